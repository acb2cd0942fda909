//! Data models for the system fetcher.
//!
//! This module contains the ordered info record that every collector
//! produces and that the formatter and recommendation engine consume.

/// Sentinel for a fact that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

/// Well-known field names shared by collectors, analysis, and display.
pub mod fields {
    pub const USER: &str = "User";
    pub const HOST: &str = "Host";
    pub const OS: &str = "OS";
    pub const KERNEL: &str = "Kernel";
    pub const UPTIME: &str = "Uptime";
    pub const SHELL: &str = "Shell";
    pub const TERMINAL: &str = "Terminal";
    pub const PACKAGES: &str = "Packages";
    pub const TOP_PROCESSES: &str = "Top Processes";

    pub const CPU: &str = "CPU";
    pub const CPU_USAGE: &str = "CPU Usage";
    pub const CPU_TEMP: &str = "CPU Temp";
    pub const RAM: &str = "RAM";
    pub const RAM_USAGE: &str = "RAM Usage %";
    pub const DISK: &str = "Disk";
    pub const DISK_IO: &str = "Disk I/O";
    pub const GPU: &str = "GPU";
    pub const BATTERY: &str = "Battery";

    pub const DE: &str = "DE";
    pub const WM: &str = "WM";
    pub const SESSION: &str = "Session";
    pub const RESOLUTION: &str = "Resolution";
    pub const THEME: &str = "Theme";

    pub const LOCAL_IP: &str = "Local IP";
    pub const PUBLIC_IP: &str = "Public IP";
    pub const ISP: &str = "ISP";
    pub const CITY: &str = "City";
    pub const COUNTRY: &str = "Country";
    pub const BANDWIDTH: &str = "Bandwidth Usage";
}

/// One piece of human-readable advice produced by the analysis.
pub type Recommendation = String;

/// Ordered mapping from field name to display value.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps
/// the key at its original position, so display order is decided by the
/// first fragment that mentioned the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoRecord {
    entries: Vec<(String, String)>,
}

impl InfoRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Inserts a field, substituting the sentinel when the value is unknown.
    pub fn insert_or_na(&mut self, key: impl Into<String>, value: Option<String>) {
        self.insert(key, value.unwrap_or_else(|| NOT_AVAILABLE.to_string()));
    }

    /// Merges `other` into this record; `other` wins on key collisions.
    pub fn extend(&mut self, other: InfoRecord) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of a field unless it is missing or the sentinel.
    pub fn known(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| *v != NOT_AVAILABLE)
    }

    /// Iterates over fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InfoRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = InfoRecord::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}
