//! ASCII logos, stored raw; the formatter applies color.

/// Distribution name the default logo belongs to.
pub const DEFAULT_DISTRO: &str = "Helwan Linux";

const HELWAN_LOGO: &str = r"
▖▖   ▜
▙▌█▌▐ ▌▌▌▀▌▛▌
▌▌▙▖▐▖▚▚▘█▌▌▌
";

/// Returns the logo lines for a distribution, if one is known.
pub fn for_distro(os_name: &str) -> Option<Vec<&'static str>> {
    if os_name.contains(DEFAULT_DISTRO) {
        return Some(HELWAN_LOGO.trim().lines().collect());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helwan_logo() {
        let lines = for_distro("Helwan Linux").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_unknown_distro() {
        assert!(for_distro("Fedora Linux 40").is_none());
    }
}
