//! Colorized report rendering.
//!
//! The report is built as a list of lines: the aligned info table, an
//! optional recommendations block, an optional logo, and an optional quote.
//! Column alignment is computed on visual width, so escape sequences that
//! end up inside keys never shift the value column.

use crate::analysis::parse_percent;
use crate::display::palette::{Color, ColorScheme, RESET};
use crate::models::{fields, InfoRecord, Recommendation, NOT_AVAILABLE};
use regex::Regex;
use std::sync::OnceLock;

const RECOMMENDATIONS_HEADER: &str = "--- System Recommendations ---";
const RECOMMENDATIONS_FOOTER: &str = "----------------------------";

/// Fields that get a usage bar when bars are enabled.
const BAR_FIELDS: [&str; 3] = [fields::CPU_USAGE, fields::RAM_USAGE, fields::DISK];

/// Everything needed to render one report.
#[derive(Debug, Clone)]
pub struct RenderSpec<'a> {
    pub record: &'a InfoRecord,
    pub logo: Option<&'a [&'a str]>,
    pub quote: Option<&'a str>,
    pub recommendations: Option<&'a [Recommendation]>,
    pub scheme: ColorScheme,
    /// Bar length for usage bars; `None` disables them.
    pub usage_bars: Option<usize>,
}

impl<'a> RenderSpec<'a> {
    /// A spec with only the info table and the default colors.
    pub fn new(record: &'a InfoRecord) -> Self {
        Self {
            record,
            logo: None,
            quote: None,
            recommendations: None,
            scheme: ColorScheme::default(),
            usage_bars: None,
        }
    }
}

fn ansi_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\x1b(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI pattern is valid")
    })
}

/// Removes ANSI escape sequences from `text`.
pub fn strip_ansi(text: &str) -> std::borrow::Cow<'_, str> {
    ansi_pattern().replace_all(text, "")
}

/// Character count of `text` once escape sequences are removed.
pub fn visual_width(text: &str) -> usize {
    strip_ansi(text).chars().count()
}

/// Width of the key column: the widest visible key, excluding the
/// multi-line process block.
pub fn key_column_width(record: &InfoRecord) -> usize {
    record
        .keys()
        .filter(|key| *key != fields::TOP_PROCESSES)
        .map(visual_width)
        .max()
        .unwrap_or(0)
}

/// Renders a bracketed bar for `percentage`, clamped to 0..=100.
pub fn progress_bar(percentage: f64, bar_length: usize) -> String {
    let clamped = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };
    let filled = ((bar_length as f64 * clamped / 100.0) as usize).min(bar_length);
    let empty = bar_length - filled;

    format!(
        "[{}{}{}{}{}]",
        Color::Green,
        "█".repeat(filled),
        Color::White,
        "-".repeat(empty),
        RESET
    )
}

/// Renders the whole report as newline-joined lines.
pub fn format_report(spec: &RenderSpec<'_>) -> String {
    let mut lines = table_lines(spec);

    // Separator after the table
    lines.push(String::new());

    if let Some(recommendations) = spec.recommendations.filter(|r| !r.is_empty()) {
        lines.extend(recommendation_lines(recommendations, spec.scheme.recommendation));
    }

    if let Some(logo) = spec.logo.filter(|l| !l.is_empty()) {
        lines.extend(logo.iter().map(|line| spec.scheme.logo.paint(line)));
        lines.push(String::new());
    }

    if let Some(quote) = spec.quote.filter(|q| !q.is_empty()) {
        lines.push(spec.scheme.quote.paint(&format!("\"{}\"", quote)));
    }

    lines.join("\n")
}

fn table_lines(spec: &RenderSpec<'_>) -> Vec<String> {
    let width = key_column_width(spec.record);
    let key_color = spec.scheme.info_key;
    let value_color = spec.scheme.info_value;
    let mut lines = Vec::with_capacity(spec.record.len());

    for (key, value) in spec.record.iter() {
        if key == fields::TOP_PROCESSES {
            lines.extend(process_block(key, value, key_color, value_color));
            continue;
        }

        let padding = " ".repeat(width.saturating_sub(visual_width(key)));
        let shown = match spec.usage_bars {
            Some(length) => with_usage_bar(key, value, length),
            None => value.to_string(),
        };

        lines.push(format!(
            "{} {}",
            key_color.paint(&format!("{}{}:", key, padding)),
            value_color.paint(&shown)
        ));
    }

    lines
}

fn process_block(key: &str, value: &str, key_color: Color, value_color: Color) -> Vec<String> {
    let mut lines = vec![key_color.paint(&format!("{}:", key))];

    if value.is_empty() || value == NOT_AVAILABLE {
        lines.push(format!("  {}", value_color.paint(NOT_AVAILABLE)));
    } else {
        lines.extend(
            value
                .split('\n')
                .map(|segment| format!("  {}", value_color.paint(segment.trim()))),
        );
    }

    lines
}

fn recommendation_lines(recommendations: &[Recommendation], color: Color) -> Vec<String> {
    let mut lines = Vec::with_capacity(recommendations.len() + 3);
    lines.push(color.paint(RECOMMENDATIONS_HEADER));
    lines.extend(
        recommendations
            .iter()
            .map(|rec| color.paint(&format!("- {}", rec))),
    );
    lines.push(color.paint(RECOMMENDATIONS_FOOTER));
    lines.push(String::new());
    lines
}

fn with_usage_bar(key: &str, value: &str, length: usize) -> String {
    if !BAR_FIELDS.contains(&key) {
        return value.to_string();
    }
    match parse_percent(value) {
        Some(pct) => format!("{} {}", value, progress_bar(pct, length)),
        None => value.to_string(),
    }
}
