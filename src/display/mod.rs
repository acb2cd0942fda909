//! Terminal presentation: colors, logos, and the report formatter.

pub mod formatter;
pub mod logo;
pub mod palette;

pub use formatter::{format_report, RenderSpec};
pub use palette::{Color, ColorScheme};
