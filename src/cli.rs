//! Command-line interface argument parsing.
//!
//! The interface is deliberately tiny: one flag. Colors, sections, and
//! network settings live in the configuration file.

use clap::Parser;

/// Helfetch - system information fetcher for Helwan Linux
///
/// Prints host, hardware, desktop, and network facts as an aligned,
/// colorized table with performance recommendations, the Helwan Linux
/// logo, and an inspirational quote.
///
/// Configuration is read from $HELFETCH_CONFIG or
/// ~/.config/helfetch/config.toml when present.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Do not display the Helwan Linux ASCII art logo
    #[arg(long)]
    pub no_logo: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let args = Args::try_parse_from(["helfetch"]).unwrap();
        assert!(!args.no_logo);
    }

    #[test]
    fn test_no_logo_flag() {
        let args = Args::try_parse_from(["helfetch", "--no-logo"]).unwrap();
        assert!(args.no_logo);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Args::try_parse_from(["helfetch", "--json"]).is_err());
        assert!(Args::try_parse_from(["helfetch", "extra"]).is_err());
    }
}
