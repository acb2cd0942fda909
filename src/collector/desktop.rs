//! Desktop environment, window manager, session, resolution, and theme.

use super::command::{env_var, run};
use crate::models::{fields, InfoRecord};
use anyhow::Result;
use tracing::debug;

/// Collects the desktop section.
pub fn collect() -> Result<InfoRecord> {
    let mut info = InfoRecord::new();

    info.insert_or_na(
        fields::DE,
        env_var("XDG_CURRENT_DESKTOP").or_else(|| env_var("DESKTOP_SESSION")),
    );
    info.insert_or_na(fields::WM, window_manager());
    info.insert_or_na(fields::SESSION, env_var("XDG_SESSION_TYPE"));
    info.insert_or_na(
        fields::RESOLUTION,
        run("xrandr", &["--current"]).and_then(|out| parse_xrandr(&out)),
    );
    info.insert_or_na(
        fields::THEME,
        run(
            "gsettings",
            &["get", "org.gnome.desktop.interface", "gtk-theme"],
        )
        .and_then(|out| parse_gsettings_string(&out)),
    );

    debug!("Desktop collector produced {} fields", info.len());
    Ok(info)
}

fn window_manager() -> Option<String> {
    run("wmctrl", &["-m"])
        .and_then(|out| parse_wmctrl(&out))
        .or_else(|| env_var("XDG_SESSION_DESKTOP"))
}

/// Extracts the `Name:` line from `wmctrl -m`.
pub fn parse_wmctrl(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Name:"))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && name != "N/A")
}

/// Collects the active modes (marked `*`) from `xrandr --current`.
pub fn parse_xrandr(output: &str) -> Option<String> {
    let modes: Vec<&str> = output
        .lines()
        .filter(|line| line.starts_with(char::is_whitespace) && line.contains('*'))
        .filter_map(|line| line.split_whitespace().next())
        .collect();

    (!modes.is_empty()).then(|| modes.join(", "))
}

/// Strips the quoting gsettings puts around string values.
pub fn parse_gsettings_string(output: &str) -> Option<String> {
    let value = output.trim().trim_matches('\'').trim_matches('"').trim();
    (!value.is_empty()).then(|| value.to_string())
}
