//! Small helpers for best-effort subprocess calls and file reads.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs `program` with `args` and returns its stdout when it exits
/// successfully. Missing binaries and non-zero exits yield `None`.
pub fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => {
            debug!("{} exited with {}", program, output.status);
            None
        }
        Err(e) => {
            debug!("Failed to run {}: {}", program, e);
            None
        }
    }
}

/// Reads a file to a string, logging and swallowing errors.
pub fn read(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Reads a file and returns its trimmed content if non-empty.
pub fn read_trimmed(path: impl AsRef<Path>) -> Option<String> {
    read(path)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads a non-empty environment variable.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Bytes to mebibytes, as the report shows them.
pub fn mebibytes(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
}
