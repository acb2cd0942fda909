//! Error types for collection and orchestration.

use thiserror::Error;

/// Failures the fetch pipeline distinguishes.
///
/// Field-level problems never surface here; collectors fold them into the
/// `N/A` sentinel. This enum covers a whole unit of work failing and the
/// worker pool itself failing to start.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    Runtime(#[source] std::io::Error),

    /// A collector returned an error or panicked; its fragment is dropped.
    #[error("collector '{name}' failed: {reason}")]
    Collector { name: &'static str, reason: String },

    /// The HTTP client for network lookups could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_error_message() {
        let err = FetchError::Collector {
            name: "network",
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "collector 'network' failed: boom");
    }

    #[test]
    fn test_runtime_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads");
        let err = FetchError::Runtime(io);
        assert!(err.to_string().contains("worker pool"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
