//! Concurrent fan-out/fan-in over collector tasks.
//!
//! Every collector and the quote selector run as independent tokio tasks.
//! The scheduler waits for all of them, drops the fragment of any task that
//! failed or panicked, and merges the rest in section precedence order.

use crate::error::FetchError;
use crate::models::InfoRecord;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::future::Future;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

/// Merge precedence of collector output; later sections override earlier
/// ones on key collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    System,
    Hardware,
    Desktop,
    Network,
}

/// One unit of collection work.
pub struct CollectorTask {
    pub section: Section,
    pub name: &'static str,
    job: BoxFuture<'static, anyhow::Result<InfoRecord>>,
}

impl CollectorTask {
    /// Wraps a blocking collector; it runs on the blocking thread pool.
    pub fn blocking<F>(section: Section, name: &'static str, collect: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<InfoRecord> + Send + 'static,
    {
        let job = async move {
            match tokio::task::spawn_blocking(collect).await {
                Ok(result) => result,
                Err(e) => Err(anyhow::anyhow!("blocking task aborted: {}", e)),
            }
        };
        Self::future(section, name, job)
    }

    /// Wraps an async collector.
    pub fn future<Fut>(section: Section, name: &'static str, job: Fut) -> Self
    where
        Fut: Future<Output = anyhow::Result<InfoRecord>> + Send + 'static,
    {
        Self {
            section,
            name,
            job: job.boxed(),
        }
    }
}

impl std::fmt::Debug for CollectorTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorTask")
            .field("section", &self.section)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Merged result of one collection run.
#[derive(Debug, Clone, Default)]
pub struct Gathered {
    pub record: InfoRecord,
    pub quote: Option<String>,
}

/// Builds the bounded worker pool the collection runs on.
pub fn build_runtime(units: usize) -> Result<Runtime, FetchError> {
    let workers = units.max(1);
    Builder::new_multi_thread()
        .worker_threads(workers)
        .max_blocking_threads(workers)
        .thread_name("helfetch-worker")
        .enable_all()
        .build()
        .map_err(FetchError::Runtime)
}

/// Runs all tasks and the quote selector concurrently and merges the
/// fragments. Must be called from within a tokio runtime.
pub async fn gather<Q>(tasks: Vec<CollectorTask>, quote: Q) -> Gathered
where
    Q: FnOnce() -> String + Send + 'static,
{
    let quote_handle = tokio::task::spawn_blocking(quote);

    let running: Vec<_> = tasks
        .into_iter()
        .map(|task| {
            let CollectorTask { section, name, job } = task;
            debug!("Spawning collector '{}'", name);
            let handle = tokio::spawn(job);
            async move { (section, name, handle.await) }
        })
        .collect();

    let finished = join_all(running).await;

    let mut fragments: Vec<(Section, InfoRecord)> = Vec::with_capacity(finished.len());
    for (section, name, outcome) in finished {
        let result = match outcome {
            Ok(Ok(fragment)) => Ok(fragment),
            Ok(Err(e)) => Err(FetchError::Collector {
                name,
                reason: format!("{:#}", e),
            }),
            Err(join_error) => Err(FetchError::Collector {
                name,
                reason: join_error.to_string(),
            }),
        };

        match result {
            Ok(fragment) => {
                debug!("Collector '{}' returned {} fields", name, fragment.len());
                fragments.push((section, fragment));
            }
            Err(e) => warn!("{}", e),
        }
    }

    let quote = match quote_handle.await {
        Ok(quote) => Some(quote),
        Err(e) => {
            warn!("Quote selection failed: {}", e);
            None
        }
    };

    Gathered {
        record: merge(fragments),
        quote,
    }
}

/// Merges fragments in section order. The sort is stable, so fragments of
/// the same section keep their submission order.
pub fn merge(mut fragments: Vec<(Section, InfoRecord)>) -> InfoRecord {
    fragments.sort_by_key(|(section, _)| *section);

    let mut merged = InfoRecord::new();
    for (_, fragment) in fragments {
        merged.extend(fragment);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fragment(pairs: &[(&str, &str)]) -> InfoRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_section_order() {
        assert!(Section::System < Section::Hardware);
        assert!(Section::Hardware < Section::Desktop);
        assert!(Section::Desktop < Section::Network);
    }

    #[test]
    fn test_merge_precedence_ignores_submission_order() {
        let merged = merge(vec![
            (Section::Network, fragment(&[("Kernel", "from-network")])),
            (Section::System, fragment(&[("Kernel", "from-system"), ("User", "a")])),
            (Section::Hardware, fragment(&[("CPU", "x")])),
        ]);

        assert_eq!(merged.get("Kernel"), Some("from-network"));
        let keys: Vec<_> = merged.keys().collect();
        assert_eq!(keys, vec!["Kernel", "User", "CPU"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_gather_merges_in_precedence_order() {
        let tasks = vec![
            CollectorTask::future(Section::Network, "network", async {
                // Finishes last but still wins on collision.
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(fragment(&[("Kernel", "6.8.0"), ("Local IP", "10.0.0.2")]))
            }),
            CollectorTask::blocking(Section::System, "system", || {
                Ok(fragment(&[("User", "alice"), ("Kernel", "4.15.0")]))
            }),
            CollectorTask::blocking(Section::Hardware, "hardware", || {
                Ok(fragment(&[("CPU", "Ryzen")]))
            }),
        ];

        let gathered = gather(tasks, || "quote".to_string()).await;

        assert_eq!(gathered.record.get("Kernel"), Some("6.8.0"));
        let keys: Vec<_> = gathered.record.keys().collect();
        assert_eq!(keys, vec!["User", "Kernel", "CPU", "Local IP"]);
        assert_eq!(gathered.quote.as_deref(), Some("quote"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failing_collectors_are_isolated() {
        let tasks = vec![
            CollectorTask::blocking(Section::System, "system", || {
                Ok(fragment(&[("User", "alice")]))
            }),
            CollectorTask::blocking(Section::Hardware, "hardware", || {
                Err(anyhow::anyhow!("sensors unavailable"))
            }),
            CollectorTask::blocking(Section::Desktop, "desktop", || -> anyhow::Result<InfoRecord> {
                panic!("desktop collector exploded")
            }),
            CollectorTask::future(Section::Network, "network", async {
                Ok(fragment(&[("Local IP", "10.0.0.2")]))
            }),
        ];

        let gathered = gather(tasks, || "q".to_string()).await;

        assert_eq!(gathered.record.len(), 2);
        assert_eq!(gathered.record.get("User"), Some("alice"));
        assert_eq!(gathered.record.get("Local IP"), Some("10.0.0.2"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_quote_is_none() {
        let tasks = vec![CollectorTask::blocking(Section::System, "system", || {
            Ok(fragment(&[("User", "alice")]))
        })];

        let gathered = gather(tasks, || -> String { panic!("no quotes") }).await;

        assert!(gathered.quote.is_none());
        assert_eq!(gathered.record.get("User"), Some("alice"));
    }

    #[test]
    fn test_gather_without_tasks() {
        let gathered = tokio_test::block_on(gather(Vec::new(), || "only quote".to_string()));

        assert!(gathered.record.is_empty());
        assert_eq!(gathered.quote.as_deref(), Some("only quote"));
    }

    #[test]
    fn test_build_runtime_runs_gather() {
        let runtime = build_runtime(3).unwrap();
        let tasks = vec![CollectorTask::blocking(Section::System, "system", || {
            Ok(fragment(&[("Host", "box")]))
        })];

        let gathered = runtime.block_on(gather(tasks, || "q".to_string()));
        assert_eq!(gathered.record.get("Host"), Some("box"));
    }
}
