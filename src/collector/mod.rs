//! Fact collectors and the scheduler that runs them.
//!
//! Each collector produces one `InfoRecord` fragment. The system, hardware,
//! and desktop collectors block on subprocesses and file reads and run on
//! the blocking pool; the network collector is async.

pub mod command;
pub mod desktop;
pub mod hardware;
pub mod network;
pub mod scheduler;
pub mod system;

pub use scheduler::{build_runtime, gather, CollectorTask, Section};

use crate::config::Config;

/// The standard collector set, in declaration order.
pub fn default_tasks(config: &Config) -> Vec<CollectorTask> {
    vec![
        CollectorTask::blocking(Section::System, "system", system::collect),
        CollectorTask::blocking(Section::Hardware, "hardware", hardware::collect),
        CollectorTask::blocking(Section::Desktop, "desktop", desktop::collect),
        CollectorTask::future(
            Section::Network,
            "network",
            network::collect(config.network.clone()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tasks_cover_every_section() {
        let tasks = default_tasks(&Config::default());
        let sections: Vec<Section> = tasks.iter().map(|t| t.section).collect();

        assert_eq!(
            sections,
            vec![
                Section::System,
                Section::Hardware,
                Section::Desktop,
                Section::Network
            ]
        );
    }
}
