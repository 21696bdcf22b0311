//! Task coordinator
//!
//! Launches generation jobs on the blocking thread pool, bridges their
//! progress callbacks into the task store, and exposes a polling stream
//! that drives server-sent events.
//!
//! A task is visible in the store before `launch` returns, so a client can
//! subscribe to the id it just received and always see at least a Queued
//! record.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::core::progress::ProgressReporter;
use crate::pipeline::GenerationPipeline;
use crate::task::{TaskId, TaskRecord, TaskStore};

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Interval between record emissions on a subscription stream
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long finished task records are kept before eviction
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_retention_secs() -> u64 {
    3600
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            retention_secs: default_retention_secs(),
        }
    }
}

/// Owns the task store and drives background generation jobs
pub struct TaskCoordinator {
    store: Arc<TaskStore>,
    pipeline: Arc<GenerationPipeline>,
    config: CoordinatorConfig,
}

impl TaskCoordinator {
    pub fn new(pipeline: Arc<GenerationPipeline>, config: CoordinatorConfig) -> Self {
        Self {
            store: Arc::new(TaskStore::new()),
            pipeline,
            config,
        }
    }

    /// The underlying task store
    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Launch a generation job and return its task id.
    ///
    /// The Queued record is inserted before the job is spawned; the id is
    /// always resolvable by the time the caller sees it.
    pub fn launch(&self, text: String, model_id: String, language: Option<String>) -> TaskId {
        let task_id = Uuid::new_v4();
        self.store.insert(task_id, TaskRecord::queued());
        info!(task = %task_id, model = %model_id, "task queued");

        let store = self.store.clone();
        let pipeline = self.pipeline.clone();
        tokio::task::spawn_blocking(move || {
            let progress_store = store.clone();
            let reporter = ProgressReporter::new(move |stage, percent| {
                progress_store.update(task_id, TaskRecord::running(stage, percent));
            });

            let result = pipeline.generate(&text, &model_id, language.as_deref(), &reporter);
            match result {
                Ok(artifact) => {
                    info!(task = %task_id, file = %artifact.file_name, "task complete");
                    store.update(
                        task_id,
                        TaskRecord::complete(format!("/audio/{}", artifact.file_name)),
                    );
                }
                Err(e) => {
                    error!(task = %task_id, error = %e, "task failed");
                    store.update(task_id, TaskRecord::error(e.to_string()));
                }
            }
        });

        task_id
    }

    /// Stream of records for `task_id`, one per poll interval.
    ///
    /// The first record is emitted immediately; the stream ends after a
    /// terminal record. An unknown id yields a single error record.
    pub fn subscribe(&self, task_id: TaskId) -> impl Stream<Item = TaskRecord> {
        let store = self.store.clone();
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms.max(1));

        stream::unfold((true, false), move |(first, done)| {
            let store = store.clone();
            async move {
                if done {
                    return None;
                }
                if !first {
                    tokio::time::sleep(poll_interval).await;
                }

                let record = store
                    .get(&task_id)
                    .unwrap_or_else(|| TaskRecord::error("Task not found"));
                let terminal = record.status.is_terminal();
                Some((record, (false, terminal)))
            }
        })
    }

    /// Spawn the periodic sweep that evicts finished task records
    pub fn spawn_retention_sweeper(self: &Arc<Self>) {
        let coordinator = self.clone();
        let ttl = Duration::from_secs(self.config.retention_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ttl);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                coordinator.store.prune(ttl);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use futures::StreamExt;

    fn coordinator() -> Arc<TaskCoordinator> {
        use crate::engine::{EngineCache, EngineHandle, EngineKind, RawAudio, SpeechEngine};
        use crate::pipeline::GenerationConfig;

        struct SilentEngine;
        impl SpeechEngine for SilentEngine {
            fn name(&self) -> &str {
                "silent"
            }
            fn synthesize(&self, text: &str, _language: &str) -> crate::Result<RawAudio> {
                Ok(RawAudio {
                    samples: vec![0.0; text.len()],
                    sample_rate: 16000,
                })
            }
        }

        struct SilentLoader;
        impl crate::engine::loader::EngineLoader for SilentLoader {
            fn load(
                &self,
                model_id: &str,
                _device: crate::core::device::Device,
                _reporter: &ProgressReporter,
            ) -> crate::Result<EngineHandle> {
                Ok(EngineHandle {
                    model_id: model_id.to_string(),
                    kind: EngineKind::Standard,
                    engine: Box::new(SilentEngine),
                })
            }
        }

        let cache = Arc::new(EngineCache::new(Box::new(SilentLoader), 4));
        let config = GenerationConfig {
            output_dir: std::env::temp_dir().join("bookvoice_coordinator_tests"),
            ..GenerationConfig::default()
        };
        Arc::new(TaskCoordinator::new(
            Arc::new(GenerationPipeline::new(cache, config)),
            CoordinatorConfig {
                poll_interval_ms: 10,
                retention_secs: 3600,
            },
        ))
    }

    #[tokio::test]
    async fn test_launch_is_immediately_visible() {
        let coordinator = coordinator();
        let id = coordinator.launch("Hello there.".into(), "vendor/model".into(), None);
        assert!(coordinator.store().get(&id).is_some());
    }

    #[tokio::test]
    async fn test_subscription_ends_on_terminal_record() {
        let coordinator = coordinator();
        let id = coordinator.launch("Hello there.".into(), "vendor/model".into(), None);

        let records: Vec<TaskRecord> = coordinator.subscribe(id).collect().await;
        let last = records.last().unwrap();
        assert!(last.status.is_terminal());
        assert_eq!(last.status, TaskStatus::Complete);
        assert!(last.audio_url.as_deref().unwrap().starts_with("/audio/"));
    }

    #[tokio::test]
    async fn test_unknown_task_yields_single_error() {
        let coordinator = coordinator();
        let records: Vec<TaskRecord> = coordinator.subscribe(Uuid::new_v4()).collect().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, TaskStatus::Error);
        assert_eq!(records[0].error.as_deref(), Some("Task not found"));
    }
}
