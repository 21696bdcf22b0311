//! In-memory task store
//!
//! Concurrent map of task records. Terminal records are immutable: a late
//! progress callback from a finished job cannot resurrect the task. A
//! retention sweep evicts terminal records after a TTL so the map does not
//! grow without bound.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use super::{TaskId, TaskRecord};

struct StoredRecord {
    record: TaskRecord,
    updated_at: Instant,
}

/// Concurrent store of task records keyed by task id
#[derive(Default)]
pub struct TaskStore {
    tasks: DashMap<TaskId, StoredRecord>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `id`
    pub fn insert(&self, id: TaskId, record: TaskRecord) {
        self.tasks.insert(
            id,
            StoredRecord {
                record,
                updated_at: Instant::now(),
            },
        );
    }

    /// Update the record for `id`. Ignored when the current record is
    /// terminal or the task is unknown.
    pub fn update(&self, id: TaskId, record: TaskRecord) {
        if let Some(mut entry) = self.tasks.get_mut(&id) {
            if entry.record.status.is_terminal() {
                debug!(task = %id, "ignoring update to terminal task");
                return;
            }
            entry.record = record;
            entry.updated_at = Instant::now();
        }
    }

    /// Current record for `id`, if known
    pub fn get(&self, id: &TaskId) -> Option<TaskRecord> {
        self.tasks.get(id).map(|e| e.record.clone())
    }

    /// Number of tracked tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Remove terminal records older than `ttl`. Returns how many were
    /// evicted. Live tasks are never touched.
    pub fn prune(&self, ttl: Duration) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|_, stored| !stored.record.status.is_terminal() || stored.updated_at.elapsed() < ttl);
        let evicted = before - self.tasks.len();
        if evicted > 0 {
            debug!(evicted, "pruned finished tasks");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use uuid::Uuid;

    #[test]
    fn test_insert_and_get() {
        let store = TaskStore::new();
        let id = Uuid::new_v4();
        store.insert(id, TaskRecord::queued());
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Queued);
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_progresses_live_task() {
        let store = TaskStore::new();
        let id = Uuid::new_v4();
        store.insert(id, TaskRecord::queued());
        store.update(id, TaskRecord::running("Generating chunk 1/3...", 33));

        let record = store.get(&id).unwrap();
        assert_eq!(record.status, TaskStatus::Running);
        assert_eq!(record.percent, 33);
    }

    #[test]
    fn test_terminal_record_is_immutable() {
        let store = TaskStore::new();
        let id = Uuid::new_v4();
        store.insert(id, TaskRecord::complete("/audio/done.wav"));
        store.update(id, TaskRecord::running("late callback", 50));

        let record = store.get(&id).unwrap();
        assert_eq!(record.status, TaskStatus::Complete);
        assert_eq!(record.audio_url.as_deref(), Some("/audio/done.wav"));
    }

    #[test]
    fn test_update_unknown_task_is_noop() {
        let store = TaskStore::new();
        store.update(Uuid::new_v4(), TaskRecord::running("x", 1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_prune_evicts_only_old_terminal_records() {
        let store = TaskStore::new();
        let finished = Uuid::new_v4();
        let live = Uuid::new_v4();
        store.insert(finished, TaskRecord::error("boom"));
        store.insert(live, TaskRecord::running("working", 10));

        assert_eq!(store.prune(Duration::from_secs(3600)), 0);
        assert_eq!(store.len(), 2);

        assert_eq!(store.prune(Duration::ZERO), 1);
        assert!(store.get(&finished).is_none());
        assert!(store.get(&live).is_some());
    }
}
