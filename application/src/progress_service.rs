use domain::models::PerformanceLevel;
use domain::storage::{KeyValueStore, PROGRESS_KEY, USER_PERFORMANCE_KEY};
use shared::types::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::json_store::{read_or_default, write_json};

/// Concept scores in [0, 1] and the per-subject performance level.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
}

pub fn progress_key(concept: &str, subject: Option<&str>) -> String {
    format!("{PROGRESS_KEY}:{}:{concept}", subject.unwrap_or("general"))
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn progress(&self) -> BTreeMap<String, f64> {
        read_or_default(self.store.as_ref(), PROGRESS_KEY)
    }

    /// Add `delta` to a concept score, clamped to [0, 1]. Returns the new score.
    pub fn update_progress(&self, concept: &str, delta: f64, subject: Option<&str>) -> Result<f64> {
        let mut progress = self.progress();
        let entry = progress.entry(progress_key(concept, subject)).or_insert(0.0);
        *entry = (*entry + delta).clamp(0.0, 1.0);
        let score = *entry;
        write_json(self.store.as_ref(), PROGRESS_KEY, &progress)?;
        Ok(score)
    }

    pub fn performance_for(&self, subject_name: &str) -> Option<PerformanceLevel> {
        let levels: BTreeMap<String, PerformanceLevel> =
            read_or_default(self.store.as_ref(), USER_PERFORMANCE_KEY);
        levels.get(subject_name).copied()
    }

    pub fn set_performance(&self, subject_name: &str, level: PerformanceLevel) -> Result<()> {
        let mut levels: BTreeMap<String, PerformanceLevel> =
            read_or_default(self.store.as_ref(), USER_PERFORMANCE_KEY);
        levels.insert(subject_name.to_string(), level);
        write_json(self.store.as_ref(), USER_PERFORMANCE_KEY, &levels)
    }
}
