use chrono::{Duration, Local, NaiveDate};
use domain::attempt_policy::{
    attempts_key, completion_key, day_label, AttemptPolicy, AttemptRecord, AttemptStatus,
};
use domain::error::AttemptError;
use domain::storage::KeyValueStore;
use shared::types::Result;
use std::sync::Arc;

/// Per-day attempt counter for one challenge activity (e.g. "grammar").
pub struct DailyAttemptTracker {
    store: Arc<dyn KeyValueStore>,
    activity: String,
    policy: AttemptPolicy,
}

impl DailyAttemptTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, activity: &str) -> Self {
        Self {
            store,
            activity: activity.trim().to_lowercase(),
            policy: AttemptPolicy::default(),
        }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    fn is_completed(&self, day: NaiveDate) -> Result<bool> {
        Ok(self.store.get(&completion_key(&self.activity, day))?.as_deref() == Some("true"))
    }

    fn recorded_attempts(&self, day: NaiveDate) -> Result<Option<u32>> {
        let Some(raw) = self.store.get(&attempts_key(&self.activity, day))? else {
            return Ok(None);
        };
        match serde_json::from_str::<AttemptRecord>(&raw) {
            Ok(record) => Ok(Some(record.attempts)),
            Err(e) => {
                tracing::warn!(activity = %self.activity, error = %e, "corrupt attempt record");
                Ok(Some(0))
            }
        }
    }

    /// Current state for `day`. A day without a record clears yesterday's keys.
    pub fn status(&self, day: NaiveDate) -> Result<AttemptStatus> {
        let completed = self.is_completed(day)?;
        let attempts = match self.recorded_attempts(day)? {
            Some(attempts) => attempts,
            None => {
                let yesterday = day - Duration::days(1);
                self.store.delete(&attempts_key(&self.activity, yesterday))?;
                self.store.delete(&completion_key(&self.activity, yesterday))?;
                0
            }
        };
        Ok(self.policy.evaluate(attempts, completed))
    }

    /// Count one more attempt. Locked activities are rejected untouched.
    pub fn record_attempt(&self, day: NaiveDate) -> std::result::Result<u32, AttemptError> {
        let attempts = match self.status(day)? {
            AttemptStatus::Locked(reason) => return Err(AttemptError::Locked(reason)),
            AttemptStatus::Open { attempts, .. } => attempts + 1,
        };
        let record = AttemptRecord {
            attempts,
            date: day_label(day),
        };
        let serialized = serde_json::to_string(&record).map_err(anyhow::Error::from)?;
        self.store
            .set(&attempts_key(&self.activity, day), &serialized)?;
        tracing::info!(activity = %self.activity, attempts, "attempt recorded");
        Ok(attempts)
    }

    pub fn mark_completed(&self, day: NaiveDate) -> Result<()> {
        self.store.set(&completion_key(&self.activity, day), "true")?;
        tracing::info!(activity = %self.activity, "activity completed");
        Ok(())
    }
}
