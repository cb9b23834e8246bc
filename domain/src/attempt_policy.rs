use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_DAILY_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempts: u32,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    AttemptsExhausted,
    CompletedToday,
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttemptsExhausted => write!(f, "no attempts left today"),
            Self::CompletedToday => write!(f, "already completed today"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Open { attempts: u32, remaining: u32 },
    Locked(LockReason),
}

impl AttemptStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }
}

#[derive(Debug, Clone)]
pub struct AttemptPolicy {
    pub max_attempts: u32,
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_DAILY_ATTEMPTS,
        }
    }
}

impl AttemptPolicy {
    pub fn evaluate(&self, attempts: u32, completed: bool) -> AttemptStatus {
        if completed {
            AttemptStatus::Locked(LockReason::CompletedToday)
        } else if attempts >= self.max_attempts {
            AttemptStatus::Locked(LockReason::AttemptsExhausted)
        } else {
            AttemptStatus::Open {
                attempts,
                remaining: self.max_attempts - attempts,
            }
        }
    }
}

/// Day label in the `Mon Oct 19 2026` form used inside storage keys.
pub fn day_label(day: NaiveDate) -> String {
    day.format("%a %b %d %Y").to_string()
}

pub fn attempts_key(activity: &str, day: NaiveDate) -> String {
    format!("{activity}-attempts-{}", day_label(day))
}

pub fn completion_key(activity: &str, day: NaiveDate) -> String {
    format!("{activity}-completed-{}", day_label(day))
}
