use crate::attempt_policy::LockReason;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a reply is still loading; wait for it before sending again")]
    Busy,
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Mirrors the 400/500 split of the plan endpoints.
#[derive(Debug, Error)]
pub enum StudyPlanError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("upstream provider failed: {0}")]
    Upstream(String),
}

impl StudyPlanError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingField(_) => 400,
            Self::Upstream(_) => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("activity is locked for today ({0})")]
    Locked(LockReason),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
