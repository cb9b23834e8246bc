use crate::models::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A named, saved conversation for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub name: String,
    pub weekday: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

/// `subject id -> sessions`; order inside a subject is not meaningful.
pub type SessionsBySubject = HashMap<String, Vec<ChatSession>>;

impl ChatSession {
    pub fn new(name: impl Into<String>, messages: Vec<Message>) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            weekday: created_at.format("%A").to_string(),
            created_at,
            messages,
        }
    }
}

pub fn find_session<'a>(
    sessions: &'a SessionsBySubject,
    subject_id: &str,
    session_id: &str,
) -> Option<&'a ChatSession> {
    sessions
        .get(subject_id)?
        .iter()
        .find(|session| session.id == session_id)
}

/// Copy of `sessions` with one session renamed. `None` when the new name is
/// blank or the session does not exist.
pub fn renamed(
    sessions: &SessionsBySubject,
    subject_id: &str,
    session_id: &str,
    new_name: &str,
) -> Option<SessionsBySubject> {
    let name = new_name.trim();
    if name.is_empty() || find_session(sessions, subject_id, session_id).is_none() {
        return None;
    }
    let mut updated = sessions.clone();
    if let Some(list) = updated.get_mut(subject_id) {
        for session in list.iter_mut().filter(|s| s.id == session_id) {
            session.name = name.to_string();
        }
    }
    Some(updated)
}
