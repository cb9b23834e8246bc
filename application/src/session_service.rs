use domain::models::Message;
use domain::session::{self, ChatSession, SessionsBySubject};
use domain::storage::{KeyValueStore, SESSIONS_KEY};
use shared::types::Result;
use std::sync::Arc;

use crate::json_store::{read_or_default, write_json};

/// Named chat sessions per subject, persisted as one JSON document.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Never fails: absent or corrupt data reads as an empty map.
    pub fn load_sessions(&self) -> SessionsBySubject {
        read_or_default(self.store.as_ref(), SESSIONS_KEY)
    }

    pub fn save_sessions(&self, sessions: &SessionsBySubject) -> Result<()> {
        write_json(self.store.as_ref(), SESSIONS_KEY, sessions)
    }

    pub fn sessions_for(&self, subject_id: &str) -> Vec<ChatSession> {
        self.load_sessions().remove(subject_id).unwrap_or_default()
    }

    pub fn find_session(&self, subject_id: &str, session_id: &str) -> Option<ChatSession> {
        session::find_session(&self.load_sessions(), subject_id, session_id).cloned()
    }

    pub fn create_session(
        &self,
        subject_id: &str,
        name: &str,
        messages: Vec<Message>,
    ) -> Result<ChatSession> {
        let mut sessions = self.load_sessions();
        let created = ChatSession::new(name.trim(), messages);
        sessions
            .entry(subject_id.to_string())
            .or_default()
            .push(created.clone());
        self.save_sessions(&sessions)?;
        tracing::info!(subject_id, session_id = %created.id, "session created");
        Ok(created)
    }

    /// Overwrite the log of an existing session. Returns false when unknown.
    pub fn update_messages(
        &self,
        subject_id: &str,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<bool> {
        let mut sessions = self.load_sessions();
        let Some(target) = sessions
            .get_mut(subject_id)
            .and_then(|list| list.iter_mut().find(|s| s.id == session_id))
        else {
            return Ok(false);
        };
        target.messages = messages;
        self.save_sessions(&sessions)?;
        Ok(true)
    }

    /// Rename and persist the whole map. Blank names and unknown ids are a
    /// no-op returning false.
    pub fn rename_session(&self, subject_id: &str, session_id: &str, new_name: &str) -> Result<bool> {
        let sessions = self.load_sessions();
        match session::renamed(&sessions, subject_id, session_id, new_name) {
            Some(updated) => {
                self.save_sessions(&updated)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_session(&self, subject_id: &str, session_id: &str) -> Result<bool> {
        let mut sessions = self.load_sessions();
        let Some(list) = sessions.get_mut(subject_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|s| s.id != session_id);
        if list.len() == before {
            return Ok(false);
        }
        self.save_sessions(&sessions)?;
        Ok(true)
    }
}
