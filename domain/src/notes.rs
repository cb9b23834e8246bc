use crate::models::Message;
use shared::types::Result;
use std::path::Path;

pub const MATH_SECTION_TITLE: &str = "Mathematical Content:";
pub const DEFAULT_NOTES_FILE: &str = "chat_notes.docx";

/// One answer prepared for export: the reply text and its math digest.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyNotes {
    pub answer: String,
    pub math: Option<String>,
}

impl StudyNotes {
    pub fn from_message(message: &Message) -> Self {
        Self {
            answer: message.text.trim().to_string(),
            math: message
                .extracted_math
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.answer.is_empty() && self.math.is_none()
    }
}

/// Document renderer for exported notes.
pub trait NotesExporter {
    fn export(&self, notes: &StudyNotes, path: &Path) -> Result<()>;
}
