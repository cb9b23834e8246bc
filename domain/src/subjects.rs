use crate::models::Message;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

const fn subject(id: &'static str, name: &'static str, category: &'static str) -> Subject {
    Subject { id, name, category }
}

pub const SUBJECTS: &[Subject] = &[
    subject("english", "English", "Academics"),
    subject("kannada", "Kannada", "Academics"),
    subject("mathematics", "Mathematics", "Academics"),
    subject("science", "Science", "Academics"),
    subject("social_science", "Social Studies", "Academics"),
    subject("physics", "Physics", "Academics"),
    subject("chemistry", "Chemistry", "Academics"),
    subject("biology", "Biology", "Academics"),
    subject("history", "History", "Academics"),
    subject("python", "Python Programming", "Programming"),
    subject("javascript", "JavaScript Basics", "Programming"),
    subject("web_dev", "Web Development", "Programming"),
    subject("data_science", "Data Science", "Programming"),
];

/// Subjects whose answers should be written with LaTeX.
pub const MATH_HEAVY_SUBJECTS: &[&str] = &["mathematics", "physics", "chemistry"];

pub fn find_subject(id: &str) -> Option<Subject> {
    let normalized = id.trim().to_lowercase();
    let normalized = if normalized == "math" {
        "mathematics".to_string()
    } else {
        normalized
    };
    SUBJECTS.iter().copied().find(|s| s.id == normalized)
}

impl Subject {
    pub fn is_math_heavy(&self) -> bool {
        MATH_HEAVY_SUBJECTS.contains(&self.id)
    }

    pub fn welcome_message(&self) -> Message {
        Message::bot(format!(
            "Welcome to {name}! I am your personal AI assistant for this subject. Feel free to ask me anything related to {name}.",
            name = self.name
        ))
    }
}
