use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LearningStyle {
    #[serde(rename = "visual")]
    Visual,
    #[serde(rename = "auditory")]
    Auditory,
    #[serde(rename = "kinesthetic")]
    Kinesthetic,
    #[default]
    #[serde(rename = "read/write")]
    ReadWrite,
}

impl LearningStyle {
    /// Case-insensitive; anything unrecognised is treated as read/write.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "visual" => Self::Visual,
            "auditory" => Self::Auditory,
            "kinesthetic" => Self::Kinesthetic,
            _ => Self::ReadWrite,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::ReadWrite => "read/write",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceLevel {
    Good,
    #[default]
    Average,
    Weak,
}

impl PerformanceLevel {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "good" => Self::Good,
            "weak" => Self::Weak,
            _ => Self::Average,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Average => "average",
            Self::Weak => "weak",
        }
    }

    /// Level after the student asks for a simpler explanation.
    pub fn lowered(&self) -> Self {
        match self {
            Self::Good => Self::Average,
            Self::Average | Self::Weak => Self::Weak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Good,
    Adjust,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedVideo {
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_list: Option<Vec<RelatedVideo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_math: Option<String>,
    /// Only read from stored sessions; live ratings are kept by the chat service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    fn new(text: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            is_bot,
            timestamp: Utc::now(),
            video_list: None,
            extracted_math: None,
            feedback: None,
        }
    }

    pub fn with_videos(mut self, videos: Option<Vec<RelatedVideo>>) -> Self {
        self.video_list = videos;
        self
    }

    pub fn with_extracted_math(mut self, math: Option<String>) -> Self {
        self.extracted_math = math;
        self
    }
}

/// Profile owned by the account backend; only read here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub performance_levels: Option<HashMap<String, String>>,
}

impl UserData {
    pub fn learning_style(&self) -> LearningStyle {
        self.learning_style
            .as_deref()
            .map(LearningStyle::parse)
            .unwrap_or_default()
    }

    pub fn performance_for(&self, subject_name: &str) -> Option<PerformanceLevel> {
        self.performance_levels
            .as_ref()
            .and_then(|levels| levels.get(subject_name))
            .map(|level| PerformanceLevel::parse(level))
    }
}

/// One hit from the tutorial search used by the study planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSuggestion {
    pub title: String,
    pub video_id: String,
    pub thumbnail: String,
    pub url: String,
}
