use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechStatus {
    #[default]
    Idle,
    Speaking,
    Paused,
}

/// Speech synthesis capability (browser `speechSynthesis` or a local engine).
pub trait TextToSpeech {
    fn speak(&mut self, text: &str);
    fn cancel(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn status(&self) -> SpeechStatus;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    NoSpeech,
    NotAllowed,
    Network,
    Aborted,
    AudioCapture,
    Unsupported,
    Other(String),
}

impl RecognitionError {
    /// Map the reason strings speech engines report.
    pub fn from_reason(reason: &str) -> Self {
        match reason {
            "no-speech" => Self::NoSpeech,
            "not-allowed" | "service-not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "unsupported" => Self::Unsupported,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => write!(f, "no-speech"),
            Self::NotAllowed => write!(f, "not-allowed"),
            Self::Network => write!(f, "network"),
            Self::Aborted => write!(f, "aborted"),
            Self::AudioCapture => write!(f, "audio-capture"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Other(reason) => write!(f, "{reason}"),
        }
    }
}

/// One-shot speech recognition (single utterance, final results only).
pub trait SpeechRecognizer {
    fn listen(&mut self) -> Result<String, RecognitionError>;
    fn stop(&mut self);
}
