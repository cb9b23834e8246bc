use domain::models::LearningStyle;
use domain::speech::{RecognitionError, SpeechRecognizer, SpeechStatus, TextToSpeech};
use shared::utils::clean_text_for_tts;

/// Reads replies aloud, but only for auditory learners.
pub struct SpeechAdapter<T: TextToSpeech> {
    engine: T,
    style: LearningStyle,
}

impl<T: TextToSpeech> SpeechAdapter<T> {
    pub fn new(engine: T, style: LearningStyle) -> Self {
        Self { engine, style }
    }

    pub fn engine(&self) -> &T {
        &self.engine
    }

    /// Returns whether an utterance was started.
    pub fn speak(&mut self, text: &str) -> bool {
        if self.style != LearningStyle::Auditory {
            return false;
        }
        self.engine.cancel();
        self.engine.speak(&clean_text_for_tts(text));
        true
    }

    /// Pause while speaking, resume while paused; idle stays idle.
    pub fn toggle(&mut self) -> SpeechStatus {
        match self.engine.status() {
            SpeechStatus::Speaking => self.engine.pause(),
            SpeechStatus::Paused => self.engine.resume(),
            SpeechStatus::Idle => {}
        }
        self.engine.status()
    }

    pub fn cancel(&mut self) {
        self.engine.cancel();
    }

    pub fn status(&self) -> SpeechStatus {
        self.engine.status()
    }
}

impl<T: TextToSpeech> Drop for SpeechAdapter<T> {
    fn drop(&mut self) {
        if self.engine.status() != SpeechStatus::Idle {
            self.engine.cancel();
        }
    }
}

/// Dictation into the pending message input.
pub struct VoiceInput<R: SpeechRecognizer> {
    recognizer: R,
    recording: bool,
    last_error: Option<RecognitionError>,
}

impl<R: SpeechRecognizer> VoiceInput<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            recording: false,
            last_error: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn last_error(&self) -> Option<&RecognitionError> {
        self.last_error.as_ref()
    }

    /// Capture one utterance. The transcript replaces `pending`; failures are
    /// recorded, never raised.
    pub fn start_listening(&mut self, pending: &mut String) -> bool {
        self.recording = true;
        self.last_error = None;
        let outcome = self.recognizer.listen();
        self.recording = false;
        match outcome {
            Ok(transcript) => {
                *pending = transcript;
                true
            }
            Err(error) => {
                tracing::warn!(%error, "speech recognition failed");
                self.last_error = Some(error);
                false
            }
        }
    }

    pub fn stop_listening(&mut self) {
        if self.recording {
            self.recognizer.stop();
            self.recording = false;
        }
    }
}
