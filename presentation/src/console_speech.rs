use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use domain::speech::{RecognitionError, SpeechRecognizer, SpeechStatus, TextToSpeech};

/// Terminal stand-in for a speech engine: utterances are echoed, not voiced.
#[derive(Debug, Default)]
pub struct ConsoleSpeech {
    status: SpeechStatus,
}

impl TextToSpeech for ConsoleSpeech {
    fn speak(&mut self, text: &str) {
        println!("{} {}", "[speaking]".magenta().bold(), text.magenta());
        self.status = SpeechStatus::Speaking;
    }

    fn cancel(&mut self) {
        self.status = SpeechStatus::Idle;
    }

    fn pause(&mut self) {
        if self.status == SpeechStatus::Speaking {
            println!("{}", "[speech paused]".magenta());
            self.status = SpeechStatus::Paused;
        }
    }

    fn resume(&mut self) {
        if self.status == SpeechStatus::Paused {
            println!("{}", "[speech resumed]".magenta());
            self.status = SpeechStatus::Speaking;
        }
    }

    fn status(&self) -> SpeechStatus {
        self.status
    }
}

/// Dictation through a typed prompt; an empty line counts as no speech.
#[derive(Debug, Default)]
pub struct PromptRecognizer;

impl SpeechRecognizer for PromptRecognizer {
    fn listen(&mut self) -> Result<String, RecognitionError> {
        let heard: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Listening (type what you would say)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| RecognitionError::Other(e.to_string()))?;
        let heard = heard.trim();
        if heard.is_empty() {
            Err(RecognitionError::NoSpeech)
        } else {
            Ok(heard.to_string())
        }
    }

    fn stop(&mut self) {}
}
