use crate::progress_service::ProgressTracker;
use crate::prompt_builder::{
    build_system_instruction, material_analysis_prompt, math_extraction_prompt, PromptContext, StudentProfile,
};
use crate::response_segmenter::ResponseSegmenter;
use crate::speech_service::SpeechAdapter;
use domain::chat_state::{recommendations_for, ChatAction, ChatState};
use domain::error::ChatError;
use domain::gateway::{ChatGateway, ChatRequest, ChatTurn, VideoSearch, FALLBACK_REPLY};
use domain::models::{Feedback, Message};
use domain::notes::StudyNotes;
use domain::session::ChatSession;
use domain::speech::{SpeechStatus, TextToSpeech};
use domain::storage::KeyValueStore;
use domain::subjects::Subject;
use shared::telemetry::Telemetry;
use shared::utils::sanitize_content;
use std::collections::HashMap;
use std::sync::Arc;

pub const GATEWAY_ERROR_REPLY: &str = "Sorry, something went wrong with the AI assistant. Please try again.";
pub const SIMPLER_REQUEST: &str = "I don't get it, please explain it simpler.";
pub const ANALYZING_NOTICE: &str = "Analyzing your teacher's material...";
const PROGRESS_STEP: f64 = 0.1;

/// One subject's conversation: state, AI round trips, video lookups and speech.
pub struct ChatService<G, V, T: TextToSpeech> {
    gateway: G,
    segmenter: ResponseSegmenter<V>,
    speech: SpeechAdapter<T>,
    progress: ProgressTracker,
    subject: Subject,
    profile: StudentProfile,
    state: ChatState,
    feedback: HashMap<String, Feedback>,
    current_session_id: Option<String>,
}

impl<G, V, T> ChatService<G, V, T>
where
    G: ChatGateway,
    V: VideoSearch,
    T: TextToSpeech,
{
    pub fn new(
        gateway: G,
        videos: V,
        speech_engine: T,
        store: Arc<dyn KeyValueStore>,
        subject: Subject,
        profile: StudentProfile,
    ) -> Self {
        let speech = SpeechAdapter::new(speech_engine, profile.learning_style);
        Self {
            gateway,
            segmenter: ResponseSegmenter::new(videos),
            speech,
            progress: ProgressTracker::new(store),
            state: ChatState::with_messages(vec![subject.welcome_message()]),
            subject,
            profile,
            feedback: HashMap::new(),
            current_session_id: None,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn profile(&self) -> &StudentProfile {
        &self.profile
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.profile.theme = theme.into();
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.current_session_id.as_deref()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn videos(&self) -> &V {
        self.segmenter.videos()
    }

    pub fn speech(&self) -> &SpeechAdapter<T> {
        &self.speech
    }

    /// Appends the user message, asks the gateway and appends the bot reply.
    ///
    /// Gateway failures become a bot apology rather than an error; only empty
    /// input and a send while a reply is pending are rejected.
    pub async fn send(&mut self, text: &str) -> Result<Message, ChatError> {
        let text = sanitize_content(text);
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.state.loading {
            return Err(ChatError::Busy);
        }
        let prior = self.state.messages.len();
        let history = ChatRequest::history_from(&self.state.messages);
        self.state.dispatch(ChatAction::AddMessage(Message::user(text.clone())));
        Ok(self.generate_reply(history, &text, prior, None).await)
    }

    pub async fn click_recommendation(&mut self, index: usize) -> Result<Message, ChatError> {
        let Some(text) = self.state.recommended_messages.get(index).cloned() else {
            return Err(ChatError::EmptyMessage);
        };
        self.send(&text).await
    }

    /// Replaces the log with the welcome and a notice, then explains the material.
    pub async fn analyze_material(&mut self, material: &str, teacher_comment: Option<&str>) -> Result<Message, ChatError> {
        if material.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.state.loading {
            return Err(ChatError::Busy);
        }
        self.state.dispatch(ChatAction::SetMessages(vec![
            self.subject.welcome_message(),
            Message::bot(ANALYZING_NOTICE),
        ]));
        let prompt = material_analysis_prompt(material, teacher_comment);
        let concept = teacher_comment.map(str::to_string);
        Ok(self.generate_reply(Vec::new(), &prompt, 0, concept).await)
    }

    /// Records feedback on a bot message. `Adjust` lowers the stored
    /// performance level and asks for a simpler explanation.
    ///
    /// The logged message is left untouched; ratings live beside the log.
    pub async fn give_feedback(&mut self, message_id: &str, feedback: Feedback) -> Result<Option<Message>, ChatError> {
        if self.state.loading {
            return Err(ChatError::Busy);
        }
        if !self.state.messages.iter().any(|m| m.id == message_id && m.is_bot) {
            return Ok(None);
        }
        self.feedback.insert(message_id.to_string(), feedback);

        let delta = match feedback {
            Feedback::Good => PROGRESS_STEP,
            Feedback::Adjust => -PROGRESS_STEP,
        };
        if let Some(concept) = self.state.last_explained_concept.clone() {
            self.progress.update_progress(&concept, delta, Some(self.subject.id))?;
        }
        if feedback == Feedback::Good {
            return Ok(None);
        }

        let lowered = self.profile.performance_level.lowered();
        self.profile.performance_level = lowered;
        self.progress.set_performance(self.subject.name, lowered)?;
        tracing::info!(subject = self.subject.name, level = lowered.as_str(), "performance level lowered");
        self.send(SIMPLER_REQUEST).await.map(Some)
    }

    pub fn feedback_for(&self, message_id: &str) -> Option<Feedback> {
        self.feedback.get(message_id).copied()
    }

    /// Notes for the latest bot answer, ready for export.
    pub fn last_answer_notes(&self) -> Option<StudyNotes> {
        self.state.last_bot_message().map(StudyNotes::from_message)
    }

    pub fn load_session(&mut self, session: &ChatSession) {
        self.speech.cancel();
        self.feedback.clear();
        self.state = ChatState::with_messages(session.messages.clone());
        self.current_session_id = Some(session.id.clone());
    }

    pub fn start_new_chat(&mut self) {
        self.speech.cancel();
        self.feedback.clear();
        self.state = ChatState::with_messages(vec![self.subject.welcome_message()]);
        self.current_session_id = None;
    }

    pub fn mark_saved(&mut self, session_id: impl Into<String>) {
        self.current_session_id = Some(session_id.into());
    }

    pub fn speak(&mut self, text: &str) -> bool {
        self.speech.speak(text)
    }

    pub fn toggle_speech(&mut self) -> SpeechStatus {
        self.speech.toggle()
    }

    /// Math-only digest of a reply, for math-heavy subjects. Failures and
    /// empty digests yield `None`.
    async fn extract_math(&self, reply: &str) -> Option<String> {
        if !self.subject.is_math_heavy() {
            return None;
        }
        match self.gateway.generate(&math_extraction_prompt(reply)).await {
            Ok(math) => {
                let math = math.trim();
                (!math.is_empty() && math != FALLBACK_REPLY).then(|| math.to_string())
            }
            Err(e) => {
                tracing::warn!(subject = self.subject.id, error = %e, "math extraction failed");
                None
            }
        }
    }

    async fn generate_reply(
        &mut self,
        history: Vec<ChatTurn>,
        message: &str,
        message_count: usize,
        concept: Option<String>,
    ) -> Message {
        self.state.dispatch(ChatAction::SetLoading(true));
        self.state.dispatch(ChatAction::SetRecommendations(Vec::new()));

        let system_instruction = build_system_instruction(&PromptContext {
            subject: &self.subject,
            profile: &self.profile,
            message_count,
            user_message: message,
        });
        let request = ChatRequest {
            history,
            message: message.to_string(),
            system_instruction,
        };

        let telemetry = Telemetry::new();
        match self.gateway.send_chat(&request).await {
            Ok(raw) => {
                let resolved = self
                    .segmenter
                    .resolve(&raw, self.profile.learning_style)
                    .await;
                tracing::debug!(
                    subject = self.subject.id,
                    elapsed_ms = telemetry.elapsed_ms(),
                    videos = resolved.video_list.as_ref().map_or(0, Vec::len),
                    "reply resolved"
                );
                let extracted_math = self.extract_math(&resolved.text).await;
                let reply = Message::bot(resolved.text)
                    .with_videos(resolved.video_list)
                    .with_extracted_math(extracted_math);
                self.state.dispatch(ChatAction::SetLoading(false));
                self.state.dispatch(ChatAction::AddMessage(reply.clone()));
                self.state.dispatch(ChatAction::SetRecommendations(recommendations_for(
                    &reply.text,
                    self.state.has_received_initial_explanation,
                )));
                self.speech.speak(&reply.text);
                self.state.dispatch(ChatAction::SetLastConcept(
                    concept.or_else(|| Some(message.to_string())),
                ));
                self.state.dispatch(ChatAction::SetInitialExplanation(true));
                reply
            }
            Err(e) => {
                tracing::error!(subject = self.subject.id, error = %e, "AI gateway request failed");
                let reply = Message::bot(GATEWAY_ERROR_REPLY);
                self.state.dispatch(ChatAction::AddMessage(reply.clone()));
                self.state.dispatch(ChatAction::SetLoading(false));
                reply
            }
        }
    }
}
