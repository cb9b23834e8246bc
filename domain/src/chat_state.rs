use crate::models::Message;

pub const THEME_OFFER: &str = "Can you explain it with my theme?";
pub const MAX_RECOMMENDATIONS: usize = 3;

const HELP_FOLLOW_UPS: [&str; 3] = [
    "Explain this concept",
    "Help me with my homework",
    "Can you quiz me?",
];
const GENERIC_FOLLOW_UPS: [&str; 3] = [
    "Tell me more",
    "Can you give me an example?",
    "Quiz me on this",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub loading: bool,
    pub recommended_messages: Vec<String>,
    pub has_received_initial_explanation: bool,
    pub last_explained_concept: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    SetMessages(Vec<Message>),
    AddMessage(Message),
    SetLoading(bool),
    SetRecommendations(Vec<String>),
    SetInitialExplanation(bool),
    SetLastConcept(Option<String>),
}

impl ChatState {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, action: ChatAction) {
        match action {
            ChatAction::SetMessages(messages) => self.messages = messages,
            ChatAction::AddMessage(message) => self.messages.push(message),
            ChatAction::SetLoading(loading) => self.loading = loading,
            ChatAction::SetRecommendations(list) => self.recommended_messages = list,
            ChatAction::SetInitialExplanation(flag) => {
                self.has_received_initial_explanation = flag
            }
            ChatAction::SetLastConcept(concept) => self.last_explained_concept = concept,
        }
    }

    pub fn last_bot_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_bot)
    }
}

/// Follow-up chips for a bot reply.
///
/// A reply offering help gets the three help follow-ups. Otherwise the theme
/// offer leads (until the first explanation has been given) and the generic
/// follow-ups fill the rest.
pub fn recommendations_for(reply: &str, has_received_initial_explanation: bool) -> Vec<String> {
    if reply.to_lowercase().contains("how can i help") {
        return HELP_FOLLOW_UPS.iter().map(|s| s.to_string()).collect();
    }
    let mut list = Vec::with_capacity(MAX_RECOMMENDATIONS + 1);
    if !has_received_initial_explanation {
        list.push(THEME_OFFER.to_string());
    }
    list.extend(GENERIC_FOLLOW_UPS.iter().map(|s| s.to_string()));
    list.truncate(MAX_RECOMMENDATIONS);
    list
}
