use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::models::chat::{ChatMessage, ChatRole};

/// Shown while the greeting request is in flight.
pub const GREETING_PLACEHOLDER: &str = "Thinking...";

/// One conversation shared by the main chat tab and the overlay.
///
/// Both surfaces append messages. The load-once effects (history fetch and
/// greeting) are gated on [`ChatRole::Primary`], so the overlay can never
/// trigger them regardless of which surface appears first.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    recommendations: Vec<Value>,
    greeting_done: bool,
    history_loaded: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn recommendations(&self) -> &[Value] {
        &self.recommendations
    }

    pub fn greeting_done(&self) -> bool {
        self.greeting_done
    }

    pub fn history_loaded(&self) -> bool {
        self.history_loaded
    }

    /// Adopt previously stored history. Only the primary surface may do this,
    /// and only once. A non-empty history counts as an earlier greeting.
    pub fn apply_history(&mut self, role: ChatRole, history: Vec<ChatMessage>) -> bool {
        if role != ChatRole::Primary || self.history_loaded {
            debug!(?role, "history load skipped");
            return false;
        }
        self.history_loaded = true;
        if history.is_empty() {
            return false;
        }
        self.messages = history;
        self.greeting_done = true;
        true
    }

    /// Start the greeting if the primary surface asks for it, the trigger fired,
    /// a personality is known and no greeting happened yet. Returns the id of
    /// the placeholder message to resolve later.
    pub fn begin_greeting(
        &mut self,
        role: ChatRole,
        triggered: bool,
        has_personality: bool,
    ) -> Option<Uuid> {
        if role != ChatRole::Primary || !triggered || !has_personality || self.greeting_done {
            return None;
        }
        self.greeting_done = true;
        let placeholder = ChatMessage::bot(GREETING_PLACEHOLDER);
        let id = placeholder.id;
        self.messages.push(placeholder);
        Some(id)
    }

    /// Replace the placeholder with the greeting reply.
    pub fn complete_greeting(&mut self, placeholder: Uuid, reply: String, recommendations: Vec<Value>) {
        match self.messages.iter_mut().find(|m| m.id == placeholder) {
            Some(msg) => msg.text = reply,
            None => self.messages.push(ChatMessage::bot(reply)),
        }
        self.recommendations = recommendations;
    }

    /// Drop the placeholder after a failed greeting request.
    pub fn fail_greeting(&mut self, placeholder: Uuid) {
        self.messages.retain(|m| m.id != placeholder);
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Uuid {
        self.push(ChatMessage::user(text))
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> Uuid {
        self.push(ChatMessage::bot(text))
    }

    /// Replace the recommendation list; an empty list keeps the current one.
    pub fn update_recommendations(&mut self, recommendations: Vec<Value>) {
        if !recommendations.is_empty() {
            self.recommendations = recommendations;
        }
    }

    /// A strategy was picked, so the recommendation list closes.
    pub fn clear_recommendations(&mut self) {
        self.recommendations.clear();
    }

    fn push(&mut self, message: ChatMessage) -> Uuid {
        let id = message.id;
        self.messages.push(message);
        id
    }
}
