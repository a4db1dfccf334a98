use crate::domains::message::{ChatMessage, ChatTurn};
use crate::error::{MermatesRagError, Result};

/// Placeholder replaced by the assembled context block.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// System prompt with a single interpolation point for retrieved context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(CONTEXT_PLACEHOLDER) {
            return Err(MermatesRagError::Config(format!(
                "prompt template must contain the {CONTEXT_PLACEHOLDER} placeholder"
            )));
        }
        Ok(Self { template })
    }

    pub fn render(&self, context: &str) -> String {
        self.template.replace(CONTEXT_PLACEHOLDER, context)
    }
}

/// Lays out the conversation sent to the completion model: the system
/// prompt, then the caller's history with normalized roles, then the
/// current message as a user turn.
pub fn build_messages(
    system_prompt: String,
    history: &[ChatTurn],
    message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(message));
    messages
}
