use std::fmt;

use serde::{Deserialize, Serialize};

use crate::url_check::is_valid_url;

/// Placeholder shown while the assistant is working.
pub const THINKING_TEXT: &str = "Finding the best website for you...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    Tool,
}

/// One transcript line. Lives only as long as the view that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub content: String,
    pub found_url: Option<String>,
}

/// A prior exchange sent along with a new question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub found_url: Option<String>,
}

/// Everything needed to dispatch one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsk {
    pub tool_id: MessageId,
    pub message: String,
    pub history: Vec<ChatTurn>,
}

/// Ordered transcript with at most one question in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: u64,
    pending: Option<MessageId>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(text: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.push(ChatRole::Assistant, text.into(), None);
        transcript
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Appends the user message and the thinking placeholder.
    ///
    /// Returns `None` for blank text or while another question is pending.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingAsk> {
        let message = text.trim();
        if message.is_empty() || self.pending.is_some() {
            return None;
        }
        let history = self.turns();
        self.push(ChatRole::User, message.to_string(), None);
        let tool_id = self.push(ChatRole::Tool, THINKING_TEXT.to_string(), None);
        self.pending = Some(tool_id);
        Some(PendingAsk {
            tool_id,
            message: message.to_string(),
            history,
        })
    }

    /// Swaps the placeholder for the reply or an error message.
    ///
    /// Returns false when `tool_id` is not the pending question.
    pub fn complete(&mut self, tool_id: MessageId, result: Result<AssistantReply, String>) -> bool {
        if self.pending != Some(tool_id) {
            return false;
        }
        self.pending = None;
        self.messages.retain(|m| m.id != tool_id);
        match result {
            Ok(reply) => {
                let found_url = reply
                    .found_url
                    .map(|url| url.trim().to_string())
                    .filter(|url| is_valid_url(url));
                self.push(ChatRole::Assistant, reply.text, found_url);
            }
            Err(err) => {
                self.push(
                    ChatRole::Assistant,
                    format!(
                        "Sorry, I encountered an error: {err}. Please try again or enter a URL directly."
                    ),
                    None,
                );
            }
        }
        true
    }

    /// The discovered URL attached to an assistant message, if any.
    pub fn found_url(&self, id: MessageId) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.id == id && m.role == ChatRole::Assistant)
            .and_then(|m| m.found_url.as_deref())
    }

    fn push(&mut self, role: ChatRole, content: String, found_url: Option<String>) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            found_url,
        });
        id
    }

    // Greetings before the first user message are local UI text, not history.
    fn turns(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .skip_while(|m| m.role != ChatRole::User)
            .filter(|m| m.role != ChatRole::Tool)
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }
}
