use crate::models::chat::{ ChatMessage, Role };
use crate::render::sanitize_terminal;
use std::fmt;
use std::str::FromStr;

/// Ordered, append-only transcript of one chat session.
///
/// Only append order is enforced; two user messages in a row are legal (a
/// failed exchange leaves the user's question without a reply).
#[derive(Clone, Debug, Default)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Copy of the messages to send with the next request, trimmed to `limit`.
    /// The local transcript itself is never trimmed.
    pub fn outbound(&self, limit: HistoryLimit) -> Vec<ChatMessage> {
        let start = match limit {
            HistoryLimit::Unbounded => 0,
            HistoryLimit::Last(n) => self.messages.len().saturating_sub(n.max(1)),
        };
        self.messages[start..].to_vec()
    }
}

/// How much of the transcript accompanies each request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryLimit {
    #[default]
    Unbounded,
    /// Keep only the most recent N messages. Zero is treated as one so the
    /// question being asked is always present.
    Last(usize),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseHistoryLimitError {
    message: String,
}

impl fmt::Display for ParseHistoryLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseHistoryLimitError {}

impl FromStr for HistoryLimit {
    type Err = ParseHistoryLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "unbounded" | "none" => Ok(HistoryLimit::Unbounded),
            other =>
                other
                    .parse::<usize>()
                    .map(HistoryLimit::Last)
                    .map_err(|_| ParseHistoryLimitError {
                        message: format!("Invalid history limit: '{}'", s),
                    }),
        }
    }
}

impl fmt::Display for HistoryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryLimit::Unbounded => f.write_str("all"),
            HistoryLimit::Last(n) => write!(f, "last {}", n),
        }
    }
}

/// Plain-text listing for the terminal. Content is sanitised the same way
/// `TerminalView` sanitises it.
pub fn format_history_for_display(history: &ConversationHistory) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut result = String::new();
    for msg in history.messages() {
        let role_display = match msg.role() {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        result.push_str(&format!("{}: {}\n", role_display, sanitize_terminal(msg.content())));
    }
    result
}
