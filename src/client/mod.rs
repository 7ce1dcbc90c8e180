pub mod http;

use async_trait::async_trait;
use crate::models::chat::{ ChatRequest, ChatResponse };
use std::error::Error as StdError;
use thiserror::Error;

pub use self::http::HttpChatBackend;

/// Why an exchange did not produce an answer. `Display` is the text shown in
/// the error notice.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Shown with its whole cause chain; reqwest's own text omits the reason
    /// (refused connection, DNS failure, timeout).
    #[error("{}", error_chain(.0))]
    Transport(#[from] reqwest::Error),

    /// Non-success status. `message` is the backend's `error` field when the
    /// body carried one, else a generic status line.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
    },

    #[error("Malformed response from server: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid server URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl ExchangeError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ExchangeError::Status { status, .. } => Some(*status),
            ExchangeError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// `outer: cause: root cause`, skipping causes whose text repeats the previous one.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut last = text.clone();
    let mut source = err.source();
    while let Some(cause) = source {
        let part = cause.to_string();
        if !part.is_empty() && !last.contains(&part) {
            text.push_str(": ");
            text.push_str(&part);
        }
        last = part;
        source = cause.source();
    }
    text
}

/// One request/response round trip with whatever answers questions.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatResponse, ExchangeError>;

    fn describe(&self) -> String;
}
