use crate::client::ChatBackend;
use crate::history::{ ConversationHistory, HistoryLimit };
use crate::models::chat::{ ChatMessage, ChatRequest };
use crate::render::ChatView;

use log::{ debug, info, warn };
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

impl SessionState {
    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionState::Idle)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::AwaitingResponse => f.write_str("awaiting response"),
        }
    }
}

/// Result of one call to [`ChatSession::submit_question`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Blank input; nothing was sent or recorded.
    Ignored,
    Answered(String),
    /// The exchange failed; only the question was recorded.
    Failed(String),
}

/// One conversation: created when the client starts, dropped when it exits.
///
/// `submit_question` holds `&mut self` across the exchange, so a second
/// question cannot be submitted while one is in flight.
pub struct ChatSession {
    id: Uuid,
    history: ConversationHistory,
    state: SessionState,
    history_limit: HistoryLimit,
}

impl ChatSession {
    pub fn new(history_limit: HistoryLimit) -> Self {
        let id = Uuid::new_v4();
        info!("Started chat session {} (history sent per request: {})", id, history_limit);
        Self {
            id,
            history: ConversationHistory::new(),
            state: SessionState::Idle,
            history_limit,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn submit_question<B, V>(&mut self, text: &str, backend: &B, view: &mut V) -> Submission
        where B: ChatBackend + ?Sized, V: ChatView + ?Sized
    {
        let question = text.trim();
        if question.is_empty() {
            debug!("Session {}: ignoring blank input", self.id);
            return Submission::Ignored;
        }

        let user_message = self.history.push(ChatMessage::user(question));
        view.message_appended(user_message);

        self.transition(SessionState::AwaitingResponse, view);

        let request = ChatRequest {
            question: question.to_string(),
            history: self.history.outbound(self.history_limit),
        };
        debug!(
            "Session {}: sending question with {} of {} messages to {}",
            self.id,
            request.history.len(),
            self.history.len(),
            backend.describe()
        );

        let outcome = match backend.exchange(&request).await {
            Ok(response) => {
                let answer = response.answer_or_fallback();
                let assistant_message = self.history.push(ChatMessage::assistant(answer.clone()));
                view.message_appended(assistant_message);
                view.error_cleared();
                Submission::Answered(answer)
            }
            Err(e) => {
                match e.status() {
                    Some(status) => warn!("Session {}: exchange failed with status {}: {}", self.id, status, e),
                    None => warn!("Session {}: exchange failed: {}", self.id, e),
                }
                let reason = e.to_string();
                view.error_shown(&reason);
                Submission::Failed(reason)
            }
        };

        self.transition(SessionState::Idle, view);
        outcome
    }

    fn transition<V: ChatView + ?Sized>(&mut self, next: SessionState, view: &mut V) {
        debug!("Session {}: {} -> {}", self.id, self.state, next);
        self.state = next;
        view.state_changed(next);
    }
}
