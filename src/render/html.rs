use chrono::{ DateTime, Utc };

use super::{ escape_html, ChatView };
use crate::models::chat::{ ChatMessage, Role };
use crate::session::SessionState;

/// Document model of the chat page: message blocks in append order, the
/// error notice, and the input controls whose enablement follows the
/// session state.
#[derive(Debug, Clone)]
pub struct HtmlTranscript {
    title: String,
    blocks: Vec<String>,
    error_notice: Option<String>,
    state: SessionState,
    started_at: DateTime<Utc>,
}

impl HtmlTranscript {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
            error_notice: None,
            state: SessionState::Idle,
            started_at: Utc::now(),
        }
    }

    /// Already-escaped message blocks in the order they were rendered.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn error_notice(&self) -> Option<&str> {
        self.error_notice.as_deref()
    }

    pub fn controls_enabled(&self) -> bool {
        self.state.accepts_input()
    }

    pub fn thinking_visible(&self) -> bool {
        self.state == SessionState::AwaitingResponse
    }

    pub fn to_html(&self) -> String {
        let disabled = if self.controls_enabled() { "" } else { " disabled" };
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n</head>\n<body>\n", escape_html(&self.title)));
        html.push_str(
            &format!(
                "<div id=\"chat-box\" data-started=\"{}\">\n",
                escape_html(&self.started_at.to_rfc3339())
            )
        );
        for block in &self.blocks {
            html.push_str(block);
            html.push('\n');
        }
        html.push_str("</div>\n");
        if self.thinking_visible() {
            html.push_str("<div id=\"thinking\" class=\"thinking\">Thinking...</div>\n");
        }
        match &self.error_notice {
            Some(reason) =>
                html.push_str(
                    &format!("<div id=\"error-message\" class=\"error\">Error: {}</div>\n", escape_html(reason))
                ),
            None => html.push_str("<div id=\"error-message\" class=\"error\" hidden></div>\n"),
        }
        html.push_str("<form id=\"chat-form\">\n");
        html.push_str(
            &format!("<input id=\"user-input\" type=\"text\" autocomplete=\"off\" autofocus{}>\n", disabled)
        );
        html.push_str(&format!("<button type=\"submit\"{}>Send</button>\n", disabled));
        html.push_str("</form>\n</body>\n</html>\n");
        html
    }
}

pub fn message_block(message: &ChatMessage) -> String {
    let class = match message.role() {
        Role::User => "user-message",
        Role::Assistant => "bot-message",
    };
    format!("<div class=\"message {}\"><p>{}</p></div>", class, escape_html(message.content()))
}

impl ChatView for HtmlTranscript {
    fn message_appended(&mut self, message: &ChatMessage) {
        self.blocks.push(message_block(message));
    }

    fn state_changed(&mut self, state: SessionState) {
        self.state = state;
    }

    fn error_shown(&mut self, reason: &str) {
        self.error_notice = Some(reason.to_string());
    }

    fn error_cleared(&mut self) {
        self.error_notice = None;
    }
}
