pub mod html;
pub mod terminal;

use crate::models::chat::ChatMessage;
use crate::session::SessionState;

pub use self::html::HtmlTranscript;
pub use self::terminal::TerminalView;

/// Receives everything a chat session wants shown to the user.
///
/// Message content handed to a view is untrusted; each view is responsible
/// for neutralising it for its own output medium.
pub trait ChatView {
    fn message_appended(&mut self, message: &ChatMessage);

    /// Called on every transition. Whether input is accepted follows from
    /// `state.accepts_input()`.
    fn state_changed(&mut self, state: SessionState);

    fn error_shown(&mut self, reason: &str);

    fn error_cleared(&mut self);
}

/// Fans every event out to two views, e.g. the terminal and an HTML transcript.
impl<A: ChatView, B: ChatView> ChatView for (A, B) {
    fn message_appended(&mut self, message: &ChatMessage) {
        self.0.message_appended(message);
        self.1.message_appended(message);
    }

    fn state_changed(&mut self, state: SessionState) {
        self.0.state_changed(state);
        self.1.state_changed(state);
    }

    fn error_shown(&mut self, reason: &str) {
        self.0.error_shown(reason);
        self.1.error_shown(reason);
    }

    fn error_cleared(&mut self) {
        self.0.error_cleared();
        self.1.error_cleared();
    }
}

/// Escapes text for insertion into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Drops control characters (ANSI escape sequences start with one) while
/// keeping line breaks and tabs.
pub fn sanitize_terminal(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
