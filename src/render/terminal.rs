use std::io::Write;
use log::warn;

use super::{ sanitize_terminal, ChatView };
use crate::models::chat::{ ChatMessage, Role };
use crate::session::SessionState;

pub const THINKING_INDICATOR: &str = "Thinking...";
pub const PROMPT: &str = "> ";

/// Line-oriented terminal view.
///
/// Interactive mode shows an input prompt whenever input is accepted and does
/// not repeat what the user just typed. Otherwise questions are echoed, as
/// they come from the command line.
pub struct TerminalView<W: Write> {
    out: W,
    interactive: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self { out, interactive }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn message_appended(&mut self, message: &ChatMessage) {
        if message.role() == Role::User && self.interactive {
            return;
        }
        let line = format!("{}: {}", message.role().display_name(), sanitize_terminal(message.content()));
        self.write_line(&line);
    }

    fn state_changed(&mut self, state: SessionState) {
        match state {
            SessionState::AwaitingResponse => self.write_line(THINKING_INDICATOR),
            SessionState::Idle if self.interactive => {
                if let Err(e) = write!(self.out, "{}", PROMPT).and_then(|_| self.out.flush()) {
                    warn!("Failed to write to terminal: {}", e);
                }
            }
            SessionState::Idle => {}
        }
    }

    fn error_shown(&mut self, reason: &str) {
        let line = format!("Error: {}", sanitize_terminal(reason));
        self.write_line(&line);
    }

    fn error_cleared(&mut self) {}
}
