use clap::Parser;
use crate::history::HistoryLimit;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Ask the district budget assistant questions from the terminal", long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the assistant backend; questions are posted to {server_url}/chat
    #[arg(long, env = "CHAT_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Request timeout in seconds. Unset leaves the HTTP client's default.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// How many past messages accompany each question ("all", or a count such as 20).
    /// Only the request is trimmed; the local transcript keeps everything.
    #[arg(long, env = "HISTORY_LIMIT", default_value = "all")]
    pub history_limit: HistoryLimit,

    // --- Knowledge Document Args ---
    /// Path to the budget knowledge document. Checked and summarised at startup.
    #[arg(long, env = "KNOWLEDGE_PATH")]
    pub knowledge_path: Option<String>,

    // --- Session Args ---
    /// Ask these questions in order and exit instead of reading from stdin.
    #[arg(short = 'q', long = "question")]
    pub questions: Vec<String>,

    /// Write the conversation as an HTML page to this path on exit.
    #[arg(long, env = "TRANSCRIPT_HTML")]
    pub transcript_html: Option<String>,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["budget-chat"]).unwrap();
        assert_eq!(args.server_url, "http://127.0.0.1:5000");
        assert_eq!(args.history_limit, HistoryLimit::Unbounded);
        assert!(args.questions.is_empty());
        assert!(args.timeout_secs.is_none());
    }

    #[test]
    fn repeated_questions_and_limit() {
        let args = Args::try_parse_from([
            "budget-chat",
            "--history-limit",
            "20",
            "-q",
            "What is the total budget?",
            "--question",
            "What are the unfunded needs?",
        ]).unwrap();
        assert_eq!(args.history_limit, HistoryLimit::Last(20));
        assert_eq!(args.questions.len(), 2);
    }

    #[test]
    fn invalid_limit_is_rejected() {
        assert!(Args::try_parse_from(["budget-chat", "--history-limit", "lots"]).is_err());
    }
}
