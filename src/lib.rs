pub mod cli;
pub mod client;
pub mod history;
pub mod models;
pub mod render;
pub mod session;

use cli::Args;
use client::{ ChatBackend, HttpChatBackend };
use history::format_history_for_display;
use log::{ debug, info, warn };
use models::knowledge::KnowledgeDocument;
use render::{ ChatView, HtmlTranscript, TerminalView };
use session::{ ChatSession, SessionState, Submission };
use std::error::Error;
use std::fs;
use std::io::{ self, Write };
use std::time::Duration;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, BufReader };

const PAGE_TITLE: &str = "School Budget Assistant";

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server URL: {}", args.server_url);
    info!("History Sent Per Request: {}", args.history_limit);
    info!(
        "Request Timeout: {}",
        args.timeout_secs.map(|s| format!("{}s", s)).unwrap_or_else(|| "client default".to_string())
    );
    info!("Knowledge Path: {}", args.knowledge_path.as_deref().unwrap_or("not set"));
    info!("Transcript HTML: {}", args.transcript_html.as_deref().unwrap_or("not set"));
    info!("-------------------------");

    if let Some(path) = &args.knowledge_path {
        let document = KnowledgeDocument::load(path)?;
        info!("Knowledge document: {}", document.summary());
        debug!("Knowledge context is {} bytes of JSON", document.context_json()?.len());
    }

    let backend = HttpChatBackend::new(&args.server_url, args.timeout_secs.map(Duration::from_secs))?;
    info!("Posting questions to: {}", backend.endpoint());

    let mut session = ChatSession::new(args.history_limit);
    let one_shot = !args.questions.is_empty();
    let mut view = (TerminalView::new(io::stdout(), !one_shot), HtmlTranscript::new(PAGE_TITLE));

    let failures = if one_shot {
        ask_all(&mut session, &backend, &mut view, &args.questions).await
    } else {
        let input = BufReader::new(tokio::io::stdin());
        interactive(&mut session, &backend, &mut view, input, &mut io::stdout()).await?;
        0
    };

    if let Some(path) = &args.transcript_html {
        fs::write(path, view.1.to_html())?;
        info!("Wrote transcript of {} messages to {}", session.history().len(), path);
    }
    info!("Session {} ended with {} messages", session.id(), session.history().len());

    if failures > 0 {
        return Err(format!("{} of {} questions failed", failures, args.questions.len()).into());
    }
    Ok(())
}

async fn ask_all<V: ChatView>(
    session: &mut ChatSession,
    backend: &HttpChatBackend,
    view: &mut V,
    questions: &[String]
) -> usize {
    let mut failures = 0;
    for question in questions {
        if let Submission::Failed(_) = session.submit_question(question, backend, view).await {
            failures += 1;
        }
    }
    failures
}

/// Reads one question per line until EOF or `/quit`. `out` receives the
/// greeting and `/history` listings; everything else goes through `view`.
async fn interactive<B, V, R, W>(
    session: &mut ChatSession,
    backend: &B,
    view: &mut V,
    input: R,
    out: &mut W
) -> Result<(), Box<dyn Error + Send + Sync>>
    where B: ChatBackend + ?Sized, V: ChatView, R: AsyncBufRead + Unpin, W: Write
{
    writeln!(out, "Ask a question about the district budget. Type /history to review, /quit to leave.")?;
    out.flush()?;
    view.state_changed(SessionState::Idle);

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => {
                break;
            }
            "/history" => {
                write!(out, "{}", format_history_for_display(session.history()))?;
                out.flush()?;
                view.state_changed(session.state());
            }
            _ => {
                if let Submission::Ignored = session.submit_question(&line, backend, view).await {
                    view.state_changed(session.state());
                }
            }
        }
    }
    if session.history().is_empty() {
        warn!("Session {} closed without any questions", session.id());
    }
    Ok(())
}
