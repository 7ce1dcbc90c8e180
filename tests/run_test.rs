use axum::{ routing::post, Json, Router };
use budget_chat::cli::Args;
use clap::Parser;
use serde_json::{ json, Value };
use tokio::net::TcpListener;

async fn spawn_backend() -> String {
    let app = Router::new().route(
        "/chat",
        post(|Json(body): Json<Value>| async move {
            let turns = body["history"].as_array().map(|h| h.len()).unwrap_or(0);
            Json(json!({ "answer": format!("answered with {} messages of context", turns) }))
        })
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn one_shot_questions_write_transcript() {
    let url = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.html");

    let args = Args::try_parse_from([
        "budget-chat",
        "--server-url",
        url.as_str(),
        "--knowledge-path",
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/budget.json"),
        "--transcript-html",
        transcript.to_str().unwrap(),
        "-q",
        "What is the total budget?",
        "-q",
        "   ",
        "-q",
        "Which needs are unfunded?",
    ]).unwrap();

    budget_chat::run(args).await.unwrap();

    let html = std::fs::read_to_string(&transcript).unwrap();
    assert_eq!(html.matches("class=\"message user-message\"").count(), 2);
    assert!(html.contains("answered with 1 messages of context"));
    assert!(html.contains("answered with 3 messages of context"));
    assert!(html.contains("class=\"error\" hidden"));
}

#[tokio::test]
async fn failed_questions_are_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}", addr);
    let args = Args::try_parse_from(["budget-chat", "--server-url", url.as_str(), "-q", "hello?"]).unwrap();

    let err = budget_chat::run(args).await.unwrap_err();
    assert_eq!(err.to_string(), "1 of 1 questions failed");
}

#[tokio::test]
async fn bad_knowledge_path_stops_startup() {
    let args = Args::try_parse_from([
        "budget-chat",
        "--knowledge-path",
        "no/such/budget.json",
        "-q",
        "hello?",
    ]).unwrap();

    let err = budget_chat::run(args).await.unwrap_err();
    assert!(err.to_string().starts_with("Knowledge document IO error"));
}
