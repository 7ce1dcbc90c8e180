use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE } };
use std::time::Duration;
use url::Url;

use super::{ ChatBackend, ExchangeError };
use crate::models::chat::{ ChatRequest, ChatResponse, ErrorBody };

const CHAT_ROUTE: &str = "chat";

pub struct HttpChatBackend {
    http: HttpClient,
    endpoint: Url,
}

impl HttpChatBackend {
    /// `base_url` is the address the page was served from; requests go to
    /// `{base_url}/chat`. `timeout` of `None` leaves reqwest's default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ExchangeError> {
        let endpoint = chat_endpoint(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatResponse, ExchangeError> {
        debug!(
            "POST {} (question: {} chars, history: {} messages)",
            self.endpoint,
            request.question.len(),
            request.history.len()
        );

        let response = self.http.post(self.endpoint.clone()).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("Server returned {}: {}", status, body);
            return Err(status_error(status, &body));
        }

        Ok(serde_json::from_str::<ChatResponse>(&body)?)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

fn chat_endpoint(base_url: &str) -> Result<Url, ExchangeError> {
    let mut base = Url::parse(base_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(CHAT_ROUTE)?)
}

fn status_error(status: reqwest::StatusCode, body: &str) -> ExchangeError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => format!("Request failed with status {}", status),
    };
    ExchangeError::Status {
        status: status.as_u16(),
        message,
    }
}
