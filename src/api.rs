use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub ticker: String,
}

/// Body of a chat reply. The backend sets `error` on failure and usually puts
/// user-facing text in `response` either way.
///
/// `error` is kept as raw JSON: any truthy value marks the reply as failed,
/// whether the backend sends a message string or a bare `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub ticker: Option<String>,
}

impl ChatReply {
    pub fn is_error(&self) -> bool {
        self.error.as_ref().is_some_and(is_truthy)
    }

    /// Text to show for an error reply: the server's message, else the raw
    /// error, else `fallback`.
    pub fn error_text(&self, fallback: &str) -> String {
        if let Some(response) = self.response.as_deref().filter(|s| !s.is_empty()) {
            return response.to_string();
        }
        match self.error.as_ref().filter(|v| is_truthy(v)) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => fallback.to_string(),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Session state exposed by `GET /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub ticker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SetTickerRequest<'a> {
    ticker: &'a str,
    initialize_rag: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TickerAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The backend the widget talks to.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /api/chat/message`. `Err` means the exchange itself failed.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// `GET /api/config`
    async fn fetch_config(&self) -> Result<SessionConfig>;

    /// `POST /api/set-ticker`
    async fn set_ticker(&self, ticker: &str, initialize_rag: bool) -> Result<TickerAck>;
}

#[derive(Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/api/chat/message", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        // Error replies come back as JSON with 4xx/5xx; the body is what counts.
        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| anyhow!("unreadable reply (status {}): {}", status, e))?;

        tracing::debug!(%status, error = ?reply.error, "chat reply received");
        Ok(reply)
    }

    async fn fetch_config(&self) -> Result<SessionConfig> {
        let url = format!("{}/api/config", self.base_url);

        let response = self.client.get(&url).send().await?;
        let config: SessionConfig = response.json().await?;
        Ok(config)
    }

    async fn set_ticker(&self, ticker: &str, initialize_rag: bool) -> Result<TickerAck> {
        let url = format!("{}/api/set-ticker", self.base_url);

        let request = SetTickerRequest {
            ticker,
            initialize_rag,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Set ticker failed with status: {}", response.status()));
        }

        let ack: TickerAck = response.json().await?;
        Ok(ack)
    }
}
