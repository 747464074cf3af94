//! HTTP client for the Gemini `generateContent` API.
//!
//! One request per operation: no retries, no timeouts. Streaming uses the
//! `alt=sse` variant of `streamGenerateContent` and yields text chunks as
//! server-sent events arrive; dropping the stream aborts the call.

use futures::StreamExt;
use tracing::info;

use crate::error::AiError;
use crate::gateway::{GenerateContent, TextStream};
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the API key. Absence is fatal at startup.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Optional model override.
pub const MODEL_VAR: &str = "PAYLENS_MODEL";

/// Client for Gemini's REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a client from `GEMINI_API_KEY`, with `PAYLENS_MODEL` as an
    /// optional model override.
    pub fn from_env() -> Result<Self, AiError> {
        let mut client = Self::new(std::env::var(API_KEY_VAR).unwrap_or_default())?;
        if let Ok(model) = std::env::var(MODEL_VAR) {
            client.model = model;
        }
        Ok(client)
    }

    /// Override the API base URL (no trailing slash required).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    async fn post(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, AiError> {
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

impl GenerateContent for GeminiClient {
    async fn generate(&self, request: GenerateContentRequest) -> Result<String, AiError> {
        let url = self.endpoint("generateContent");
        info!(model = %self.model, turns = request.contents.len(), "calling generateContent");
        let resp = self.post(&url, &request).await?;
        let parsed: GenerateContentResponse = resp.json().await?;
        let text = parsed.text();
        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }

    async fn stream(&self, request: GenerateContentRequest) -> Result<TextStream, AiError> {
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        info!(model = %self.model, turns = request.contents.len(), "calling streamGenerateContent");
        let resp = self.post(&url, &request).await?;

        // SSE events can split across HTTP chunks; buffer until newline.
        // A trailing event without a newline is never emitted by the server.
        let stream = resp
            .bytes_stream()
            .scan(String::new(), |buf, chunk| {
                let events = match chunk {
                    Ok(bytes) => {
                        buf.push_str(&String::from_utf8_lossy(&bytes));
                        drain_sse_events(buf)
                    }
                    Err(e) => vec![Err(AiError::Http(e))],
                };
                futures::future::ready(Some(events))
            })
            .flat_map(futures::stream::iter)
            .boxed();
        Ok(stream)
    }
}

/// Pop every complete `data:` event out of `buf`, leaving any partial
/// trailing line in place. Empty text chunks are skipped.
fn drain_sse_events(buf: &mut String) -> Vec<Result<String, AiError>> {
    let mut events = Vec::new();
    while let Some(pos) = buf.find('\n') {
        let line: String = buf.drain(..=pos).collect();
        let line = line.trim();
        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim_start();
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }
        match serde_json::from_str::<GenerateContentResponse>(payload) {
            Ok(resp) => {
                let text = resp.text();
                if !text.is_empty() {
                    events.push(Ok(text));
                }
            }
            Err(e) => events.push(Err(AiError::Json(e))),
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"parts\":[{{\"text\":\"{text}\"}}]}}}}]}}\n\n"
        )
    }

    #[test]
    fn missing_api_key_is_fatal() {
        assert!(matches!(GeminiClient::new(""), Err(AiError::MissingApiKey)));
        assert!(matches!(GeminiClient::new("  "), Err(AiError::MissingApiKey)));
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let client = GeminiClient::new("k")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            client.endpoint("generateContent"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn model_override() {
        let client = GeminiClient::new("k").unwrap().with_model("gemini-2.5-pro");
        assert_eq!(client.model(), "gemini-2.5-pro");
        assert!(client.endpoint("generateContent").contains("gemini-2.5-pro:"));
    }

    #[test]
    fn drains_single_event() {
        let mut buf = event("ciao");
        let events = drain_sse_events(&mut buf);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), "ciao");
        assert!(buf.is_empty());
    }

    #[test]
    fn drains_multiple_events_in_one_chunk() {
        let mut buf = format!("{}{}", event("uno"), event("due"));
        let events = drain_sse_events(&mut buf);
        let texts: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(texts, ["uno", "due"]);
    }

    #[test]
    fn partial_event_stays_buffered() {
        let full = event("spezzato");
        let (head, tail) = full.split_at(20);

        let mut buf = head.to_string();
        assert!(drain_sse_events(&mut buf).is_empty());
        assert_eq!(buf, head);

        buf.push_str(tail);
        let events = drain_sse_events(&mut buf);
        assert_eq!(events[0].as_ref().unwrap(), "spezzato");
    }

    #[test]
    fn ignores_non_data_lines_and_done_marker() {
        let mut buf = format!("event: message\nretry: 100\n\ndata: [DONE]\n{}", event("fine"));
        let events = drain_sse_events(&mut buf);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), "fine");
    }

    #[test]
    fn malformed_event_yields_error_item() {
        let mut buf = "data: {not json}\n".to_string();
        let events = drain_sse_events(&mut buf);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(AiError::Json(_))));
    }

    #[test]
    fn metadata_only_events_are_skipped() {
        let mut buf = "data: {\"usageMetadata\":{\"totalTokenCount\":7}}\n".to_string();
        assert!(drain_sse_events(&mut buf).is_empty());
    }
}
