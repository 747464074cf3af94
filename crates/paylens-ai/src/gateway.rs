//! The four gateway operations — analyze, compare, summarize, chat — over a
//! swappable generation backend.
//!
//! Every operation wraps exactly one remote call: any transport or parsing
//! failure is terminal for that call, with no retry and no partial result.

use std::future::Future;

use futures::stream::BoxStream;
use paylens_core::{ChatMessage, Payslip, Sender, payslip_response_schema};
use tracing::info;
use uuid::Uuid;

use crate::error::AiError;
use crate::prompts;
use crate::wire::{Content, GenerateContentRequest, GenerationConfig, Part};

/// Incremental text chunks from a streamed completion. Errors arrive as
/// stream items; dropping the stream cancels the in-flight call.
pub type TextStream = BoxStream<'static, Result<String, AiError>>;

/// The seam between the gateway and the remote model, so tests can swap in
/// a double returning canned responses.
pub trait GenerateContent {
    /// Single text completion.
    fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> impl Future<Output = Result<String, AiError>> + Send;

    /// Streamed text completion.
    fn stream(
        &self,
        request: GenerateContentRequest,
    ) -> impl Future<Output = Result<TextStream, AiError>> + Send;
}

/// A file to analyze or attach: raw bytes plus the original mime type,
/// encoded for transport at request-build time.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Optional context for a chat turn.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// File attached to the new question; placed ahead of the question text.
    pub attachment: Option<FileInput>,
    /// Payslip the user currently has open, injected into the system
    /// instruction so the assistant can refer to it.
    pub focused_payslip: Option<Payslip>,
    /// Inject the municipal surtax reference document.
    pub include_tax_tables: bool,
}

/// Request/response adapters around the generation backend.
pub struct Gateway<C> {
    client: C,
}

impl<C: GenerateContent> Gateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Extract a structured payslip record from a document or image.
    ///
    /// The response is constrained to the contract schema; anything that
    /// still fails to parse becomes [`AiError::InvalidExtraction`]. A
    /// missing id is synthesized locally as `payslip-{uuid}`.
    pub async fn analyze(&self, file: &FileInput) -> Result<Payslip, AiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::text(prompts::ANALYZE_PROMPT),
                Part::inline(&file.mime_type, &file.bytes),
            ])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(payslip_response_schema()),
            }),
        };

        let text = self.client.generate(request).await?;
        let mut payslip: Payslip =
            serde_json::from_str(text.trim()).map_err(AiError::InvalidExtraction)?;

        if payslip.id.is_empty() {
            payslip.id = format!("payslip-{}", Uuid::new_v4());
        }
        info!(
            id = %payslip.id,
            month = payslip.period.month,
            year = payslip.period.year,
            "payslip extracted"
        );
        Ok(payslip)
    }

    /// Free-text narrative of the differences between two payslips.
    /// Argument order never causes failure.
    pub async fn compare(&self, first: &Payslip, second: &Payslip) -> Result<String, AiError> {
        let prompt = prompts::comparison_prompt(first, second)?;
        self.client
            .generate(GenerateContentRequest::from_prompt(prompt))
            .await
    }

    /// Free-text descriptive narrative of a single payslip.
    pub async fn summarize(&self, payslip: &Payslip) -> Result<String, AiError> {
        let prompt = prompts::summary_prompt(payslip)?;
        self.client
            .generate(GenerateContentRequest::from_prompt(prompt))
            .await
    }

    /// One assistant turn as a single completion.
    pub async fn chat(
        &self,
        history: &[ChatMessage],
        question: &str,
        context: &ChatContext,
    ) -> Result<String, AiError> {
        let request = build_chat_request(history, question, context)?;
        self.client.generate(request).await
    }

    /// One assistant turn as a live token stream.
    pub async fn chat_stream(
        &self,
        history: &[ChatMessage],
        question: &str,
        context: &ChatContext,
    ) -> Result<TextStream, AiError> {
        let request = build_chat_request(history, question, context)?;
        self.client.stream(request).await
    }
}

/// Replay history as alternating user/model turns, in order, then append
/// the new question (attachment first, when present).
fn build_chat_request(
    history: &[ChatMessage],
    question: &str,
    context: &ChatContext,
) -> Result<GenerateContentRequest, AiError> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|msg| Content {
            role: Some(
                match msg.sender {
                    Sender::User => "user",
                    Sender::Ai => "model",
                }
                .into(),
            ),
            parts: vec![Part::text(msg.text.clone())],
        })
        .collect();

    let mut parts = Vec::new();
    if let Some(file) = &context.attachment {
        parts.push(Part::inline(&file.mime_type, &file.bytes));
    }
    parts.push(Part::text(question));
    contents.push(Content::user(parts));

    let instruction = prompts::system_instruction(
        context.include_tax_tables,
        context.focused_payslip.as_ref(),
    )?;

    Ok(GenerateContentRequest {
        contents,
        system_instruction: Some(Content::system(instruction)),
        generation_config: None,
    })
}
