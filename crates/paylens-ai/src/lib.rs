//! AI gateway: request/response mapping around the Gemini API for payslip
//! analysis, comparison, summary, and the assistant chat.

pub mod client;
pub mod error;
pub mod gateway;
pub mod prompts;
pub mod wire;

pub use client::GeminiClient;
pub use error::AiError;
pub use gateway::{ChatContext, FileInput, Gateway, GenerateContent, TextStream};
