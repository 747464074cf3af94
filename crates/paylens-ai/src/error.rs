use thiserror::Error;

/// Errors surfaced by the AI gateway.
///
/// No variant is retried: every failure is terminal for the current
/// operation and is handled by the caller (typically: show the message,
/// allow re-upload).
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Chiave API Gemini mancante. Imposta GEMINI_API_KEY nell'ambiente.")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model returned no content")]
    EmptyResponse,

    /// The analysis response did not parse as a payslip. The message is the
    /// user-facing remediation hint shown by the app.
    #[error(
        "L'analisi ha prodotto un risultato non valido. \
         Assicurati che il file sia una busta paga chiara."
    )]
    InvalidExtraction(#[source] serde_json::Error),
}
