//! paylens — AI assistant for Italian payslips, from the terminal.

mod display;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use paylens_ai::{ChatContext, FileInput, Gateway, GeminiClient, GenerateContent};
use paylens_core::{ChatMessage, Payslip, Sender, check_consistency};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "paylens")]
#[command(about = "Analizza, confronta e interroga buste paga italiane")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Model override, e.g. gemini-2.5-pro
    #[arg(long, global = true, env = "PAYLENS_MODEL")]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a structured record from a payslip image or PDF
    Analyze {
        /// Payslip file (pdf, png, jpg, webp)
        input: PathBuf,

        /// Mime type override when the extension is ambiguous
        #[arg(long)]
        mime: Option<String>,

        /// Where to write the extracted JSON (default: alongside the input)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Narrate the differences between two analyzed payslips
    Compare {
        /// First payslip JSON (from `analyze`)
        first: PathBuf,
        /// Second payslip JSON
        second: PathBuf,
    },

    /// Plain-language summary of an analyzed payslip
    Summarize {
        /// Payslip JSON (from `analyze`)
        payslip: PathBuf,
    },

    /// Interactive assistant chat, streamed (exit with /esci or EOF)
    Chat {
        /// Analyzed payslip JSON to discuss
        #[arg(long)]
        payslip: Option<PathBuf>,

        /// File to attach to the first question
        #[arg(long)]
        attach: Option<PathBuf>,

        /// Include the municipal surtax reference document
        #[arg(long)]
        tax_tables: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::debug!("paylens v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let mut client = GeminiClient::from_env()?;
    if let Some(model) = &cli.model {
        client = client.with_model(model);
    }
    let gateway = Gateway::new(client);

    match cli.command {
        Commands::Analyze {
            input,
            mime,
            output,
        } => analyze(&gateway, &input, mime, output).await,
        Commands::Compare { first, second } => compare(&gateway, &first, &second).await,
        Commands::Summarize { payslip } => summarize(&gateway, &payslip).await,
        Commands::Chat {
            payslip,
            attach,
            tax_tables,
        } => chat(&gateway, payslip, attach, tax_tables).await,
    }
}

async fn analyze<C: GenerateContent>(
    gateway: &Gateway<C>,
    input: &Path,
    mime: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let file = read_file_input(input, mime)?;
    eprintln!("Analisi di {} in corso...", input.display());

    let payslip = gateway.analyze(&file).await?;
    print!("{}", display::payslip_card(&payslip));

    let findings = check_consistency(&payslip);
    if !findings.is_empty() {
        eprintln!("\nAttenzione: incongruenze rilevate nell'estrazione:");
        for finding in &findings {
            eprintln!("  {}: {}", finding.field, finding.message);
        }
    }

    let output = output.unwrap_or_else(|| input.with_extension("payslip.json"));
    let json = serde_json::to_string_pretty(&payslip)?;
    std::fs::write(&output, json)
        .with_context(|| format!("writing {}", output.display()))?;
    eprintln!("\nRecord salvato in {}", output.display());
    Ok(())
}

async fn compare<C: GenerateContent>(
    gateway: &Gateway<C>,
    first: &Path,
    second: &Path,
) -> anyhow::Result<()> {
    let a = load_payslip(first)?;
    let b = load_payslip(second)?;
    let narrative = gateway.compare(&a, &b).await?;
    println!("{narrative}");
    Ok(())
}

async fn summarize<C: GenerateContent>(gateway: &Gateway<C>, path: &Path) -> anyhow::Result<()> {
    let payslip = load_payslip(path)?;
    let summary = gateway.summarize(&payslip).await?;
    println!("{summary}");
    Ok(())
}

async fn chat<C: GenerateContent>(
    gateway: &Gateway<C>,
    payslip: Option<PathBuf>,
    attach: Option<PathBuf>,
    tax_tables: bool,
) -> anyhow::Result<()> {
    let focused = payslip.as_deref().map(load_payslip).transpose()?;
    // The attachment rides along with the first question only.
    let mut attachment = attach
        .as_deref()
        .map(|path| read_file_input(path, None))
        .transpose()?;

    let mut history: Vec<ChatMessage> = Vec::new();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    eprintln!("Assistente buste paga. Scrivi una domanda (/esci per uscire).");
    loop {
        eprint!("> ");
        let mut question = String::new();
        if stdin.lock().read_line(&mut question)? == 0 {
            break;
        }
        let question = question.trim();
        if question.is_empty() {
            continue;
        }
        if question == "/esci" {
            break;
        }

        let context = ChatContext {
            attachment: attachment.take(),
            focused_payslip: focused.clone(),
            include_tax_tables: tax_tables,
        };

        let mut stream = gateway.chat_stream(&history, question, &context).await?;
        let mut answer = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            print!("{chunk}");
            stdout.flush()?;
            answer.push_str(&chunk);
        }
        println!();

        history.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: question.to_string(),
            sender: Sender::User,
        });
        history.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: answer,
            sender: Sender::Ai,
        });
    }
    Ok(())
}

fn load_payslip(path: &Path) -> anyhow::Result<Payslip> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("{} is not an analyzed payslip record", path.display()))
}

fn read_file_input(path: &Path, mime: Option<String>) -> anyhow::Result<FileInput> {
    let mime = match mime {
        Some(mime) => mime,
        None => guess_mime(path)
            .with_context(|| {
                format!(
                    "cannot infer mime type of {}; pass --mime explicitly",
                    path.display()
                )
            })?
            .to_string(),
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(FileInput::new(mime, bytes))
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_payslip_mime_types() {
        assert_eq!(guess_mime(Path::new("marzo.pdf")), Some("application/pdf"));
        assert_eq!(guess_mime(Path::new("b.PNG")), Some("image/png"));
        assert_eq!(guess_mime(Path::new("scan.jpeg")), Some("image/jpeg"));
        assert_eq!(guess_mime(Path::new("scan.webp")), Some("image/webp"));
        assert_eq!(guess_mime(Path::new("busta.docx")), None);
        assert_eq!(guess_mime(Path::new("senza_estensione")), None);
    }
}
