//! Instruction prompts handed to the model, in Italian like the documents
//! they describe.

use paylens_core::Payslip;

/// Fixed extraction instruction for `analyze`. The response schema is sent
/// separately as a structured-output constraint.
pub const ANALYZE_PROMPT: &str = "\
Esegui un'analisi semantica completa e dettagliata di questa busta paga italiana.
Popola lo schema JSON fornito con la massima granularità possibile.";

/// Base system instruction for the assistant chat.
pub const SYSTEM_INSTRUCTION: &str = "\
Sei un consulente del lavoro virtuale esperto di CCNL italiani.
Rispondi in modo informativo, preciso e non vincolante.";

/// Quick-reference document on municipal IRPEF surtaxes, injected into the
/// system instruction when the caller opts in.
pub const MUNICIPAL_TAX_TABLES: &str = "\
Addizionali comunali IRPEF — riferimento rapido per i capoluoghi principali:
Roma: 0,90%; Milano: 0,80% con esenzione fino a 23.000 € di imponibile;
Napoli: 0,80%; Torino: 0,80%; Bologna: aliquote a scaglioni da 0,70% a 0,80%;
Firenze: 0,30%; Genova: 0,80%; Palermo: 0,80%; Bari: 0,80%; Venezia: 0,80%.
L'addizionale si calcola sull'imponibile fiscale IRPEF ed è versata in acconto
(marzo-novembre) e saldo (anno successivo). Verificare sempre la delibera
comunale dell'anno d'imposta: aliquote ed esenzioni cambiano di anno in anno.";

const MONTHS: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

/// Italian month name for a 1-based month number.
pub fn month_name(month: u8) -> &'static str {
    usize::from(month)
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i))
        .copied()
        .unwrap_or("mese sconosciuto")
}

/// Difference-narrative prompt over two full payslip records.
pub fn comparison_prompt(first: &Payslip, second: &Payslip) -> Result<String, serde_json::Error> {
    Ok(format!(
        "Confronta le seguenti due buste paga e spiega le differenze principali.\n\
         Busta Paga 1 ({} {}):\n{}\n\n\
         Busta Paga 2 ({} {}):\n{}",
        month_name(first.period.month),
        first.period.year,
        serde_json::to_string_pretty(first)?,
        month_name(second.period.month),
        second.period.year,
        serde_json::to_string_pretty(second)?,
    ))
}

/// Descriptive-narrative prompt over a single payslip record.
pub fn summary_prompt(payslip: &Payslip) -> Result<String, serde_json::Error> {
    Ok(format!(
        "Descrivi in modo semplice e professionale la seguente busta paga:\n{}",
        serde_json::to_string_pretty(payslip)?,
    ))
}

/// Assemble the chat system instruction: consultant persona, optionally the
/// municipal surtax reference and the payslip the user is looking at.
pub fn system_instruction(
    include_tax_tables: bool,
    focused_payslip: Option<&Payslip>,
) -> Result<String, serde_json::Error> {
    let mut instruction = SYSTEM_INSTRUCTION.to_string();

    if include_tax_tables {
        instruction.push_str(
            "\n--- INIZIO DOCUMENTO ADDIZIONALI COMUNALI ---\n",
        );
        instruction.push_str(MUNICIPAL_TAX_TABLES);
        instruction.push_str("\n--- FINE DOCUMENTO ADDIZIONALI COMUNALI ---");
    }

    if let Some(payslip) = focused_payslip {
        instruction.push_str("\n--- BUSTA PAGA IN ESAME ---\n");
        instruction.push_str(&serde_json::to_string_pretty(payslip)?);
        instruction.push_str("\n--- FINE BUSTA PAGA ---");
    }

    Ok(instruction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "gennaio");
        assert_eq!(month_name(8), "agosto");
        assert_eq!(month_name(12), "dicembre");
        assert_eq!(month_name(0), "mese sconosciuto");
        assert_eq!(month_name(13), "mese sconosciuto");
    }

    #[test]
    fn system_instruction_base_only() {
        let instruction = system_instruction(false, None).unwrap();
        assert_eq!(instruction, SYSTEM_INSTRUCTION);
    }

    #[test]
    fn system_instruction_with_tax_tables() {
        let instruction = system_instruction(true, None).unwrap();
        assert!(instruction.starts_with(SYSTEM_INSTRUCTION));
        assert!(instruction.contains("INIZIO DOCUMENTO ADDIZIONALI COMUNALI"));
        assert!(instruction.contains("FINE DOCUMENTO ADDIZIONALI COMUNALI"));
    }
}
