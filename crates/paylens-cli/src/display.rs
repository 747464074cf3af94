//! Vertical card display for extracted payslips.
//!
//! Renders a `Payslip` as a grouped, human-readable card: header, earning
//! and deduction lines, totals, then the fiscal, social-security, TFR and
//! leave sections.

use paylens_ai::prompts::month_name;
use paylens_core::{LeaveBalance, PayItem, Payslip};

const LABEL_WIDTH: usize = 24;

/// Format an amount the way Italian payslips print them: comma decimals.
fn eur(value: f64) -> String {
    format!("{:.2} €", value).replace('.', ",")
}

fn line(out: &mut String, label: &str, value: impl AsRef<str>) {
    out.push_str(&format!("  {:<LABEL_WIDTH$}{}\n", label, value.as_ref()));
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n── {title} ──\n"));
}

fn item_line(out: &mut String, item: &PayItem) {
    let detail = match (item.quantity, item.rate) {
        (Some(quantity), Some(rate)) => format!("{quantity:.2} x {rate:.4}  "),
        _ => String::new(),
    };
    out.push_str(&format!(
        "  {:<38}{:>18}{:>14}\n",
        item.description,
        detail,
        eur(item.value)
    ));
}

fn leave_line(out: &mut String, label: &str, balance: &LeaveBalance) {
    line(
        out,
        label,
        format!(
            "residuo prec. {:.2}  maturato {:.2}  goduto {:.2}  saldo {:.2}",
            balance.previous, balance.accrued, balance.taken, balance.balance
        ),
    );
}

/// Render the full card.
pub fn payslip_card(slip: &Payslip) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Busta Paga — {} {}\n",
        month_name(slip.period.month),
        slip.period.year
    ));
    line(
        &mut out,
        "Azienda",
        format!("{} ({})", slip.company.name, slip.company.tax_id),
    );
    if let Some(address) = &slip.company.address {
        line(&mut out, "Indirizzo", address);
    }
    line(
        &mut out,
        "Dipendente",
        format!(
            "{} {} ({})",
            slip.employee.first_name, slip.employee.last_name, slip.employee.tax_id
        ),
    );
    if let Some(level) = &slip.employee.level {
        line(&mut out, "Livello", level);
    }
    if let Some(contract) = &slip.employee.contract_type {
        line(&mut out, "Contratto", contract);
    }

    section(&mut out, "Competenze");
    for item in &slip.income_items {
        item_line(&mut out, item);
    }

    section(&mut out, "Trattenute");
    for item in &slip.deduction_items {
        item_line(&mut out, item);
    }

    section(&mut out, "Totali");
    line(&mut out, "Retribuzione lorda", eur(slip.gross_salary));
    line(&mut out, "Totale trattenute", eur(slip.total_deductions));
    line(&mut out, "Netto in busta", eur(slip.net_salary));

    section(&mut out, "Fisco");
    line(&mut out, "Imponibile fiscale", eur(slip.tax_data.taxable_base));
    line(&mut out, "Imposta lorda", eur(slip.tax_data.gross_tax));
    line(
        &mut out,
        "Detrazione dipendente",
        eur(slip.tax_data.deductions.employee),
    );
    if let Some(family) = slip.tax_data.deductions.family {
        line(&mut out, "Detrazioni familiari", eur(family));
    }
    line(&mut out, "Totale detrazioni", eur(slip.tax_data.deductions.total));
    line(&mut out, "Imposta netta", eur(slip.tax_data.net_tax));
    line(
        &mut out,
        "Addizionale regionale",
        eur(slip.tax_data.regional_surtax),
    );
    line(
        &mut out,
        "Addizionale comunale",
        eur(slip.tax_data.municipal_surtax),
    );

    section(&mut out, "Previdenza");
    line(
        &mut out,
        "Imponibile INPS",
        eur(slip.social_security_data.taxable_base),
    );
    line(
        &mut out,
        "Contributi dipendente",
        eur(slip.social_security_data.employee_contribution),
    );
    line(
        &mut out,
        "Contributi azienda",
        eur(slip.social_security_data.company_contribution),
    );
    if let Some(inail) = slip.social_security_data.inail_contribution {
        line(&mut out, "Contributo INAIL", eur(inail));
    }

    section(&mut out, "TFR");
    line(&mut out, "Imponibile TFR", eur(slip.tfr.taxable_base));
    line(&mut out, "Quota del mese", eur(slip.tfr.accrued));
    line(&mut out, "Fondo precedente", eur(slip.tfr.previous_balance));
    line(&mut out, "Fondo totale", eur(slip.tfr.total_fund));

    section(&mut out, "Ferie e permessi");
    leave_line(&mut out, "Ferie", &slip.leave_data.vacation);
    leave_line(&mut out, "Permessi (ROL)", &slip.leave_data.permits);

    out
}
