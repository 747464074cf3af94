//! Advisory consistency checks over an extracted payslip.
//!
//! The extraction comes from a generative model and can be subtly wrong;
//! these checks cross-verify the arithmetic the slip itself should satisfy.
//! Findings are advisory only and never block an analysis result.

use crate::payslip::Payslip;

/// Cent-level slack for amounts that the slip prints rounded.
const AMOUNT_TOLERANCE: f64 = 0.01;

/// Looser slack for quantity×rate lines, which payroll software rounds
/// per-component before multiplying.
const ITEM_TOLERANCE: f64 = 0.05;

/// One inconsistency detected in an extracted payslip.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Dotted path of the offending field, e.g. `netSalary` or
    /// `leaveData.vacation.balance`.
    pub field: String,
    /// Human-readable description with the expected value.
    pub message: String,
}

/// Cross-check the totals of an extracted payslip.
///
/// Returns one [`Finding`] per violated identity; an empty vector means the
/// record is arithmetically consistent:
///
/// - `netSalary = grossSalary - totalDeductions`
/// - `balance = previous + accrued - taken` for each leave balance
/// - `value = quantity * rate` for each pay item carrying both
pub fn check_consistency(slip: &Payslip) -> Vec<Finding> {
    let mut findings = Vec::new();

    let expected_net = slip.gross_salary - slip.total_deductions;
    if (slip.net_salary - expected_net).abs() > AMOUNT_TOLERANCE {
        findings.push(Finding {
            field: "netSalary".into(),
            message: format!(
                "net salary {:.2} does not match gross {:.2} minus deductions {:.2} (expected {:.2})",
                slip.net_salary, slip.gross_salary, slip.total_deductions, expected_net
            ),
        });
    }

    for (name, balance) in [
        ("vacation", &slip.leave_data.vacation),
        ("permits", &slip.leave_data.permits),
    ] {
        let expected = balance.previous + balance.accrued - balance.taken;
        if (balance.balance - expected).abs() > AMOUNT_TOLERANCE {
            findings.push(Finding {
                field: format!("leaveData.{name}.balance"),
                message: format!(
                    "{name} balance {:.2} does not match previous {:.2} + accrued {:.2} - taken {:.2} (expected {:.2})",
                    balance.balance, balance.previous, balance.accrued, balance.taken, expected
                ),
            });
        }
    }

    for (kind, items) in [
        ("incomeItems", &slip.income_items),
        ("deductionItems", &slip.deduction_items),
    ] {
        for (i, item) in items.iter().enumerate() {
            let (Some(quantity), Some(rate)) = (item.quantity, item.rate) else {
                continue;
            };
            let expected = quantity * rate;
            if (item.value - expected).abs() > ITEM_TOLERANCE {
                findings.push(Finding {
                    field: format!("{kind}[{i}].value"),
                    message: format!(
                        "'{}': value {:.2} does not match quantity {:.2} x rate {:.2} (expected {:.2})",
                        item.description, item.value, quantity, rate, expected
                    ),
                });
            }
        }
    }

    if !findings.is_empty() {
        tracing::warn!(
            payslip = %slip.id,
            count = findings.len(),
            "payslip failed consistency checks"
        );
    }

    findings
}
