//! Shared payslip contract types for the AI gateway and its consumers.
//!
//! Field names on the wire are camelCase; every consumer must tolerate
//! optional fields being absent. A `Payslip` is created only as the parsed
//! output of an analysis call and is never mutated afterwards.

use serde::{Deserialize, Serialize};

/// One extracted Italian payslip ("busta paga") for a single pay period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    /// Synthesized by the gateway when the extraction omits one.
    #[serde(default)]
    pub id: String,
    pub period: Period,
    pub company: Company,
    pub employee: Employee,
    pub income_items: Vec<PayItem>,
    pub deduction_items: Vec<PayItem>,
    /// Retribuzione lorda (totale competenze).
    pub gross_salary: f64,
    /// Totale trattenute.
    pub total_deductions: f64,
    /// Netto in busta.
    pub net_salary: f64,
    pub tax_data: TaxData,
    pub social_security_data: SocialSecurityData,
    pub tfr: Tfr,
    pub leave_data: LeaveData,
}

/// Pay period: month 1-12 plus year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub month: u8,
    pub year: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub tax_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub first_name: String,
    pub last_name: String,
    pub tax_id: String,
    /// CCNL level, when printed on the slip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
}

/// A single earning or deduction line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayItem {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    pub value: f64,
}

/// Fiscal section: IRPEF base, gross/net tax, deduction breakdown, surtaxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxData {
    /// Imponibile fiscale.
    pub taxable_base: f64,
    /// Imposta lorda.
    pub gross_tax: f64,
    pub deductions: TaxDeductions,
    /// Imposta netta.
    pub net_tax: f64,
    /// Addizionale regionale.
    pub regional_surtax: f64,
    /// Addizionale comunale.
    pub municipal_surtax: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxDeductions {
    /// Detrazione lavoro dipendente.
    pub employee: f64,
    /// Detrazioni familiari a carico.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<f64>,
    pub total: f64,
}

/// INPS section: contribution base and employee/company shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSecurityData {
    /// Imponibile previdenziale.
    pub taxable_base: f64,
    pub employee_contribution: f64,
    pub company_contribution: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inail_contribution: Option<f64>,
}

/// Trattamento di fine rapporto (severance fund) accrual for the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tfr {
    pub taxable_base: f64,
    /// Quota maturata nel mese.
    pub accrued: f64,
    /// Fondo al 31/12 dell'anno precedente.
    pub previous_balance: f64,
    pub total_fund: f64,
}

/// Leave balances: vacation days (ferie) and ROL permit hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveData {
    pub vacation: LeaveBalance,
    pub permits: LeaveBalance,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub previous: f64,
    pub accrued: f64,
    pub taken: f64,
    pub balance: f64,
}

/// One turn of the assistant conversation. History is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payslip() -> Payslip {
        Payslip {
            id: "payslip-test".into(),
            period: Period {
                month: 3,
                year: 2025,
            },
            company: Company {
                name: "Acme S.r.l.".into(),
                tax_id: "01234567890".into(),
                address: Some("Via Roma 1, Milano".into()),
            },
            employee: Employee {
                first_name: "Maria".into(),
                last_name: "Rossi".into(),
                tax_id: "RSSMRA80A41F205X".into(),
                level: Some("4".into()),
                contract_type: Some("CCNL Commercio".into()),
            },
            income_items: vec![PayItem {
                description: "Retribuzione ordinaria".into(),
                quantity: Some(168.0),
                rate: Some(12.5),
                value: 2100.0,
            }],
            deduction_items: vec![PayItem {
                description: "Contributi INPS".into(),
                quantity: None,
                rate: None,
                value: 193.2,
            }],
            gross_salary: 2100.0,
            total_deductions: 500.0,
            net_salary: 1600.0,
            tax_data: TaxData {
                taxable_base: 1906.8,
                gross_tax: 470.0,
                deductions: TaxDeductions {
                    employee: 110.0,
                    family: None,
                    total: 110.0,
                },
                net_tax: 360.0,
                regional_surtax: 25.0,
                municipal_surtax: 8.0,
            },
            social_security_data: SocialSecurityData {
                taxable_base: 2100.0,
                employee_contribution: 193.2,
                company_contribution: 630.0,
                inail_contribution: None,
            },
            tfr: Tfr {
                taxable_base: 2100.0,
                accrued: 155.5,
                previous_balance: 4200.0,
                total_fund: 4355.5,
            },
            leave_data: LeaveData {
                vacation: LeaveBalance {
                    previous: 10.0,
                    accrued: 1.83,
                    taken: 2.0,
                    balance: 9.83,
                },
                permits: LeaveBalance {
                    previous: 20.0,
                    accrued: 4.33,
                    taken: 0.0,
                    balance: 24.33,
                },
            },
        }
    }

    #[test]
    fn payslip_json_roundtrip() {
        let slip = sample_payslip();
        let json = serde_json::to_string(&slip).unwrap();
        let parsed: Payslip = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "payslip-test");
        assert_eq!(parsed.period.month, 3);
        assert_eq!(parsed.employee.last_name, "Rossi");
        assert_eq!(parsed.income_items[0].quantity, Some(168.0));
        assert_eq!(parsed.leave_data.permits.balance, 24.33);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(sample_payslip()).unwrap();
        assert!(json.get("grossSalary").is_some());
        assert!(json.get("incomeItems").is_some());
        assert!(json["taxData"].get("regionalSurtax").is_some());
        assert!(json["employee"].get("firstName").is_some());
        assert!(json["socialSecurityData"].get("employeeContribution").is_some());
    }

    #[test]
    fn missing_id_defaults_to_empty() {
        let mut json = serde_json::to_value(sample_payslip()).unwrap();
        json.as_object_mut().unwrap().remove("id");
        let parsed: Payslip = serde_json::from_value(json).unwrap();
        assert!(parsed.id.is_empty());
    }

    #[test]
    fn absent_optional_fields_tolerated() {
        let mut json = serde_json::to_value(sample_payslip()).unwrap();
        json["company"].as_object_mut().unwrap().remove("address");
        json["employee"].as_object_mut().unwrap().remove("level");
        json["employee"].as_object_mut().unwrap().remove("contractType");
        json["taxData"]["deductions"].as_object_mut().unwrap().remove("family");
        let parsed: Payslip = serde_json::from_value(json).unwrap();
        assert!(parsed.company.address.is_none());
        assert!(parsed.employee.level.is_none());
        assert!(parsed.tax_data.deductions.family.is_none());
    }

    #[test]
    fn none_fields_skipped_when_serializing() {
        let mut slip = sample_payslip();
        slip.company.address = None;
        let json = serde_json::to_value(&slip).unwrap();
        assert!(json["company"].get("address").is_none());
    }

    #[test]
    fn sender_serializes_lowercase() {
        let msg = ChatMessage {
            id: "m1".into(),
            text: "Quanto è il netto?".into(),
            sender: Sender::User,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "user");

        let parsed: ChatMessage =
            serde_json::from_str(r#"{"id":"m2","text":"1600 euro","sender":"ai"}"#).unwrap();
        assert_eq!(parsed.sender, Sender::Ai);
    }
}
