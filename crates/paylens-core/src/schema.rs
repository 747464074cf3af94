//! Machine-readable response schema for payslip extraction.
//!
//! Handed to the model as a `responseSchema` constraint so the extraction
//! comes back as JSON matching [`crate::Payslip`]. The schema and the Rust
//! types must stay structurally identical; drift between them is a silent
//! correctness bug, so the tests below deserialize schema-shaped documents
//! straight into the contract types.

use serde_json::{Value, json};

fn pay_item_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": { "type": "STRING" },
            "quantity": { "type": "NUMBER" },
            "rate": { "type": "NUMBER" },
            "value": { "type": "NUMBER" },
        },
        "required": ["description", "value"],
    })
}

fn leave_balance_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "previous": { "type": "NUMBER" },
            "accrued": { "type": "NUMBER" },
            "taken": { "type": "NUMBER" },
            "balance": { "type": "NUMBER" },
        },
        "required": ["previous", "accrued", "taken", "balance"],
    })
}

/// Response schema for a full payslip extraction.
///
/// `id` is deliberately not required: when the model omits it the gateway
/// synthesizes one locally.
pub fn payslip_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "period": {
                "type": "OBJECT",
                "properties": {
                    "month": { "type": "INTEGER" },
                    "year": { "type": "INTEGER" },
                },
                "required": ["month", "year"],
            },
            "company": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "taxId": { "type": "STRING" },
                    "address": { "type": "STRING" },
                },
                "required": ["name", "taxId"],
            },
            "employee": {
                "type": "OBJECT",
                "properties": {
                    "firstName": { "type": "STRING" },
                    "lastName": { "type": "STRING" },
                    "taxId": { "type": "STRING" },
                    "level": { "type": "STRING" },
                    "contractType": { "type": "STRING" },
                },
                "required": ["firstName", "lastName", "taxId"],
            },
            "incomeItems": { "type": "ARRAY", "items": pay_item_schema() },
            "deductionItems": { "type": "ARRAY", "items": pay_item_schema() },
            "grossSalary": { "type": "NUMBER" },
            "totalDeductions": { "type": "NUMBER" },
            "netSalary": { "type": "NUMBER" },
            "taxData": {
                "type": "OBJECT",
                "properties": {
                    "taxableBase": { "type": "NUMBER" },
                    "grossTax": { "type": "NUMBER" },
                    "deductions": {
                        "type": "OBJECT",
                        "properties": {
                            "employee": { "type": "NUMBER" },
                            "family": { "type": "NUMBER" },
                            "total": { "type": "NUMBER" },
                        },
                        "required": ["employee", "total"],
                    },
                    "netTax": { "type": "NUMBER" },
                    "regionalSurtax": { "type": "NUMBER" },
                    "municipalSurtax": { "type": "NUMBER" },
                },
                "required": [
                    "taxableBase", "grossTax", "deductions",
                    "netTax", "regionalSurtax", "municipalSurtax",
                ],
            },
            "socialSecurityData": {
                "type": "OBJECT",
                "properties": {
                    "taxableBase": { "type": "NUMBER" },
                    "employeeContribution": { "type": "NUMBER" },
                    "companyContribution": { "type": "NUMBER" },
                    "inailContribution": { "type": "NUMBER" },
                },
                "required": ["taxableBase", "employeeContribution", "companyContribution"],
            },
            "tfr": {
                "type": "OBJECT",
                "properties": {
                    "taxableBase": { "type": "NUMBER" },
                    "accrued": { "type": "NUMBER" },
                    "previousBalance": { "type": "NUMBER" },
                    "totalFund": { "type": "NUMBER" },
                },
                "required": ["taxableBase", "accrued", "previousBalance", "totalFund"],
            },
            "leaveData": {
                "type": "OBJECT",
                "properties": {
                    "vacation": leave_balance_schema(),
                    "permits": leave_balance_schema(),
                },
                "required": ["vacation", "permits"],
            },
        },
        "required": [
            "period", "company", "employee",
            "incomeItems", "deductionItems",
            "grossSalary", "totalDeductions", "netSalary",
            "taxData", "socialSecurityData", "tfr", "leaveData",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payslip;
    use serde_json::Map;

    #[test]
    fn top_level_required_fields() {
        let schema = payslip_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "period",
            "company",
            "employee",
            "incomeItems",
            "deductionItems",
            "grossSalary",
            "totalDeductions",
            "netSalary",
            "taxData",
            "socialSecurityData",
            "tfr",
            "leaveData",
        ] {
            assert!(required.contains(&field), "missing required field {field}");
        }
        assert!(!required.contains(&"id"), "id must stay optional on the wire");
    }

    /// Build a minimal document containing only schema-required fields,
    /// recursively, and check that it deserializes into the Rust type.
    /// This is the structural-identity guard between schema and contract.
    #[test]
    fn required_only_document_matches_contract() {
        let schema = payslip_response_schema();
        let doc = minimal_document(&schema);
        let parsed: Result<Payslip, _> = serde_json::from_value(doc.clone());
        assert!(
            parsed.is_ok(),
            "schema-required document did not deserialize: {:?}\ndoc: {doc}",
            parsed.err()
        );
    }

    /// Every schema property must exist on the Rust type: a document with
    /// ALL schema properties populated must also deserialize cleanly
    /// (serde would accept unknown fields silently, so this guards the
    /// other direction by construction: full document round-trips through
    /// the type without losing required content).
    #[test]
    fn full_document_matches_contract() {
        let schema = payslip_response_schema();
        let doc = full_document(&schema);
        let parsed: Payslip = serde_json::from_value(doc).unwrap();
        // Optional properties present in the schema land in Options.
        assert!(parsed.company.address.is_some());
        assert!(parsed.employee.level.is_some());
        assert!(parsed.tax_data.deductions.family.is_some());
        assert!(parsed.social_security_data.inail_contribution.is_some());
    }

    fn minimal_document(schema: &Value) -> Value {
        build_document(schema, false)
    }

    fn full_document(schema: &Value) -> Value {
        build_document(schema, true)
    }

    fn build_document(schema: &Value, include_optional: bool) -> Value {
        match schema["type"].as_str().unwrap() {
            "OBJECT" => {
                let props = schema["properties"].as_object().unwrap();
                let required: Vec<&str> = schema["required"]
                    .as_array()
                    .map(|a| a.iter().map(|v| v.as_str().unwrap()).collect())
                    .unwrap_or_default();
                let mut out = Map::new();
                for (name, prop) in props {
                    if include_optional || required.contains(&name.as_str()) {
                        out.insert(name.clone(), build_document(prop, include_optional));
                    }
                }
                Value::Object(out)
            }
            "ARRAY" => Value::Array(vec![build_document(&schema["items"], include_optional)]),
            "STRING" => Value::String("x".into()),
            "NUMBER" => serde_json::json!(1.0),
            "INTEGER" => serde_json::json!(1),
            other => panic!("unexpected schema type {other}"),
        }
    }
}
