pub mod check;
pub mod payslip;
pub mod schema;

pub use check::{Finding, check_consistency};
pub use payslip::{
    ChatMessage, Company, Employee, LeaveBalance, LeaveData, PayItem, Payslip, Period, Sender,
    SocialSecurityData, TaxData, TaxDeductions, Tfr,
};
pub use schema::payslip_response_schema;
