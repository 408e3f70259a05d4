mod deduction_result;
mod income_category;
mod payee;
mod residency;

pub use deduction_result::DeductionResult;
pub use income_category::IncomeCategory;
pub use payee::{ExemptionFlags, PayeeProfile};
pub use residency::ResidencyStatus;
