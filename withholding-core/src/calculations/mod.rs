//! Deduction calculations: the forward withholding pass and the reverse
//! (net-to-gross) search, plus the rule set they share.

pub mod common;
pub mod gross_up;
pub mod rule_set;
pub mod withholding;

pub use rule_set::{RuleSet, RuleSetError};
pub use withholding::DeductionEngine;
