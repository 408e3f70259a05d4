pub mod calculations;
pub mod models;

pub use calculations::{DeductionEngine, RuleSet, RuleSetError};
pub use models::*;
