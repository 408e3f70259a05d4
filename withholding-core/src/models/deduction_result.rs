use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of a forward or reverse deduction computation.
///
/// Amounts are whole NT dollars; the two deductions are each the floor of
/// `gross_amount × rate`, computed independently of one another, and
/// `net_amount = gross_amount − tax_amount − health_premium_amount` always
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    /// The gross payment the deductions were computed from. For a reverse
    /// computation this is the solved minimal gross.
    pub gross_amount: u64,

    /// Withholding tax rate that applied, zero when exempt.
    pub tax_rate: Decimal,

    /// Withholding tax actually deducted.
    pub tax_amount: u64,

    /// Supplementary NHI premium rate that applied, zero when exempt.
    pub health_premium_rate: Decimal,

    /// Supplementary NHI premium actually deducted.
    pub health_premium_amount: u64,

    /// What the payee receives after both deductions.
    pub net_amount: u64,

    /// Human-readable explanation of each rule that fired, in computation
    /// order: premium first, then tax. Display only, never control flow.
    pub messages: Vec<String>,
}

impl DeductionResult {
    /// The degenerate result for a zero amount: everything zero, nothing to
    /// explain.
    pub(crate) fn zero() -> Self {
        Self {
            gross_amount: 0,
            tax_rate: Decimal::ZERO,
            tax_amount: 0,
            health_premium_rate: Decimal::ZERO,
            health_premium_amount: 0,
            net_amount: 0,
            messages: Vec::new(),
        }
    }
}
