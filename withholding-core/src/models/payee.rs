use serde::{Deserialize, Serialize};

use super::{IncomeCategory, ResidencyStatus};

/// Conditions that exempt a resident 9A/9B payee from the supplementary
/// NHI premium.
///
/// The form treats the two checkboxes as mutually exclusive, but the engine
/// must not rely on that: either flag alone is sufficient, so both set is
/// still exempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionFlags {
    /// Payee is separately insured through an occupational (trade) union.
    pub union_insured: bool,

    /// Payment goes to a firm or practice rather than an individual, e.g. an
    /// accounting or architecture firm.
    pub firm_payee: bool,
}

/// Classification of a payment's recipient: everything the engine needs
/// besides the amount itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeeProfile {
    pub category: IncomeCategory,
    pub residency: ResidencyStatus,
    pub exemptions: ExemptionFlags,
}

impl PayeeProfile {
    /// A resident payee with neither premium exemption claimed.
    pub fn resident(category: IncomeCategory) -> Self {
        Self {
            category,
            residency: ResidencyStatus::Resident,
            exemptions: ExemptionFlags::default(),
        }
    }

    /// A non-resident payee. Exemption flags are irrelevant for
    /// non-residents but kept at their defaults.
    pub fn non_resident(category: IncomeCategory) -> Self {
        Self {
            category,
            residency: ResidencyStatus::NonResident,
            exemptions: ExemptionFlags::default(),
        }
    }
}
