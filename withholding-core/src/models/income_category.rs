use serde::{Deserialize, Serialize};

/// Statutory income category codes used on Taiwanese withholding statements.
///
/// The set is closed: every payment the engine handles falls into exactly one
/// of these four codes, and each code carries its own rate/threshold schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeCategory {
    /// Code 9A: professional practice income (lawyers, accountants,
    /// architects, physicians, performers, agents and similar).
    ProfessionalFees,
    /// Code 9B: manuscript, scriptwriting, artwork and lecture fees with a
    /// creative character.
    ManuscriptFees,
    /// Code 50: part-time salary income.
    PartTimeSalary,
    /// Code 92: other income not covered by the codes above.
    OtherIncome,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfessionalFees => "9A",
            Self::ManuscriptFees => "9B",
            Self::PartTimeSalary => "50",
            Self::OtherIncome => "92",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "9A" => Some(Self::ProfessionalFees),
            "9B" => Some(Self::ManuscriptFees),
            "50" => Some(Self::PartTimeSalary),
            "92" => Some(Self::OtherIncome),
            _ => None,
        }
    }
}
