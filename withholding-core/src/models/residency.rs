use serde::{Deserialize, Serialize};

/// Tax residency of the payee.
///
/// Residents are individuals present in Taiwan for 183 days or more in the
/// tax year; everyone else is a non-resident. The two statuses use entirely
/// different rate/threshold tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidencyStatus {
    Resident,
    NonResident,
}

impl ResidencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::NonResident => "non-resident",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resident" => Some(Self::Resident),
            "non-resident" | "nonresident" => Some(Self::NonResident),
            _ => None,
        }
    }
}
