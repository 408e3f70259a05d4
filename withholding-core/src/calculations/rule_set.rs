//! The statutory rate and threshold schedule the engine applies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported when a rule set fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    /// The supplementary NHI premium rate must lie in [0, 1].
    #[error("supplementary premium rate must be between 0 and 1, got {0}")]
    InvalidPremiumRate(Decimal),

    /// A withholding tax rate must lie in [0, 1].
    #[error("withholding tax rate must be between 0 and 1, got {0}")]
    InvalidTaxRate(Decimal),

    /// The non-resident reduced part-time rate must not exceed the high one.
    #[error("non-resident reduced rate {0} exceeds the standard rate {1}")]
    InvertedPartTimeRates(Decimal, Decimal),
}

/// Rates and thresholds for the current rule set.
///
/// All thresholds are whole NT dollars. The premium thresholds are inclusive
/// (withholding starts at the threshold) while the resident tax thresholds
/// are strict (withholding starts one dollar above); that asymmetry comes
/// from the statute and is relied on by the engine.
///
/// | Rule | Value |
/// |------|-------|
/// | Resident supplementary premium rate | 2.11% |
/// | Resident tax rate, 9A/9B | 10% |
/// | Resident tax rate, 50 | 5% |
/// | Premium threshold, 9A/9B | NT$20,000 (≥) |
/// | Premium threshold, 50 | NT$28,590 (≥) |
/// | Resident tax threshold, 9A/9B | NT$20,000 (>) |
/// | Resident tax threshold, 50 | NT$88,501 (>) |
/// | Non-resident flat rate (92, and 9A/9B above the floor) | 20% |
/// | Non-resident rate, 50 at or below 1.5× basic wage | 6% |
/// | Non-resident rate, 50 above 1.5× basic wage | 18% |
/// | Non-resident exemption floor, 9A/9B | NT$5,000 (≤) |
/// | Non-resident rate break, 50 | NT$42,885 (≤ low rate) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Supplementary NHI premium rate for residents.
    pub premium_rate: Decimal,

    /// Resident withholding rate for professional and manuscript fees
    /// (codes 9A/9B).
    pub resident_professional_tax_rate: Decimal,

    /// Resident withholding rate for part-time salary (code 50).
    pub resident_part_time_tax_rate: Decimal,

    /// Premium threshold for codes 9A/9B; the premium applies at or above it.
    pub professional_premium_threshold: u64,

    /// Premium threshold for code 50; the premium applies at or above it.
    pub part_time_premium_threshold: u64,

    /// Resident tax threshold for codes 9A/9B; tax applies strictly above it.
    pub professional_tax_threshold: u64,

    /// Resident tax threshold for code 50; tax applies strictly above it.
    pub part_time_tax_threshold: u64,

    /// Flat non-resident rate: code 92 always, codes 9A/9B above the
    /// exemption floor.
    pub non_resident_tax_rate: Decimal,

    /// Non-resident rate for code 50 at or below the rate break.
    pub non_resident_part_time_low_rate: Decimal,

    /// Non-resident rate for code 50 above the rate break.
    pub non_resident_part_time_high_rate: Decimal,

    /// Non-resident exemption floor for codes 9A/9B; payments at or below it
    /// are not withheld.
    pub non_resident_exemption_floor: u64,

    /// Non-resident rate break for code 50: 1.5× the monthly basic wage.
    pub non_resident_part_time_break: u64,
}

impl RuleSet {
    /// The rule set currently in force.
    pub fn current() -> Self {
        Self {
            premium_rate: Decimal::new(211, 4),
            resident_professional_tax_rate: Decimal::new(10, 2),
            resident_part_time_tax_rate: Decimal::new(5, 2),
            professional_premium_threshold: 20_000,
            part_time_premium_threshold: 28_590,
            professional_tax_threshold: 20_000,
            part_time_tax_threshold: 88_501,
            non_resident_tax_rate: Decimal::new(20, 2),
            non_resident_part_time_low_rate: Decimal::new(6, 2),
            non_resident_part_time_high_rate: Decimal::new(18, 2),
            non_resident_exemption_floor: 5_000,
            non_resident_part_time_break: 42_885,
        }
    }

    /// Validates the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError`] if any rate lies outside [0, 1], or if the
    /// non-resident part-time rates are inverted.
    pub fn validate(&self) -> Result<(), RuleSetError> {
        if !Self::is_rate(self.premium_rate) {
            return Err(RuleSetError::InvalidPremiumRate(self.premium_rate));
        }
        for rate in [
            self.resident_professional_tax_rate,
            self.resident_part_time_tax_rate,
            self.non_resident_tax_rate,
            self.non_resident_part_time_low_rate,
            self.non_resident_part_time_high_rate,
        ] {
            if !Self::is_rate(rate) {
                return Err(RuleSetError::InvalidTaxRate(rate));
            }
        }
        if self.non_resident_part_time_low_rate > self.non_resident_part_time_high_rate {
            return Err(RuleSetError::InvertedPartTimeRates(
                self.non_resident_part_time_low_rate,
                self.non_resident_part_time_high_rate,
            ));
        }
        Ok(())
    }

    fn is_rate(value: Decimal) -> bool {
        value >= Decimal::ZERO && value <= Decimal::ONE
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::current()
    }
}
