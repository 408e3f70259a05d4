//! Forward withholding computation: gross payment → deductions → net payout.
//!
//! A payment is classified by income category, payee residency and the two
//! premium exemption flags, then run through two independent passes:
//!
//! 1. supplementary (2nd-generation) NHI premium — residents only;
//! 2. withholding tax.
//!
//! Each pass compares the gross amount against its own threshold, deducts
//! `floor(gross × rate)` when the rule fires, and contributes exactly one
//! explanation message, premium first. The two deductions are computed
//! independently of each other and never compounded.
//!
//! Note the threshold asymmetry for residents: the premium applies *at* its
//! threshold (≥) while the tax applies strictly *above* its threshold (>).
//! At exactly NT$20,000 a 9A payee owes the premium but no tax.
//!
//! # Example
//!
//! ```
//! use withholding_core::{DeductionEngine, IncomeCategory, PayeeProfile};
//!
//! let engine = DeductionEngine::default();
//! let payee = PayeeProfile::resident(IncomeCategory::ProfessionalFees);
//!
//! let result = engine.deduct(30_000, &payee);
//!
//! assert_eq!(result.health_premium_amount, 633); // floor(30000 × 0.0211)
//! assert_eq!(result.tax_amount, 3_000); // floor(30000 × 0.10)
//! assert_eq!(result.net_amount, 26_367);
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{floor_share, format_amount, format_rate};
use crate::calculations::rule_set::{RuleSet, RuleSetError};
use crate::models::{DeductionResult, IncomeCategory, PayeeProfile, ResidencyStatus};

/// One deduction component: the rate that applied, the amount withheld, and
/// the explanation for the branch that fired.
struct Component {
    rate: Decimal,
    amount: u64,
    message: String,
}

impl Component {
    fn exempt(message: String) -> Self {
        Self {
            rate: Decimal::ZERO,
            amount: 0,
            message,
        }
    }

    fn withheld(
        gross: u64,
        rate: Decimal,
        message: String,
    ) -> Self {
        Self {
            rate,
            amount: floor_share(gross, rate),
            message,
        }
    }
}

/// Computes withholding tax and supplementary NHI premium deductions.
///
/// The engine is pure and total over non-negative amounts: identical inputs
/// always produce identical outputs, and no input within the documented
/// domain fails.
#[derive(Debug, Clone)]
pub struct DeductionEngine {
    rules: RuleSet,
}

impl DeductionEngine {
    /// Creates an engine over a validated rule set.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError`] if the rule set fails validation.
    pub fn new(rules: RuleSet) -> Result<Self, RuleSetError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// The rule set this engine applies.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Computes both deductions for a gross payment.
    ///
    /// A zero amount yields the all-zero result with no messages. Otherwise
    /// the result carries one premium message and one tax message, in that
    /// order, and `net_amount = gross_amount − tax_amount −
    /// health_premium_amount`.
    pub fn deduct(
        &self,
        gross_amount: u64,
        payee: &PayeeProfile,
    ) -> DeductionResult {
        if gross_amount == 0 {
            return DeductionResult::zero();
        }

        let premium = self.health_premium(gross_amount, payee);
        let tax = self.withholding_tax(gross_amount, payee);
        let net_amount = gross_amount - tax.amount - premium.amount;

        DeductionResult {
            gross_amount,
            tax_rate: tax.rate,
            tax_amount: tax.amount,
            health_premium_rate: premium.rate,
            health_premium_amount: premium.amount,
            net_amount,
            messages: vec![premium.message, tax.message],
        }
    }

    fn health_premium(
        &self,
        gross: u64,
        payee: &PayeeProfile,
    ) -> Component {
        if payee.residency == ResidencyStatus::NonResident {
            return Component::exempt(
                "non-resident payee: supplementary NHI premium does not apply".to_string(),
            );
        }

        match payee.category {
            IncomeCategory::OtherIncome => Component::exempt(
                "income code 92: supplementary NHI premium does not apply".to_string(),
            ),
            IncomeCategory::ProfessionalFees | IncomeCategory::ManuscriptFees => {
                // Either flag alone exempts; the union check runs first, so
                // both flags set still reports the union reason.
                if payee.exemptions.union_insured {
                    Component::exempt(
                        "payee insured through an occupational union: \
                         supplementary NHI premium exempt"
                            .to_string(),
                    )
                } else if payee.exemptions.firm_payee {
                    Component::exempt(
                        "payee is a firm or practice, not an individual: \
                         supplementary NHI premium exempt"
                            .to_string(),
                    )
                } else {
                    self.premium_at(gross, self.rules.professional_premium_threshold)
                }
            }
            IncomeCategory::PartTimeSalary => {
                self.premium_at(gross, self.rules.part_time_premium_threshold)
            }
        }
    }

    /// The shared premium rule: 2.11% at or above the category threshold.
    fn premium_at(
        &self,
        gross: u64,
        threshold: u64,
    ) -> Component {
        let rate = self.rules.premium_rate;
        if gross >= threshold {
            Component::withheld(
                gross,
                rate,
                format!(
                    "reaches the NT${} threshold: {} supplementary NHI premium withheld",
                    format_amount(threshold),
                    format_rate(rate)
                ),
            )
        } else {
            Component::exempt(format!(
                "below the NT${} supplementary NHI premium threshold",
                format_amount(threshold)
            ))
        }
    }

    fn withholding_tax(
        &self,
        gross: u64,
        payee: &PayeeProfile,
    ) -> Component {
        match payee.residency {
            ResidencyStatus::Resident => match payee.category {
                IncomeCategory::OtherIncome => Component::exempt(
                    "income code 92: withholding tax does not apply".to_string(),
                ),
                IncomeCategory::ProfessionalFees | IncomeCategory::ManuscriptFees => self
                    .resident_tax(
                        gross,
                        self.rules.professional_tax_threshold,
                        self.rules.resident_professional_tax_rate,
                    ),
                IncomeCategory::PartTimeSalary => self.resident_tax(
                    gross,
                    self.rules.part_time_tax_threshold,
                    self.rules.resident_part_time_tax_rate,
                ),
            },
            ResidencyStatus::NonResident => self.non_resident_tax(gross, payee.category),
        }
    }

    /// The resident tax rule: the rate applies strictly above the threshold
    /// (unlike the inclusive premium threshold).
    fn resident_tax(
        &self,
        gross: u64,
        threshold: u64,
        rate: Decimal,
    ) -> Component {
        if gross > threshold {
            Component::withheld(
                gross,
                rate,
                format!(
                    "exceeds the NT${} threshold: {} withholding tax applied",
                    format_amount(threshold),
                    format_rate(rate)
                ),
            )
        } else {
            Component::exempt(format!(
                "at or below the NT${} threshold: no withholding tax",
                format_amount(threshold)
            ))
        }
    }

    fn non_resident_tax(
        &self,
        gross: u64,
        category: IncomeCategory,
    ) -> Component {
        match category {
            IncomeCategory::OtherIncome => Component::withheld(
                gross,
                self.rules.non_resident_tax_rate,
                format!(
                    "income code 92 paid to a non-resident: {} withholding tax applied",
                    format_rate(self.rules.non_resident_tax_rate)
                ),
            ),
            IncomeCategory::ProfessionalFees | IncomeCategory::ManuscriptFees => {
                let floor = self.rules.non_resident_exemption_floor;
                if gross <= floor {
                    Component::exempt(format!(
                        "NT${} or less paid to a non-resident: no withholding tax",
                        format_amount(floor)
                    ))
                } else {
                    Component::withheld(
                        gross,
                        self.rules.non_resident_tax_rate,
                        format!(
                            "over NT${}: {} withholding tax applied",
                            format_amount(floor),
                            format_rate(self.rules.non_resident_tax_rate)
                        ),
                    )
                }
            }
            IncomeCategory::PartTimeSalary => {
                let break_point = self.rules.non_resident_part_time_break;
                if gross <= break_point {
                    Component::withheld(
                        gross,
                        self.rules.non_resident_part_time_low_rate,
                        format!(
                            "at or below 1.5x the monthly basic wage (NT${}): \
                             {} withholding tax applied",
                            format_amount(break_point),
                            format_rate(self.rules.non_resident_part_time_low_rate)
                        ),
                    )
                } else {
                    Component::withheld(
                        gross,
                        self.rules.non_resident_part_time_high_rate,
                        format!(
                            "over 1.5x the monthly basic wage (NT${}): \
                             {} withholding tax applied",
                            format_amount(break_point),
                            format_rate(self.rules.non_resident_part_time_high_rate)
                        ),
                    )
                }
            }
        }
    }
}

impl Default for DeductionEngine {
    /// An engine over [`RuleSet::current`], which is valid by construction.
    fn default() -> Self {
        Self {
            rules: RuleSet::current(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
    use proptest::prop_oneof;
    use proptest::strategy::{Just, Strategy};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::ExemptionFlags;

    const ALL_CATEGORIES: [IncomeCategory; 4] = [
        IncomeCategory::ProfessionalFees,
        IncomeCategory::ManuscriptFees,
        IncomeCategory::PartTimeSalary,
        IncomeCategory::OtherIncome,
    ];

    fn engine() -> DeductionEngine {
        DeductionEngine::default()
    }

    fn resident_with_flags(
        category: IncomeCategory,
        union_insured: bool,
        firm_payee: bool,
    ) -> PayeeProfile {
        PayeeProfile {
            category,
            residency: ResidencyStatus::Resident,
            exemptions: ExemptionFlags {
                union_insured,
                firm_payee,
            },
        }
    }

    // =========================================================================
    // zero amount tests
    // =========================================================================

    #[test]
    fn zero_amount_yields_all_zero_result_for_every_classification() {
        let engine = engine();

        for category in ALL_CATEGORIES {
            for payee in [
                PayeeProfile::resident(category),
                PayeeProfile::non_resident(category),
            ] {
                let result = engine.deduct(0, &payee);

                assert_eq!(result, DeductionResult::zero());
            }
        }
    }

    // =========================================================================
    // resident premium tests
    // =========================================================================

    #[test]
    fn professional_premium_applies_at_the_threshold() {
        let payee = PayeeProfile::resident(IncomeCategory::ProfessionalFees);

        let result = engine().deduct(20_000, &payee);

        // Premium threshold is inclusive, tax threshold is strict.
        assert_eq!(result.health_premium_amount, 422);
        assert_eq!(result.health_premium_rate, dec!(0.0211));
        assert_eq!(result.tax_amount, 0);
        assert_eq!(result.net_amount, 19_578);
    }

    #[test]
    fn professional_premium_exempt_below_the_threshold() {
        let payee = PayeeProfile::resident(IncomeCategory::ManuscriptFees);

        let result = engine().deduct(19_999, &payee);

        assert_eq!(result.health_premium_amount, 0);
        assert_eq!(result.tax_amount, 0);
        assert_eq!(result.net_amount, 19_999);
    }

    #[test]
    fn part_time_premium_applies_at_its_own_threshold() {
        let payee = PayeeProfile::resident(IncomeCategory::PartTimeSalary);
        let engine = engine();

        let below = engine.deduct(28_589, &payee);
        let at = engine.deduct(28_590, &payee);

        assert_eq!(below.health_premium_amount, 0);
        // floor(28590 × 0.0211) = floor(603.249)
        assert_eq!(at.health_premium_amount, 603);
    }

    #[test]
    fn union_insured_payee_is_premium_exempt_at_any_amount() {
        let payee = resident_with_flags(IncomeCategory::ProfessionalFees, true, false);

        let result = engine().deduct(1_000_000, &payee);

        assert_eq!(result.health_premium_amount, 0);
        assert_eq!(result.health_premium_rate, Decimal::ZERO);
        assert_eq!(result.tax_amount, 100_000);
    }

    #[test]
    fn firm_payee_is_premium_exempt_at_any_amount() {
        let payee = resident_with_flags(IncomeCategory::ManuscriptFees, false, true);

        let result = engine().deduct(500_000, &payee);

        assert_eq!(result.health_premium_amount, 0);
        assert_eq!(result.tax_amount, 50_000);
    }

    #[test]
    fn both_exemption_flags_set_still_exempts_the_premium() {
        // The form keeps the flags mutually exclusive; the engine must not.
        let payee = resident_with_flags(IncomeCategory::ProfessionalFees, true, true);

        let result = engine().deduct(100_000, &payee);

        assert_eq!(result.health_premium_amount, 0);
    }

    #[test]
    fn exemption_flags_do_not_affect_part_time_salary() {
        let payee = resident_with_flags(IncomeCategory::PartTimeSalary, true, true);

        let result = engine().deduct(30_000, &payee);

        // floor(30000 × 0.0211) = 633
        assert_eq!(result.health_premium_amount, 633);
    }

    // =========================================================================
    // resident tax tests
    // =========================================================================

    #[test]
    fn professional_tax_applies_strictly_above_the_threshold() {
        let payee = PayeeProfile::resident(IncomeCategory::ProfessionalFees);
        let engine = engine();

        let at = engine.deduct(20_000, &payee);
        let above = engine.deduct(20_001, &payee);

        assert_eq!(at.tax_amount, 0);
        assert_eq!(above.tax_amount, 2_000);
        assert_eq!(above.tax_rate, dec!(0.10));
    }

    #[test]
    fn part_time_tax_applies_strictly_above_its_threshold() {
        let payee = PayeeProfile::resident(IncomeCategory::PartTimeSalary);
        let engine = engine();

        let at = engine.deduct(88_501, &payee);
        let above = engine.deduct(88_502, &payee);

        assert_eq!(at.tax_amount, 0);
        // floor(88502 × 0.05) = 4425
        assert_eq!(above.tax_amount, 4_425);
        assert_eq!(above.tax_rate, dec!(0.05));
    }

    #[test]
    fn other_income_is_fully_exempt_for_residents() {
        let payee = PayeeProfile::resident(IncomeCategory::OtherIncome);

        let result = engine().deduct(1_000_000, &payee);

        assert_eq!(result.tax_amount, 0);
        assert_eq!(result.health_premium_amount, 0);
        assert_eq!(result.net_amount, 1_000_000);
    }

    #[test]
    fn deductions_are_independent_never_compounded() {
        let payee = PayeeProfile::resident(IncomeCategory::ProfessionalFees);

        let result = engine().deduct(100_000, &payee);

        // Each floor(gross × rate) on the same gross, not on a reduced base.
        assert_eq!(result.tax_amount, 10_000);
        assert_eq!(result.health_premium_amount, 2_110);
        assert_eq!(result.net_amount, 87_890);
    }

    // =========================================================================
    // non-resident tests
    // =========================================================================

    #[test]
    fn non_resident_other_income_pays_the_flat_rate() {
        let payee = PayeeProfile::non_resident(IncomeCategory::OtherIncome);

        let result = engine().deduct(10_000, &payee);

        assert_eq!(result.tax_amount, 2_000);
        assert_eq!(result.tax_rate, dec!(0.20));
        assert_eq!(result.health_premium_amount, 0);
    }

    #[test]
    fn non_resident_professional_exempt_at_the_floor() {
        let payee = PayeeProfile::non_resident(IncomeCategory::ProfessionalFees);
        let engine = engine();

        let at = engine.deduct(5_000, &payee);
        let above = engine.deduct(5_001, &payee);

        assert_eq!(at.tax_amount, 0);
        // floor(5001 × 0.20) = 1000
        assert_eq!(above.tax_amount, 1_000);
        assert_eq!(above.tax_rate, dec!(0.20));
    }

    #[test]
    fn non_resident_part_time_switches_rate_at_the_break() {
        let payee = PayeeProfile::non_resident(IncomeCategory::PartTimeSalary);
        let engine = engine();

        let at = engine.deduct(42_885, &payee);
        let above = engine.deduct(42_886, &payee);

        assert_eq!(at.tax_rate, dec!(0.06));
        // floor(42885 × 0.06) = 2573
        assert_eq!(at.tax_amount, 2_573);
        assert_eq!(above.tax_rate, dec!(0.18));
        // floor(42886 × 0.18) = 7719
        assert_eq!(above.tax_amount, 7_719);
    }

    #[test]
    fn non_resident_never_owes_the_premium() {
        let engine = engine();

        for category in ALL_CATEGORIES {
            let payee = PayeeProfile::non_resident(category);
            let result = engine.deduct(500_000, &payee);

            assert_eq!(result.health_premium_amount, 0);
            assert_eq!(result.health_premium_rate, Decimal::ZERO);
        }
    }

    // =========================================================================
    // message tests
    // =========================================================================

    #[test]
    fn messages_run_premium_first_then_tax() {
        let payee = PayeeProfile::resident(IncomeCategory::ProfessionalFees);

        let result = engine().deduct(30_000, &payee);

        assert_eq!(
            result.messages,
            vec![
                "reaches the NT$20,000 threshold: 2.11% supplementary NHI premium withheld"
                    .to_string(),
                "exceeds the NT$20,000 threshold: 10% withholding tax applied".to_string(),
            ]
        );
    }

    #[test]
    fn below_threshold_branches_still_explain_themselves() {
        let payee = PayeeProfile::resident(IncomeCategory::PartTimeSalary);

        let result = engine().deduct(10_000, &payee);

        assert_eq!(
            result.messages,
            vec![
                "below the NT$28,590 supplementary NHI premium threshold".to_string(),
                "at or below the NT$88,501 threshold: no withholding tax".to_string(),
            ]
        );
    }

    #[test]
    fn non_resident_messages_cover_both_passes() {
        let payee = PayeeProfile::non_resident(IncomeCategory::PartTimeSalary);

        let result = engine().deduct(42_885, &payee);

        assert_eq!(
            result.messages,
            vec![
                "non-resident payee: supplementary NHI premium does not apply".to_string(),
                "at or below 1.5x the monthly basic wage (NT$42,885): \
                 6% withholding tax applied"
                    .to_string(),
            ]
        );
    }

    // =========================================================================
    // rule set plumbing tests
    // =========================================================================

    #[test]
    fn new_rejects_an_invalid_rule_set() {
        let mut rules = RuleSet::current();
        rules.non_resident_tax_rate = dec!(2);

        let result = DeductionEngine::new(rules);

        assert!(matches!(result, Err(RuleSetError::InvalidTaxRate(_))));
    }

    #[test]
    fn new_accepts_the_current_rule_set() {
        let engine = DeductionEngine::new(RuleSet::current()).unwrap();

        assert_eq!(engine.rules(), &RuleSet::current());
    }

    // =========================================================================
    // property tests
    // =========================================================================

    fn category_strategy() -> impl Strategy<Value = IncomeCategory> {
        prop_oneof![
            Just(IncomeCategory::ProfessionalFees),
            Just(IncomeCategory::ManuscriptFees),
            Just(IncomeCategory::PartTimeSalary),
            Just(IncomeCategory::OtherIncome),
        ]
    }

    fn payee_strategy() -> impl Strategy<Value = PayeeProfile> {
        (
            category_strategy(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(category, non_resident, union_insured, firm_payee)| {
                PayeeProfile {
                    category,
                    residency: if non_resident {
                        ResidencyStatus::NonResident
                    } else {
                        ResidencyStatus::Resident
                    },
                    exemptions: ExemptionFlags {
                        union_insured,
                        firm_payee,
                    },
                }
            })
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_net_equals_gross_minus_both_deductions(
            gross in 0u64..5_000_000,
            payee in payee_strategy(),
        ) {
            let result = engine().deduct(gross, &payee);

            prop_assert_eq!(
                result.net_amount,
                result.gross_amount - result.tax_amount - result.health_premium_amount
            );
            prop_assert_eq!(result.gross_amount, gross);
        }

        #[test]
        fn prop_net_is_monotonic_in_gross(
            gross in 0u64..5_000_000,
            step in 1u64..50_000,
            payee in payee_strategy(),
        ) {
            let engine = engine();

            let smaller = engine.deduct(gross, &payee);
            let larger = engine.deduct(gross + step, &payee);

            prop_assert!(smaller.net_amount <= larger.net_amount);
        }

        #[test]
        fn prop_either_exemption_flag_zeroes_the_premium(
            gross in 1u64..5_000_000,
            union_insured in any::<bool>(),
            firm_payee in any::<bool>(),
        ) {
            let payee = resident_with_flags(
                IncomeCategory::ProfessionalFees,
                union_insured,
                firm_payee,
            );

            let result = engine().deduct(gross, &payee);

            if union_insured || firm_payee {
                prop_assert_eq!(result.health_premium_amount, 0);
            }
        }

        #[test]
        fn prop_non_resident_other_income_is_a_flat_fifth(
            gross in 1u64..5_000_000,
        ) {
            let payee = PayeeProfile::non_resident(IncomeCategory::OtherIncome);

            let result = engine().deduct(gross, &payee);

            prop_assert_eq!(result.tax_amount, floor_share(gross, dec!(0.20)));
            prop_assert_eq!(result.health_premium_amount, 0);
        }

        #[test]
        fn prop_resident_other_income_is_untouched(
            gross in 1u64..5_000_000,
        ) {
            let payee = PayeeProfile::resident(IncomeCategory::OtherIncome);

            let result = engine().deduct(gross, &payee);

            prop_assert_eq!(result.net_amount, gross);
        }
    }
}
