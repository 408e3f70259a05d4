//! Reverse computation: desired net payout → minimal gross payment.
//!
//! `net(gross)` is non-decreasing and piecewise linear, but the threshold
//! steps make it impossible to invert in closed form, so the inverse is
//! found by integer bisection over the gross amount. Feasibility
//! (`net(mid) ≥ target`) is monotone in `mid`, which is exactly what the
//! bisection needs; floor-truncation ties resolve to the smallest gross.

use tracing::{debug, warn};

use crate::calculations::common::format_amount;
use crate::calculations::withholding::DeductionEngine;
use crate::models::{DeductionResult, PayeeProfile};

impl DeductionEngine {
    /// Finds the minimal gross payment that nets at least `target_net`.
    ///
    /// If the target itself clears every applicable threshold untouched (it
    /// is below the thresholds, or the payee is exempt), the payout simply
    /// equals the target and no grossing-up happens. Otherwise the result is
    /// the smallest gross whose forward computation nets at least the
    /// target, found in `O(log target_net)` forward calls.
    ///
    /// The returned result is the forward computation at the found gross,
    /// with one extra message prepended describing the outcome.
    ///
    /// # Example
    ///
    /// ```
    /// use withholding_core::{DeductionEngine, IncomeCategory, PayeeProfile};
    ///
    /// let engine = DeductionEngine::default();
    /// let payee = PayeeProfile::resident(IncomeCategory::PartTimeSalary);
    ///
    /// let result = engine.gross_up(100_000, &payee);
    ///
    /// assert_eq!(result.gross_amount, 107_653);
    /// assert!(result.net_amount >= 100_000);
    /// ```
    pub fn gross_up(
        &self,
        target_net: u64,
        payee: &PayeeProfile,
    ) -> DeductionResult {
        if target_net == 0 {
            return DeductionResult::zero();
        }

        let baseline = self.deduct(target_net, payee);
        if baseline.net_amount >= target_net {
            let mut result = baseline;
            result.messages.insert(
                0,
                "payout equals the requested net amount (no withholding applies)".to_string(),
            );
            return result;
        }

        // A 100% markup always covers the current schedule (total deduction
        // tops out around 22%). Should a future rate change break that,
        // widen the bound rather than return a wrong answer.
        let mut low = target_net;
        let mut high = target_net.saturating_mul(2);
        while self.deduct(high, payee).net_amount < target_net {
            warn!(high, target_net, "gross-up upper bound infeasible, widening");
            high = high.saturating_mul(2);
        }

        while low < high {
            let mid = low + (high - low) / 2;
            if self.deduct(mid, payee).net_amount >= target_net {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        debug!(target_net, gross = low, "gross-up search converged");

        let mut result = self.deduct(low, payee);
        result.messages.insert(
            0,
            format!(
                "to net NT${}, a gross payment of NT${} is required",
                format_amount(target_net),
                format_amount(low)
            ),
        );
        result
    }
}
