//! Shared helpers for deduction calculations: statutory truncation and the
//! display formatting used in explanation messages.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Returns `floor(amount × rate)` in whole NT dollars.
///
/// Withheld amounts are truncated toward zero per the statute, never rounded.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use withholding_core::calculations::common::floor_share;
///
/// assert_eq!(floor_share(20_000, dec!(0.0211)), 422);
/// assert_eq!(floor_share(20_001, dec!(0.10)), 2_000);
/// assert_eq!(floor_share(0, dec!(0.20)), 0);
/// ```
pub fn floor_share(
    amount: u64,
    rate: Decimal,
) -> u64 {
    // Rates are validated to [0, 1], so the share never exceeds the amount.
    (Decimal::from(amount) * rate)
        .floor()
        .to_u64()
        .unwrap_or(amount)
}

/// Formats an amount with thousands separators, e.g. `1234567` → "1,234,567".
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a rate as a percentage with trailing zeros trimmed,
/// e.g. `0.0211` → "2.11%", `0.10` → "10%".
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
