//! Text rendering of a deduction result.

use withholding_core::DeductionResult;
use withholding_core::calculations::common::{format_amount, format_rate};

/// Renders a result as aligned currency lines followed by the explanation
/// list, ready to print.
pub fn render(result: &DeductionResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "gross payment      NT${}\n",
        format_amount(result.gross_amount)
    ));
    out.push_str(&format!(
        "withholding tax    NT${} ({})\n",
        format_amount(result.tax_amount),
        format_rate(result.tax_rate)
    ));
    out.push_str(&format!(
        "NHI premium        NT${} ({})\n",
        format_amount(result.health_premium_amount),
        format_rate(result.health_premium_rate)
    ));
    out.push_str(&format!(
        "net payout         NT${}\n",
        format_amount(result.net_amount)
    ));

    if !result.messages.is_empty() {
        out.push('\n');
        for message in &result.messages {
            out.push_str(&format!("  - {message}\n"));
        }
    }

    out
}
