use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use withholding_core::{
    DeductionEngine, ExemptionFlags, IncomeCategory, PayeeProfile, ResidencyStatus,
};

mod output;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Taiwan withholding tax and supplementary NHI premium calculator.
///
/// Computes the deductions on a gross payment, or with `--net` solves for
/// the gross payment needed to reach a desired net payout.
#[derive(Debug, Parser)]
struct Cli {
    /// Amount in NT$. Commas are allowed; empty or invalid input counts as 0.
    amount: Option<String>,

    /// Income category code.
    #[arg(long, default_value = "9A", value_parser = parse_category)]
    category: IncomeCategory,

    /// Payee residency: "resident" (183+ days in the tax year) or
    /// "non-resident".
    #[arg(long, default_value = "resident", value_parser = parse_residency)]
    residency: ResidencyStatus,

    /// Payee is separately insured through an occupational union
    /// (premium exemption for codes 9A/9B).
    #[arg(long)]
    union_insured: bool,

    /// Payment goes to a firm or practice rather than an individual
    /// (premium exemption for codes 9A/9B).
    #[arg(long)]
    firm_payee: bool,

    /// Treat AMOUNT as the desired net payout and solve for the gross
    /// payment instead.
    #[arg(long)]
    net: bool,

    /// Emit the result as JSON instead of formatted text.
    #[arg(long)]
    json: bool,
}

fn parse_category(s: &str) -> Result<IncomeCategory, String> {
    IncomeCategory::parse(s)
        .ok_or_else(|| format!("unknown income category '{s}' (expected 9A, 9B, 50 or 92)"))
}

fn parse_residency(s: &str) -> Result<ResidencyStatus, String> {
    ResidencyStatus::parse(s)
        .ok_or_else(|| format!("unknown residency '{s}' (expected resident or non-resident)"))
}

/// Normalizes free-text amount input: commas stripped, anything that fails
/// to parse as a non-negative integer counts as 0.
fn parse_amount(raw: Option<&str>) -> u64 {
    raw.map(|s| s.replace(',', ""))
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let amount = parse_amount(cli.amount.as_deref());
    let payee = PayeeProfile {
        category: cli.category,
        residency: cli.residency,
        exemptions: ExemptionFlags {
            union_insured: cli.union_insured,
            firm_payee: cli.firm_payee,
        },
    };

    debug!(
        amount,
        category = payee.category.as_str(),
        residency = payee.residency.as_str(),
        reverse = cli.net,
        "computing deduction"
    );

    let engine = DeductionEngine::default();
    let result = if cli.net {
        engine.gross_up(amount, &payee)
    } else {
        engine.deduct(amount, &payee)
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", output::render(&result));
    }

    Ok(())
}
