use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use cfs_core::{compute_composite, CalculatorInputs, MetricKey};

use super::sheet::{load_sheet, SheetArgs};
use crate::input;

/// Arguments for the what-if CFS calculator.
///
/// Inputs come from `--input`, else piped JSON, and individual flags
/// override either. Anything left unset ranks neutral (50).
#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// JSON file of inputs keyed by field name, e.g. {"sales": "12.5", "pe": "18"}
    #[arg(long)]
    pub input: Option<String>,

    /// Sales CAGR
    #[arg(long, allow_hyphen_values = true)]
    pub sales: Option<Decimal>,
    /// EBITDA CAGR
    #[arg(long, allow_hyphen_values = true)]
    pub ebitda: Option<Decimal>,
    /// Net profit CAGR
    #[arg(long, allow_hyphen_values = true)]
    pub netprofit: Option<Decimal>,
    /// Return on capital employed
    #[arg(long, allow_hyphen_values = true)]
    pub roce: Option<Decimal>,
    /// Return on equity
    #[arg(long, allow_hyphen_values = true)]
    pub roe: Option<Decimal>,
    /// Return on assets
    #[arg(long, allow_hyphen_values = true)]
    pub roa: Option<Decimal>,
    /// Debt / equity
    #[arg(long, allow_hyphen_values = true)]
    pub de: Option<Decimal>,
    /// Debt / EBITDA
    #[arg(long, allow_hyphen_values = true)]
    pub debt_ebitda: Option<Decimal>,
    /// Debt / total assets
    #[arg(long, allow_hyphen_values = true)]
    pub debt_assets: Option<Decimal>,
    /// Interest coverage ratio
    #[arg(long, allow_hyphen_values = true)]
    pub icr: Option<Decimal>,
    /// Price / earnings
    #[arg(long, allow_hyphen_values = true)]
    pub pe: Option<Decimal>,
    /// Price / book
    #[arg(long, allow_hyphen_values = true)]
    pub pb: Option<Decimal>,
}

impl ScoreArgs {
    fn flag_values(&self) -> [(MetricKey, Option<Decimal>); 12] {
        [
            (MetricKey::Sales, self.sales),
            (MetricKey::Ebitda, self.ebitda),
            (MetricKey::NetProfit, self.netprofit),
            (MetricKey::Roce, self.roce),
            (MetricKey::Roe, self.roe),
            (MetricKey::Roa, self.roa),
            (MetricKey::DebtToEquity, self.de),
            (MetricKey::DebtToEbitda, self.debt_ebitda),
            (MetricKey::DebtToAssets, self.debt_assets),
            (MetricKey::InterestCoverage, self.icr),
            (MetricKey::PriceEarnings, self.pe),
            (MetricKey::PriceBook, self.pb),
        ]
    }
}

fn get_inputs(args: &ScoreArgs) -> Result<CalculatorInputs, Box<dyn std::error::Error>> {
    let mut inputs: CalculatorInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin_json()? {
        piped
    } else {
        CalculatorInputs::new()
    };

    for (key, value) in args.flag_values() {
        if let Some(v) = value {
            inputs.set(key, v);
        }
    }
    Ok(inputs)
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = get_inputs(&args)?;
    let (dataset, load_warnings) = load_sheet(&args.sheet)?;

    let mut output = compute_composite(&inputs, &dataset)?;
    let mut warnings = load_warnings;
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    Ok(serde_json::to_value(output)?)
}
