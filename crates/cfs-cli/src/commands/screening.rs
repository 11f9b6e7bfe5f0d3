use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use cfs_core::dataset::record::{CompanyRecord, DEFAULT_VIEW_SIZE};
use cfs_core::scoring::percentile::RankDirection;
use cfs_core::scoring::sentiment::Sentiment;
use cfs_core::with_metadata;

use super::sheet::{load_sheet, SheetArgs};

/// Arguments for the ranked company list
#[derive(Args)]
pub struct RankArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Case-insensitive company-name filter (searches the full list)
    #[arg(long)]
    pub search: Option<String>,

    /// Number of companies to show when not searching
    #[arg(long, default_value_t = DEFAULT_VIEW_SIZE)]
    pub top: usize,
}

/// Arguments for a single-column percentile rank
#[derive(Args)]
pub struct PercentileArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Sheet column header, e.g. "5Y Mean ROE"
    #[arg(long)]
    pub metric: String,

    /// Candidate value to rank
    #[arg(long, allow_hyphen_values = true)]
    pub value: Decimal,

    /// Invert the rank (debt ratios, valuation multiples)
    #[arg(long)]
    pub lower_is_better: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct RankedCompany {
    rank: usize,
    company: String,
    cfs: Decimal,
    sentiment: Sentiment,
    growth: Option<Decimal>,
    returns: Option<Decimal>,
    leverage: Option<Decimal>,
    valuation: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RankAssumptions {
    companies_loaded: usize,
    final_score_column: Option<String>,
    search: Option<String>,
    top: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct PercentileOutput {
    metric: String,
    value: Decimal,
    direction: RankDirection,
    reference_size: usize,
    percentile: Decimal,
}

fn ranked(position: usize, record: &CompanyRecord) -> RankedCompany {
    let breakdown = record.category_breakdown();
    RankedCompany {
        rank: position,
        company: record.identifier.clone(),
        cfs: record.final_score,
        sentiment: record.sentiment(),
        growth: breakdown.growth,
        returns: breakdown.returns,
        leverage: breakdown.leverage,
        valuation: breakdown.valuation,
    }
}

pub fn run_rank(args: RankArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (dataset, warnings) = load_sheet(&args.sheet)?;

    let rows: Vec<RankedCompany> = dataset
        .ranked_view(args.search.as_deref().unwrap_or(""), args.top)
        .into_iter()
        .map(|(position, r)| ranked(position, r))
        .collect();

    let assumptions = RankAssumptions {
        companies_loaded: dataset.len(),
        final_score_column: dataset.final_score_column.clone(),
        search: args.search.clone(),
        top: args.top,
    };

    let output = with_metadata(
        "Companies ordered by published CFS, highest first",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        rows,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_percentile(args: PercentileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (dataset, mut warnings) = load_sheet(&args.sheet)?;

    if !dataset.is_empty() && !dataset.has_column(&args.metric) {
        warnings.push(format!(
            "Column '{}' not found in sheet; ranked against zeros",
            args.metric
        ));
    }

    let direction = RankDirection::from_lower_is_better(args.lower_is_better);
    let distribution = dataset.distribution(&args.metric);
    let output = PercentileOutput {
        metric: args.metric.clone(),
        value: args.value,
        direction,
        reference_size: distribution.values.len(),
        percentile: distribution.percentile_rank(Some(args.value), direction),
    };

    let result = with_metadata(
        "Share of the loaded universe strictly below the value, x100",
        &serde_json::json!({ "companies_loaded": dataset.len() }),
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    );
    Ok(serde_json::to_value(result)?)
}
