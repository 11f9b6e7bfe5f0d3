//! What-if CFS calculator.
//!
//! Each user input is ranked against the loaded distribution of the sheet
//! column it corresponds to, the ranks are averaged per category, and the
//! four category means are combined into the composite.
//!
//! [`METRIC_TABLE`] is the only place where calculator inputs are tied to
//! sheet header labels. A header missing from the sheet reads as 0 for every
//! company.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::dataset::record::CompanyDataset;
use crate::scoring::composite::{self, Category};
use crate::scoring::percentile::RankDirection;
use crate::types::{with_metadata, ComputationOutput, Percentile, Score};
use crate::CfsResult;

// ---------------------------------------------------------------------------
// Metric table
// ---------------------------------------------------------------------------

/// Calculator input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKey {
    #[serde(rename = "sales")]
    Sales,
    #[serde(rename = "ebitda")]
    Ebitda,
    #[serde(rename = "netprofit")]
    NetProfit,
    #[serde(rename = "roce")]
    Roce,
    #[serde(rename = "roe")]
    Roe,
    #[serde(rename = "roa")]
    Roa,
    #[serde(rename = "de")]
    DebtToEquity,
    #[serde(rename = "debtEbitda")]
    DebtToEbitda,
    #[serde(rename = "debtAssets")]
    DebtToAssets,
    #[serde(rename = "icr")]
    InterestCoverage,
    #[serde(rename = "pe")]
    PriceEarnings,
    #[serde(rename = "pb")]
    PriceBook,
}

/// How one calculator input maps onto the score sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub key: MetricKey,
    pub category: Category,
    /// Exact normalized header of the sheet column
    pub column: &'static str,
    /// Form label
    pub label: &'static str,
    pub direction: RankDirection,
}

const fn spec(
    key: MetricKey,
    category: Category,
    column: &'static str,
    label: &'static str,
    direction: RankDirection,
) -> MetricSpec {
    MetricSpec {
        key,
        category,
        column,
        label,
        direction,
    }
}

use Category::{Growth, Leverage, Returns, Valuation};
use RankDirection::{HigherIsBetter, LowerIsBetter};

pub static METRIC_TABLE: [MetricSpec; 12] = [
    spec(MetricKey::Sales, Growth, "5Y Sales Mean", "Sales CAGR", HigherIsBetter),
    spec(MetricKey::Ebitda, Growth, "5Y EBITDA CAGR", "EBITDA CAGR", HigherIsBetter),
    spec(MetricKey::NetProfit, Growth, "5Y Net Profit CAGR", "Net Profit CAGR", HigherIsBetter),
    spec(MetricKey::Roce, Returns, "5Y Mean ROCE", "ROCE", HigherIsBetter),
    spec(MetricKey::Roe, Returns, "5Y Mean ROE", "ROE", HigherIsBetter),
    spec(MetricKey::Roa, Returns, "5Y Mean ROA", "ROA", HigherIsBetter),
    spec(MetricKey::DebtToEquity, Leverage, "5Y Debt to Equity Mean", "Debt / Equity", LowerIsBetter),
    spec(MetricKey::DebtToEbitda, Leverage, "5Y Debt to EBITDA Mean", "Debt / EBITDA", LowerIsBetter),
    spec(MetricKey::DebtToAssets, Leverage, "5Y Debt to Total Assets Mean", "Debt / Assets", LowerIsBetter),
    spec(MetricKey::InterestCoverage, Leverage, "ICR Ratio", "Interest Coverage", HigherIsBetter),
    spec(MetricKey::PriceEarnings, Valuation, "Current PE Ratio", "PE Ratio", LowerIsBetter),
    spec(MetricKey::PriceBook, Valuation, "Current P/B Ratio", "P/B Ratio", LowerIsBetter),
];

impl MetricKey {
    /// Table rows are in declaration order of the keys.
    pub fn spec(self) -> &'static MetricSpec {
        &METRIC_TABLE[self as usize]
    }

    /// Field name used in JSON inputs and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::Sales => "sales",
            MetricKey::Ebitda => "ebitda",
            MetricKey::NetProfit => "netprofit",
            MetricKey::Roce => "roce",
            MetricKey::Roe => "roe",
            MetricKey::Roa => "roa",
            MetricKey::DebtToEquity => "de",
            MetricKey::DebtToEbitda => "debtEbitda",
            MetricKey::DebtToAssets => "debtAssets",
            MetricKey::InterestCoverage => "icr",
            MetricKey::PriceEarnings => "pe",
            MetricKey::PriceBook => "pb",
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// User-entered metric values; keys that were never entered are unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculatorInputs {
    pub values: BTreeMap<MetricKey, Decimal>,
}

impl CalculatorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MetricKey) -> Option<Decimal> {
        self.values.get(&key).copied()
    }

    pub fn set(&mut self, key: MetricKey, value: Decimal) {
        self.values.insert(key, value);
    }

    pub fn clear(&mut self, key: MetricKey) {
        self.values.remove(&key);
    }

    pub fn with(mut self, key: MetricKey, value: Decimal) -> Self {
        self.set(key, value);
        self
    }
}

/// Rank of one input against its column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstituentRank {
    pub key: MetricKey,
    pub category: Category,
    pub column: String,
    pub input: Option<Decimal>,
    pub direction: RankDirection,
    pub reference_size: usize,
    pub percentile: Percentile,
}

/// Calculator output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeResult {
    pub constituents: Vec<ConstituentRank>,
    pub growth: Option<Score>,
    pub returns: Option<Score>,
    pub leverage: Option<Score>,
    pub valuation: Option<Score>,
    /// `None` when no basis for a score exists
    pub composite: Option<Score>,
    /// One decimal place, or "--" when unavailable
    pub display: String,
}

#[derive(Serialize)]
struct CalculatorAssumptions<'a> {
    weights: BTreeMap<Category, Decimal>,
    reference_companies: usize,
    inputs: &'a CalculatorInputs,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rank every calculator input against `dataset` and combine the category
/// means into the composite score.
pub fn compute_composite(
    inputs: &CalculatorInputs,
    dataset: &CompanyDataset,
) -> CfsResult<ComputationOutput<CompositeResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if dataset.is_empty() {
        warnings.push("No reference companies loaded; every metric ranks neutral (50)".into());
    }

    let constituents: Vec<ConstituentRank> = METRIC_TABLE
        .iter()
        .map(|spec| rank_constituent(spec, inputs, dataset, &mut warnings))
        .collect();

    let mean_of = |category: Category| {
        let ranks: Vec<Decimal> = constituents
            .iter()
            .filter(|c| c.category == category)
            .map(|c| c.percentile)
            .collect();
        composite::category_mean(&ranks)
    };

    let growth = mean_of(Category::Growth);
    let returns = mean_of(Category::Returns);
    let leverage = mean_of(Category::Leverage);
    let valuation = mean_of(Category::Valuation);
    let score = composite::composite_from_means(growth, returns, leverage, valuation);

    if score.is_none() {
        warnings.push("Composite unavailable: a category has no constituents".into());
    }

    let result = CompositeResult {
        constituents,
        growth,
        returns,
        leverage,
        valuation,
        composite: score,
        display: composite::format_score(score),
    };

    let assumptions = CalculatorAssumptions {
        weights: Category::ALL.iter().map(|c| (*c, c.weight())).collect(),
        reference_companies: dataset.len(),
        inputs,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "CFS: equal-weighted mean of Growth, Returns, Leverage and Valuation percentile ranks",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

fn rank_constituent(
    spec: &MetricSpec,
    inputs: &CalculatorInputs,
    dataset: &CompanyDataset,
    warnings: &mut Vec<String>,
) -> ConstituentRank {
    let input = inputs.get(spec.key);
    let distribution = dataset.distribution(spec.column);

    if input.is_none() {
        warnings.push(format!("{} ({}) not set; ranked neutral (50)", spec.label, spec.key));
    }
    if !dataset.is_empty() && !dataset.has_column(spec.column) {
        warnings.push(format!(
            "Column '{}' not found in sheet; {} ranked against zeros",
            spec.column, spec.key
        ));
    }

    ConstituentRank {
        key: spec.key,
        category: spec.category,
        column: spec.column.to_string(),
        input,
        direction: spec.direction,
        reference_size: distribution.values.len(),
        percentile: distribution.percentile_rank(input, spec.direction),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
