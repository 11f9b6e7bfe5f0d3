use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::percentile::{self, RankDirection};
use crate::scoring::sentiment::{self, Sentiment};
use crate::types::{Percentile, Score};

/// Number of records shown when no search query is active.
pub const DEFAULT_VIEW_SIZE: usize = 8;

/// Sheet columns holding the precomputed per-category scores.
pub const GROWTH_SCORE_COLUMN: &str = "Growth Score";
pub const RETURN_SCORE_COLUMN: &str = "Return Score";
pub const LEVERAGE_SCORE_COLUMN: &str = "Leverage Score";
pub const VALUATION_SCORE_COLUMN: &str = "Valuation Score";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One company row from the score sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company name, trimmed, never empty
    pub identifier: String,
    /// Precomputed CFS from the sheet's final-score column (0 if absent)
    pub final_score: Score,
    /// Every other column, keyed by its normalized header
    pub metrics: BTreeMap<String, Decimal>,
}

/// The sheet's stored per-category scores for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub growth: Option<Score>,
    pub returns: Option<Score>,
    pub leverage: Option<Score>,
    pub valuation: Option<Score>,
}

/// All companies from one load, sorted by final score (highest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDataset {
    pub records: Vec<CompanyRecord>,
    /// Metric column labels in sheet order
    pub columns: Vec<String>,
    /// Header that supplied `final_score`, if the sheet had one
    pub final_score_column: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Values of one metric across a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDistribution {
    pub metric: String,
    pub values: Vec<Decimal>,
}

// ---------------------------------------------------------------------------
// CompanyRecord
// ---------------------------------------------------------------------------

impl CompanyRecord {
    pub fn metric(&self, label: &str) -> Option<Decimal> {
        self.metrics.get(label).copied()
    }

    pub fn category_breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown {
            growth: self.metric(GROWTH_SCORE_COLUMN),
            returns: self.metric(RETURN_SCORE_COLUMN),
            leverage: self.metric(LEVERAGE_SCORE_COLUMN),
            valuation: self.metric(VALUATION_SCORE_COLUMN),
        }
    }

    pub fn sentiment(&self) -> Sentiment {
        sentiment::classify(self.final_score)
    }
}

// ---------------------------------------------------------------------------
// CompanyDataset
// ---------------------------------------------------------------------------

impl CompanyDataset {
    /// Build a dataset, sorting records by final score descending.
    ///
    /// The sort is stable: equal scores keep their sheet order.
    pub fn new(
        mut records: Vec<CompanyRecord>,
        columns: Vec<String>,
        final_score_column: Option<String>,
    ) -> Self {
        records.sort_by(|a, b| b.final_score.cmp(&a.final_score));
        CompanyDataset {
            records,
            columns,
            final_score_column,
            loaded_at: Utc::now(),
        }
    }

    /// The "no data" dataset.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), None)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c == label)
    }

    /// The `n` highest-scoring records.
    pub fn top(&self, n: usize) -> &[CompanyRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Records matching a company-name query.
    ///
    /// A blank query yields the default top view. Otherwise every record
    /// whose name contains the query, ignoring case, in ranking order.
    pub fn search(&self, query: &str) -> Vec<&CompanyRecord> {
        self.ranked_view(query, DEFAULT_VIEW_SIZE)
            .into_iter()
            .map(|(_, r)| r)
            .collect()
    }

    /// Like [`search`](Self::search) with a custom top size, pairing each
    /// record with its 1-based position in the full ranking.
    pub fn ranked_view(&self, query: &str, top: usize) -> Vec<(usize, &CompanyRecord)> {
        let ranked = self.records.iter().enumerate().map(|(i, r)| (i + 1, r));
        if query.trim().is_empty() {
            return ranked.take(top).collect();
        }
        let needle = query.to_lowercase();
        ranked
            .filter(|(_, r)| r.identifier.to_lowercase().contains(&needle))
            .collect()
    }

    /// Distribution of `metric` over the full set.
    ///
    /// Every record contributes one value. A record without the metric
    /// counts as 0, the same as a blank cell.
    pub fn distribution(&self, metric: &str) -> MetricDistribution {
        MetricDistribution {
            metric: metric.to_string(),
            values: self
                .records
                .iter()
                .map(|r| r.metric(metric).unwrap_or(Decimal::ZERO))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// MetricDistribution
// ---------------------------------------------------------------------------

impl MetricDistribution {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn percentile_rank(
        &self,
        candidate: Option<Decimal>,
        direction: RankDirection,
    ) -> Percentile {
        percentile::percentile_rank(&self.values, candidate, direction)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
