use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Score;

pub const GROWTH_WEIGHT: Decimal = dec!(0.25);
pub const RETURNS_WEIGHT: Decimal = dec!(0.25);
pub const LEVERAGE_WEIGHT: Decimal = dec!(0.25);
pub const VALUATION_WEIGHT: Decimal = dec!(0.25);

/// Shown in place of a composite that has no basis.
pub const UNAVAILABLE: &str = "--";

/// The four scoring categories of the CFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Growth,
    Returns,
    Leverage,
    Valuation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Growth,
        Category::Returns,
        Category::Leverage,
        Category::Valuation,
    ];

    pub fn weight(self) -> Decimal {
        match self {
            Category::Growth => GROWTH_WEIGHT,
            Category::Returns => RETURNS_WEIGHT,
            Category::Leverage => LEVERAGE_WEIGHT,
            Category::Valuation => VALUATION_WEIGHT,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Growth => write!(f, "Growth"),
            Category::Returns => write!(f, "Returns"),
            Category::Leverage => write!(f, "Leverage"),
            Category::Valuation => write!(f, "Valuation"),
        }
    }
}

/// Mean percentile rank per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub growth: Score,
    pub returns: Score,
    pub leverage: Score,
    pub valuation: Score,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> Score {
        match category {
            Category::Growth => self.growth,
            Category::Returns => self.returns,
            Category::Leverage => self.leverage,
            Category::Valuation => self.valuation,
        }
    }
}

/// Arithmetic mean of a category's constituent ranks; `None` when the
/// category has no constituents.
pub fn category_mean(ranks: &[Decimal]) -> Option<Score> {
    if ranks.is_empty() {
        return None;
    }
    let sum: Decimal = ranks.iter().sum();
    Some(sum / Decimal::from(ranks.len()))
}

/// Equal-weighted composite of the four category scores.
pub fn composite_score(scores: &CategoryScores) -> Score {
    Category::ALL
        .iter()
        .map(|c| c.weight() * scores.get(*c))
        .sum()
}

/// Composite from optional category means: unavailable if any is missing.
pub fn composite_from_means(
    growth: Option<Score>,
    returns: Option<Score>,
    leverage: Option<Score>,
    valuation: Option<Score>,
) -> Option<Score> {
    Some(composite_score(&CategoryScores {
        growth: growth?,
        returns: returns?,
        leverage: leverage?,
        valuation: valuation?,
    }))
}

/// One decimal place, or [`UNAVAILABLE`].
pub fn format_score(score: Option<Score>) -> String {
    match score {
        Some(s) => format!(
            "{:.1}",
            s.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => UNAVAILABLE.to_string(),
    }
}
