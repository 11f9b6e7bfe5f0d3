//! Percentile rank of a candidate value within a reference distribution.
//!
//! The rank is the share of the distribution strictly below the candidate,
//! on a 0–100 scale. For lower-is-better metrics (debt ratios, valuation
//! multiples) the rank is inverted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Percentile;

/// Rank given when there is nothing to rank against.
pub const NEUTRAL_PERCENTILE: Decimal = dec!(50);

const HUNDRED: Decimal = dec!(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

impl RankDirection {
    pub fn from_lower_is_better(lower_is_better: bool) -> Self {
        if lower_is_better {
            RankDirection::LowerIsBetter
        } else {
            RankDirection::HigherIsBetter
        }
    }
}

/// Percentile rank of `candidate` in `distribution`, in `[0, 100]`.
///
/// An empty distribution or an unset candidate yields
/// [`NEUTRAL_PERCENTILE`].
pub fn percentile_rank(
    distribution: &[Decimal],
    candidate: Option<Decimal>,
    direction: RankDirection,
) -> Percentile {
    let Some(value) = candidate else {
        return NEUTRAL_PERCENTILE;
    };
    if distribution.is_empty() {
        return NEUTRAL_PERCENTILE;
    }

    let mut sorted = distribution.to_vec();
    sorted.sort();
    // First index not below `value` == number of entries strictly below.
    let below = sorted.partition_point(|v| *v < value);

    let mut pct = HUNDRED * Decimal::from(below) / Decimal::from(sorted.len());
    if direction == RankDirection::LowerIsBetter {
        pct = HUNDRED - pct;
    }
    pct.clamp(Decimal::ZERO, HUNDRED)
}
