use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Score;

/// Final scores at or above this read as bullish.
pub const BULLISH_THRESHOLD: Decimal = dec!(0.7);
/// Final scores at or above this (and below bullish) read as neutral.
pub const NEUTRAL_THRESHOLD: Decimal = dec!(0.5);

/// Outlook label attached to a company's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "Bullish"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Classify a final score on the sheet's 0–1 scale.
pub fn classify(final_score: Score) -> Sentiment {
    if final_score >= BULLISH_THRESHOLD {
        Sentiment::Bullish
    } else if final_score >= NEUTRAL_THRESHOLD {
        Sentiment::Neutral
    } else {
        Sentiment::Bearish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(classify(dec!(0.7)), Sentiment::Bullish);
        assert_eq!(classify(dec!(0.69)), Sentiment::Neutral);
        assert_eq!(classify(dec!(0.5)), Sentiment::Neutral);
        assert_eq!(classify(dec!(0.49)), Sentiment::Bearish);
        assert_eq!(classify(Decimal::ZERO), Sentiment::Bearish);
    }
}
