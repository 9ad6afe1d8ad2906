//! Three-way sentiment label derived from a compound polarity score.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scorer::polarity_score;

/// Compound scores strictly above this are [`Sentiment::Positive`].
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores strictly below this are [`Sentiment::Negative`].
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Sentiment label, serialized as `1`, `0` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

#[derive(Debug, Error)]
#[error("invalid sentiment value {0}: expected -1, 0 or 1")]
pub struct InvalidSentiment(pub i8);

impl From<Sentiment> for i8 {
    fn from(value: Sentiment) -> Self {
        match value {
            Sentiment::Negative => -1,
            Sentiment::Neutral => 0,
            Sentiment::Positive => 1,
        }
    }
}

impl TryFrom<i8> for Sentiment {
    type Error = InvalidSentiment;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Sentiment::Negative),
            0 => Ok(Sentiment::Neutral),
            1 => Ok(Sentiment::Positive),
            other => Err(InvalidSentiment(other)),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Positive => write!(f, "positive"),
        }
    }
}

/// Map a compound score onto a label. Scores exactly at either threshold are neutral.
#[must_use]
pub fn classify(compound: f64) -> Sentiment {
    if compound > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if compound < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Score `text` and classify it in one step.
#[must_use]
pub fn categorize(text: &str) -> Sentiment {
    classify(polarity_score(text))
}
