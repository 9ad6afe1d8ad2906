use chrono::{DateTime, Utc};
use redditetl_sentiment::Sentiment;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::batch_id::BatchId;

/// One post as returned by the content source, before any coercion.
///
/// Each attribute keeps the raw JSON value it arrived with. `None` means the
/// upstream record did not carry the field at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPost {
    pub title: Option<Value>,
    pub score: Option<Value>,
    pub id: Option<Value>,
    pub url: Option<Value>,
    pub num_comments: Option<Value>,
    pub created_utc: Option<Value>,
    /// Display name, or the literal `"None"` for deleted/anonymized authors.
    pub author: Option<Value>,
    pub over_18: Option<Value>,
    /// `false`, or the edit time in epoch seconds.
    pub edited: Option<Value>,
    pub spoiler: Option<Value>,
    pub stickied: Option<Value>,
}

/// The output of one extraction: a run id plus posts in source order.
#[derive(Debug, Clone)]
pub struct Batch {
    pub id: BatchId,
    pub posts: Vec<RawPost>,
}

/// A fully typed post with its title sentiment.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub title: String,
    pub score: i64,
    pub id: String,
    pub url: String,
    pub num_comments: i64,
    #[serde(with = "crate::transform::codec::csv_timestamp")]
    pub created_utc: DateTime<Utc>,
    pub author: String,
    #[serde(with = "crate::transform::codec::csv_bool")]
    pub over_18: bool,
    #[serde(with = "crate::transform::codec::csv_bool")]
    pub edited: bool,
    #[serde(with = "crate::transform::codec::csv_bool")]
    pub spoiler: bool,
    #[serde(with = "crate::transform::codec::csv_bool")]
    pub stickied: bool,
    pub sentiment: Sentiment,
}

/// Per-label record counts for one payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentTally {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

impl<'a> FromIterator<&'a NormalizedRecord> for SentimentTally {
    fn from_iter<I: IntoIterator<Item = &'a NormalizedRecord>>(iter: I) -> Self {
        let mut tally = Self::default();
        for record in iter {
            tally.record(record.sentiment);
        }
        tally
    }
}

/// Serialized CSV ready for storage, paired with its object key.
#[derive(Debug, Clone)]
pub struct Payload {
    pub body: Vec<u8>,
    pub object_key: String,
    pub tally: SentimentTally,
}

impl Payload {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tally.total()
    }
}
