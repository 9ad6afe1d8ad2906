//! Title sentiment for the subreddit pipeline.
//!
//! [`polarity_score`] computes a lexicon-based compound score in `[-1.0, 1.0]`
//! and [`classify`] maps it onto a three-way [`Sentiment`] label using fixed
//! `±0.05` thresholds.

pub mod label;
mod lexicon;
pub mod scorer;

pub use label::{
    categorize, classify, InvalidSentiment, Sentiment, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD,
};
pub use scorer::polarity_score;
