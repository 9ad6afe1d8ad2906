//! Transform stage: raw posts → typed records with sentiment → CSV payload.

pub mod codec;
mod coerce;

use serde_json::Value;

use redditetl_sentiment::categorize;

use crate::error::SchemaError;
use crate::types::{Batch, NormalizedRecord, Payload, RawPost, SentimentTally};

/// Normalize every post, classify its title and serialize the batch.
///
/// The whole batch fails on the first malformed post; no rows are skipped.
///
/// # Errors
///
/// Returns [`SchemaError::MissingField`] or [`SchemaError::InvalidField`] for
/// malformed upstream records, and [`SchemaError::Csv`] if encoding fails.
pub fn transform(batch: Batch) -> Result<Payload, SchemaError> {
    let records = batch
        .posts
        .iter()
        .enumerate()
        .map(|(index, post)| normalize_post(index, post))
        .collect::<Result<Vec<_>, _>>()?;

    let tally: SentimentTally = records.iter().collect();
    let body = codec::write_records(&records)?;

    tracing::info!(
        batch_id = %batch.id,
        rows = records.len(),
        positive = tally.positive,
        neutral = tally.neutral,
        negative = tally.negative,
        bytes = body.len(),
        "transformed batch"
    );

    Ok(Payload {
        body,
        object_key: batch.id.object_key(),
        tally,
    })
}

/// Apply the per-column coercions to one post and score its title.
///
/// # Errors
///
/// Returns [`SchemaError`] naming the first missing or unusable field.
pub fn normalize_post(index: usize, post: &RawPost) -> Result<NormalizedRecord, SchemaError> {
    let post_id = post
        .id
        .as_ref()
        .map_or_else(|| "<no id>".to_string(), coerce::to_text);

    let require = |field: &'static str, value: &Option<Value>| -> Result<Value, SchemaError> {
        value.clone().ok_or_else(|| SchemaError::MissingField {
            index,
            post_id: post_id.clone(),
            field,
        })
    };
    let invalid = |field: &'static str, reason: String| SchemaError::InvalidField {
        index,
        post_id: post_id.clone(),
        field,
        reason,
    };

    let title = coerce::to_text(&require("title", &post.title)?);
    let score =
        coerce::to_integer(&require("score", &post.score)?).map_err(|r| invalid("score", r))?;
    let id = coerce::to_text(&require("id", &post.id)?);
    let url = coerce::to_text(&require("url", &post.url)?);
    let num_comments = coerce::to_integer(&require("num_comments", &post.num_comments)?)
        .map_err(|r| invalid("num_comments", r))?;
    let created_utc = coerce::to_timestamp(&require("created_utc", &post.created_utc)?)
        .map_err(|r| invalid("created_utc", r))?;
    let author = coerce::to_text(&require("author", &post.author)?);
    let over_18 = coerce::truthy(&require("over_18", &post.over_18)?);
    let edited = coerce::collapse_edited(&require("edited", &post.edited)?);
    let spoiler = coerce::truthy(&require("spoiler", &post.spoiler)?);
    let stickied = coerce::truthy(&require("stickied", &post.stickied)?);

    if id.is_empty() {
        return Err(invalid("id", "must not be empty".to_string()));
    }

    let sentiment = categorize(&title);

    Ok(NormalizedRecord {
        title,
        score,
        id,
        url,
        num_comments,
        created_utc,
        author,
        over_18,
        edited,
        spoiler,
        stickied,
        sentiment,
    })
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
