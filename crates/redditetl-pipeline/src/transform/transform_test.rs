use chrono::{TimeZone, Utc};
use redditetl_sentiment::Sentiment;
use serde_json::json;

use super::*;
use crate::batch_id::BatchId;

fn batch_id() -> BatchId {
    BatchId::from_timestamp(Utc.with_ymd_and_hms(2024, 2, 14, 9, 30, 0).unwrap())
}

fn make_post(id: &str, title: &str) -> RawPost {
    RawPost {
        title: Some(json!(title)),
        score: Some(json!(1520)),
        id: Some(json!(id)),
        url: Some(json!(format!("https://example.com/{id}"))),
        num_comments: Some(json!(87)),
        created_utc: Some(json!(1_707_900_000.0)),
        author: Some(json!("throwaway")),
        over_18: Some(json!(false)),
        edited: Some(json!(false)),
        spoiler: Some(json!(false)),
        stickied: Some(json!(false)),
    }
}

// -----------------------------------------------------------------------
// normalize_post
// -----------------------------------------------------------------------

#[test]
fn normalize_post_applies_every_coercion() {
    let mut post = make_post("abc", "Great breakthrough in AI!");
    post.score = Some(json!(99.9));
    post.num_comments = Some(json!("12"));
    post.edited = Some(json!(1_707_900_500.0));
    post.over_18 = Some(json!(1));
    post.stickied = Some(json!(null));

    let record = normalize_post(0, &post).unwrap();
    assert_eq!(record.title, "Great breakthrough in AI!");
    assert_eq!(record.score, 99);
    assert_eq!(record.num_comments, 12);
    assert_eq!(record.created_utc.timestamp(), 1_707_900_000);
    assert!(record.edited);
    assert!(record.over_18);
    assert!(!record.spoiler);
    assert!(!record.stickied);
    assert_eq!(record.author, "throwaway");
    assert_eq!(record.sentiment, Sentiment::Positive);
}

#[test]
fn normalize_post_stringifies_numeric_id() {
    let mut post = make_post("ignored", "title");
    post.id = Some(json!(12345));
    let record = normalize_post(0, &post).unwrap();
    assert_eq!(record.id, "12345");
}

#[test]
fn edited_true_stays_true_and_false_stays_false() {
    let mut post = make_post("a", "t");
    post.edited = Some(json!(true));
    assert!(normalize_post(0, &post).unwrap().edited);
    post.edited = Some(json!(false));
    assert!(!normalize_post(0, &post).unwrap().edited);
}

#[test]
fn missing_title_is_schema_error() {
    let mut post = make_post("abc", "unused");
    post.title = None;
    let err = normalize_post(3, &post).unwrap_err();
    assert!(
        matches!(err, SchemaError::MissingField { index: 3, ref post_id, field: "title" } if post_id == "abc"),
        "got {err:?}"
    );
}

#[test]
fn missing_id_reports_placeholder() {
    let mut post = make_post("abc", "t");
    post.id = None;
    let err = normalize_post(0, &post).unwrap_err();
    assert!(
        matches!(err, SchemaError::MissingField { ref post_id, field: "id", .. } if post_id == "<no id>"),
        "got {err:?}"
    );
}

#[test]
fn empty_id_is_invalid() {
    let mut post = make_post("", "t");
    post.id = Some(json!(""));
    let err = normalize_post(0, &post).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidField { field: "id", .. }), "got {err:?}");
}

#[test]
fn non_numeric_score_is_invalid() {
    let mut post = make_post("abc", "t");
    post.score = Some(json!("lots"));
    let err = normalize_post(0, &post).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidField { field: "score", .. }), "got {err:?}");
}

#[test]
fn negative_created_utc_is_invalid() {
    let mut post = make_post("abc", "t");
    post.created_utc = Some(json!(-5));
    let err = normalize_post(0, &post).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidField { field: "created_utc", .. }), "got {err:?}");
}

// -----------------------------------------------------------------------
// transform
// -----------------------------------------------------------------------

#[test]
fn empty_batch_yields_header_only_payload() {
    let payload = transform(Batch {
        id: batch_id(),
        posts: Vec::new(),
    })
    .unwrap();
    assert_eq!(payload.row_count(), 0);
    assert_eq!(payload.object_key, "14022024093000.csv");
    let text = String::from_utf8(payload.body).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert_eq!(text.trim_end(), codec::COLUMNS.join(","));
}

#[test]
fn transform_preserves_order_and_labels_titles() {
    let payload = transform(Batch {
        id: batch_id(),
        posts: vec![
            make_post("p1", "Great breakthrough in AI!"),
            make_post("p2", "Terrible outage hits servers"),
            make_post("p3", "Weekly discussion thread"),
        ],
    })
    .unwrap();

    assert_eq!(payload.tally.positive, 1);
    assert_eq!(payload.tally.negative, 1);
    assert_eq!(payload.tally.neutral, 1);

    let records = codec::read_records(&payload.body).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);
    let labels: Vec<i8> = records.iter().map(|r| r.sentiment.into()).collect();
    assert_eq!(labels, [1, -1, 0]);
}

#[test]
fn transform_aborts_whole_batch_on_one_bad_post() {
    let mut broken = make_post("p2", "unused");
    broken.title = None;
    let err = transform(Batch {
        id: batch_id(),
        posts: vec![make_post("p1", "fine"), broken],
    })
    .unwrap_err();
    assert!(
        matches!(err, SchemaError::MissingField { index: 1, field: "title", .. }),
        "got {err:?}"
    );
}

#[test]
fn payload_round_trips_to_normalized_records() {
    let mut odd = make_post("p9", "Commas, \"quotes\"\nand newlines");
    odd.edited = Some(json!(1_707_999_999));
    let posts = vec![make_post("p1", "Great breakthrough in AI!"), odd];
    let expected: Vec<NormalizedRecord> = posts
        .iter()
        .enumerate()
        .map(|(i, p)| normalize_post(i, p).unwrap())
        .collect();

    let payload = transform(Batch {
        id: batch_id(),
        posts,
    })
    .unwrap();
    assert_eq!(codec::read_records(&payload.body).unwrap(), expected);
}
