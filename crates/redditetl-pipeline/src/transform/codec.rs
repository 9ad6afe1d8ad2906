//! CSV encoding of normalized records.
//!
//! Cells follow the layout downstream notebooks already consume: timestamps as
//! `YYYY-MM-DD HH:MM:SS`, booleans as `True`/`False`, sentiment as `1`/`0`/`-1`.

use crate::error::SchemaError;
use crate::types::NormalizedRecord;

/// Header row, in column order.
pub const COLUMNS: [&str; 12] = [
    "title",
    "score",
    "id",
    "url",
    "num_comments",
    "created_utc",
    "author",
    "over_18",
    "edited",
    "spoiler",
    "stickied",
    "sentiment",
];

/// Encode records as CSV with a header row. An empty slice yields the header only.
///
/// # Errors
///
/// Returns [`SchemaError::Csv`] if a record cannot be serialized.
pub fn write_records(records: &[NormalizedRecord]) -> Result<Vec<u8>, SchemaError> {
    // Header written by hand so empty batches still get one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| SchemaError::Csv(csv::Error::from(e.into_error())))
}

/// Decode a payload produced by [`write_records`].
///
/// # Errors
///
/// Returns [`SchemaError::UnexpectedHeader`] if the header row differs from
/// [`COLUMNS`], or [`SchemaError::Csv`] for malformed rows.
pub fn read_records(bytes: &[u8]) -> Result<Vec<NormalizedRecord>, SchemaError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();
    if !headers.iter().eq(COLUMNS.iter().copied()) {
        return Err(SchemaError::UnexpectedHeader {
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }
    reader
        .deserialize()
        .collect::<Result<Vec<NormalizedRecord>, _>>()
        .map_err(SchemaError::from)
}

pub(crate) mod csv_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(crate) fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) mod csv_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn serialize<S: Serializer>(
        value: &bool,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "True" | "true" => Ok(true),
            "False" | "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected True or False, got {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use redditetl_sentiment::Sentiment;

    use super::*;

    fn record(title: &str, sentiment: Sentiment) -> NormalizedRecord {
        NormalizedRecord {
            title: title.to_string(),
            score: 1520,
            id: "1aq2b3c".to_string(),
            url: "https://example.com/a?b=1,2".to_string(),
            num_comments: 87,
            created_utc: Utc.with_ymd_and_hms(2024, 2, 14, 8, 40, 0).unwrap(),
            author: "None".to_string(),
            over_18: false,
            edited: true,
            spoiler: false,
            stickied: true,
            sentiment,
        }
    }

    #[test]
    fn empty_input_writes_header_only() {
        let bytes = write_records(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), format!("{}\n", COLUMNS.join(",")));
        assert!(read_records(&bytes).unwrap().is_empty());
    }

    #[test]
    fn cells_use_expected_spelling() {
        let bytes = write_records(&[record("Plain title", Sentiment::Negative)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "Plain title,1520,1aq2b3c,\"https://example.com/a?b=1,2\",87,2024-02-14 08:40:00,None,False,True,False,True,-1"
        );
    }

    #[test]
    fn quoting_survives_round_trip() {
        let records = vec![
            record("Comma, \"quotes\" and\nnewline", Sentiment::Positive),
            record("", Sentiment::Neutral),
        ];
        let bytes = write_records(&records).unwrap();
        assert_eq!(read_records(&bytes).unwrap(), records);
    }

    #[test]
    fn foreign_header_is_rejected() {
        let err = read_records(b"a,b,c\n1,2,3\n").unwrap_err();
        assert!(matches!(err, SchemaError::UnexpectedHeader { .. }), "got {err:?}");
    }

    #[test]
    fn bad_boolean_cell_is_an_error() {
        let bytes = write_records(&[record("x", Sentiment::Neutral)]).unwrap();
        let text = String::from_utf8(bytes)
            .unwrap()
            .replace(",False,True,False,True,", ",nope,True,False,True,");
        assert!(matches!(read_records(text.as_bytes()), Err(SchemaError::Csv(_))));
    }
}
