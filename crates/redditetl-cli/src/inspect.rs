//! Read back a payload CSV and summarise it.

use std::fmt::Write as _;
use std::path::Path;

use redditetl_pipeline::{read_records, NormalizedRecord, SentimentTally};

/// Print the sentiment tally of a payload file and optionally its first rows.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a payload CSV.
pub(crate) async fn run_inspect(file: &Path, rows: usize) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
    let records = read_records(&bytes)
        .map_err(|e| anyhow::anyhow!("{} is not a payload CSV: {e}", file.display()))?;

    print!("{}", render_report(&records, rows));
    Ok(())
}

pub(crate) fn render_report(records: &[NormalizedRecord], rows: usize) -> String {
    let tally: SentimentTally = records.iter().collect();
    let mut out = format!(
        "{} rows: positive {}, neutral {}, negative {}\n",
        tally.total(),
        tally.positive,
        tally.neutral,
        tally.negative,
    );

    for record in records.iter().take(rows) {
        let _ = writeln!(
            out,
            "{:>8}  {:>6}  {}  {}",
            record.sentiment.to_string(),
            record.score,
            record.created_utc.format("%Y-%m-%d"),
            record.title
        );
    }
    out
}
