//! Subreddit sentiment batch pipeline.
//!
//! Three stages composed strictly in sequence:
//!
//! 1. [`extract`]: top posts of a subreddit from a [`PostSource`], tagged with a
//!    time-derived [`BatchId`].
//! 2. [`transform`]: type coercion, title sentiment, CSV serialization.
//! 3. [`load`]: unconditional put into an [`object_store::ObjectStore`].
//!
//! [`run_pipeline`] drives one run; [`run_with_retries`] re-runs it whole on
//! transient failure.

pub mod batch_id;
pub mod error;
pub mod extract;
pub mod load;
pub mod retry;
pub mod runner;
pub mod source;
pub mod transform;
pub mod types;

pub use batch_id::BatchId;
pub use error::{ClientError, PipelineError, SchemaError, StorageError};
pub use extract::{extract, extract_with_id, DEFAULT_LIMIT};
pub use load::{load, open_store};
pub use retry::{is_retriable, run_with_retries, RetryPolicy};
pub use runner::{
    run_pipeline, write_local_copy, PipelineContext, RunRequest, RunSettings, RunSummary,
};
pub use source::{PostSource, RedditClient};
pub use transform::codec::{read_records, write_records, COLUMNS};
pub use transform::{normalize_post, transform};
pub use types::{Batch, NormalizedRecord, Payload, RawPost, SentimentTally};
