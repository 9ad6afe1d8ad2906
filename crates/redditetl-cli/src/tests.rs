use std::path::PathBuf;
use std::sync::Arc;

use object_store::memory::InMemory;
use object_store::ObjectStore;
use redditetl_core::{AppConfig, Environment, RedditCredentials};
use redditetl_pipeline::{
    read_records, BatchId, ClientError, NormalizedRecord, PipelineContext, PostSource, RawPost,
    RetryPolicy, RunRequest, RunSettings, RunSummary, SentimentTally, COLUMNS,
};
use tokio::sync::Mutex;

use super::*;
use crate::inspect::render_report;
use crate::run::{render_summary, resolve_request};
use crate::schedule::{build_scheduler, scheduled_run};

fn config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        reddit: RedditCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            user_agent: "redditetl-tests/0.1".to_string(),
        },
        storage_url: "memory://".to_string(),
        default_subreddit: None,
        post_limit: 100,
        key_prefix: String::new(),
        persist_local_copy: false,
        local_copy_dir: PathBuf::from("."),
        request_timeout_secs: 30,
        unique_batch_ids: false,
        run_max_retries: 2,
        run_retry_delay_secs: 300,
        schedule: "0 0 0 * * SUN".to_string(),
    }
}

/// Source with no posts; runs produce header-only payloads.
struct EmptySource;

impl PostSource for EmptySource {
    async fn top_posts(&self, _collection: &str, _limit: u32) -> Result<Vec<RawPost>, ClientError> {
        Ok(Vec::new())
    }
}

fn memory_context(store: Arc<InMemory>) -> PipelineContext<EmptySource> {
    PipelineContext {
        source: EmptySource,
        store,
        settings: RunSettings::default(),
    }
}

fn request() -> RunRequest {
    RunRequest {
        collection: "technology".to_string(),
        limit: 2,
    }
}

/// Payload row parsed through the CSV codec, as `inspect` would see it.
fn record(title: &str, score: i64, sentiment: i8) -> NormalizedRecord {
    let csv = format!(
        "{}\n{title},{score},abc,https://example.com,3,2024-02-14 09:30:00,alice,False,False,False,False,{sentiment}\n",
        COLUMNS.join(",")
    );
    read_records(csv.as_bytes()).unwrap().remove(0)
}

#[test]
fn parses_run_with_subreddit_and_limit() {
    let cli =
        Cli::try_parse_from(["redditetl", "run", "--subreddit", "technology", "--limit", "2"])
            .expect("expected valid cli args");

    match cli.command {
        Commands::Run { target, no_retry } => {
            assert_eq!(target.subreddit.as_deref(), Some("technology"));
            assert_eq!(target.limit, Some(2));
            assert!(!no_retry);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_run_short_flags_and_no_retry() {
    let cli = Cli::try_parse_from(["redditetl", "run", "-s", "rust", "-l", "5", "--no-retry"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Run { target, no_retry } => {
            assert_eq!(target.subreddit.as_deref(), Some("rust"));
            assert_eq!(target.limit, Some(5));
            assert!(no_retry);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn run_without_flags_leaves_target_to_config() {
    let cli = Cli::try_parse_from(["redditetl", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Run { target, no_retry: false } if target == TargetArgs::default()
    ));
}

#[test]
fn parses_schedule_with_cron_override() {
    let cli = Cli::try_parse_from(["redditetl", "schedule", "--cron", "0 */5 * * * *"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Schedule { target, cron } => {
            assert_eq!(target, TargetArgs::default());
            assert_eq!(cron.as_deref(), Some("0 */5 * * * *"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_inspect_with_rows() {
    let cli = Cli::try_parse_from(["redditetl", "inspect", "out/14022024093000.csv", "--rows", "3"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Inspect { file, rows } => {
            assert_eq!(file, PathBuf::from("out/14022024093000.csv"));
            assert_eq!(rows, 3);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_missing_subcommand_and_bad_limit() {
    assert!(Cli::try_parse_from(["redditetl"]).is_err());
    assert!(Cli::try_parse_from(["redditetl", "run", "--limit", "-1"]).is_err());
    assert!(Cli::try_parse_from(["redditetl", "run", "--limit", "many"]).is_err());
}

#[test]
fn resolve_request_prefers_flags_over_config() {
    let mut cfg = config();
    cfg.default_subreddit = Some("news".to_string());
    cfg.post_limit = 25;

    let flagged = TargetArgs {
        subreddit: Some("technology".to_string()),
        limit: Some(2),
    };
    let req = resolve_request(&cfg, &flagged).unwrap();
    assert_eq!(req.collection, "technology");
    assert_eq!(req.limit, 2);

    let req = resolve_request(&cfg, &TargetArgs::default()).unwrap();
    assert_eq!(req.collection, "news");
    assert_eq!(req.limit, 25);
}

#[test]
fn resolve_request_requires_a_subreddit() {
    let err = resolve_request(&config(), &TargetArgs::default()).unwrap_err();
    assert!(err.to_string().contains("--subreddit"), "got {err}");
}

#[test]
fn summary_mentions_key_and_counts() {
    let summary = RunSummary {
        batch_id: BatchId::now(),
        object_key: "14022024093000.csv".to_string(),
        tally: SentimentTally {
            positive: 1,
            neutral: 0,
            negative: 1,
        },
        local_copy: Some(PathBuf::from("/tmp/14022024093000.csv")),
    };

    let text = render_summary(&request(), &summary);
    assert!(text.starts_with("r/technology: wrote 2 rows to 14022024093000.csv"), "got {text}");
    assert!(text.contains("positive 1, neutral 0, negative 1"));
    assert!(text.contains("local copy: /tmp/14022024093000.csv"));
}

#[test]
fn report_counts_labels_and_limits_rows() {
    let records = vec![
        record("Great breakthrough in AI!", 512, 1),
        record("Terrible outage hits servers", 88, -1),
        record("Weekly thread", 3, 0),
    ];

    let report = render_report(&records, 2);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "3 rows: positive 1, neutral 1, negative 1");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("positive") && lines[1].ends_with("Great breakthrough in AI!"));
    assert!(lines[2].contains("negative") && lines[2].contains("2024-02-14"));
}

#[test]
fn report_of_empty_payload() {
    assert_eq!(render_report(&[], 10), "0 rows: positive 0, neutral 0, negative 0\n");
}

#[tokio::test]
async fn scheduled_run_writes_when_idle() {
    let store = Arc::new(InMemory::new());
    let ctx = memory_context(Arc::clone(&store));
    let lock = Mutex::new(());

    let outcome = scheduled_run(&ctx, &request(), RetryPolicy::none(), &lock).await;

    let summary = outcome.expect("run should not be skipped").unwrap();
    assert_eq!(summary.tally.total(), 0);
    let listed = store.list_with_delimiter(None).await.unwrap();
    assert_eq!(listed.objects.len(), 1);
    assert!(lock.try_lock().is_ok(), "lock must be released after the run");
}

#[tokio::test]
async fn scheduled_run_skips_while_previous_run_holds_lock() {
    let store = Arc::new(InMemory::new());
    let ctx = memory_context(Arc::clone(&store));
    let lock = Mutex::new(());
    let _held = lock.lock().await;

    let outcome = scheduled_run(&ctx, &request(), RetryPolicy::none(), &lock).await;

    assert!(outcome.is_none());
    let listed = store.list_with_delimiter(None).await.unwrap();
    assert!(listed.objects.is_empty());
}

#[tokio::test]
async fn build_scheduler_rejects_bad_cron() {
    let ctx = Arc::new(memory_context(Arc::new(InMemory::new())));
    let result = build_scheduler(ctx, request(), RetryPolicy::none(), "every sunday").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn build_scheduler_starts_and_stops() {
    let ctx = Arc::new(memory_context(Arc::new(InMemory::new())));
    let mut scheduler = build_scheduler(ctx, request(), RetryPolicy::none(), "0 0 0 * * SUN")
        .await
        .expect("scheduler should start");
    scheduler.shutdown().await.expect("scheduler should stop");
}
