//! Recurring runs on a cron schedule.
//!
//! One job is registered per process. A trigger that fires while the previous
//! run still holds the run lock is skipped, never queued.

use std::sync::Arc;

use redditetl_core::AppConfig;
use redditetl_pipeline::{
    PipelineContext, PipelineError, PostSource, RetryPolicy, RunRequest, RunSummary,
};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::run::{build_context, execute, resolve_request, retry_policy};
use crate::TargetArgs;

/// Start the scheduler and block until ctrl-c or SIGTERM.
///
/// # Errors
///
/// Returns an error if the target or context cannot be built, or the
/// scheduler fails to start or stop.
pub(crate) async fn run_scheduled(
    config: &AppConfig,
    target: &TargetArgs,
    cron: Option<String>,
) -> anyhow::Result<()> {
    let request = resolve_request(config, target)?;
    let ctx = Arc::new(build_context(config)?);
    let cron = cron.unwrap_or_else(|| config.schedule.clone());

    let mut scheduler = build_scheduler(ctx, request, retry_policy(config), &cron).await?;
    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

/// Builds and starts a scheduler with the pipeline job registered.
///
/// The returned handle must be kept alive; dropping it stops the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if `cron` does not parse or the scheduler
/// cannot be started.
pub(crate) async fn build_scheduler<S>(
    ctx: Arc<PipelineContext<S>>,
    request: RunRequest,
    policy: RetryPolicy,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError>
where
    S: PostSource + Send + Sync + 'static,
{
    let scheduler = JobScheduler::new().await?;
    let request = Arc::new(request);
    let run_lock = Arc::new(Mutex::new(()));
    let subreddit = request.collection.clone();

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let ctx = Arc::clone(&ctx);
        let request = Arc::clone(&request);
        let run_lock = Arc::clone(&run_lock);

        Box::pin(async move {
            let _outcome = scheduled_run(&ctx, &request, policy, &run_lock).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron = %cron, subreddit = %subreddit, "scheduler: registered pipeline job");
    Ok(scheduler)
}

/// Execute one scheduled run unless another is in flight.
///
/// Returns `None` when the trigger was skipped.
pub(crate) async fn scheduled_run<S>(
    ctx: &PipelineContext<S>,
    request: &RunRequest,
    policy: RetryPolicy,
    run_lock: &Mutex<()>,
) -> Option<Result<RunSummary, PipelineError>>
where
    S: PostSource + Sync,
{
    let Ok(_guard) = run_lock.try_lock() else {
        tracing::warn!(
            subreddit = %request.collection,
            "scheduler: previous run still in progress; skipping trigger"
        );
        return None;
    };

    tracing::info!(subreddit = %request.collection, "scheduler: starting pipeline run");
    let result = execute(ctx, request, policy).await;
    match &result {
        Ok(summary) => tracing::info!(
            key = %summary.object_key,
            rows = summary.tally.total(),
            "scheduler: pipeline run complete"
        ),
        Err(e) => tracing::error!(error = %e, "scheduler: pipeline run failed"),
    }
    Some(result)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
