use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use super::refresh::{DashboardState, RefreshOutcome};

/// Called after every refresh cycle that published new data.
pub type RefreshHook = Arc<dyn Fn(&DashboardState) + Send + Sync>;

/// Default cadence: every 15 minutes.
pub const DEFAULT_CRON: &str = "0 */15 * * * *";

pub async fn init(state: Arc<DashboardState>, cron: &str, on_refresh: RefreshHook) -> Result<JobScheduler, anyhow::Error> {
    let sched = JobScheduler::new().await?;
    let state_clone = state.clone();
    let hook_clone = on_refresh.clone();

    sched.add(
        Job::new_async(cron, move |_uuid, _l| {
            let state = state_clone.clone();
            let hook = hook_clone.clone();
            Box::pin(async move {
                info!("Running scheduled refresh");
                run_refresh(&state, &hook).await;
            })
        })?
    ).await?;

    // Also refresh once immediately so the dashboard never starts empty
    tokio::spawn(async move {
        info!("Running startup refresh");
        run_refresh(&state, &on_refresh).await;
    });

    sched.start().await?;
    Ok(sched)
}

/// Refreshes both groups concurrently; failures are logged and the previous data stays published.
pub async fn run_refresh(state: &DashboardState, hook: &RefreshHook) {
    let (leading, lagging) = tokio::join!(state.refresh_leading(), state.refresh_lagging());

    let mut published = false;
    for (group, outcome) in [("leading", leading), ("lagging", lagging)] {
        match outcome {
            Ok(RefreshOutcome::Published) => published = true,
            Ok(RefreshOutcome::Superseded) => info!(group, "Refresh superseded by a newer one"),
            Err(e) => error!(group, error = %e, "Refresh failed; keeping previous data"),
        }
    }

    if published {
        hook(state);
    }
}
