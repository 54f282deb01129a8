//! recession-dashboard CLI: prints display-ready indicator records as JSON

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use recession_dashboard_lib::calendar::countdown::{remaining, resolve_target, CountdownTarget, TimeRemaining};
use recession_dashboard_lib::core::refresh::DashboardState;
use recession_dashboard_lib::core::scheduler::{self, RefreshHook, DEFAULT_CRON};
use recession_dashboard_lib::indicators::IndicatorId;
use recession_dashboard_lib::models::FedEvent;
use recession_dashboard_lib::{AppConfig, DashboardError};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "recession-dashboard")]
#[command(about = "Leading and lagging recession indicators, normalized for display")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Yield curve, treasury spread, housing starts, PMI and money supply
    Leading,
    /// Unemployment and inflation
    Lagging,
    /// A single indicator card
    Indicator {
        /// Indicator id, e.g. `housing-starts` or `yield-10y`
        id: IndicatorId,
    },
    /// Next scheduled remarks by the Fed Chair, with a countdown
    Fed,
    /// Refresh both groups on a cron schedule until interrupted
    Watch {
        /// Six-field cron expression
        #[arg(long, default_value = DEFAULT_CRON)]
        cron: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FedCountdown {
    event: Option<FedEvent>,
    target: Option<CountdownTarget>,
    remaining: Option<TimeRemaining>,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Aggregate failures are shown as an error state with a retry hint.
fn exit_with(err: DashboardError, retry: &str) -> ! {
    eprintln!("error: {}", err);
    eprintln!("hint: upstream data may be temporarily unavailable; retry with `recession-dashboard {}`", retry);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("loading configuration")?;

    match cli.command {
        Commands::Leading => {
            let service = config.build_service()?;
            match service.get_all_leading_indicators().await {
                Ok(leading) => print_json(&leading)?,
                Err(e) => exit_with(e, "leading"),
            }
        }
        Commands::Lagging => {
            let service = config.build_service()?;
            match service.get_all_lagging_indicators().await {
                Ok(lagging) => print_json(&lagging)?,
                Err(e) => exit_with(e, "lagging"),
            }
        }
        Commands::Indicator { id } => {
            let service = config.build_service()?;
            match service.get_indicator(id).await {
                Ok(series) => print_json(&series)?,
                Err(e) => exit_with(e, &format!("indicator {}", id)),
            }
        }
        Commands::Fed => {
            let now = Utc::now();
            let event = config.calendar_fetcher()?.fetch_next_event(now).await;

            let fallback = config
                .fallback_event
                .map(|at| CountdownTarget::fallback("Scheduled remarks", at));
            let target = resolve_target(event.as_ref(), fallback, now);
            if target.is_none() {
                info!("No upcoming event and no FED_FALLBACK_EVENT configured");
            }

            print_json(&FedCountdown {
                remaining: target.as_ref().map(|t| remaining(t.at, now)),
                event,
                target,
            })?;
        }
        Commands::Watch { cron } => {
            let service = Arc::new(config.build_service()?);
            let state = Arc::new(DashboardState::new(service));

            let hook: RefreshHook = Arc::new(|state: &DashboardState| {
                let snapshot = serde_json::json!({ "leading": state.leading(), "lagging": state.lagging() });
                println!("{}", snapshot);
            });

            let mut sched = scheduler::init(state, &cron, hook).await?;
            info!(cron = %cron, "Watching; press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            sched.shutdown().await?;
        }
    }

    Ok(())
}
