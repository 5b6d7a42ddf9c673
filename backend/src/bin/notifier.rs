//! Daily reminder dispatch job.
//!
//! Loads every vaccination record with its owner's profile, plans reminders
//! for the notify-day offsets, claims each in the sent ledger, and submits
//! mail over SMTP. Intended to run once a day from a scheduler; reruns on
//! the same day send nothing thanks to the ledger.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use reqwest::Url;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use paticheck_backend::domain::ports::AlwaysClaimReminderLog;
use paticheck_backend::domain::{DispatchSummary, ReminderDispatcher};
use paticheck_backend::outbound::mailer::{LoggingMailer, SmtpConfig, SmtpMailer};
use paticheck_backend::outbound::persistence::{
    DbPool, DieselReminderFeed, DieselReminderLog, PoolConfig,
};
use paticheck_backend::outbound::wakeup;

/// `paticheck-notifier` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "paticheck-notifier",
    about = "Send vaccination reminder mail for due and overdue records",
    version
)]
struct CliArgs {
    /// Dispatch date. Defaults to today (UTC).
    #[arg(long = "today", value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,
    /// Plan and claim nothing; log what would be sent instead.
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Dashboard URL to wake before dispatch. Falls back to `APP_URL`.
    #[arg(long = "app-url", value_name = "url")]
    app_url: Option<Url>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(io::Error::other)?;
    runtime.block_on(run(CliArgs::parse()))
}

fn require_env(name: &str) -> io::Result<String> {
    env::var(name).map_err(|_| io::Error::other(format!("{name} must be set")))
}

fn smtp_config_from_env() -> io::Result<SmtpConfig> {
    let port = match env::var("SMTP_PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|error| io::Error::other(format!("SMTP_PORT invalid: {error}")))?,
        Err(_) => 587,
    };
    Ok(SmtpConfig {
        host: require_env("SMTP_HOST")?,
        port,
        username: require_env("SMTP_USERNAME")?,
        password: require_env("SMTP_PASSWORD")?,
        from: require_env("MAIL_FROM")?,
    })
}

async fn run(args: CliArgs) -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let database_url = match args.database_url {
        Some(url) => url,
        None => require_env("DATABASE_URL")?,
    };
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());

    let app_url = match args.app_url {
        Some(url) => Some(url),
        None => match env::var("APP_URL") {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|error| io::Error::other(format!("APP_URL invalid: {error}")))?,
            ),
            Err(_) => None,
        },
    };
    if let Some(url) = &app_url {
        wakeup::ping_app(url).await;
    }

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;
    let feed = Arc::new(DieselReminderFeed::new(pool.clone()));

    let summary = if args.dry_run {
        // No ledger writes and no real mail on a dry run.
        info!(%today, "dry run, nothing is claimed or sent");
        let dispatcher = ReminderDispatcher::new(
            feed,
            Arc::new(AlwaysClaimReminderLog),
            Arc::new(LoggingMailer),
        );
        dispatch(&dispatcher, today).await?
    } else {
        let mailer = SmtpMailer::new(&smtp_config_from_env()?)
            .map_err(|error| io::Error::other(error.to_string()))?;
        let log = Arc::new(DieselReminderLog::new(pool));
        let dispatcher = ReminderDispatcher::new(feed, log, Arc::new(mailer));
        dispatch(&dispatcher, today).await?
    };

    info!(
        records = summary.records_considered,
        planned = summary.reminders_planned,
        sent = summary.emails_sent,
        suppressed = summary.suppressed,
        failures = summary.failures,
        "dispatch finished"
    );
    if summary.failures > 0 {
        return Err(io::Error::other(format!(
            "{} reminder(s) failed to send",
            summary.failures
        )));
    }
    Ok(())
}

async fn dispatch<F, L, M>(
    dispatcher: &ReminderDispatcher<F, L, M>,
    today: NaiveDate,
) -> io::Result<DispatchSummary>
where
    F: paticheck_backend::domain::ports::ReminderFeed,
    L: paticheck_backend::domain::ports::ReminderLog,
    M: paticheck_backend::domain::ports::Mailer,
{
    dispatcher
        .run(today)
        .await
        .map_err(|error| io::Error::other(error.to_string()))
}
