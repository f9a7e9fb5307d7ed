use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nudge_api::{ChannelRouter, GMAIL_API_BASE, GmailClient, SLACK_API_BASE, SlackClient};
use nudge_engine::{Clock, FixedClock, ReminderWorkflow};
use nudge_types::{RunPhase, RunReport};
use tracing::debug;

mod config;

use config::{NudgeConfig, default_config_path, load_config_from_path, parse_time_of_day};

/// Exit status for runs that ended in `ABORTED`.
const EXIT_ABORTED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "nudge", version, about = "Remind a user to send their daily work update")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check for today's update once and send a reminder if it is missing.
    Run {
        /// Pretend the current time is HH:MM[:SS] today in the configured zone.
        #[arg(long)]
        at: Option<String>,
        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Inspect the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage secrets referenced as `${secret:NAME}`.
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration path.
    Path,
    /// Print the loaded configuration with secrets redacted.
    Show,
}

#[derive(Debug, Subcommand)]
enum SecretAction {
    /// Store a secret in the OS keychain.
    Set { name: String, value: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match cli.command {
        Command::Run { at, json } => run_once(&config_path, at.as_deref(), json).await,
        Command::Config { action: ConfigAction::Path } => {
            println!("{}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { action: ConfigAction::Show } => {
            let config = load(&config_path)?;
            let rendered = serde_json::to_string_pretty(&config)?;
            println!("{}", nudge_util::redact_sensitive(&rendered));
            Ok(ExitCode::SUCCESS)
        }
        Command::Secret {
            action: SecretAction::Set { name, value },
        } => {
            nudge_util::store_secret(&name, &value).with_context(|| format!("store secret '{name}'"))?;
            println!("stored secret '{name}'; reference it as ${{secret:{name}}}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load(path: &std::path::Path) -> Result<NudgeConfig> {
    load_config_from_path(path).with_context(|| format!("load configuration from {}", path.display()))
}

async fn run_once(config_path: &std::path::Path, at: Option<&str>, json: bool) -> Result<ExitCode> {
    let config = load(config_path)?;
    let clock = build_clock(&config, at)?;
    debug!(now = %clock.now(), "clock ready");

    let slack = SlackClient::new(
        config.slack.base_url.as_deref().unwrap_or(SLACK_API_BASE),
        &config.slack.token,
        config.slack.channel_id.clone(),
    )?;
    let mut gmail = GmailClient::new(
        config.gmail.base_url.as_deref().unwrap_or(GMAIL_API_BASE),
        &config.gmail.access_token,
        clock.clone(),
    )?;
    if let Some(subject) = &config.gmail.update_subject {
        gmail = gmail.with_update_subject(subject.clone());
    }
    if let Some(subject) = &config.gmail.reminder_subject {
        gmail = gmail.with_reminder_subject(subject.clone());
    }

    let workflow = ReminderWorkflow::new(
        config.workflow_config()?,
        Arc::new(gmail.clone()),
        Arc::new(ChannelRouter::new(slack, gmail)),
        clock,
    );
    let report = workflow.run_once().await.report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", summarize(&report, &config.recipient));
    }

    Ok(if report.is_aborted() {
        ExitCode::from(EXIT_ABORTED)
    } else {
        ExitCode::SUCCESS
    })
}

/// The configured clock, or one pinned to `at` today when rehearsing.
fn build_clock(config: &NudgeConfig, at: Option<&str>) -> Result<Arc<dyn Clock>> {
    let system = config.clock()?;
    let Some(raw) = at else {
        return Ok(Arc::new(system));
    };

    let time = parse_time_of_day(raw).with_context(|| format!("--at '{raw}' is not HH:MM[:SS]"))?;
    let today = system.now();
    let pinned = today
        .date_naive()
        .and_time(time)
        .and_local_timezone(*today.offset())
        .single()
        .with_context(|| format!("--at '{raw}' does not name a single instant today"))?;
    Ok(Arc::new(FixedClock(pinned)))
}

fn summarize(report: &RunReport, recipient: &str) -> String {
    match (report.final_phase, &report.failure) {
        (RunPhase::DoneUpdateReceived, _) => format!("{recipient} already sent today's update; no reminder needed"),
        (RunPhase::DoneReminderSent, _) => format!("reminder sent to {recipient} via {}", report.reminder_channel),
        (_, Some(failure)) => format!(
            "run aborted during {}{}: {}",
            failure.step,
            if failure.timed_out { " (timed out)" } else { "" },
            failure.message
        ),
        (phase, None) => format!("run stopped in {phase}"),
    }
}
