//! rq - render job queue simulator
//!
//! CLI entry point for driving the render scheduler.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use renderqueue::cli::{Cli, Command, JobSpec, OutputFormat};
use renderqueue::config::Config;
use renderqueue::domain::{Effect, Priority};
use renderqueue::policy::EffectDurations;
use renderqueue::report;
use renderqueue::scheduler::RenderScheduler;

/// The scripted re-edit lands this far into the first render
const DEMO_RESUBMIT_FRACTION: u64 = 4;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("renderqueue")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("renderqueue.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    config.validate()?;

    match cli.command {
        Some(Command::Demo { speed, format }) => {
            debug!(speed, %format, "main: matched Demo command");
            cmd_demo(&config, speed, format).await
        }
        Some(Command::Run { jobs, speed, format }) => {
            debug!(job_count = jobs.len(), speed, %format, "main: matched Run command");
            cmd_run(&config, &jobs, speed, format).await
        }
        Some(Command::Effects { format }) => {
            debug!(%format, "main: matched Effects command");
            cmd_effects(&config, format)
        }
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn spawn_scheduler(config: &Config, policy: EffectDurations) -> RenderScheduler {
    RenderScheduler::spawn(config.scheduler.clone(), Arc::new(policy))
}

/// Scripted edit session: three segments, then a re-edit of the second
/// while the first is still rendering
async fn cmd_demo(config: &Config, speed: f64, format: OutputFormat) -> Result<()> {
    let policy = config.effects.scaled(speed);
    let delay = policy.get_ms(Effect::ColorGrade).unwrap_or_default() / DEMO_RESUBMIT_FRACTION;
    let scheduler = spawn_scheduler(config, policy);

    scheduler.submit("seg_001", Effect::ColorGrade, Priority::High).await?;
    scheduler.submit("seg_002", Effect::Blur, Priority::Normal).await?;
    scheduler.submit("seg_003", Effect::Transition, Priority::Normal).await?;

    debug!(delay_ms = delay, "cmd_demo: waiting before re-edit");
    tokio::time::sleep(Duration::from_millis(delay)).await;

    scheduler.submit("seg_002", Effect::SpeedChange, Priority::Normal).await?;

    finish(&scheduler, format).await
}

async fn cmd_run(config: &Config, jobs: &[JobSpec], speed: f64, format: OutputFormat) -> Result<()> {
    let scheduler = spawn_scheduler(config, config.effects.scaled(speed));

    for job in jobs {
        scheduler
            .submit(job.segment_id.as_str(), job.effect, job.priority)
            .await
            .context(format!("Failed to submit {}:{}", job.segment_id, job.effect))?;
    }

    finish(&scheduler, format).await
}

/// Wait for the queue to drain, then print history and stats
async fn finish(scheduler: &RenderScheduler, format: OutputFormat) -> Result<()> {
    scheduler.wait_idle().await;
    let history = scheduler.history().await;
    let stats = scheduler.stats().await;
    scheduler.shutdown().await;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "history": history,
                    "stats": stats,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", "Job History".bold());
            print!("{}", report::render_history(&history));
            println!();
            print!("{}", report::render_stats(&stats));
        }
    }
    Ok(())
}

fn cmd_effects(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config.effects)?);
        }
        OutputFormat::Text => {
            for effect in Effect::ALL {
                match config.effects.get_ms(effect) {
                    Some(ms) => println!("{:<13} {:>6}ms", effect.to_string(), ms),
                    None => println!("{:<13} {:>8}", effect.to_string(), "n/a".red()),
                }
            }
        }
    }
    Ok(())
}
