use peerbrushd::intake::run_intake;
use peerbrushd::{DaemonConfig, DaemonError, build_scheduler};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("peerbrushd error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), DaemonError> {
    let mut config_path: Option<PathBuf> = None;
    let mut ledger_path: Option<PathBuf> = None;

    let mut remaining: Vec<String> = std::env::args().skip(1).collect();
    while let Some(flag) = remaining.first().cloned() {
        remaining.remove(0);
        match flag.as_str() {
            "--config" => config_path = Some(PathBuf::from(take_arg("--config", &mut remaining)?)),
            "--ledger" => ledger_path = Some(PathBuf::from(take_arg("--ledger", &mut remaining)?)),
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => return Err(DaemonError::Config(format!("unknown flag: {other}"))),
        }
    }

    init_tracing();

    let mut config = if let Some(path) = config_path {
        DaemonConfig::from_path(&path)?
    } else {
        let default_path = PathBuf::from("peerbrush.json");
        if default_path.exists() {
            DaemonConfig::from_path(&default_path)?
        } else {
            DaemonConfig::default()
        }
    };
    config.apply_env();
    if let Some(path) = ledger_path {
        config.ledger_path = Some(std::path::absolute(path)?);
    }

    let scheduler = build_scheduler(&config)?;
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        stats = run_intake(stdin, scheduler.clone()) => {
            let stats = stats?;
            tracing::info!(accepted = stats.accepted, rejected = stats.rejected, "peerbrush.daemon.stdin_closed");
            // Armed timers keep running until interrupted.
            tokio::signal::ctrl_c().await?;
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    tracing::info!(state = ?scheduler.state(), "peerbrush.daemon.shutdown");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn take_arg(flag: &str, remaining: &mut Vec<String>) -> Result<String, DaemonError> {
    if remaining.is_empty() {
        return Err(DaemonError::Config(format!("missing value for {flag}")));
    }
    Ok(remaining.remove(0))
}

fn print_usage() {
    println!("peerbrushd [--config peerbrush.json] [--ledger PATH]");
    println!();
    println!("Reads OneBot event JSON from stdin, one object per line.");
    println!("Environment: RUST_LOG, PEERBRUSH_COORDINATION_URL, PEERBRUSH_ONEBOT_URL, PEERBRUSH_ONEBOT_TOKEN");
}
