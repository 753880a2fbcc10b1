//! Athletics - a command-line browser for the athletics statistics database.
//!
//! Lists competitions and athletes, shows results and the national
//! dashboard. Every data command goes through a view backed by the cached
//! fetch layer, so a failed refresh still shows the last good data.

mod cli;
mod commands;
mod output;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use athletics_core::api::ApiClient;
use athletics_core::config::Config;
use athletics_core::views::{AthleteTarget, ViewContext};

use cli::{Cli, Command};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr, or to a daily rolling file instead when `log_file`
/// is given. The returned guard flushes the file on drop.
fn init_tracing(log_file: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "athletics.log".into());
            let appender = tracing_appender::rolling::daily(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let stderr_layer = log_file
        .is_none()
        .then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(ref url) = cli.api_url {
        config.api_base_url = Some(url.clone());
    }

    let base_url = config.api_base_url();
    info!(api = %base_url, "athletics starting");
    let api = ApiClient::new(&base_url)?;

    // Commands that do not need a session
    match cli.command {
        Command::Login { username } => {
            return commands::login(&api, &mut config, username).await;
        }
        Command::Logout => return commands::logout(&config),
        Command::Health => return commands::health(&api).await,
        _ => {}
    }

    let authed = commands::authed_client(&api, cli.token.as_deref(), &config)?;
    let ctx = ViewContext::from_config(authed, &config);
    debug!(per_page = ctx.per_page, ttl_secs = ctx.ttl.as_secs(), "view context");

    match cli.command {
        Command::Stats { watch } => commands::stats(&ctx, watch).await,
        Command::Competitions {
            search,
            page,
            per_page,
        } => commands::competitions(&ctx, search.as_deref(), page, per_page).await,
        Command::Competition { id, page, athletes } => {
            commands::competition(&ctx, id, page, athletes).await
        }
        Command::Athletes {
            search,
            page,
            sort_by,
            order,
        } => commands::athletes(&ctx, search.as_deref(), page, &sort_by, &order).await,
        Command::Athlete { id, page } => {
            commands::athlete_results(&ctx, AthleteTarget::Id(id), page).await
        }
        Command::AthleteResults { name, page } => {
            commands::athlete_results(&ctx, AthleteTarget::Name(name), page).await
        }
        Command::Suggest { query, limit } => commands::suggest(&ctx, &query, limit).await,
        Command::Disciplines => commands::disciplines(&ctx).await,
        Command::Countries => commands::countries(&ctx).await,
        Command::National { watch } => commands::national(&ctx, watch).await,
        Command::Login { .. } | Command::Logout | Command::Health => Ok(()),
    }
}
