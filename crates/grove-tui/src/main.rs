//! `grove-tui` — terminal dashboard for a grow chamber.
//!
//! Shows the latest air and water temperature readings with their set
//! points, the recipe currently running on the device, and a recipe
//! manager backed by the local document store and synced with a remote
//! origin.
//!
//! Logs go to a file (default `/tmp/grove-tui.log`) so they never
//! corrupt the terminal.

mod app;
mod event;
mod theme;
mod tui;
mod view;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal dashboard for grow-chamber readings and recipes.
#[derive(Parser, Debug)]
#[command(name = "grove-tui", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "GROVE_CONFIG")]
    config: Option<PathBuf>,

    /// Remote origin to sync recipes with (e.g. http://chamber.local:5984)
    #[arg(short, long, env = "GROVE_ORIGIN")]
    origin: Option<String>,

    /// Write a default config file (to --config or the platform path) and exit
    #[arg(long)]
    init_config: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/grove-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. The returned guard flushes on drop and must live
/// as long as the app.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "grove_tui={level},grove_core={level},grove_api={level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("grove-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Write the default configuration to `path`, refusing to overwrite.
fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists; edit it instead", path.display());
    }
    grove_config::save_config(&grove_config::Config::default(), path)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let path = cli.config.clone().unwrap_or_else(grove_config::config_path);
        init_config(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let cfg = grove_config::load_config(cli.config.as_deref())?;
    let config = grove_config::to_grove_config(&cfg, cli.origin.as_deref())?;

    info!(
        latest = %config.latest_url,
        local = %config.recipes_local,
        origin = config.default_origin.as_ref().map_or("(none)", url::Url::as_str),
        "starting grove-tui"
    );

    let mut app = App::new(&config)?;
    app.run().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn init_config_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grove").join("config.toml");

        init_config(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[recipes]"));
        assert!(written.contains("{origin}/recipes"));
    }

    #[test]
    fn init_config_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_origin = \"http://chamber.local:5984\"\n").unwrap();

        assert!(init_config(&path).is_err());
        let kept = std::fs::read_to_string(&path).unwrap();
        assert!(kept.contains("chamber.local"));
    }

    #[test]
    fn cli_accepts_init_flag() {
        let cli = Cli::try_parse_from(["grove-tui", "--init-config", "-c", "/tmp/g.toml"]).unwrap();
        assert!(cli.init_config);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/g.toml")));
    }
}
