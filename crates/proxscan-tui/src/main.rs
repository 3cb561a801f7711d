mod action;
mod anim;
mod app;
mod app_state;
mod component;
mod components;
mod cycle;
mod quotes;
mod scenes;
mod terminal;
mod theme;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use proxscan_proto::config::Config;

use scenes::{rain::Charset, ChainOptions};

#[derive(Parser)]
#[command(name = "proxscan")]
#[command(version)]
#[command(about = "Matrix-style proximity network scanner console", long_about = None)]
struct Cli {
    /// Skip the typed intro and loader
    #[arg(long)]
    skip_intro: bool,

    /// Skip the rain transition
    #[arg(long)]
    skip_rain: bool,

    /// Skip the scanner console
    #[arg(long)]
    skip_console: bool,

    /// Loop typed quotes instead of the scanner console
    #[arg(long)]
    quotes: bool,

    /// Seconds of blank screen between scenes
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pause: f64,

    /// Use a config file other than the default one
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// ASCII glyphs for the rain instead of katakana
    #[arg(long)]
    ascii_rain: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = proxscan_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let log_path = proxscan_proto::platform::log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,reqwest=warn,hyper_util=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("proxscan log: {}", log_path.display());

    tracing::info!("proxscan starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config: {:#}, using defaults", e);
        Config::default()
    });

    let opts = ChainOptions {
        skip_intro: cli.skip_intro,
        skip_rain: cli.skip_rain,
        skip_console: cli.skip_console,
        quotes: cli.quotes,
        pause: Duration::try_from_secs_f64(cli.pause).unwrap_or(Duration::ZERO),
        charset: if cli.ascii_rain {
            Charset::Ascii
        } else {
            Charset::Katakana
        },
    };

    let chain = scenes::build_chain(&opts);
    if chain.is_empty() {
        tracing::info!("nothing to run");
        return Ok(());
    }
    tracing::info!("chain: {:?}", chain);

    scenes::run_chain(&chain, &opts, &config).await?;

    tracing::info!("proxscan exiting");
    Ok(())
}
