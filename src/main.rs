use anyhow::{Context, Result};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use subview::config::Config;
use subview::fetch::create_fetcher;
use subview::interactive::{print_header, run_interactive, Session, TerminalOverlay, TerminalPresenter};
use subview::player::ClockPlayerFactory;
use subview::Viewer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subview")]
#[command(version, about = "Browse translated subtitle transcripts side by side")]
#[command(
    long_about = "Pick a video, a translation method and a language from a subtitle manifest, read the English and translated transcripts side by side, and follow a simulated playback overlay."
)]
struct Cli {
    /// Base URL or directory containing manifest.json and videos/
    #[arg(short, long)]
    source: Option<String>,

    /// Manifest path relative to the source
    #[arg(short, long)]
    manifest: Option<String>,

    /// Overlay polling interval in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Transcript rows shown per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(ref source) = cli.source {
        config.source = source.clone();
    }
    if let Some(ref manifest) = cli.manifest {
        config.manifest_path = manifest.clone();
    }
    if let Some(interval) = cli.poll_interval_ms {
        config.poll_interval_ms = interval;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    let config = apply_overrides(config, &cli);
    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Source:   {} ({})", config.source, config.source_kind());
    info!("Manifest: {}", config.manifest_path);

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("Failed to install Ctrl+C handler")?;

    let fetcher = create_fetcher(&config).context("Failed to set up subtitle source")?;
    let presenter = Arc::new(TerminalPresenter::new());
    let overlay = Arc::new(TerminalOverlay::new());
    let players = Arc::new(ClockPlayerFactory::new());

    let (mut viewer, events) = Viewer::new(
        &config,
        Arc::from(fetcher),
        presenter.clone(),
        overlay.clone(),
        players.clone(),
    );

    print_header();

    viewer.init().await.context("Failed to load manifest")?;
    viewer.player_api_ready().await;

    run_interactive(Session {
        viewer,
        events,
        presenter,
        overlay,
        players,
        config,
        interrupted,
    })
    .await
}
