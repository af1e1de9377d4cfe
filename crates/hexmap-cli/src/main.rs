//! Hexmap command line front end.

use clap::Parser;
use hexmap_core::{MapEngine, PhysicalCoordinate};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod session;
mod shell;
mod store;

use session::Session;
use store::FileStorage;

#[derive(Parser, Debug)]
#[command(name = "hexmap", version, about = "Build a map out of hex tiles")]
struct Cli {
    /// Saved map, loaded at start and updated after every change
    #[arg(long, env = "HEXMAP_STATE", default_value = "hexmap.json")]
    state: PathBuf,

    /// Engine config (TOML)
    #[arg(long, env = "HEXMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Viewport width in pixels, used by `click` and `reset`
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::resolve_config(cli.config.as_deref())?;

    let storage = FileStorage::new(&cli.state);
    info!(state = %storage.path().display(), "Starting hexmap...");

    let mut engine = MapEngine::with_config(config, storage);
    engine.set_window_size(PhysicalCoordinate::new(cli.width, cli.height));
    engine.init()?;

    let mut session = Session::new(engine);
    let stdin = std::io::stdin();
    let prompt = stdin.is_terminal();
    shell::run_shell(&mut session, stdin.lock(), std::io::stdout().lock(), prompt)
}
