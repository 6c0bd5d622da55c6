use anyhow::{Context, Result};
use clap::Parser;
use neon_snake::game::GameConfig;
use neon_snake::modes::HumanMode;
use neon_snake::storage::FileHighScoreStore;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in tiles (default: fit the terminal)
    #[arg(long, requires = "height")]
    width: Option<usize>,

    /// Grid height in tiles (default: fit the terminal)
    #[arg(long, requires = "width")]
    height: Option<usize>,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_highscore.json")]
    high_score_file: PathBuf,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Route `log` output to a file; the terminal belongs to the game
fn init_logging(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let fit_to_terminal = match (cli.width, cli.height) {
        (Some(width), Some(height)) => {
            config.grid_width = width;
            config.grid_height = height;
            false
        }
        // A config file pins the board too
        _ => cli.config.is_none(),
    };

    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid game configuration")?;

    log::info!(
        "Starting with {:?}, fit to terminal: {}",
        config,
        fit_to_terminal
    );

    let store = FileHighScoreStore::new(cli.high_score_file);
    let mut human_mode = HumanMode::new(config, store, fit_to_terminal);
    human_mode.run().await?;

    Ok(())
}
