use anyhow::{Result, bail};
use boss_snake::game::GameConfig;
use boss_snake::logging;
use boss_snake::modes::PlayMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boss_snake")]
#[command(version, about = "Snake with a story, levels and wandering bosses")]
struct Cli {
    /// JSON file with game settings; missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Player name; skips the name prompt
    #[arg(long)]
    name: Option<String>,

    /// Seed for food and boss placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if let Err(reason) = config.validate() {
        bail!("Invalid game settings: {}", reason);
    }

    let mut play_mode = PlayMode::new(config, cli.seed, cli.name)?;
    play_mode.run().await?;

    Ok(())
}
