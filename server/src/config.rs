use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use artillery_core::{GameConfig, LevelData, Seed, BUILTIN_LEVELS, DEFAULT_PORT, TICK_RATE};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "artillery-server")]
#[command(about = "Authoritative WebSocket server for turn-based artillery matches")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Simulation steps per second
    #[arg(long, env = "TICK_RATE", default_value_t = TICK_RATE)]
    pub tick_rate: u32,

    /// World seed for the first match; defaults to the clock
    #[arg(long, env = "SEED")]
    pub seed: Option<Seed>,

    /// JSON file overriding game rules (camelCase keys, all optional)
    #[arg(long, env = "GAME_CONFIG")]
    pub game_config: Option<PathBuf>,

    /// Built-in hand-made map to play instead of generated terrain
    #[arg(long, env = "LEVEL")]
    pub level: Option<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate.clamp(1, 240)
    }

    pub fn initial_seed(&self) -> Seed {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as Seed)
                .unwrap_or(1)
        })
    }

    pub fn load_game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.game_config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading game config {}", path.display()))?;
                parse_game_config(&text).with_context(|| format!("parsing game config {}", path.display()))?
            }
            None => GameConfig::default(),
        };
        if let Some(name) = &self.level {
            let level = LevelData::builtin(name).with_context(|| {
                format!("unknown level {name:?}, expected one of {}", BUILTIN_LEVELS.join(", "))
            })?;
            config.level = Some(level);
        }
        Ok(config)
    }
}

pub fn parse_game_config(text: &str) -> Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(text)?;
    anyhow::ensure!(
        config.width >= 100.0 && config.height >= 100.0,
        "play field must be at least 100x100, got {}x{}",
        config.width,
        config.height
    );
    anyhow::ensure!(config.turn_time > 0.0, "turnTime must be positive");
    if let Some(level) = &config.level {
        level.validate().map_err(anyhow::Error::msg)?;
    }
    Ok(config)
}
