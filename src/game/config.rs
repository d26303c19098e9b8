use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest grid side, in cells
pub const MAX_GRID_SIDE: usize = 1000;

/// A number of bosses that replaces the current ones when a level is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossWave {
    pub level: u32,
    pub count: usize,
}

impl BossWave {
    pub fn new(level: u32, count: usize) -> Self {
        Self { level, count }
    }
}

/// Configuration for the game
///
/// Every tunable constant of a run lives here. Missing fields in a config
/// file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Reaching this length wins the game
    pub max_snake_length: usize,

    /// Tick interval at level 1, in milliseconds
    pub initial_speed_ms: u64,
    /// Tick interval reduction applied on every level-up
    pub speed_step_ms: u64,
    /// The tick interval never drops below this
    pub min_speed_ms: u64,

    /// Points awarded per food
    pub food_score: u32,
    /// A level-up happens whenever the score is a multiple of this
    pub level_up_score: u32,
    /// Reaching this level wins the game
    pub win_level: u32,
    /// Boss waves, keyed by the level that triggers them
    pub boss_waves: Vec<BossWave>,

    /// Random tries before placement falls back to enumerating free cells
    pub placement_attempts: usize,
    /// Story screen auto-scroll interval, in milliseconds
    pub story_scroll_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            max_snake_length: 20,
            initial_speed_ms: 200,
            speed_step_ms: 20,
            min_speed_ms: 50,
            food_score: 10,
            level_up_score: 50,
            win_level: 10,
            boss_waves: vec![BossWave::new(3, 1), BossWave::new(5, 2)],
            placement_attempts: 64,
            story_scroll_ms: 1500,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        if let Err(reason) = config.validate() {
            bail!("Invalid config in {:?}: {}", path, reason);
        }
        Ok(config)
    }

    /// Number of bosses the given level spawns, if it spawns any
    pub fn boss_wave_for(&self, level: u32) -> Option<usize> {
        self.boss_waves
            .iter()
            .find(|wave| wave.level == level)
            .map(|wave| wave.count)
    }

    pub fn story_scroll_interval(&self) -> Duration {
        Duration::from_millis(self.story_scroll_ms)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(format!(
                "grid must be at least 3x3, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(format!(
                "grid sides are capped at {}, got {}x{}",
                MAX_GRID_SIDE, self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The snake starts at the centre facing right, its tail trails left
        let centre_x = self.grid_width / 2;
        if self.initial_snake_length > centre_x + 1 {
            return Err(format!(
                "initial_snake_length ({}) does not fit left of the grid centre",
                self.initial_snake_length
            ));
        }

        if self.max_snake_length <= self.initial_snake_length {
            return Err(format!(
                "max_snake_length ({}) must exceed initial_snake_length ({})",
                self.max_snake_length, self.initial_snake_length
            ));
        }

        if self.max_snake_length >= self.grid_width * self.grid_height {
            return Err(format!(
                "max_snake_length ({}) must be smaller than the grid ({} cells)",
                self.max_snake_length,
                self.grid_width * self.grid_height
            ));
        }

        if self.min_speed_ms == 0 {
            return Err("min_speed_ms must be positive".to_string());
        }

        if self.initial_speed_ms < self.min_speed_ms {
            return Err(format!(
                "initial_speed_ms ({}) cannot be below min_speed_ms ({})",
                self.initial_speed_ms, self.min_speed_ms
            ));
        }

        if self.food_score == 0 {
            return Err("food_score must be positive".to_string());
        }

        if self.level_up_score == 0 {
            return Err("level_up_score must be positive".to_string());
        }

        if self.win_level < 2 {
            return Err(format!("win_level must be at least 2, got {}", self.win_level));
        }

        if let Some(wave) = self.boss_waves.iter().find(|wave| wave.level < 2) {
            return Err(format!(
                "boss waves start at level 2 or later, got level {}",
                wave.level
            ));
        }

        if self.story_scroll_ms == 0 {
            return Err("story_scroll_ms must be positive".to_string());
        }

        Ok(())
    }
}
