use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Widest board that can be played or drawn
pub const MAX_GRID_WIDTH: usize = 40;
/// Tallest board that can be played or drawn
pub const MAX_GRID_HEIGHT: usize = 30;
/// Narrowest board that still gives the snake room to turn
pub const MIN_GRID_WIDTH: usize = 8;
/// Shortest board that fits the vertical starting snake below the center
pub const MIN_GRID_HEIGHT: usize = 6;

/// Segments of the snake at the start of every game
pub const INITIAL_SNAKE_LENGTH: usize = 3;
/// Score granted per food eaten
pub const FOOD_REWARD: u32 = 10;

/// Terminal columns taken by one tile
pub const TILE_COLUMNS: u16 = 2;
/// Terminal rows taken by the header, footer and board border
pub const CHROME_ROWS: u16 = 3 + 3 + 2;
/// Terminal columns taken by the board border
pub const CHROME_COLUMNS: u16 = 2;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Width of the game grid in tiles
    pub grid_width: usize,
    /// Height of the game grid in tiles
    pub grid_height: usize,
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            tick_interval_ms: 100,
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

    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their defaults; unknown fields are
    /// rejected.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Board dimensions for a terminal of `columns` x `rows`.
    ///
    /// One tile is two columns wide so cells look square. The result is
    /// capped at 40x30 and never smaller than the minimum playable board.
    pub fn fit_to_viewport(columns: u16, rows: u16) -> (usize, usize) {
        let usable_columns = columns.saturating_sub(CHROME_COLUMNS) / TILE_COLUMNS;
        let usable_rows = rows.saturating_sub(CHROME_ROWS);

        let width = (usable_columns as usize).clamp(MIN_GRID_WIDTH, MAX_GRID_WIDTH);
        let height = (usable_rows as usize).clamp(MIN_GRID_HEIGHT, MAX_GRID_HEIGHT);

        (width, height)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if the board can host a fresh game and be drawn,
    /// `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_width > MAX_GRID_WIDTH {
            return Err(format!(
                "grid_width must be in [1, {}], got {}",
                MAX_GRID_WIDTH, self.grid_width
            ));
        }

        if self.grid_height > MAX_GRID_HEIGHT {
            return Err(format!(
                "grid_height must be at most {}, got {}",
                MAX_GRID_HEIGHT, self.grid_height
            ));
        }

        // The snake starts at the center and extends downwards
        let tail_row = self.grid_height / 2 + INITIAL_SNAKE_LENGTH - 1;
        if tail_row >= self.grid_height {
            return Err(format!(
                "grid_height {} is too small for the starting snake",
                self.grid_height
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
    }

    #[test]
    fn test_validate_rejects_short_board() {
        // Center row 2, tail would land on row 4 of a 4-row board
        let config = GameConfig::new(10, 4);
        assert!(config.validate().is_err());

        let config = GameConfig::new(5, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_board() {
        assert!(GameConfig::new(40000, 10).validate().is_err());
        assert!(GameConfig::new(20, 31).validate().is_err());
        assert!(GameConfig::new(0, 10).validate().is_err());

        let largest = GameConfig::new(MAX_GRID_WIDTH, MAX_GRID_HEIGHT);
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_start_shape_not_configurable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "initial_snake_length": 1, "food_reward": 7 }"#).unwrap();

        assert!(GameConfig::load(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = GameConfig::default();
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fit_to_viewport_caps() {
        assert_eq!(
            GameConfig::fit_to_viewport(500, 200),
            (MAX_GRID_WIDTH, MAX_GRID_HEIGHT)
        );
    }

    #[test]
    fn test_fit_to_viewport_small_terminal() {
        // 80x24: (80 - 2) / 2 = 39 tiles wide, 24 - 8 = 16 rows
        assert_eq!(GameConfig::fit_to_viewport(80, 24), (39, 16));
        assert_eq!(
            GameConfig::fit_to_viewport(10, 5),
            (MIN_GRID_WIDTH, MIN_GRID_HEIGHT)
        );
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "grid_width": 12, "tick_interval_ms": 80 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.tick_interval_ms, 80);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(GameConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
