use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Grid;

/// Directory name used under the platform data dir.
pub const APP_DIR_NAME: &str = "classic-snake";

/// Default board edge length in cells.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Largest accepted board edge length.
pub const MAX_GRID_SIZE: u16 = 255;

/// Segments in a freshly started snake.
pub const DEFAULT_INITIAL_LENGTH: usize = 3;

/// Ticks per second at the start of a game.
pub const DEFAULT_INITIAL_SPEED: u32 = 7;

/// Upper bound for the speed level.
pub const DEFAULT_MAX_SPEED: u32 = 15;

/// Score needed per speed level increase.
pub const POINTS_PER_SPEED_LEVEL: u32 = 5;

/// Rejected [`GameConfig`] values.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("a {grid_size}x{grid_size} grid cannot fit a {length}-cell snake and its food")]
    GridTooSmall { grid_size: u16, length: usize },
    #[error("grid size {grid_size} exceeds the maximum of {max}")]
    GridTooLarge { grid_size: u16, max: u16 },
    #[error("initial snake length must be at least 1")]
    EmptySnake,
    #[error("initial speed must be greater than zero")]
    ZeroSpeed,
    #[error("max speed {max} is below initial speed {initial}")]
    MaxBelowInitial { initial: u32, max: u32 },
    #[error("points per speed level must be greater than zero")]
    ZeroPointsPerLevel,
}

/// Gameplay tuning for one engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: u16,
    pub initial_length: usize,
    pub initial_speed: u32,
    pub max_speed: u32,
    pub points_per_speed_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_length: DEFAULT_INITIAL_LENGTH,
            initial_speed: DEFAULT_INITIAL_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            points_per_speed_level: POINTS_PER_SPEED_LEVEL,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }

    /// Checks that a game can start with these values.
    ///
    /// The snake starts at the board centre trailing left, so the tail must
    /// still land on the board, and one more cell must remain for food.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                grid_size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }

        let fits_behind_center = self.initial_length <= usize::from(self.grid_size / 2) + 1;
        let room_for_food = self.grid().total_cells() > self.initial_length;
        if !fits_behind_center || !room_for_food {
            return Err(ConfigError::GridTooSmall {
                grid_size: self.grid_size,
                length: self.initial_length,
            });
        }

        if self.initial_speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        if self.max_speed < self.initial_speed {
            return Err(ConfigError::MaxBelowInitial {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }
        if self.points_per_speed_level == 0 {
            return Err(ConfigError::ZeroPointsPerLevel);
        }

        Ok(())
    }
}

/// Colour palette applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    /// Body colour at full strength; segments fade toward `play_bg`.
    pub snake_body: Color,
    pub food: Color,
    pub grid_dot: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_text: Color,
    pub hud_accent: Color,
    pub overlay_text: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

pub const THEME_LIGHT: Theme = Theme {
    name: "Light",
    snake_head: Color::Rgb(76, 175, 80),
    snake_body: Color::Rgb(102, 187, 106),
    food: Color::Rgb(244, 67, 54),
    grid_dot: Color::Rgb(224, 224, 224),
    play_bg: Color::Rgb(245, 245, 245),
    border_fg: Color::Rgb(120, 120, 120),
    hud_text: Color::Rgb(60, 60, 60),
    hud_accent: Color::Rgb(56, 142, 60),
    overlay_text: Color::Rgb(33, 33, 33),
    menu_title: Color::Rgb(56, 142, 60),
    menu_footer: Color::Rgb(140, 140, 140),
};

pub const THEME_DARK: Theme = Theme {
    name: "Dark",
    snake_head: Color::Rgb(129, 199, 132),
    snake_body: Color::Rgb(102, 187, 106),
    food: Color::Rgb(239, 83, 80),
    grid_dot: Color::Rgb(48, 48, 48),
    play_bg: Color::Rgb(30, 30, 30),
    border_fg: Color::Rgb(160, 160, 160),
    hud_text: Color::Rgb(220, 220, 220),
    hud_accent: Color::Rgb(129, 199, 132),
    overlay_text: Color::Rgb(240, 240, 240),
    menu_title: Color::Rgb(129, 199, 132),
    menu_footer: Color::DarkGray,
};

/// All available themes in cycle order.
pub const THEMES: &[Theme] = &[THEME_DARK, THEME_LIGHT];

pub const GLYPH_FOOD: &str = "●";
pub const GLYPH_GRID_DOT: &str = "·";
