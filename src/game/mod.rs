//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end drives it through [`GameEngine::start`],
//! [`GameEngine::set_direction`] and [`GameEngine::tick`], and reads
//! [`GameState`] to draw.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{BossWave, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, Schedule, TickResult};
pub use state::{Boss, CollisionType, GamePhase, GameState, Outcome, Position, Snake};
