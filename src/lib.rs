//! Boss Snake - a terminal Snake game with a story, levels and wandering bosses
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - TUI rendering of the intro, story, play field and result (render module)
//! - Keyboard mapping (input module)
//! - Play-time tracking (metrics module)
//! - The interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
