//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A session is advanced one tick at a time by whoever owns the timer.

pub mod action;
pub mod config;
pub mod engine;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Velocity};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult, submit_direction};
pub use session::{GameLoop, Snapshot};
pub use state::{CollisionType, GameState, Position, SessionState, Snake};
