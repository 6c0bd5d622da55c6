//! Neon Snake - a Snake game with a deterministic tick loop
//!
//! This library provides:
//! - Core game logic and the tick-driven session (game module)
//! - High score persistence (storage module)
//! - Terminal input and rendering (input, render modules)
//! - The interactive terminal front end (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
