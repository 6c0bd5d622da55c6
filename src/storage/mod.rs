//! High score persistence
//!
//! The game only ever stores one integer. The store is a capability handed
//! to the game loop so tests can swap the file for memory.

pub mod high_score;

pub use high_score::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore, STORAGE_KEY};
