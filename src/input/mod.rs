pub mod handler;
pub mod swipe;

pub use handler::{Command, InputHandler};
pub use swipe::SwipeTracker;
