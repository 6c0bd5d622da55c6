pub mod renderer;

pub use renderer::{RenderSink, Renderer, TerminalSink};
