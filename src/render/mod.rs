pub mod renderer;
pub mod story;

pub use renderer::{Renderer, Screen};
pub use story::story_lines;
