pub mod canvas;
pub mod stroke_collection;

pub use canvas::Canvas;
