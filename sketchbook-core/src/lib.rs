pub mod bitmap;
pub mod color;
pub mod commands;
pub mod filter;
pub mod fit;
pub mod geom;
pub mod history;
pub mod id;
pub mod input;
pub mod render;
pub mod state;
pub mod stroke;

pub use id::SketchID;
