//! Rendering
//!
//! The scene is drawn on the CPU into a fixed-size [`PixelCanvas`]; the
//! WebGPU present pass scales that up to the window.

pub mod canvas;
pub mod present;
pub mod scene;

pub use canvas::{PixelCanvas, Rgba};
pub use present::PresentState;
pub use scene::draw_frame;
