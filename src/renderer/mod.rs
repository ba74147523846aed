//! WebGPU rendering module
//!
//! Draws coloured rectangles; all text is overlaid by the page.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
