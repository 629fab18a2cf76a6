//! Rendering module
//!
//! The compositor talks to a `DrawSurface`; `VertexSurface` turns those calls
//! into a triangle list that `RenderState` draws offscreen with wgpu.

pub mod compositor;
pub mod pipeline;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use compositor::{Compositor, DrawItem, DrawSurface, depth_order, draw_order};
pub use pipeline::{RenderState, screen_to_ndc, to_ndc};
pub use surface::VertexSurface;
pub use vertex::Vertex;
