//! GPU rendering: lens math, WGSL pipeline, and the render loop.

pub mod lens;
pub mod render_loop;
pub mod session;
pub mod shader;

pub use render_loop::RenderLoop;
pub use session::GpuSession;
