//! WebGPU rendering module
//!
//! The scene is rebuilt into one world-space triangle list per frame and
//! drawn with a single unlit, depth-tested pipeline.

pub mod camera;
pub mod geometry;
pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use camera::Camera;
pub use geometry::Mesh;
pub use pipeline::RenderState;
pub use scene::{Scene, SceneObject};
pub use vertex::Vertex;
