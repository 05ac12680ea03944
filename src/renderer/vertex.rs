//! Vertex types for scene rendering

use bytemuck::{Pod, Zeroable};

/// World-space vertex with position and colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    use crate::rgb_hex;

    pub const BACKGROUND: [f32; 4] = rgb_hex(0xb7c3f3);
    pub const AMBIENT: [f32; 4] = rgb_hex(0xffffff);
    pub const BACK_WALL: [f32; 4] = rgb_hex(0xe5a716);
    pub const SIDE_POST: [f32; 4] = rgb_hex(0xfbc851);
    pub const TIME_BAR: [f32; 4] = rgb_hex(0xfbc851);
    pub const PLAYER: [f32; 4] = rgb_hex(0xffffff);
}
