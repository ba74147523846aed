//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.69, 0.886, 1.0, 1.0]; // #B0E2FF
    pub const BODY: [f32; 4] = [1.0, 0.855, 0.2, 1.0]; // #FFDA33
    pub const BODY_BORDER: [f32; 4] = [0.776, 0.651, 0.0, 1.0]; // #C6A600
    pub const OBSTACLE: [f32; 4] = [0.133, 0.545, 0.133, 1.0]; // #228B22
    pub const OBSTACLE_BORDER: [f32; 4] = [0.11, 0.455, 0.11, 1.0]; // #1C741C
    pub const BUTTON_GO: [f32; 4] = [0.298, 0.686, 0.314, 1.0]; // #4CAF50
    pub const BUTTON_CAUTION: [f32; 4] = [1.0, 0.757, 0.027, 1.0]; // #FFC107
    pub const BUTTON_DANGER: [f32; 4] = [0.957, 0.263, 0.212, 1.0]; // #F44336
    pub const BUTTON_NEUTRAL: [f32; 4] = [0.38, 0.49, 0.545, 1.0];
    pub const BUTTON_SELECTED: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const INPUT_BOX: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const SCRIM: [f32; 4] = [0.0, 0.0, 0.0, 0.25];
}
