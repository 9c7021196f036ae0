//! The interleaved vertex format for the quad.

/**
 * One quad vertex as stored in GPU memory: 3 position floats followed by
 * 2 texture-coordinate floats, 20 bytes per vertex with no padding.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    /// Describes the buffer layout to the vertex stage.
    ///
    /// offset: zero as we want to use the full space.
    /// stride: length of one vertex (20 bytes).
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_20_bytes() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 20);
        assert_eq!(
            QuadVertex::desc().array_stride,
            std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress
        );
    }
}
