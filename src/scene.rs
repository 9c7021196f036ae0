//! The renderable scene: one textured quad and its animation state.
//!
//! A [`Scene`] owns the quad's vertex buffer, the linked shader pipeline,
//! the diffuse texture and the per-frame animation state. Construction is
//! initialization: `Scene::new` either returns a scene that is ready to
//! render or an error, and dropping the scene releases every GPU resource
//! it acquired, including on failure partway through construction.

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::{
    camera::OPENGL_TO_WGPU_MATRIX,
    context::InitContext,
    data_structures::{texture::Texture, vertex::QuadVertex},
    error::SceneError,
    pipelines::QuadPipeline,
    resources,
};

pub const VERTEX_SHADER_ASSET: &str = "quad.vert.wgsl";
pub const FRAGMENT_SHADER_ASSET: &str = "quad.frag.wgsl";
pub const TEXTURE_ASSET: &str = "emoji.png";

/// Effective tile count derived from the requested one.
///
/// The request is floor-divided by 4, so 5 tiles collapse to 1 and
/// anything below 4 disables tiling entirely. That discards precision for
/// requests not divisible by 4, but it is the behaviour shipped with every
/// variant of this demo, so it is kept as-is for compatibility.
pub fn tiling_factor(requested: u32) -> u32 {
    requested / 4
}

/// The default geometry: a unit quad in the XY plane, centred at the
/// origin, in triangle-strip order.
///
/// With tiling enabled (n >= 1) the texture coordinates span 0..4n so the
/// image repeats across the surface; without it they span the plain 0..1
/// stretch.
pub fn quad_vertices(tiling: u32) -> [QuadVertex; 4] {
    let uv = if tiling >= 1 { (4 * tiling) as f32 } else { 1.0 };
    [
        QuadVertex {
            position: [-0.5, -0.5, 0.0],
            tex_coords: [0.0, 0.0],
        },
        QuadVertex {
            position: [0.5, -0.5, 0.0],
            tex_coords: [uv, 0.0],
        },
        QuadVertex {
            position: [-0.5, 0.5, 0.0],
            tex_coords: [0.0, uv],
        },
        QuadVertex {
            position: [0.5, 0.5, 0.0],
            tex_coords: [uv, uv],
        },
    ]
}

/// Per-frame animation state, owned by the scene and mutated only by
/// [`Scene::step`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AnimationState {
    /// Rotation angle in whole degrees, cyclic in [0, 360).
    pub t: u32,
    pub show_circle: bool,
}

impl AnimationState {
    fn reset() -> Self {
        Self {
            t: 0,
            show_circle: false,
        }
    }

    fn step(&mut self) {
        self.t = (self.t + 1) % 360;
    }
}

/// The uniform table as laid out in GPU memory, shared by both shader
/// stages. Field order matches the WGSL struct declaration.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    theta: f32,
    tiling_factor: f32,
    show_circle: u32,
    _padding: u32,
}

impl SceneUniform {
    fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            projection: Matrix4::identity().into(),
            view: Matrix4::identity().into(),
            theta: 0.0,
            tiling_factor: 0.0,
            show_circle: 0,
            _padding: 0,
        }
    }
}

/// One textured quad plus everything needed to draw it.
#[derive(Debug)]
pub struct Scene {
    pipeline: QuadPipeline,
    vertex_buffer: wgpu::Buffer,
    num_vertices: u32,
    uniforms: SceneUniform,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    #[allow(unused)]
    texture: Texture,
    texture_bind_group: wgpu::BindGroup,
    animation: AnimationState,
    tiling: u32,
}

impl Scene {
    /// Build the scene: compile and link the shaders, upload the quad
    /// geometry, load the texture and reset the animation state.
    ///
    /// `geometry_override` replaces the default quad when supplied;
    /// `tiling_request` is the raw CLI tile count (see [`tiling_factor`]).
    /// Any failure propagates as an error and releases whatever had been
    /// created up to that point.
    pub async fn new(
        init: &InitContext,
        geometry_override: Option<Vec<QuadVertex>>,
        tiling_request: u32,
    ) -> Result<Self, SceneError> {
        let tiling = tiling_factor(tiling_request);

        let vertex_source = resources::load_string(VERTEX_SHADER_ASSET).map_err(|source| {
            SceneError::ShaderSource {
                path: VERTEX_SHADER_ASSET.to_string(),
                source,
            }
        })?;
        let fragment_source = resources::load_string(FRAGMENT_SHADER_ASSET).map_err(|source| {
            SceneError::ShaderSource {
                path: FRAGMENT_SHADER_ASSET.to_string(),
                source,
            }
        })?;
        let pipeline =
            QuadPipeline::new(&init.device, init.format, &vertex_source, &fragment_source).await?;

        let vertices = match geometry_override {
            Some(vertices) => vertices,
            None => quad_vertices(tiling).to_vec(),
        };
        let num_vertices = vertices.len() as u32;
        let vertex_buffer = init
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let uniforms = SceneUniform::new();
        let uniform_buffer = init
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniforms]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = init.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("scene_uniform_bind_group"),
        });

        let texture = resources::load_texture(TEXTURE_ASSET, &init.device, &init.queue)?;
        let texture_bind_group = init.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &pipeline.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some("quad_texture_bind_group"),
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            num_vertices,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
            texture,
            texture_bind_group,
            animation: AnimationState::reset(),
            tiling,
        })
    }

    /// Record the quad draw into `render_pass`.
    ///
    /// Packs the current frame's matrices and animation state into the
    /// uniform buffer, binds program, uniforms and texture, and submits one
    /// 4-vertex triangle-strip draw.
    pub fn render(
        &mut self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        projection: Matrix4<f32>,
        view: Matrix4<f32>,
    ) {
        self.uniforms.projection = (OPENGL_TO_WGPU_MATRIX * projection).into();
        self.uniforms.view = view.into();
        self.uniforms.theta = (self.animation.t as f32).to_radians();
        self.uniforms.tiling_factor = self.tiling as f32;
        self.uniforms.show_circle = self.animation.show_circle as u32;
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniforms]));

        render_pass.set_pipeline(&self.pipeline.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.num_vertices, 0..1);
    }

    /// Advance the animation by one degree, wrapping at a full turn.
    ///
    /// The increment is per call, not per elapsed second; the fixed-step
    /// loop makes that equivalent to one degree per simulated frame.
    pub fn step(&mut self) {
        self.animation.step();
    }

    pub fn angle(&self) -> u32 {
        self.animation.t
    }

    pub fn tiling(&self) -> u32 {
        self.tiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiling_request_is_floor_divided_by_four() {
        assert_eq!(tiling_factor(4), 1);
        assert_eq!(tiling_factor(5), 1);
        assert_eq!(tiling_factor(7), 1);
        assert_eq!(tiling_factor(8), 2);
        // Small positive requests disable tiling entirely; kept as shipped.
        assert_eq!(tiling_factor(0), 0);
        assert_eq!(tiling_factor(3), 0);
    }

    #[test]
    fn default_quad_is_a_unit_strip_in_the_xy_plane() {
        let vertices = quad_vertices(0);
        assert_eq!(vertices.len(), 4);
        for v in &vertices {
            assert_eq!(v.position[2], 0.0);
            assert!(v.position[0].abs() == 0.5 && v.position[1].abs() == 0.5);
        }
    }

    #[test]
    fn texcoords_stretch_once_without_tiling() {
        let vertices = quad_vertices(0);
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(vertices[3].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn texcoords_span_four_n_with_tiling() {
        let vertices = quad_vertices(2);
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(vertices[1].tex_coords, [8.0, 0.0]);
        assert_eq!(vertices[3].tex_coords, [8.0, 8.0]);
    }

    #[test]
    fn uniform_table_matches_the_wgsl_layout() {
        // mat4x4 + mat4x4 + f32 + f32 + u32, padded to a 16-byte multiple.
        assert_eq!(std::mem::size_of::<SceneUniform>(), 144);
    }

    #[test]
    fn angle_wraps_after_a_full_turn() {
        let mut state = AnimationState::reset();
        for _ in 0..360 {
            state.step();
        }
        assert_eq!(state.t, 0);
        state.step();
        assert_eq!(state.t, 1);
    }

    #[test]
    fn reset_state_starts_at_zero_with_the_circle_hidden() {
        let state = AnimationState::reset();
        assert_eq!(state.t, 0);
        assert!(!state.show_circle);
    }
}
