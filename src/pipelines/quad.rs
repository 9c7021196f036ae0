use std::borrow::Cow;

use crate::{
    data_structures::{texture::Texture, vertex::QuadVertex},
    error::{ShaderError, ShaderStage},
};

/// The linked quad program plus the bind group layouts it was built
/// against.
///
/// The GL notion of per-uniform locations does not exist in WGPU; the
/// whole uniform table lives in one buffer bound at group 0 and the
/// texture/sampler pair at group 1. A uniform the current shader revision
/// does not read is simply ignored, which keeps older and newer shader
/// sources interchangeable without any sentinel handling.
#[derive(Debug)]
pub struct QuadPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl QuadPipeline {
    /// Compile both shader stages and link them into a render pipeline.
    ///
    /// Each stage compiles independently; a failed stage reports its
    /// diagnostic and linking is never attempted. All fixed state lives
    /// here: 4-vertex triangle strip input, no culling, depth test on.
    pub async fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex_module = compile_stage(device, ShaderStage::Vertex, vertex_source).await?;
        let fragment_module = compile_stage(device, ShaderStage::Fragment, fragment_source).await?;

        let uniform_layout = uniform_layout(device);
        let texture_layout = texture_layout(device);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            cache: None,
            label: Some("Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState {
                        alpha: wgpu::BlendComponent::REPLACE,
                        color: wgpu::BlendComponent::REPLACE,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Both faces of the quad stay visible while it spins.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });
        match device.pop_error_scope().await {
            Some(error) => Err(ShaderError::Link {
                log: error.to_string(),
            }),
            None => Ok(Self {
                pipeline,
                uniform_layout,
                texture_layout,
            }),
        }
    }
}

/// Compile one WGSL stage, capturing the compiler diagnostic on failure.
///
/// The invalid module is dropped on the error path, so nothing stays
/// allocated for a failed attempt.
async fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let label = match stage {
        ShaderStage::Vertex => "Quad Vertex Shader",
        ShaderStage::Fragment => "Quad Fragment Shader",
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });
    match device.pop_error_scope().await {
        Some(error) => Err(ShaderError::Compile {
            stage,
            log: error.to_string(),
        }),
        None => Ok(module),
    }
}

/// Layout for the scene uniform buffer, visible to both stages so either
/// side of the program can pick up or drop individual fields across shader
/// revisions.
pub fn uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("scene_uniform_bind_group_layout"),
    })
}

/// Layout for the quad's diffuse texture and its sampler.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("quad_texture_bind_group_layout"),
    })
}
