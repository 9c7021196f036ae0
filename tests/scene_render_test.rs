//! End-to-end tests that need a real GPU adapter. Run with
//! `cargo test --features integration-tests`.

#![cfg(feature = "integration-tests")]

use cgmath::{Matrix4, SquareMatrix};
use spinquad::context::InitContext;
use spinquad::data_structures::texture::Texture;
use spinquad::error::{ShaderError, ShaderStage, TextureError};
use spinquad::pipelines::QuadPipeline;
use spinquad::resources;
use spinquad::scene::{self, Scene};

fn headless_init() -> InitContext {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .expect("no GPU adapter available");
    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: None,
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: Default::default(),
        trace: wgpu::Trace::Off,
    }))
    .expect("failed to acquire a device");

    InitContext {
        device,
        queue,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
    }
}

fn offscreen_target(init: &InitContext, size: u32) -> (wgpu::TextureView, Texture) {
    let colour = init.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Test Target"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: init.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = colour.create_view(&wgpu::TextureViewDescriptor::default());
    let depth = Texture::create_depth_texture(&init.device, [size, size], "test_depth_texture");
    (view, depth)
}

#[test]
fn scene_initializes_and_draws_the_quad() {
    let init = headless_init();
    let mut scene = pollster::block_on(Scene::new(&init, None, 4)).expect("scene init failed");
    assert_eq!(scene.tiling(), 1);
    assert_eq!(scene.angle(), 0);

    let (colour_view, depth) = offscreen_target(&init, 64);

    // Any bad bind group, vertex layout or draw range would surface as a
    // validation error in this scope.
    init.device.push_error_scope(wgpu::ErrorFilter::Validation);

    let mut encoder = init
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Encoder"),
        });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Test Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &colour_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        scene.render(
            &init.queue,
            &mut render_pass,
            Matrix4::identity(),
            Matrix4::identity(),
        );
    }
    init.queue.submit(std::iter::once(encoder.finish()));

    let error = pollster::block_on(init.device.pop_error_scope());
    assert!(error.is_none(), "draw raised a validation error: {error:?}");

    scene.step();
    assert_eq!(scene.angle(), 1);
}

#[test]
fn missing_texture_is_an_error_not_a_crash() {
    let init = headless_init();
    let result = resources::load_texture("nonexistent.png", &init.device, &init.queue);
    assert!(matches!(result, Err(TextureError::Io { .. })));
}

#[test]
fn bad_vertex_source_reports_a_compile_diagnostic() {
    let init = headless_init();
    let fragment_source =
        resources::load_string(scene::FRAGMENT_SHADER_ASSET).expect("fragment asset");

    let result = pollster::block_on(QuadPipeline::new(
        &init.device,
        init.format,
        "this is not wgsl",
        &fragment_source,
    ));
    match result {
        Err(ShaderError::Compile { stage, log }) => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!log.is_empty());
        }
        other => panic!("expected a vertex compile error, got {other:?}"),
    }
}

#[test]
fn geometry_override_replaces_the_default_quad() {
    let init = headless_init();
    let triangle = scene::quad_vertices(0)[..3].to_vec();
    let scene = pollster::block_on(Scene::new(&init, Some(triangle), 0)).expect("scene init");
    assert_eq!(scene.tiling(), 0);
}
