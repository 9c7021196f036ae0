//! Application event loop and frame pacing.
//!
//! The window layer delivers input through winit callbacks, but callbacks
//! never mutate render state directly: each one is translated into an
//! [`InputEvent`] and queued. The queue is drained exactly once at the top
//! of every frame, so state transitions happen in a known order and the
//! loop logic stays testable without a window.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window, GPU context and scene (or records the
//!    startup error and exits before the loop runs a single frame)
//! 2. each `RedrawRequested`: drain queued events, observe the close flag,
//!    then consume whole fixed-timestep slices, one render+step per slice
//! 3. `exiting` tears the context down; teardown is idempotent

use std::{collections::VecDeque, iter, sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    context::Context, data_structures::texture::Texture, error::ContextError, scene::Scene,
    time::FixedTimestep,
};

/// Startup configuration for the demo window.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub target_fps: u32,
    /// Raw tile count as requested on the command line.
    pub tiling_request: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "spinquad".to_string(),
            target_fps: 60,
            tiling_request: 4,
        }
    }
}

/// Window/input events after translation out of the windowing layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum InputEvent {
    Resize { width: u32, height: u32 },
    KeyPress(KeyCode),
    CloseRequested,
}

/// Application state bundle: GPU context, scene and surface status.
#[derive(Debug)]
pub(crate) struct AppState {
    pub(crate) ctx: Context,
    scene: Scene,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, tiling_request: u32) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let scene = Scene::new(&(&ctx).into(), None, tiling_request).await?;
        Ok(Self {
            ctx,
            scene,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        // The projection applies its own zero-height guard; the surface
        // itself cannot be configured with a degenerate size.
        self.ctx.projection.resize(width, height);
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture =
                Texture::create_depth_texture(&self.ctx.device, [width, height], "depth_texture");
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // The viewport state is re-read every frame, so a resize
            // applied from the queue takes effect immediately.
            let projection = self.ctx.projection.matrix();
            let view_matrix = self.ctx.camera.matrix();
            self.scene
                .render(&self.ctx.queue, &mut render_pass, projection, view_matrix);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// The demo application driven by winit.
pub struct App {
    config: RunConfig,
    state: Option<AppState>,
    events: VecDeque<InputEvent>,
    timestep: FixedTimestep,
    close_requested: bool,
    init_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: RunConfig) -> Self {
        let timestep = FixedTimestep::new(config.target_fps);
        Self {
            config,
            state: None,
            events: VecDeque::new(),
            timestep,
            close_requested: false,
            init_error: None,
        }
    }

    fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.events.pop_front() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::CloseRequested => self.close_requested = true,
            InputEvent::KeyPress(KeyCode::Escape) => {
                log::info!("escape pressed, closing window");
                self.close_requested = true;
            }
            InputEvent::KeyPress(code) => {
                // Observed only; extension point for input-driven behaviour.
                log::info!("key {code:?} pressed");
            }
            InputEvent::Resize { width, height } => {
                if let Some(state) = &mut self.state {
                    state.resize(width, height);
                }
            }
        }
    }

    /// One loop iteration: drain events, honour the close flag, then run
    /// as many fixed-timestep slices as the wall clock owes us.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.drain_events();
        if self.close_requested {
            event_loop.exit();
            return;
        }
        let Some(state) = &mut self.state else {
            return;
        };

        // Keep the redraw cycle going; presentation is vsync-throttled.
        state.ctx.window.request_redraw();
        if !state.is_surface_configured {
            return;
        }

        let steps = self.timestep.consume(Instant::now());
        for _ in 0..steps {
            match state.render() {
                Ok(()) => state.scene.step(),
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => log::error!("unable to render: {e}"),
            }
        }
    }

    /// Release the window and GPU context. Safe to call more than once;
    /// only the first call has an effect.
    pub fn teardown(&mut self) {
        if self.state.take().is_some() {
            log::info!("window and GPU context released");
        }
    }

    #[cfg(test)]
    fn close_requested(&self) -> bool {
        self.close_requested
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                let error = ContextError::SurfaceCreation(e.to_string());
                log::error!("{error}");
                self.init_error = Some(error.into());
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(AppState::new(window, self.config.tiling_request)) {
            Ok(state) => {
                // Seed the redraw cycle; `frame` keeps it going from here.
                state.ctx.window.request_redraw();
                self.state = Some(state);
                // Initialization took a while; don't count it as backlog.
                self.timestep.reset(Instant::now());
            }
            Err(error) => {
                log::error!("initialization failed: {error:#}");
                self.init_error = Some(error);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.push_event(InputEvent::CloseRequested),
            WindowEvent::Resized(size) => self.push_event(InputEvent::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.push_event(InputEvent::KeyPress(code)),
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Open the window and run the demo until it is closed.
///
/// Startup failures (surface, context, shaders, texture) are logged and
/// returned without the render loop ever starting.
pub fn run(config: RunConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(RunConfig::default())
    }

    #[test]
    fn close_request_raises_the_close_flag() {
        let mut app = app();
        app.push_event(InputEvent::CloseRequested);
        app.drain_events();
        assert!(app.close_requested());
    }

    #[test]
    fn escape_press_requests_closure() {
        let mut app = app();
        app.push_event(InputEvent::KeyPress(KeyCode::Escape));
        app.drain_events();
        assert!(app.close_requested());
    }

    #[test]
    fn other_keys_are_observed_but_ignored() {
        let mut app = app();
        app.push_event(InputEvent::KeyPress(KeyCode::KeyW));
        app.push_event(InputEvent::KeyPress(KeyCode::Space));
        app.drain_events();
        assert!(!app.close_requested());
    }

    #[test]
    fn events_queue_until_drained() {
        let mut app = app();
        app.push_event(InputEvent::CloseRequested);
        assert!(!app.close_requested());
        app.drain_events();
        assert!(app.close_requested());
        assert!(app.events.is_empty());
    }

    #[test]
    fn resize_before_initialization_is_ignored() {
        let mut app = app();
        app.push_event(InputEvent::Resize {
            width: 640,
            height: 480,
        });
        app.drain_events();
        assert!(app.state.is_none());
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut app = app();
        app.teardown();
        app.teardown();
        assert!(app.state.is_none());
    }
}
