//! spinquad
//!
//! A minimal real-time rendering demo: one textured quad, spun around the
//! z-axis and optionally tiled, drawn at a fixed simulation rate into a
//! vsync-throttled window. The crate exposes the small set of pieces the
//! demo binary wires together.
//!
//! High-level modules
//! - `camera`: projection/view matrix construction and viewport state
//! - `context`: central GPU and window context that owns device/queue/surface
//! - `data_structures`: GPU-side data models (vertices, textures)
//! - `error`: the error taxonomy for startup failures
//! - `flow`: the window event queue and fixed-timestep render loop
//! - `pipelines`: shader compilation/linking into the quad render pipeline
//! - `resources`: helpers to load shader sources and texture images
//! - `scene`: the quad itself: geometry, program, texture, animation state
//! - `time`: the fixed-timestep accumulator
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod resources;
pub mod scene;
pub mod time;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Matrix4, Point3, Vector3};
pub use winit::event::WindowEvent;
pub use winit::keyboard::KeyCode;
