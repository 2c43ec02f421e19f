//! GPU resource management and shader tooling.
//!
//! Provides the [`device::GraphicsDevice`] seam the post-process chain draws
//! through, its wgpu implementation, shader composition and reflection, and
//! CPU-side uniform staging.

/// The graphics-context trait and draw-call description.
pub mod device;
/// Shared wgpu boilerplate helpers for screen-space post-process pipelines.
pub mod pipeline_helpers;
/// Uniform and texture lookup by name from shader IR.
pub mod reflection;
/// wgpu device and queue initialization.
pub mod render_context;
/// Opaque resource handles and the arena backing them.
pub mod resources;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Embedded shader sources with an optional on-disk override.
pub mod shader_library;
/// Offscreen color target textures.
pub mod texture;
/// Per-frame dynamic-offset uniform buffer.
pub mod uniform_ring;
/// CPU-side uniform blocks and texture-unit tables.
pub mod uniforms;
/// wgpu implementation of the graphics context.
pub mod wgpu_device;
