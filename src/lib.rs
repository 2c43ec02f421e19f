// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Screen-space post-processing for a deferred wgpu renderer.
//!
//! postfx chains fullscreen effect stages (supersampling resolve,
//! screen-space god rays, ray-marched volumetric clouds) over the lit scene
//! color, feeding each stage a per-frame snapshot of camera, settings and
//! G-buffer inputs.
//!
//! # Key entry points
//!
//! - [`postprocess::PostProcessPipeline`] - ordered stages, ping-pong
//!   targets, per-frame walk
//! - [`postprocess::ProgramRegistry`] - builds and caches programs by name
//!   and [`postprocess::ProgramParameters`]
//! - [`gpu::device::GraphicsDevice`] - the GPU context stages draw through,
//!   implemented for wgpu by [`gpu::wgpu_device::WgpuDevice`]
//! - [`light::LightManager`] - light slots and dirty-flag flushing
//! - [`settings::RenderSettings`] - TOML tunables (lighting, god rays,
//!   clouds, stage list)
//!
//! # Architecture
//!
//! Shaders are WGSL composed with naga_oil. Each program's uniform struct
//! and texture units are reflected from the naga module once, at configure
//! time; per-frame binds write into a CPU uniform block at those offsets and
//! the device uploads it before the draw. Programs refer to GPU objects by
//! arena handles, so a copied program shares its GPU program while keeping
//! its own uniform state.

pub mod camera;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod light;
pub mod postprocess;
pub mod settings;

pub use error::PostFxError;
