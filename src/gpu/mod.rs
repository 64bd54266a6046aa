//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, render-target allocation,
//! screen-space pipeline helpers, and shader composition.

/// Shared wgpu boilerplate helpers for screen-space post-process pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Render-target textures (frame buffers) of a given size and format.
pub mod texture;
