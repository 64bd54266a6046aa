//! Shared trait for the effect's fullscreen passes.

/// Uniform interface for fullscreen passes that render into a caller-chosen
/// target.
///
/// Input texture views are bound at construction and refreshed through
/// pass-specific `rebind` methods after a resize.
pub trait ScreenPass {
    /// Encode GPU commands for this pass, writing into `target`.
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    );
}
