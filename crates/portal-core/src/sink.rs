use crate::frame::AnimationState;
use crate::viewport::Viewport;

/// The rendering collaborator, as seen from the engine.
///
/// Implementations own every GPU object. The engine only ever hands over
/// plain numbers: a viewport when the surface changes, the particle
/// positions when they were touched, and the per-frame state to draw.
pub trait RenderSink {
    /// Apply the pixel ratio and physical size, then resize post-process targets.
    fn resize(&mut self, viewport: &Viewport);

    /// Replace the particle position buffer. Only called when it changed.
    fn upload_particles(&mut self, positions: &[[f32; 3]]);

    /// Draw one frame. An error drops this frame only.
    fn render(&mut self, state: &AnimationState) -> anyhow::Result<()>;
}
