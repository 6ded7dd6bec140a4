use eframe::egui::{Pos2, Rect, Vec2, emath::TSTransform};

use super::animation::{AnimatedValue, Timing};
use super::buffer::OffscreenBuffer;
use super::shader::{DisplacementShader, ShaderUniforms};
use super::FrameContext;
use crate::render::RenderTarget;

/// Hosts one slide: draws it into its own offscreen buffer and composites
/// that buffer through the displacement shader.
#[derive(Debug, Clone)]
pub struct TransitionContainer {
    rect: Rect,
    alpha: AnimatedValue,
    buffer: OffscreenBuffer,
    shader: DisplacementShader,
    uniforms: ShaderUniforms,
    child: Option<usize>,
}

impl TransitionContainer {
    pub fn new(shader: DisplacementShader) -> Self {
        Self {
            rect: Rect::NOTHING,
            alpha: AnimatedValue::new(0.0),
            buffer: OffscreenBuffer::default(),
            shader,
            uniforms: ShaderUniforms::default(),
            child: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Place the container on screen. The buffer follows the new size unless
    /// it is degenerate, in which case the last valid buffer stays.
    pub fn resize(&mut self, rect: Rect) {
        self.rect = rect;
        if !self.buffer.resize(rect.size()) {
            tracing::trace!(?rect, kept = ?self.buffer_size(), "ignoring degenerate container size");
        }
    }

    pub fn buffer(&self) -> &OffscreenBuffer {
        &self.buffer
    }

    pub fn buffer_size(&self) -> Vec2 {
        self.buffer.size()
    }

    pub fn child(&self) -> Option<usize> {
        self.child
    }

    pub fn clear(&mut self) {
        self.child = None;
        self.buffer.clear();
    }

    pub fn attach(&mut self, slide: usize) {
        self.child = Some(slide);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha.get()
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha.set(alpha);
    }

    pub fn animate_alpha(&mut self, target: f32, timing: Timing, now: f64) {
        self.alpha.animate_to(target, timing, now);
    }

    pub fn is_animating(&self) -> bool {
        self.alpha.is_animating()
    }

    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    /// Per-frame tick: advance the alpha animation and refresh every uniform
    /// from the frame context.
    pub fn update(&mut self, frame: &FrameContext) {
        let alpha = self.alpha.tick(frame.time);
        let origin = if self.rect.is_positive() {
            self.rect.min.to_vec2()
        } else {
            Vec2::ZERO
        };
        self.uniforms = ShaderUniforms {
            projection: frame.projection,
            modelview: frame.view * TSTransform::from_translation(origin),
            alpha,
            size: self.rect.size().max(Vec2::ZERO),
        };
    }

    /// Redraw the child into the offscreen buffer. `draw` receives the slide
    /// index and the buffer as its render target.
    pub fn render(&mut self, draw: impl FnOnce(usize, &mut OffscreenBuffer)) {
        self.buffer.clear();
        if let Some(child) = self.child {
            draw(child, &mut self.buffer);
        }
    }

    /// Where the buffer's quad lands on screen this frame.
    pub fn quad_rect(&self) -> Rect {
        let quad = Rect::from_min_size(Pos2::ZERO, self.buffer.size());
        self.shader.transform(&self.uniforms) * quad
    }

    /// Push the buffer's geometry, displaced by the shader, onto `target`.
    pub fn composite(&self, target: &mut dyn RenderTarget) {
        if self.child.is_none() {
            return;
        }
        let transform = self.shader.transform(self.uniforms());
        for shape in self.buffer.shapes() {
            let mut shape = shape.clone();
            shape.transform(transform);
            target.add(shape);
        }
    }
}
