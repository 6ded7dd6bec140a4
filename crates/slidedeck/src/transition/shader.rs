//! The displacement program used to composite a container's buffer.
//!
//! Only the vertex stage does any work; it is the CPU equivalent of
//!
//! ```glsl
//! uniform float alpha;
//! uniform vec2  size;
//! void main (void) {
//!   vec2 p = vPosition.xy;
//!   p.x += alpha * size.x;
//!   gl_Position = projection_mat * modelview_mat * vec4(p, 0.0, 1.0);
//! }
//! ```
//!
//! applied to every vertex of the buffer's geometry. Pixels are never blended
//! by alpha; the geometry itself moves.

use eframe::egui::{Pos2, Vec2, emath::TSTransform};

/// Axis along which `alpha` displaces geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Horizontal,
    /// Slides move up when `alpha` grows.
    Vertical,
}

impl Axis {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    pub projection: TSTransform,
    pub modelview: TSTransform,
    pub alpha: f32,
    pub size: Vec2,
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self {
            projection: TSTransform::IDENTITY,
            modelview: TSTransform::IDENTITY,
            alpha: 0.0,
            size: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplacementShader {
    pub axis: Axis,
}

impl DisplacementShader {
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }

    fn displacement(&self, u: &ShaderUniforms) -> Vec2 {
        match self.axis {
            Axis::Horizontal => Vec2::new(u.alpha * u.size.x, 0.0),
            Axis::Vertical => Vec2::new(0.0, -u.alpha * u.size.y),
        }
    }

    /// Vertex stage for a single buffer-local position.
    pub fn vertex(&self, u: &ShaderUniforms, p: Pos2) -> Pos2 {
        let p = p + self.displacement(u);
        u.projection * (u.modelview * p)
    }

    /// The whole vertex stage folded into one transform, for applying to
    /// shapes in bulk.
    pub fn transform(&self, u: &ShaderUniforms) -> TSTransform {
        u.projection * u.modelview * TSTransform::from_translation(self.displacement(u))
    }
}
