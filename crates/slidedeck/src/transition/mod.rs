pub mod animation;
pub mod buffer;
pub mod container;
pub mod easing;
pub mod shader;
pub mod stage;

use eframe::egui::{Rect, emath::TSTransform};

pub use animation::Timing;
pub use easing::Easing;
pub use shader::{Axis, DisplacementShader};
pub use stage::Stage;

/// Everything a container needs from the window for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Seconds since the viewer started.
    pub time: f64,
    /// Logical points to screen.
    pub projection: TSTransform,
    /// World to logical points, shared by every container.
    pub view: TSTransform,
    pub screen: Rect,
}

impl FrameContext {
    pub fn new(time: f64, screen: Rect) -> Self {
        Self {
            time,
            projection: TSTransform::IDENTITY,
            view: TSTransform::IDENTITY,
            screen,
        }
    }
}
