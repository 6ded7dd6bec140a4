use eframe::egui::{Pos2, Rect, Shape, Vec2};

use crate::render::RenderTarget;

/// Offscreen render target: a retained display list in buffer-local
/// coordinates, `(0, 0)` to `size`.
#[derive(Debug, Clone, Default)]
pub struct OffscreenBuffer {
    size: Vec2,
    shapes: Vec<Shape>,
}

impl OffscreenBuffer {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            shapes: Vec::new(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Reallocate for a new size. Dimensions below one pixel are refused and
    /// the previous size is kept.
    pub fn resize(&mut self, size: Vec2) -> bool {
        if size.x < 1.0 || size.y < 1.0 {
            return false;
        }
        if size != self.size {
            self.size = size;
            self.shapes.clear();
        }
        true
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl RenderTarget for OffscreenBuffer {
    fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size)
    }

    fn add(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Color32;

    #[test]
    fn test_degenerate_resize_keeps_size() {
        let mut buffer = OffscreenBuffer::new(Vec2::new(640.0, 480.0));
        assert!(!buffer.resize(Vec2::new(0.0, 480.0)));
        assert!(!buffer.resize(Vec2::new(640.0, 0.0)));
        assert!(!buffer.resize(Vec2::new(-5.0, 10.0)));
        assert!(!buffer.resize(Vec2::new(0.5, 0.5)));
        assert_eq!(buffer.size(), Vec2::new(640.0, 480.0));
    }

    #[test]
    fn test_resize_drops_stale_content() {
        let mut buffer = OffscreenBuffer::new(Vec2::new(10.0, 10.0));
        buffer.add(Shape::rect_filled(buffer.rect(), 0.0, Color32::RED));
        assert!(buffer.resize(Vec2::new(10.0, 10.0)));
        assert_eq!(buffer.shapes().len(), 1);
        assert!(buffer.resize(Vec2::new(20.0, 10.0)));
        assert!(buffer.is_empty());
        assert_eq!(buffer.rect(), Rect::from_min_size(Pos2::ZERO, Vec2::new(20.0, 10.0)));
    }
}
