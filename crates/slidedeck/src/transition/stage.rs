use eframe::egui::Rect;

use super::animation::Timing;
use super::buffer::OffscreenBuffer;
use super::container::TransitionContainer;
use super::shader::DisplacementShader;
use super::FrameContext;
use crate::deck::IndexChange;

/// The pair of containers the deck transitions between.
///
/// `current` hosts the incoming slide and is drawn on top; `previous` hosts
/// the outgoing one.
#[derive(Debug, Clone)]
pub struct Stage {
    current: TransitionContainer,
    previous: TransitionContainer,
    timing: Timing,
}

impl Stage {
    pub fn new(shader: DisplacementShader, timing: Timing) -> Self {
        Self {
            current: TransitionContainer::new(shader),
            previous: TransitionContainer::new(shader),
            timing,
        }
    }

    pub fn current(&self) -> &TransitionContainer {
        &self.current
    }

    pub fn previous(&self) -> &TransitionContainer {
        &self.previous
    }

    /// Containers in paint order.
    pub fn containers(&self) -> [&TransitionContainer; 2] {
        [&self.previous, &self.current]
    }

    pub fn resize(&mut self, rect: Rect) {
        self.current.resize(rect);
        self.previous.resize(rect);
    }

    /// Start the push transition for an index change: the new slide slides
    /// in from the direction of travel while the old one slides out the
    /// opposite way.
    pub fn apply(&mut self, change: &IndexChange, now: f64) {
        let d = change.direction.sign();

        self.current.clear();
        self.current.attach(change.index);
        self.current.set_alpha(d);
        self.current.animate_alpha(0.0, self.timing, now);

        if let Some(old) = change.old_index {
            self.previous.clear();
            self.previous.attach(old);
            self.previous.set_alpha(0.0);
            self.previous.animate_alpha(-d, self.timing, now);
        }

        tracing::debug!(
            index = change.index,
            old_index = ?change.old_index,
            direction = d,
            duration = self.timing.duration,
            "transition started"
        );
    }

    pub fn update(&mut self, frame: &FrameContext) {
        self.current.update(frame);
        self.previous.update(frame);
    }

    /// Redraw both offscreen buffers.
    pub fn render(&mut self, mut draw: impl FnMut(usize, &mut OffscreenBuffer)) {
        self.previous.render(&mut draw);
        self.current.render(&mut draw);
    }

    pub fn is_animating(&self) -> bool {
        self.current.is_animating() || self.previous.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Direction;
    use eframe::egui::{Pos2, Vec2};

    fn stage() -> Stage {
        let mut stage = Stage::new(DisplacementShader::default(), Timing::default());
        stage.resize(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)));
        stage
    }

    fn frame(time: f64) -> FrameContext {
        FrameContext::new(time, Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 635.0)))
    }

    #[test]
    fn test_first_display_fills_only_current() {
        let mut stage = stage();
        stage.apply(
            &IndexChange {
                index: 0,
                old_index: None,
                direction: Direction::Forward,
            },
            0.0,
        );
        assert_eq!(stage.current().child(), Some(0));
        assert_eq!(stage.current().alpha(), 1.0);
        assert_eq!(stage.previous().child(), None);

        stage.update(&frame(0.3));
        assert_eq!(stage.current().alpha(), 0.0);
        assert!(!stage.is_animating());
    }

    #[test]
    fn test_forward_push() {
        let mut stage = stage();
        stage.apply(
            &IndexChange {
                index: 2,
                old_index: Some(1),
                direction: Direction::Forward,
            },
            5.0,
        );
        assert_eq!(stage.current().child(), Some(2));
        assert_eq!(stage.previous().child(), Some(1));
        assert_eq!(stage.current().alpha(), 1.0);
        assert_eq!(stage.previous().alpha(), 0.0);

        stage.update(&frame(5.15));
        let incoming = stage.current().alpha();
        let outgoing = stage.previous().alpha();
        assert!(incoming > 0.0 && incoming < 1.0);
        assert!(outgoing < 0.0 && outgoing > -1.0);
        // Both follow the same curve, so they stay one width apart.
        assert!((incoming - outgoing - 1.0).abs() < 1e-5);

        stage.update(&frame(5.5));
        assert_eq!(stage.current().alpha(), 0.0);
        assert_eq!(stage.previous().alpha(), -1.0);
    }

    #[test]
    fn test_backward_push() {
        let mut stage = stage();
        stage.apply(
            &IndexChange {
                index: 0,
                old_index: Some(3),
                direction: Direction::Backward,
            },
            0.0,
        );
        assert_eq!(stage.current().alpha(), -1.0);
        stage.update(&frame(1.0));
        assert_eq!(stage.current().alpha(), 0.0);
        assert_eq!(stage.previous().alpha(), 1.0);
    }

    #[test]
    fn test_new_change_supersedes_running_transition() {
        let mut stage = stage();
        stage.apply(
            &IndexChange {
                index: 1,
                old_index: Some(0),
                direction: Direction::Forward,
            },
            0.0,
        );
        stage.update(&frame(0.1));
        stage.apply(
            &IndexChange {
                index: 2,
                old_index: Some(1),
                direction: Direction::Forward,
            },
            0.1,
        );
        assert_eq!(stage.current().child(), Some(2));
        assert_eq!(stage.previous().child(), Some(1));
        assert_eq!(stage.previous().alpha(), 0.0);
        stage.update(&frame(0.4));
        assert_eq!(stage.previous().alpha(), -1.0);
    }

    #[test]
    fn test_render_visits_both_children() {
        let mut stage = stage();
        stage.apply(
            &IndexChange {
                index: 4,
                old_index: Some(2),
                direction: Direction::Forward,
            },
            0.0,
        );
        let mut seen = Vec::new();
        stage.render(|index, _| seen.push(index));
        assert_eq!(seen, vec![2, 4]);
    }
}
