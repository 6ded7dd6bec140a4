pub mod keys;

use eframe::egui::Color32;

use crate::widget::WidgetNode;

pub use keys::Key;

#[derive(Debug, Clone, Default)]
pub struct Slide {
    pub title: String,
    /// Section slides are the stops for Up/Down jumps.
    pub is_section: bool,
    /// True while this slide is the one being shown.
    pub active: bool,
    pub background: Option<Color32>,
    pub content: Vec<WidgetNode>,
}

impl Slide {
    pub fn new(title: impl Into<String>, is_section: bool) -> Self {
        Self {
            title: title.into(),
            is_section,
            ..Default::default()
        }
    }
}

/// Which way the deck moved; the incoming slide enters from this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Emitted whenever the current index actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexChange {
    pub index: usize,
    /// `None` for the very first display.
    pub old_index: Option<usize>,
    pub direction: Direction,
}

/// Result of feeding a raw scan code to the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a navigation key; the host may handle it.
    Ignored,
    /// Consumed. Carries the change if the index moved.
    Handled(Option<IndexChange>),
}

#[derive(Debug, thiserror::Error)]
#[error("a deck needs at least one slide")]
pub struct EmptyDeckError;

#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
    index: usize,
    old_index: Option<usize>,
    elapsed: f64,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Result<Self, EmptyDeckError> {
        if slides.is_empty() {
            return Err(EmptyDeckError);
        }
        Ok(Self {
            slides,
            index: 0,
            old_index: None,
            elapsed: 0.0,
        })
    }

    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides; valid indices are `0..max_index()`.
    pub fn max_index(&self) -> usize {
        self.slides.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn old_index(&self) -> Option<usize> {
        self.old_index
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn current(&self) -> &Slide {
        &self.slides[self.index]
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    pub fn advance_time(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    /// Choose the slide shown by [`Deck::start`]. Clamped to the deck.
    pub fn set_start_index(&mut self, index: usize) {
        self.index = index.min(self.max_index() - 1);
    }

    /// Force the first display: an index change from "no slide" to the
    /// stored index, so the first paint runs the same path as navigation.
    pub fn start(&mut self) -> IndexChange {
        self.old_index = None;
        for slide in &mut self.slides {
            slide.active = false;
        }
        self.commit()
    }

    /// Title of the nearest section at or before the current slide.
    pub fn section_title(&self) -> Option<&str> {
        self.section_title_at(self.index)
    }

    pub fn section_title_at(&self, index: usize) -> Option<&str> {
        let end = index.min(self.max_index() - 1);
        self.slides[..=end]
            .iter()
            .rev()
            .find(|s| s.is_section)
            .map(|s| s.title.as_str())
    }

    pub fn handle_scancode(&mut self, scancode: u32) -> KeyOutcome {
        match Key::from_scancode(scancode) {
            Some(key) => KeyOutcome::Handled(self.handle_key(key)),
            None => KeyOutcome::Ignored,
        }
    }

    /// Apply one navigation key. Every key records the current index as the
    /// old index, even when the target turns out to be the same slide.
    pub fn handle_key(&mut self, key: Key) -> Option<IndexChange> {
        let last = self.max_index() - 1;
        let target = match key {
            Key::Down => self.next_section().unwrap_or(self.index),
            Key::Up => self.previous_section().unwrap_or(self.index),
            Key::Home => 0,
            Key::End => last,
            Key::Left => (self.index + 1).min(last),
            Key::Right => self.index.saturating_sub(1),
        };
        self.old_index = Some(self.index);
        if target == self.index {
            return None;
        }
        self.index = target;
        let change = self.commit();
        tracing::debug!(
            ?key,
            index = change.index,
            old_index = ?change.old_index,
            section = ?self.section_title(),
            "slide changed"
        );
        Some(change)
    }

    fn next_section(&self) -> Option<usize> {
        (self.index + 1..self.max_index()).find(|&i| self.slides[i].is_section)
    }

    fn previous_section(&self) -> Option<usize> {
        (0..self.index).rev().find(|&i| self.slides[i].is_section)
    }

    fn commit(&mut self) -> IndexChange {
        let direction = match self.old_index {
            Some(old) if self.index <= old => Direction::Backward,
            _ => Direction::Forward,
        };
        self.slides[self.index].active = true;
        if let Some(old) = self.old_index {
            self.slides[old].active = false;
        }
        IndexChange {
            index: self.index,
            old_index: self.old_index,
            direction,
        }
    }
}
