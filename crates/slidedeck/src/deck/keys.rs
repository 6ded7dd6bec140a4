//! Navigation keys and the scan codes that produce them.
//!
//! The codes are the SDL 1.x key symbols (`SDLK_UP` = 273 and so on). The
//! navigation semantics were historically attached to them under different
//! names than the physical keys, so the variants below are named after the
//! handler, not the key cap: [`Key::Left`] is produced by the Right arrow and
//! advances one slide.

use eframe::egui;

pub const SCANCODE_DOWN: u32 = 273;
pub const SCANCODE_UP: u32 = 274;
pub const SCANCODE_LEFT: u32 = 275;
pub const SCANCODE_RIGHT: u32 = 276;
pub const SCANCODE_HOME: u32 = 278;
pub const SCANCODE_END: u32 = 279;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Jump to the next section slide.
    Down,
    /// Jump to the previous section slide.
    Up,
    Home,
    End,
    /// Next slide.
    Left,
    /// Previous slide.
    Right,
}

impl Key {
    pub const ALL: [Key; 6] = [
        Key::Down,
        Key::Up,
        Key::Home,
        Key::End,
        Key::Left,
        Key::Right,
    ];

    pub fn from_scancode(code: u32) -> Option<Self> {
        match code {
            SCANCODE_DOWN => Some(Self::Down),
            SCANCODE_UP => Some(Self::Up),
            SCANCODE_HOME => Some(Self::Home),
            SCANCODE_END => Some(Self::End),
            SCANCODE_LEFT => Some(Self::Left),
            SCANCODE_RIGHT => Some(Self::Right),
            _ => None,
        }
    }
}

/// Map a physical egui key to the scan code the deck understands.
pub fn scancode_for(key: egui::Key) -> Option<u32> {
    match key {
        egui::Key::ArrowUp => Some(SCANCODE_DOWN),
        egui::Key::ArrowDown => Some(SCANCODE_UP),
        egui::Key::ArrowRight | egui::Key::PageDown | egui::Key::Space => Some(SCANCODE_LEFT),
        egui::Key::ArrowLeft | egui::Key::PageUp | egui::Key::Backspace => Some(SCANCODE_RIGHT),
        egui::Key::Home => Some(SCANCODE_HOME),
        egui::Key::End => Some(SCANCODE_END),
        _ => None,
    }
}
