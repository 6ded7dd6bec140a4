use eframe::egui::{self, Color32, Pos2, Rect, Vec2};
use serde::Deserialize;

/// A node of a slide's content tree, produced by the loader.
#[derive(Debug, Clone)]
pub struct WidgetNode {
    pub kind: WidgetKind,
    pub placement: Placement,
    pub children: Vec<WidgetNode>,
}

#[derive(Debug, Clone)]
pub enum WidgetKind {
    /// `FloatLayout`: only positions its children.
    Group,
    Label(LabelProps),
    Image(ImageProps),
    Rectangle(RectangleProps),
}

impl WidgetNode {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            placement: Placement::default(),
            children: Vec::new(),
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_children(mut self, children: Vec<WidgetNode>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LabelProps {
    pub text: String,
    /// Authored for a 1080px-high canvas, scaled at draw time.
    pub font_size: f32,
    /// `None` falls back to the theme foreground.
    pub color: Option<Color32>,
    pub halign: HAlign,
    pub valign: VAlign,
    pub monospace: bool,
}

impl Default for LabelProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 32.0,
            color: None,
            halign: HAlign::Left,
            valign: VAlign::Top,
            monospace: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageProps {
    pub source: String,
    pub fit: ImageFit,
}

#[derive(Debug, Clone)]
pub struct RectangleProps {
    pub color: Color32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Contain,
    Fill,
}

/// Position of the node's top-left corner, as fractions of the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosHint {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// Where a widget sits inside its parent rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos_hint: PosHint,
    pub size_hint: [f32; 2],
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            pos_hint: PosHint::default(),
            size_hint: [1.0, 1.0],
        }
    }
}

impl Placement {
    pub fn resolve(&self, parent: Rect) -> Rect {
        let min = Pos2::new(
            parent.left() + self.pos_hint.x * parent.width(),
            parent.top() + self.pos_hint.y * parent.height(),
        );
        let size = Vec2::new(
            self.size_hint[0] * parent.width(),
            self.size_hint[1] * parent.height(),
        );
        Rect::from_min_size(min, size)
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(s: &str) -> Option<Color32> {
    let hex = s.strip_prefix('#')?;
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    match digits.as_slice() {
        [r, g, b] => Some(Color32::from_rgb(r * 17, g * 17, b * 17)),
        [r1, r0, g1, g0, b1, b0] => Some(Color32::from_rgb(
            r1 * 16 + r0,
            g1 * 16 + g0,
            b1 * 16 + b0,
        )),
        [r1, r0, g1, g0, b1, b0, a1, a0] => Some(Color32::from_rgba_unmultiplied(
            r1 * 16 + r0,
            g1 * 16 + g0,
            b1 * 16 + b0,
            a1 * 16 + a0,
        )),
        _ => None,
    }
}

/// Color components in `0.0..=1.0`, alpha optional.
pub fn color_from_components(c: &[f32]) -> Option<Color32> {
    if !(3..=4).contains(&c.len()) || c.iter().any(|v| !(0.0..=1.0).contains(v)) {
        return None;
    }
    let to_u8 = |v: f32| (v * 255.0).round() as u8;
    let a = c.get(3).copied().unwrap_or(1.0);
    Some(Color32::from_rgba_unmultiplied(
        to_u8(c[0]),
        to_u8(c[1]),
        to_u8(c[2]),
        to_u8(a),
    ))
}

/// Offset of a `size` box aligned inside `outer`.
pub fn align_in(outer: Rect, size: Vec2, halign: HAlign, valign: VAlign) -> Pos2 {
    let x = match halign {
        HAlign::Left => outer.left(),
        HAlign::Center => outer.center().x - size.x / 2.0,
        HAlign::Right => outer.right() - size.x,
    };
    let y = match valign {
        VAlign::Top => outer.top(),
        VAlign::Middle => outer.center().y - size.y / 2.0,
        VAlign::Bottom => outer.bottom() - size.y,
    };
    egui::pos2(x, y)
}
