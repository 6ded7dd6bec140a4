pub mod image_cache;
pub mod text;

use eframe::egui::{self, FontId, Rect, Shape};

use crate::deck::Slide;
use crate::theme::Theme;
use crate::widget::{self, ImageFit, WidgetKind, WidgetNode};

use image_cache::ImageCache;
use text::TextVars;

/// Font sizes are authored against a canvas of this height.
pub const REFERENCE_HEIGHT: f32 = 1080.0;

/// Somewhere to draw. Slides are drawn into a container's offscreen buffer;
/// decorations and composited buffers go to the screen.
pub trait RenderTarget {
    /// The drawable area in target coordinates.
    fn rect(&self) -> Rect;
    fn add(&mut self, shape: Shape);
}

/// The window, through an egui painter.
pub struct ScreenTarget {
    painter: egui::Painter,
}

impl ScreenTarget {
    pub fn new(painter: egui::Painter) -> Self {
        Self { painter }
    }
}

impl RenderTarget for ScreenTarget {
    fn rect(&self) -> Rect {
        self.painter.clip_rect()
    }

    fn add(&mut self, shape: Shape) {
        self.painter.add(shape);
    }
}

/// Shared inputs for drawing widgets. The painter is only used for text
/// layout and texture upload; shapes always go to the explicit target.
pub struct DrawContext<'a> {
    pub painter: &'a egui::Painter,
    pub theme: &'a Theme,
    pub images: &'a ImageCache,
    pub vars: &'a TextVars,
    pub scale: f32,
}

pub fn draw_slide(cx: &DrawContext<'_>, slide: &Slide, target: &mut dyn RenderTarget) {
    let rect = target.rect();
    if let Some(background) = slide.background {
        target.add(Shape::rect_filled(rect, 0.0, background));
    }
    draw_widgets(cx, &slide.content, rect, target);
}

pub fn draw_widgets(
    cx: &DrawContext<'_>,
    nodes: &[WidgetNode],
    parent: Rect,
    target: &mut dyn RenderTarget,
) {
    for node in nodes {
        draw_widget(cx, node, parent, target);
    }
}

fn draw_widget(cx: &DrawContext<'_>, node: &WidgetNode, parent: Rect, target: &mut dyn RenderTarget) {
    let rect = node.placement.resolve(parent);

    match &node.kind {
        WidgetKind::Group => {}
        WidgetKind::Rectangle(props) => {
            target.add(Shape::rect_filled(rect, props.radius * cx.scale, props.color));
        }
        WidgetKind::Label(props) => {
            let color = props.color.unwrap_or(cx.theme.foreground);
            let size = props.font_size * cx.scale;
            let font = if props.monospace {
                FontId::monospace(size)
            } else {
                FontId::proportional(size)
            };
            let content = text::expand(&props.text, cx.vars);
            let galley = cx
                .painter
                .layout(content.into_owned(), font, color, rect.width().max(1.0));
            let pos = widget::align_in(rect, galley.rect.size(), props.halign, props.valign);
            target.add(Shape::galley(pos, galley, color));
        }
        WidgetKind::Image(props) => {
            if let Some(texture) = cx.images.get(cx.painter.ctx(), &props.source) {
                let image_rect = match props.fit {
                    ImageFit::Fill => rect,
                    ImageFit::Contain => contain(texture.size_vec2(), rect),
                };
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                target.add(Shape::image(texture.id(), image_rect, uv, egui::Color32::WHITE));
            }
        }
    }

    draw_widgets(cx, &node.children, rect, target);
}

/// Largest rect with the image's aspect ratio that fits in `outer`, centered.
fn contain(image: egui::Vec2, outer: Rect) -> Rect {
    if image.x <= 0.0 || image.y <= 0.0 {
        return outer;
    }
    let scale = (outer.width() / image.x).min(outer.height() / image.y);
    Rect::from_center_size(outer.center(), image * scale)
}
