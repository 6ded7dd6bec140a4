use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

use crate::clock::FixedClock;
use crate::config::{Config, Settings};
use crate::deck::KeyOutcome;
use crate::deck::keys::scancode_for;
use crate::loader::{self, Presentation};
use crate::render::image_cache::ImageCache;
use crate::render::text::TextVars;
use crate::render::{self, DrawContext, REFERENCE_HEIGHT, RenderTarget, ScreenTarget};
use crate::theme::Theme;
use crate::transition::{DisplacementShader, FrameContext, Stage};
use crate::widget::WidgetNode;

/// What the shell does with a key the deck did not consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellAction {
    Quit,
    ToggleFullscreen,
    ToggleTheme,
}

fn shell_action(key: egui::Key) -> Option<ShellAction> {
    match key {
        egui::Key::Escape | egui::Key::Q => Some(ShellAction::Quit),
        egui::Key::F => Some(ShellAction::ToggleFullscreen),
        egui::Key::D => Some(ShellAction::ToggleTheme),
        _ => None,
    }
}

/// Split the window into the slide stage and the chrome band under it.
fn stage_rect(window: egui::Rect, chrome_height: f32) -> egui::Rect {
    let bottom = (window.max.y - chrome_height).max(window.min.y);
    egui::Rect::from_min_max(window.min, egui::pos2(window.max.x, bottom))
}

/// Font sizes scale with the slide area, not the whole window.
fn slide_scale(stage: egui::Rect) -> f32 {
    stage.height().max(1.0) / REFERENCE_HEIGHT
}

/// Theme precedence: the deck's own choice, then the user config, then dark.
fn pick_theme(deck: Option<&str>, config: Option<&str>) -> Theme {
    deck.or(config).map(Theme::from_name).unwrap_or_else(Theme::dark)
}

struct ViewerApp {
    presentation: Presentation,
    stage: Stage,
    images: ImageCache,
    theme: Theme,
    chrome_height: f32,
    clock: FixedClock,
    last_time: Option<f64>,
    started: bool,
    fullscreen: bool,
}

impl ViewerApp {
    fn new(presentation: Presentation, settings: &Settings, windowed: bool) -> Self {
        let theme = pick_theme(presentation.theme.as_deref(), settings.theme.as_deref());
        let images = ImageCache::new(presentation.resources.clone());
        Self {
            presentation,
            stage: Stage::new(DisplacementShader::new(settings.axis), settings.timing),
            images,
            theme,
            chrome_height: settings.chrome_height,
            clock: FixedClock::default(),
            last_time: None,
            started: false,
            fullscreen: !windowed,
        }
    }

    /// Advance the deck's elapsed time in fixed steps.
    fn tick(&mut self, now: f64) {
        let dt = self.last_time.map_or(0.0, |last| now - last);
        self.last_time = Some(now);
        let steps = self.clock.tick(dt);
        if steps > 0 {
            self.presentation
                .deck
                .advance_time(f64::from(steps) * self.clock.step());
        }
    }

    fn handle_keys(&mut self, keys: &[egui::Key], now: f64, commands: &mut Vec<egui::ViewportCommand>) {
        for &key in keys {
            if let Some(code) = scancode_for(key) {
                match self.presentation.deck.handle_scancode(code) {
                    KeyOutcome::Handled(Some(change)) => self.stage.apply(&change, now),
                    KeyOutcome::Handled(None) => {}
                    KeyOutcome::Ignored => tracing::trace!(code, "scan code ignored"),
                }
                continue;
            }
            match shell_action(key) {
                Some(ShellAction::Quit) => commands.push(egui::ViewportCommand::Close),
                Some(ShellAction::ToggleFullscreen) => {
                    self.fullscreen = !self.fullscreen;
                    commands.push(egui::ViewportCommand::Fullscreen(self.fullscreen));
                }
                Some(ShellAction::ToggleTheme) => {
                    self.theme = self.theme.toggled();
                    tracing::debug!(theme = %self.theme.name, "theme toggled");
                }
                None => {}
            }
        }
    }

    /// Background and foreground layers are laid out against the whole
    /// window, so they can reach into the chrome band.
    fn draw_decorations(
        &self,
        painter: &egui::Painter,
        layer: &[WidgetNode],
        window: egui::Rect,
        target: &mut dyn RenderTarget,
    ) {
        let vars = TextVars::from_deck(&self.presentation.deck);
        let cx = DrawContext {
            painter,
            theme: &self.theme,
            images: &self.images,
            vars: &vars,
            scale: slide_scale(stage_rect(window, self.chrome_height)),
        };
        render::draw_widgets(&cx, layer, window, target);
    }

    fn paint(&mut self, painter: &egui::Painter, window: egui::Rect) {
        let stage = stage_rect(window, self.chrome_height);
        let scale = slide_scale(stage);

        painter.rect_filled(window, 0.0, self.theme.chrome);
        painter.rect_filled(stage, 0.0, self.theme.background);

        let mut screen = ScreenTarget::new(painter.with_clip_rect(window));
        self.draw_decorations(painter, &self.presentation.background, window, &mut screen);

        let deck = &self.presentation.deck;
        let theme = &self.theme;
        let images = &self.images;
        self.stage.render(|index, buffer| {
            let Some(slide) = deck.slide(index) else {
                return;
            };
            let vars = TextVars::for_slide(deck, index);
            let cx = DrawContext {
                painter,
                theme,
                images,
                vars: &vars,
                scale,
            };
            render::draw_slide(&cx, slide, buffer);
        });

        for container in self.stage.containers() {
            let clip = container.quad_rect().intersect(stage);
            if clip.is_positive() {
                container.composite(&mut ScreenTarget::new(painter.with_clip_rect(clip)));
            }
        }

        self.draw_decorations(painter, &self.presentation.foreground, window, &mut screen);
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        if !self.started {
            let change = self.presentation.deck.start();
            self.stage.apply(&change, now);
            self.started = true;
        }
        self.tick(now);

        // Collected first: sending viewport commands inside ctx.input()
        // deadlocks.
        let keys: Vec<egui::Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key, pressed: true, ..
                    } => Some(*key),
                    _ => None,
                })
                .collect()
        });
        let mut commands = Vec::new();
        self.handle_keys(&keys, now, &mut commands);
        for command in commands {
            ctx.send_viewport_cmd(command);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.chrome).inner_margin(0.0))
            .show(ctx, |ui| {
                let window = ui.max_rect();
                self.stage.resize(stage_rect(window, self.chrome_height));
                self.stage.update(&FrameContext::new(now, window));
                self.paint(ui.painter(), window);
            });

        if self.stage.is_animating() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_secs_f64(self.clock.step()));
        }
    }
}

pub fn run(file: PathBuf, windowed: bool, start_slide: Option<usize>) -> anyhow::Result<()> {
    let mut presentation = loader::load(&file)?;
    let settings = Config::load_or_default().settings();
    let windowed = windowed || settings.windowed;

    if let Some(slide) = start_slide {
        presentation.deck.set_start_index(slide.saturating_sub(1));
    }

    let title = format!("slidedeck - {}", presentation.title);
    tracing::info!(
        slides = presentation.deck.max_index(),
        windowed,
        "starting viewer"
    );

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0 + settings.chrome_height])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(presentation, &settings, windowed)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
