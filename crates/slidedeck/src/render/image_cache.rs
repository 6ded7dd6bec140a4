use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use eframe::egui;

use crate::resources::ResourcePaths;

/// Decoded slide images, keyed by the `source` written in the description.
///
/// Failures are cached too so a broken image is only reported once.
pub struct ImageCache {
    resources: ResourcePaths,
    textures: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
}

impl ImageCache {
    pub fn new(resources: ResourcePaths) -> Self {
        Self {
            resources,
            textures: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, ctx: &egui::Context, source: &str) -> Option<egui::TextureHandle> {
        if let Some(entry) = self.textures.borrow().get(source) {
            return entry.clone();
        }

        let loaded = match self.resources.resolve(source) {
            Some(path) => match load_color_image(&path) {
                Ok(image) => {
                    tracing::debug!(path = %path.display(), "loaded image");
                    Some(ctx.load_texture(source, image, egui::TextureOptions::LINEAR))
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to load image: {e:#}");
                    None
                }
            },
            None => {
                tracing::warn!(source, paths = ?self.resources.dirs(), "image not found in resource paths");
                None
            }
        };

        self.textures
            .borrow_mut()
            .insert(source.to_string(), loaded.clone());
        loaded
    }
}

fn load_color_image(path: &Path) -> anyhow::Result<egui::ColorImage> {
    let image = image::open(path)?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}
