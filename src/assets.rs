use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use eframe::egui;
use image::RgbaImage;
use log::{info, warn};

pub const LOGO: &str = "logo.png";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Brand images for the loading overlay, uploaded to egui once and cached.
///
/// Images that fail to load are remembered so the failure is logged once and
/// the overlay can fall back to its painted stand-ins.
pub struct BrandAssets {
    pub asset_dir: PathBuf,
    texture_cache: HashMap<String, egui::TextureHandle>,
    missing: HashSet<String>,
}

impl BrandAssets {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        let asset_dir = asset_dir.into();
        info!("Brand assets directory: {}", asset_dir.display());
        Self {
            asset_dir,
            texture_cache: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    /// Texture for `name` under the asset directory, or `None` if it could
    /// not be loaded.
    pub fn texture(&mut self, name: &str, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        if let Some(handle) = self.texture_cache.get(name) {
            return Some(handle.clone());
        }
        if self.missing.contains(name) {
            return None;
        }

        match load_image(&self.asset_dir.join(name)) {
            Ok(image) => {
                let handle = add_image_to_egui(ctx, &image, name);
                self.texture_cache.insert(name.to_string(), handle.clone());
                Some(handle)
            }
            Err(e) => {
                warn!("{}; painting a stand-in instead", e);
                self.missing.insert(name.to_string());
                None
            }
        }
    }

    pub fn is_missing(&self, name: &str) -> bool {
        self.missing.contains(name)
    }
}

fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })
}

fn add_image_to_egui(ctx: &egui::Context, image: &RgbaImage, name: &str) -> egui::TextureHandle {
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image.as_flat_samples();

    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());

    ctx.load_texture(name, color_image, Default::default())
}
