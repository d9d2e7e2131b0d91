use std::fmt;
use std::path::{Path, PathBuf};

use eframe::egui::Color32;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{read_json, write_json, ConfigError, CONFIG_DIR};
use crate::ui::animation::{AnimationSpec, Easing};

const THEME_FILE: &str = "pharaohs_legacy_theme.json";

/// Parse `#RRGGBB` (leading `#` optional, hex digits in any case).
pub fn parse_hex_color(text: &str) -> Result<HexColor, ConfigError> {
    let digits = text.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(text.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| ConfigError::InvalidColor(text.to_string()))
    };
    Ok(HexColor {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// An opaque RGB color written as `#RRGGBB` in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn color(self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }

    pub fn with_opacity(self, opacity: f32) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_hex_color(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

fn full_opacity() -> f32 {
    1.0
}

/// A gradient stop: a color and the opacity it is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub color: HexColor,
    #[serde(default = "full_opacity")]
    pub opacity: f32,
}

impl Stop {
    pub const fn solid(color: HexColor) -> Self {
        Self { color, opacity: 1.0 }
    }

    pub const fn faded(color: HexColor, opacity: f32) -> Self {
        Self { color, opacity }
    }

    pub fn color32(&self) -> Color32 {
        self.color.with_opacity(self.opacity)
    }
}

pub fn gradient(stops: &[Stop]) -> Vec<Color32> {
    stops.iter().map(Stop::color32).collect()
}

const GOLD: HexColor = HexColor::rgb(0xFF, 0xD7, 0x00);
const BRONZE: HexColor = HexColor::rgb(0x8B, 0x73, 0x55);
const OLD_GOLD: HexColor = HexColor::rgb(0xD4, 0xAF, 0x37);
const UMBER: HexColor = HexColor::rgb(0x1A, 0x16, 0x11);
const BLACK: HexColor = HexColor::rgb(0x00, 0x00, 0x00);
const WHITE: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);

/// Colors of the Egyptian theme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub backdrop: HexColor,
    pub text: HexColor,
    pub panel: Stop,
    pub logo_shadow: Stop,
    pub track: Vec<Stop>,
    pub track_border: Vec<Stop>,
    pub track_shadow: Stop,
    pub fill: Vec<Stop>,
    pub fill_glow: Stop,
    pub fill_highlight: Stop,
    pub shimmer: HexColor,
    pub glyph: Stop,
    pub glyph_glow: Stop,
    pub gem_core: HexColor,
    pub gem_edge: HexColor,
    pub error_text: HexColor,
    pub offline_text: HexColor,
    pub fallback_sand: Vec<Stop>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            backdrop: BLACK,
            text: WHITE,
            panel: Stop::faded(BLACK, 0.22),
            logo_shadow: Stop::faded(BLACK, 0.25),
            track: vec![
                Stop::solid(UMBER),
                Stop::solid(HexColor::rgb(0x2D, 0x24, 0x18)),
                Stop::solid(UMBER),
            ],
            track_border: vec![
                Stop::faded(BRONZE, 0.6),
                Stop::faded(OLD_GOLD, 0.3),
                Stop::faded(BRONZE, 0.6),
            ],
            track_shadow: Stop::faded(BLACK, 0.4),
            fill: vec![
                Stop::solid(GOLD),
                Stop::solid(HexColor::rgb(0xFF, 0xA5, 0x00)),
                Stop::solid(HexColor::rgb(0xFF, 0x8C, 0x00)),
                Stop::solid(GOLD),
            ],
            fill_glow: Stop::faded(GOLD, 0.6),
            fill_highlight: Stop::faded(HexColor::rgb(0xFF, 0xFA, 0xCD), 0.8),
            shimmer: WHITE,
            glyph: Stop::faded(OLD_GOLD, 0.8),
            glyph_glow: Stop::faded(GOLD, 0.5),
            gem_core: HexColor::rgb(0x00, 0xCE, 0xD1),
            gem_edge: HexColor::rgb(0x00, 0x8B, 0x8B),
            error_text: HexColor::rgb(0xFF, 0x3B, 0x30),
            offline_text: HexColor::rgb(0x8E, 0x8E, 0x93),
            fallback_sand: vec![
                Stop::solid(HexColor::rgb(0x3B, 0x2A, 0x14)),
                Stop::solid(HexColor::rgb(0x8A, 0x6A, 0x3A)),
                Stop::solid(HexColor::rgb(0x3B, 0x2A, 0x14)),
            ],
        }
    }
}

/// Every visual constant of the entry screen and loading overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub palette: Palette,
    /// Opacity of the black layer over the background image.
    pub backdrop_dim: f32,
    pub logo_width_fraction: f32,
    pub logo_spacing: f32,
    pub logo_shadow_radius: f32,
    pub logo_shadow_offset_y: f32,
    pub logo_pulse: AnimationSpec,
    pub text_size: f32,
    pub text_spacing: f32,
    pub panel_padding: f32,
    pub panel_radius: f32,
    /// Space under the panel, as a fraction of the screen height.
    pub panel_bottom_fraction: f32,
    pub bar_width_fraction: f32,
    pub bar_height: f32,
    pub track_border_width: f32,
    pub fill_transition_secs: f32,
    pub fill_pulse: AnimationSpec,
    pub fill_glow_radius: f32,
    pub highlight_height_fraction: f32,
    pub highlight_raise_fraction: f32,
    pub shimmer: AnimationSpec,
    pub shimmer_width_fraction: f32,
    pub shimmer_height_fraction: f32,
    pub shimmer_opacity: f32,
    pub gem_glow: AnimationSpec,
    pub gem_slots: u32,
    pub gem_threshold: f64,
    pub gem_size_fraction: f32,
    pub glyph_size_fraction: f32,
    /// Opacity of the content host while loading has not finished.
    pub pending_host_opacity: f32,
    pub indicator_text_size: f32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            backdrop_dim: 0.45,
            logo_width_fraction: 0.38,
            logo_spacing: 36.0,
            logo_shadow_radius: 16.0,
            logo_shadow_offset_y: 8.0,
            logo_pulse: AnimationSpec::oscillate(0.82, 1.02, 1.1, Easing::EaseInOut),
            text_size: 24.0,
            text_spacing: 14.0,
            panel_padding: 14.0,
            panel_radius: 14.0,
            panel_bottom_fraction: 0.18,
            bar_width_fraction: 0.52,
            bar_height: 10.0,
            track_border_width: 2.0,
            fill_transition_secs: 0.3,
            fill_pulse: AnimationSpec::oscillate(1.0, 1.05, 1.5, Easing::EaseInOut),
            fill_glow_radius: 8.0,
            highlight_height_fraction: 0.4,
            highlight_raise_fraction: 0.15,
            shimmer: AnimationSpec::sweep(0.0, 1.5, 2.0, Easing::Linear),
            shimmer_width_fraction: 0.3,
            shimmer_height_fraction: 0.8,
            shimmer_opacity: 0.7,
            gem_glow: AnimationSpec::oscillate(0.5, 1.0, 1.0, Easing::EaseInOut),
            gem_slots: 5,
            gem_threshold: 0.1,
            gem_size_fraction: 0.2,
            glyph_size_fraction: 0.6,
            pending_host_opacity: 0.5,
            indicator_text_size: 18.0,
        }
    }
}

fn check_fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} is outside (0, 1]", value),
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} must be positive", value),
        })
    }
}

fn check_animation(field: &'static str, spec: &AnimationSpec) -> Result<(), ConfigError> {
    check_positive(field, spec.duration)?;
    if spec.from > spec.to {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("range {}..{} is inverted", spec.from, spec.to),
        });
    }
    Ok(())
}

fn check_gradient(field: &'static str, stops: &[Stop]) -> Result<(), ConfigError> {
    if stops.len() < 2 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "a gradient needs at least two stops".to_string(),
        });
    }
    if let Some(stop) = stops.iter().find(|s| !(0.0..=1.0).contains(&s.opacity)) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("opacity {} is outside [0, 1]", stop.opacity),
        });
    }
    Ok(())
}

impl ThemeConfig {
    pub fn default_path() -> PathBuf {
        CONFIG_DIR.join(THEME_FILE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("backdrop_dim", self.backdrop_dim)?;
        check_fraction("logo_width_fraction", self.logo_width_fraction)?;
        check_fraction("panel_bottom_fraction", self.panel_bottom_fraction)?;
        check_fraction("bar_width_fraction", self.bar_width_fraction)?;
        check_fraction("highlight_height_fraction", self.highlight_height_fraction)?;
        check_fraction("shimmer_width_fraction", self.shimmer_width_fraction)?;
        check_fraction("shimmer_height_fraction", self.shimmer_height_fraction)?;
        check_fraction("shimmer_opacity", self.shimmer_opacity)?;
        check_fraction("gem_size_fraction", self.gem_size_fraction)?;
        check_fraction("glyph_size_fraction", self.glyph_size_fraction)?;
        check_fraction("pending_host_opacity", self.pending_host_opacity)?;
        check_positive("bar_height", self.bar_height)?;
        check_positive("text_size", self.text_size)?;
        check_positive("fill_transition_secs", self.fill_transition_secs)?;
        check_animation("logo_pulse", &self.logo_pulse)?;
        check_animation("fill_pulse", &self.fill_pulse)?;
        check_animation("shimmer", &self.shimmer)?;
        check_animation("gem_glow", &self.gem_glow)?;
        check_gradient("palette.track", &self.palette.track)?;
        check_gradient("palette.track_border", &self.palette.track_border)?;
        check_gradient("palette.fill", &self.palette.fill)?;
        check_gradient("palette.fallback_sand", &self.palette.fallback_sand)?;
        if !(0.0..=1.0).contains(&self.gem_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "gem_threshold",
                reason: format!("{} is outside [0, 1]", self.gem_threshold),
            });
        }
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let theme: Self = read_json(path)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        write_json(path, self)
    }

    /// Load the theme from the config directory.
    pub fn load() -> Self {
        Self::load_or_seed(&Self::default_path())
    }

    /// A missing file is seeded with the defaults so there is something to
    /// edit; an unreadable or invalid one is logged and left alone.
    pub fn load_or_seed(path: &Path) -> Self {
        if !path.exists() {
            let theme = Self::default();
            match theme.save_to(path) {
                Ok(()) => info!("Wrote default theme to {}", path.display()),
                Err(e) => warn!("Could not write default theme: {}", e),
            }
            return theme;
        }
        match Self::load_from(path) {
            Ok(theme) => {
                info!("Loaded theme from {}", path.display());
                theme
            }
            Err(e) => {
                warn!("Ignoring theme file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
