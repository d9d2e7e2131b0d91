use eframe::egui;
use egui::{Align2, Color32, FontId, Rect, Stroke, Vec2};

use crate::config::theme::ThemeConfig;

/// Surface that renders the loaded web content.
///
/// The real web view lives outside this crate; the entry screen only decides
/// how opaque it is.
pub trait ContentHost {
    fn show(&mut self, ui: &mut egui::Ui, opacity: f32);
}

/// Stand-in host: an empty page frame labelled with the content URL.
pub struct PlaceholderHost {
    pub url: String,
    page: Color32,
    accent: Color32,
}

impl PlaceholderHost {
    pub fn new(url: impl Into<String>, theme: &ThemeConfig) -> Self {
        let palette = &theme.palette;
        Self {
            url: url.into(),
            page: palette.track[1].color.color(),
            accent: palette.glyph.color.color(),
        }
    }
}

impl ContentHost for PlaceholderHost {
    fn show(&mut self, ui: &mut egui::Ui, opacity: f32) {
        let rect = ui.max_rect();
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, self.page.linear_multiply(opacity));

        let address_bar = Rect::from_min_size(rect.min + Vec2::new(16.0, 16.0), Vec2::new(rect.width() - 32.0, 28.0));
        painter.rect_stroke(address_bar, 6.0, Stroke::new(1.0, self.accent.linear_multiply(opacity)));
        painter.text(
            address_bar.left_center() + Vec2::new(10.0, 0.0),
            Align2::LEFT_CENTER,
            &self.url,
            FontId::monospace(14.0),
            self.accent.linear_multiply(opacity),
        );
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Pharaohs Legacy",
            FontId::proportional(32.0),
            self.accent.linear_multiply(opacity),
        );
    }
}
