use eframe::egui;
use egui::{Align2, Color32, FontId, Id, LayerId, Order};

use crate::config::theme::ThemeConfig;

pub const OFFLINE_TEXT: &str = "No connection";

/// The loader's message is shown as-is after the prefix.
pub fn error_text(message: &str) -> String {
    format!("Error: {}", message)
}

fn show_centered(ctx: &egui::Context, id: &str, text: String, color: Color32, size: f32) {
    let screen = ctx.input().screen_rect();
    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new(id)));
    painter.text(screen.center(), Align2::CENTER_CENTER, text, FontId::proportional(size), color);
}

pub fn show_error_indicator(ctx: &egui::Context, message: &str, theme: &ThemeConfig) {
    show_centered(
        ctx,
        "pharaohs_error_indicator",
        error_text(message),
        theme.palette.error_text.color(),
        theme.indicator_text_size,
    );
}

pub fn show_offline_indicator(ctx: &egui::Context, theme: &ThemeConfig) {
    show_centered(
        ctx,
        "pharaohs_offline_indicator",
        OFFLINE_TEXT.to_string(),
        theme.palette.offline_text.color(),
        theme.indicator_text_size,
    );
}
