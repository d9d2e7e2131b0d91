use eframe::egui;
use egui::{Align2, Color32, FontId, Id, LayerId, Order, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::assets::{BrandAssets, LOGO};
use crate::config::theme::{gradient, ThemeConfig};
use crate::ui::animation::Repeating;
use crate::ui::progress_bar::{clamp_progress, percentage, BarGeometry, ProgressBar};
use crate::ui::render::{fill_uv, gradient_rounded_rect, paint_glow, scale_about_center, GradientAxis};

/// Height over width of the painted stand-in mark.
const FALLBACK_LOGO_ASPECT: f32 = 0.8;
const LINE_HEIGHT: f32 = 1.2;

pub trait ProgressDisplayable {
    fn progress_percentage(&self) -> u32;
}

pub fn loading_label(progress: f64) -> String {
    format!("Loading {}%", percentage(progress))
}

/// Where each part of the overlay goes on a screen of a given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayout {
    /// Brand mark at rest; the pulse scales it about its center.
    pub logo: Rect,
    pub panel: Rect,
    pub text_center: Pos2,
    pub bar: Rect,
}

impl OverlayLayout {
    /// `logo_aspect` is the brand image's height over its width.
    pub fn compute(screen: Rect, logo_aspect: f32, theme: &ThemeConfig) -> Self {
        let width = screen.width();
        let height = screen.height();

        let logo_width = width * theme.logo_width_fraction;
        let logo_size = Vec2::new(logo_width, logo_width * logo_aspect);

        let text_height = theme.text_size * LINE_HEIGHT;
        let bar_size = Vec2::new(width * theme.bar_width_fraction, theme.bar_height);
        let panel_size = Vec2::new(
            bar_size.x + 2.0 * theme.panel_padding,
            text_height + theme.text_spacing + bar_size.y + 2.0 * theme.panel_padding,
        );

        let content_height = logo_size.y
            + theme.logo_spacing
            + panel_size.y
            + height * theme.panel_bottom_fraction;
        let top = screen.min.y + ((height - content_height) / 2.0).max(0.0);
        let center_x = screen.center().x;

        let logo = Rect::from_min_size(Pos2::new(center_x - logo_size.x / 2.0, top), logo_size);
        let panel = Rect::from_min_size(
            Pos2::new(center_x - panel_size.x / 2.0, logo.max.y + theme.logo_spacing),
            panel_size,
        );
        let text_center = Pos2::new(center_x, panel.min.y + theme.panel_padding + text_height / 2.0);
        let bar = Rect::from_min_size(
            Pos2::new(
                center_x - bar_size.x / 2.0,
                panel.min.y + theme.panel_padding + text_height + theme.text_spacing,
            ),
            bar_size,
        );

        Self {
            logo,
            panel,
            text_center,
            bar,
        }
    }
}

/// Full-screen loading overlay: dimmed backdrop, pulsing brand mark,
/// percentage text and the animated progress bar.
pub struct LoadingOverlay {
    progress: f64,
    logo_pulse: Repeating,
    bar: ProgressBar,
}

impl LoadingOverlay {
    pub fn mount(progress: f64, now: f64, theme: &ThemeConfig) -> Self {
        Self {
            progress: clamp_progress(progress),
            logo_pulse: theme.logo_pulse.start(now),
            bar: ProgressBar::mount(progress, now, theme),
        }
    }

    pub fn set_progress(&mut self, progress: f64, now: f64) {
        let progress = clamp_progress(progress);
        if progress != self.progress {
            self.progress = progress;
            self.bar.set_progress(progress, now);
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn label(&self) -> String {
        loading_label(self.progress)
    }

    pub fn logo_scale(&self, now: f64) -> f32 {
        self.logo_pulse.value_at(now)
    }

    /// Bar geometry for `track` at `now`, as painted by [`LoadingOverlay::show`].
    pub fn bar_geometry(&self, track: Rect, now: f64, theme: &ThemeConfig) -> BarGeometry {
        self.bar.geometry(track, self.progress, now, theme)
    }

    pub fn show(&self, ctx: &egui::Context, theme: &ThemeConfig, assets: &mut BrandAssets, now: f64) {
        let screen = ctx.input().screen_rect();
        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("pharaohs_progress_indicator")));
        let palette = &theme.palette;

        // The brand image doubles as the full-bleed backdrop.
        let logo_texture = assets.texture(LOGO, ctx);
        painter.rect_filled(screen, 0.0, palette.backdrop.color());
        match &logo_texture {
            Some(texture) => {
                let [w, h] = texture.size();
                let uv = fill_uv(Vec2::new(w as f32, h as f32), screen.size());
                painter.add(Shape::image(texture.id(), screen, uv, Color32::WHITE));
            }
            None => {
                painter.add(gradient_rounded_rect(
                    screen,
                    0.0,
                    &gradient(&palette.fallback_sand),
                    GradientAxis::Vertical,
                ));
            }
        }
        painter.rect_filled(screen, 0.0, Color32::BLACK.linear_multiply(theme.backdrop_dim));

        let logo_aspect = match &logo_texture {
            Some(texture) => {
                let [w, h] = texture.size();
                if w == 0 {
                    FALLBACK_LOGO_ASPECT
                } else {
                    h as f32 / w as f32
                }
            }
            None => FALLBACK_LOGO_ASPECT,
        };
        let layout = OverlayLayout::compute(screen, logo_aspect, theme);

        let scale = self.logo_scale(now);
        let logo = scale_about_center(layout.logo, scale, scale);
        paint_glow(
            &painter,
            logo.translate(Vec2::new(0.0, theme.logo_shadow_offset_y)),
            theme.logo_shadow_radius,
            palette.logo_shadow.color32(),
            theme.logo_shadow_radius,
        );
        match logo_texture {
            Some(texture) => {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.add(Shape::image(texture.id(), logo, uv, Color32::WHITE));
            }
            None => paint_pyramid(&painter, logo, theme),
        }

        painter.rect_filled(layout.panel, theme.panel_radius, palette.panel.color32());
        let font = FontId::proportional(theme.text_size);
        painter.text(
            layout.text_center + Vec2::new(0.0, 1.0),
            Align2::CENTER_CENTER,
            self.label(),
            font.clone(),
            Color32::from_black_alpha(120),
        );
        painter.text(
            layout.text_center,
            Align2::CENTER_CENTER,
            self.label(),
            font,
            palette.text.color(),
        );

        self.bar_geometry(layout.bar, now, theme).paint(&painter, theme);
    }
}

impl ProgressDisplayable for LoadingOverlay {
    fn progress_percentage(&self) -> u32 {
        percentage(self.progress)
    }
}

/// Stand-in brand mark: a two-tone golden pyramid.
fn paint_pyramid(painter: &Painter, rect: Rect, theme: &ThemeConfig) {
    let palette = &theme.palette;
    let apex = Pos2::new(rect.center().x, rect.min.y);
    let base_mid = Pos2::new(rect.center().x, rect.max.y);
    let lit = palette.fill.first().map(|s| s.color32()).unwrap_or(Color32::GOLD);
    let shaded = palette.glyph.color.color();
    painter.add(Shape::convex_polygon(
        vec![apex, base_mid, rect.left_bottom()],
        lit,
        Stroke::none(),
    ));
    painter.add(Shape::convex_polygon(
        vec![apex, rect.right_bottom(), base_mid],
        shaded,
        Stroke::none(),
    ));
}
