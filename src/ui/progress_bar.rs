//! Animated Egyptian-themed progress bar.
//!
//! Geometry is computed by [`BarGeometry::compute`] from the progress value and
//! the current animation phases; painting only reads that geometry. The fill
//! width follows the progress through a short ease-in-out transition, while the
//! pulse, shimmer and gem glow run from mount until the bar is dropped.

use eframe::egui;
use egui::{Color32, Painter, Pos2, Rect, Vec2};

use crate::config::theme::{gradient, ThemeConfig};
use crate::ui::animation::{Repeating, Transition};
use crate::ui::render::{
    gradient_rounded_rect, gradient_stroke, paint_diamond, paint_glow, radial_gradient_circle,
    scale_about_center, GradientAxis,
};

/// Clamp to `[0, 1]`; NaN counts as no progress.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Integer percentage shown to the user, `floor(progress * 100)`.
pub fn percentage(progress: f64) -> u32 {
    (clamp_progress(progress) * 100.0).floor() as u32
}

pub fn fill_width(progress: f64, track_width: f32) -> f32 {
    clamp_progress(progress) as f32 * track_width
}

/// Number of gem markers, `floor(progress * slots)`.
pub fn gem_count(progress: f64, slots: u32) -> u32 {
    (clamp_progress(progress) * slots as f64).floor() as u32
}

pub fn gems_visible(progress: f64, threshold: f64) -> bool {
    clamp_progress(progress) > threshold
}

/// Phase values of the self-driven animations at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarPhases {
    /// Vertical scale of the fill.
    pub pulse: f32,
    /// Shimmer offset as a multiple of the fill width.
    pub shimmer: f32,
    /// Gem opacity and scale.
    pub gem_glow: f32,
}

impl BarPhases {
    /// Phases at mount time.
    pub fn at_rest(theme: &ThemeConfig) -> Self {
        Self {
            pulse: theme.fill_pulse.from,
            shimmer: theme.shimmer.from,
            gem_glow: theme.gem_glow.from,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gem {
    pub center: Pos2,
    pub radius: f32,
    pub glow: f32,
}

/// Everything the painter needs for one frame of the bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    pub track: Rect,
    /// Unscaled fill; the painted fill is this rect scaled by the pulse.
    pub fill: Rect,
    pub pulse: f32,
    pub shimmer: Option<Rect>,
    pub gems: Vec<Gem>,
    pub glyphs: [Pos2; 2],
    pub glyph_size: f32,
}

impl BarGeometry {
    pub fn compute(track: Rect, progress: f64, phases: BarPhases, theme: &ThemeConfig) -> Self {
        let height = track.height();
        let width = fill_width(progress, track.width());
        let fill = Rect::from_min_size(track.min, Vec2::new(width, height));

        let shimmer = (width > 0.0).then(|| {
            let size = Vec2::new(
                width * theme.shimmer_width_fraction,
                height * theme.shimmer_height_fraction,
            );
            let left = fill.min.x + width * phases.shimmer;
            Rect::from_min_size(Pos2::new(left, fill.center().y - size.y / 2.0), size)
        });

        let gems = if gems_visible(progress, theme.gem_threshold) {
            let count = gem_count(progress, theme.gem_slots);
            let radius = height * theme.gem_size_fraction / 2.0 * phases.gem_glow;
            (0..count)
                .map(|i| Gem {
                    center: Pos2::new(
                        fill.min.x + width * (i as f32 + 0.5) / count as f32,
                        fill.center().y,
                    ),
                    radius,
                    glow: phases.gem_glow,
                })
                .collect()
        } else {
            Vec::new()
        };

        // The glyphs sit in a row one bar-height wider than the track.
        let glyph_size = height * theme.glyph_size_fraction;
        let inset = height / 2.0 - glyph_size / 2.0;
        let glyphs = [
            Pos2::new(track.min.x - inset, track.center().y),
            Pos2::new(track.max.x + inset, track.center().y),
        ];

        Self {
            track,
            fill,
            pulse: phases.pulse,
            shimmer,
            gems,
            glyphs,
            glyph_size,
        }
    }

    pub fn painted_fill(&self) -> Rect {
        scale_about_center(self.fill, 1.0, self.pulse)
    }

    pub fn paint(&self, painter: &Painter, theme: &ThemeConfig) {
        let palette = &theme.palette;
        let radius = self.track.height() / 2.0;

        // Track
        paint_glow(
            painter,
            self.track.translate(Vec2::new(0.0, 2.0)),
            radius,
            palette.track_shadow.color32(),
            4.0,
        );
        painter.add(gradient_rounded_rect(
            self.track,
            radius,
            &gradient(&palette.track),
            GradientAxis::Horizontal,
        ));
        gradient_stroke(
            painter,
            self.track,
            radius,
            theme.track_border_width,
            &gradient(&palette.track_border),
        );

        // Fill, clipped to the track
        if self.fill.width() > 0.0 {
            let fill = self.painted_fill();
            paint_glow(painter, fill, radius, palette.fill_glow.color32(), theme.fill_glow_radius);
            let clipped = painter.with_clip_rect(self.track.intersect(painter.clip_rect()));
            clipped.add(gradient_rounded_rect(
                fill,
                radius,
                &gradient(&palette.fill),
                GradientAxis::Horizontal,
            ));

            if let Some(band) = self.shimmer {
                let shine = palette.shimmer.with_opacity(theme.shimmer_opacity);
                clipped
                    .with_clip_rect(self.fill.intersect(clipped.clip_rect()))
                    .add(gradient_rounded_rect(
                        band,
                        radius,
                        &[Color32::TRANSPARENT, shine, Color32::TRANSPARENT],
                        GradientAxis::Horizontal,
                    ));
            }

            let highlight_height = self.fill.height() * theme.highlight_height_fraction;
            let highlight = Rect::from_center_size(
                self.fill.center() - Vec2::new(0.0, self.fill.height() * theme.highlight_raise_fraction),
                Vec2::new(self.fill.width(), highlight_height),
            );
            clipped.add(gradient_rounded_rect(
                highlight,
                radius,
                &[palette.fill_highlight.color32(), Color32::TRANSPARENT],
                GradientAxis::Vertical,
            ));
        }

        // Decorations
        for center in self.glyphs {
            paint_glow(
                painter,
                Rect::from_center_size(center, Vec2::splat(self.glyph_size * 0.5)),
                self.glyph_size,
                palette.glyph_glow.color32(),
                2.0,
            );
            paint_diamond(painter, center, self.glyph_size, palette.glyph.color32());
        }

        if !self.gems.is_empty() {
            let gem_painter = painter.with_clip_rect(self.fill.intersect(painter.clip_rect()));
            for gem in &self.gems {
                let stops = [
                    palette.gem_core.with_opacity(gem.glow),
                    palette.gem_edge.with_opacity(gem.glow * 0.8),
                    Color32::TRANSPARENT,
                ];
                gem_painter.add(radial_gradient_circle(gem.center, gem.radius, &stops));
            }
        }
    }
}

/// Stateful progress bar: owns the fill transition and the three
/// decorative animations.
pub struct ProgressBar {
    fill: Transition,
    pulse: Repeating,
    shimmer: Repeating,
    gem_glow: Repeating,
}

impl ProgressBar {
    /// Start all animations at `now`; the fill starts at `progress` without
    /// animating.
    pub fn mount(progress: f64, now: f64, theme: &ThemeConfig) -> Self {
        Self {
            fill: Transition::settled(clamp_progress(progress) as f32, theme.fill_transition_secs),
            pulse: theme.fill_pulse.start(now),
            shimmer: theme.shimmer.start(now),
            gem_glow: theme.gem_glow.start(now),
        }
    }

    pub fn set_progress(&mut self, progress: f64, now: f64) {
        self.fill.retarget(clamp_progress(progress) as f32, now);
    }

    /// Fill fraction currently on screen, mid-transition included.
    pub fn displayed_progress(&self, now: f64) -> f64 {
        self.fill.value_at(now) as f64
    }

    pub fn phases(&self, now: f64) -> BarPhases {
        BarPhases {
            pulse: self.pulse.value_at(now),
            shimmer: self.shimmer.value_at(now),
            gem_glow: self.gem_glow.value_at(now),
        }
    }

    /// Geometry at `now`. Gem count and visibility follow the target
    /// progress; the fill follows the transition.
    pub fn geometry(&self, track: Rect, progress: f64, now: f64, theme: &ThemeConfig) -> BarGeometry {
        let phases = self.phases(now);
        let mut geometry = BarGeometry::compute(track, progress, phases, theme);
        let shown = self.displayed_progress(now);
        if shown as f32 != clamp_progress(progress) as f32 {
            let animated = BarGeometry::compute(track, shown, phases, theme);
            geometry.fill = animated.fill;
            geometry.shimmer = animated.shimmer;
        }
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(width: f32) -> Rect {
        Rect::from_min_size(Pos2::new(40.0, 300.0), Vec2::new(width, 10.0))
    }

    #[test]
    fn fill_width_is_progress_times_track() {
        for progress in [0.0, 0.1, 0.25, 0.6, 0.999, 1.0] {
            assert_eq!(fill_width(progress, 208.0), progress as f32 * 208.0);
        }
    }

    #[test]
    fn percentage_floors() {
        assert_eq!(percentage(0.0), 0);
        assert_eq!(percentage(0.2), 20);
        assert_eq!(percentage(0.6), 60);
        assert_eq!(percentage(0.999), 99);
        assert_eq!(percentage(1.0), 100);
    }

    #[test]
    fn gem_count_table() {
        assert_eq!(gem_count(0.0, 5), 0);
        assert_eq!(gem_count(0.19, 5), 0);
        assert_eq!(gem_count(0.2, 5), 1);
        assert_eq!(gem_count(0.6, 5), 3);
        assert_eq!(gem_count(1.0, 5), 5);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(percentage(-0.4), 0);
        assert_eq!(percentage(1.7), 100);
        assert_eq!(gem_count(3.0, 5), 5);
        assert_eq!(fill_width(-1.0, 100.0), 0.0);
        assert_eq!(fill_width(2.0, 100.0), 100.0);
        assert_eq!(fill_width(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn gems_need_more_than_a_tenth() {
        let theme = ThemeConfig::default();
        assert!(!gems_visible(0.1, theme.gem_threshold));
        assert!(gems_visible(0.11, theme.gem_threshold));

        let phases = BarPhases::at_rest(&theme);
        // 0.15 is past the threshold but floors to zero markers.
        assert!(BarGeometry::compute(track(200.0), 0.15, phases, &theme).gems.is_empty());
        assert!(BarGeometry::compute(track(200.0), 0.05, phases, &theme).gems.is_empty());
        assert_eq!(BarGeometry::compute(track(200.0), 0.45, phases, &theme).gems.len(), 2);
    }

    #[test]
    fn gems_are_spread_evenly_inside_the_fill() {
        let theme = ThemeConfig::default();
        let geometry = BarGeometry::compute(track(200.0), 0.6, BarPhases::at_rest(&theme), &theme);
        assert_eq!(geometry.gems.len(), 3);
        let xs: Vec<f32> = geometry.gems.iter().map(|g| g.center.x).collect();
        for x in &xs {
            assert!(*x > geometry.fill.min.x && *x < geometry.fill.max.x);
        }
        let gap = xs[1] - xs[0];
        assert!((xs[2] - xs[1] - gap).abs() < 1e-3);
        // Diameter is 20% of the bar height, scaled by the glow.
        assert!((geometry.gems[0].radius - 10.0 * 0.2 / 2.0 * 0.5).abs() < 1e-5);
    }

    #[test]
    fn shimmer_only_with_a_visible_fill() {
        let theme = ThemeConfig::default();
        let phases = BarPhases::at_rest(&theme);
        assert!(BarGeometry::compute(track(200.0), 0.0, phases, &theme).shimmer.is_none());

        let geometry = BarGeometry::compute(track(200.0), 0.5, phases, &theme);
        let band = geometry.shimmer.unwrap();
        assert!((band.width() - 30.0).abs() < 1e-3);
        assert!((band.height() - 8.0).abs() < 1e-3);
        assert_eq!(band.min.x, geometry.fill.min.x);
    }

    #[test]
    fn shimmer_travels_to_one_and_a_half_fill_widths() {
        let theme = ThemeConfig::default();
        let phases = BarPhases {
            shimmer: 1.5,
            ..BarPhases::at_rest(&theme)
        };
        let geometry = BarGeometry::compute(track(200.0), 0.5, phases, &theme);
        assert_eq!(geometry.shimmer.unwrap().min.x, geometry.fill.min.x + 150.0);
    }

    #[test]
    fn glyphs_flank_the_track_regardless_of_progress() {
        let theme = ThemeConfig::default();
        let a = BarGeometry::compute(track(200.0), 0.0, BarPhases::at_rest(&theme), &theme);
        let b = BarGeometry::compute(track(200.0), 1.0, BarPhases::at_rest(&theme), &theme);
        assert_eq!(a.glyphs, b.glyphs);
        assert!(a.glyphs[0].x < a.track.min.x);
        assert!(a.glyphs[1].x > a.track.max.x);
        assert!((a.glyph_size - 6.0).abs() < 1e-4);
    }

    #[test]
    fn pulse_scales_the_fill_vertically() {
        let theme = ThemeConfig::default();
        let phases = BarPhases {
            pulse: 1.05,
            ..BarPhases::at_rest(&theme)
        };
        let geometry = BarGeometry::compute(track(200.0), 0.5, phases, &theme);
        let painted = geometry.painted_fill();
        assert!((painted.height() - 10.5).abs() < 1e-4);
        assert_eq!(painted.width(), geometry.fill.width());
    }

    #[test]
    fn bar_animates_fill_towards_new_progress() {
        let theme = ThemeConfig::default();
        let mut bar = ProgressBar::mount(0.2, 0.0, &theme);
        assert_eq!(bar.displayed_progress(0.0), 0.2f32 as f64);

        bar.set_progress(0.6, 1.0);
        let midway = bar.displayed_progress(1.15);
        assert!(midway > 0.2 && midway < 0.6);

        let geometry = bar.geometry(track(200.0), 0.6, 2.0, &theme);
        assert_eq!(geometry.fill.width(), fill_width(0.6f32 as f64, 200.0));
        assert_eq!(geometry.gems.len(), 3);
    }

    #[test]
    fn bar_phases_start_at_rest_on_mount() {
        let theme = ThemeConfig::default();
        let bar = ProgressBar::mount(0.5, 3.0, &theme);
        assert_eq!(bar.phases(3.0), BarPhases::at_rest(&theme));
        let later = bar.phases(3.75);
        assert!(later.pulse > 1.0 && later.pulse < 1.05);
        assert!((later.shimmer - 0.5625).abs() < 1e-4);
    }

    #[test]
    fn painting_does_not_panic() {
        let theme = ThemeConfig::default();
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            for progress in [0.0, 0.05, 0.6, 1.0] {
                let bar = ProgressBar::mount(progress, 0.0, &theme);
                bar.geometry(track(200.0), progress, 0.4, &theme).paint(&painter, &theme);
            }
        });
    }
}
