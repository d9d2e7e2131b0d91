use eframe::egui;
use egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke, Vec2};

/// Segments used for each quarter-circle corner.
const CORNER_SEGMENTS: usize = 8;
const GLOW_LAYERS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientAxis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgba_premultiplied(
        mix(a.r(), b.r()),
        mix(a.g(), b.g()),
        mix(a.b(), b.b()),
        mix(a.a(), b.a()),
    )
}

/// Color at `t` in `[0, 1]` along evenly spaced gradient stops.
pub fn sample_gradient(stops: &[Color32], t: f32) -> Color32 {
    match stops {
        [] => Color32::TRANSPARENT,
        [only] => *only,
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let index = (scaled.floor() as usize).min(stops.len() - 2);
            lerp_color(stops[index], stops[index + 1], scaled - index as f32)
        }
    }
}

/// Outline of a rounded rectangle, clockwise from the top-right corner.
/// The radius is capped at half the shorter side.
pub fn rounded_outline(rect: Rect, radius: f32) -> Vec<Pos2> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let corners = [
        (Pos2::new(rect.max.x - r, rect.min.y + r), -90.0_f32),
        (Pos2::new(rect.max.x - r, rect.max.y - r), 0.0),
        (Pos2::new(rect.min.x + r, rect.max.y - r), 90.0),
        (Pos2::new(rect.min.x + r, rect.min.y + r), 180.0),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (center, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let angle = (start + 90.0 * i as f32 / CORNER_SEGMENTS as f32).to_radians();
            points.push(center + Vec2::new(angle.cos(), angle.sin()) * r);
        }
    }
    points
}

fn gradient_t(rect: Rect, pos: Pos2, axis: GradientAxis) -> f32 {
    match axis {
        GradientAxis::Horizontal if rect.width() > 0.0 => (pos.x - rect.min.x) / rect.width(),
        GradientAxis::Vertical if rect.height() > 0.0 => (pos.y - rect.min.y) / rect.height(),
        _ => 0.0,
    }
}

/// Rounded rectangle filled with a linear gradient, as a triangle fan.
pub fn gradient_rounded_rect(
    rect: Rect,
    radius: f32,
    stops: &[Color32],
    axis: GradientAxis,
) -> Mesh {
    let mut mesh = Mesh::default();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return mesh;
    }
    let center = rect.center();
    mesh.colored_vertex(center, sample_gradient(stops, gradient_t(rect, center, axis)));
    let outline = rounded_outline(rect, radius);
    for pos in &outline {
        mesh.colored_vertex(*pos, sample_gradient(stops, gradient_t(rect, *pos, axis)));
    }
    let n = outline.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    mesh
}

/// Stroke a rounded rectangle whose color follows a horizontal gradient.
pub fn gradient_stroke(painter: &Painter, rect: Rect, radius: f32, width: f32, stops: &[Color32]) {
    let outline = rounded_outline(rect, radius);
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        let mid = Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let color = sample_gradient(stops, gradient_t(rect, mid, GradientAxis::Horizontal));
        painter.line_segment([*a, b], Stroke::new(width, color));
    }
}

/// Disc filled with a radial gradient from `stops[0]` at the center outwards.
pub fn radial_gradient_circle(center: Pos2, radius: f32, stops: &[Color32]) -> Mesh {
    const RINGS: usize = 4;
    const SEGMENTS: usize = 20;
    let mut mesh = Mesh::default();
    if radius <= 0.0 {
        return mesh;
    }
    mesh.colored_vertex(center, sample_gradient(stops, 0.0));
    for ring in 1..=RINGS {
        let t = ring as f32 / RINGS as f32;
        let color = sample_gradient(stops, t);
        for seg in 0..SEGMENTS {
            let angle = std::f32::consts::TAU * seg as f32 / SEGMENTS as f32;
            mesh.colored_vertex(center + Vec2::new(angle.cos(), angle.sin()) * radius * t, color);
        }
    }
    let ring_start = |ring: usize| (1 + (ring - 1) * SEGMENTS) as u32;
    for seg in 0..SEGMENTS as u32 {
        let next = (seg + 1) % SEGMENTS as u32;
        mesh.add_triangle(0, ring_start(1) + seg, ring_start(1) + next);
    }
    for ring in 2..=RINGS {
        let inner = ring_start(ring - 1);
        let outer = ring_start(ring);
        for seg in 0..SEGMENTS as u32 {
            let next = (seg + 1) % SEGMENTS as u32;
            mesh.add_triangle(inner + seg, outer + seg, outer + next);
            mesh.add_triangle(inner + seg, outer + next, inner + next);
        }
    }
    mesh
}

/// Soft halo around a rounded rectangle, drawn as fading expanded layers.
pub fn paint_glow(painter: &Painter, rect: Rect, radius: f32, color: Color32, spread: f32) {
    if spread <= 0.0 || color.a() == 0 {
        return;
    }
    for layer in (1..=GLOW_LAYERS).rev() {
        let grow = spread * layer as f32 / GLOW_LAYERS as f32;
        let fade = 1.0 - layer as f32 / (GLOW_LAYERS + 1) as f32;
        painter.rect_filled(
            rect.expand(grow),
            radius + grow,
            color.linear_multiply(fade / GLOW_LAYERS as f32),
        );
    }
}

pub fn paint_diamond(painter: &Painter, center: Pos2, size: f32, color: Color32) {
    let half = size / 2.0;
    let points = vec![
        center + Vec2::new(0.0, -half),
        center + Vec2::new(half, 0.0),
        center + Vec2::new(0.0, half),
        center + Vec2::new(-half, 0.0),
    ];
    painter.add(Shape::convex_polygon(points, color, Stroke::none()));
}

/// UV rect that crops an image of `image_size` to cover `target` without
/// stretching.
pub fn fill_uv(image_size: Vec2, target: Vec2) -> Rect {
    let full = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    if image_size.x <= 0.0 || image_size.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }
    let image_aspect = image_size.x / image_size.y;
    let target_aspect = target.x / target.y;
    if image_aspect > target_aspect {
        let visible = target_aspect / image_aspect;
        let inset = (1.0 - visible) / 2.0;
        Rect::from_min_max(Pos2::new(inset, 0.0), Pos2::new(1.0 - inset, 1.0))
    } else {
        let visible = image_aspect / target_aspect;
        let inset = (1.0 - visible) / 2.0;
        Rect::from_min_max(Pos2::new(0.0, inset), Pos2::new(1.0, 1.0 - inset))
    }
}

/// Scale `rect` about its center.
pub fn scale_about_center(rect: Rect, sx: f32, sy: f32) -> Rect {
    Rect::from_center_size(rect.center(), Vec2::new(rect.width() * sx, rect.height() * sy))
}
