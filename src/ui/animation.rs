//! Frame-driven animation primitives.
//!
//! Nothing here owns a timer: every value is computed from the frame clock
//! (`egui::InputState::time`, seconds) handed in by the caller.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Cubic bezier (0.42, 0, 0.58, 1).
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => ease_in_out(t),
        }
    }
}

fn ease_in_out(t: f32) -> f32 {
    const X1: f32 = 0.42;
    const X2: f32 = 0.58;
    let x_at = |s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * X1 + 3.0 * inv * s * s * X2 + s * s * s
    };
    let dx_at = |s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * X1 + 6.0 * inv * s * (X2 - X1) + 3.0 * s * s * (1.0 - X2)
    };

    // Newton's method on x(s) = t; the curve is monotonic so it converges fast.
    let mut s = t;
    for _ in 0..8 {
        let err = x_at(s) - t;
        if err.abs() < 1e-6 {
            break;
        }
        let slope = dx_at(s);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }
    let inv = 1.0 - s;
    3.0 * inv * s * s + s * s * s
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Timing of an endlessly repeating animation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub from: f32,
    pub to: f32,
    /// Seconds per cycle.
    pub duration: f32,
    pub easing: Easing,
    /// Play every other cycle backwards instead of jumping back to `from`.
    pub autoreverses: bool,
}

impl AnimationSpec {
    /// `from → to → from → ...`
    pub const fn oscillate(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            autoreverses: true,
        }
    }

    /// `from → to, from → to, ...`
    pub const fn sweep(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            autoreverses: false,
        }
    }

    pub fn start(self, now: f64) -> Repeating {
        Repeating {
            spec: self,
            started_at: now,
        }
    }
}

/// A running [`AnimationSpec`]. It has no end; drop it to stop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Repeating {
    spec: AnimationSpec,
    started_at: f64,
}

impl Repeating {
    pub fn value_at(&self, now: f64) -> f32 {
        let spec = &self.spec;
        if spec.duration <= 0.0 {
            return spec.to;
        }
        let cycles = (now - self.started_at).max(0.0) / spec.duration as f64;
        let index = cycles.floor();
        let mut t = (cycles - index) as f32;
        if spec.autoreverses && index as u64 % 2 == 1 {
            t = 1.0 - t;
        }
        lerp(spec.from, spec.to, spec.easing.apply(t))
    }
}

/// Ease-in-out tween between successive target values.
///
/// Retargeting mid-flight starts from the value shown at that instant, so the
/// output never jumps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    from: f32,
    to: f32,
    started_at: f64,
    duration: f32,
}

impl Transition {
    /// A transition already resting at `value`.
    pub fn settled(value: f32, duration: f32) -> Self {
        Self {
            from: value,
            to: value,
            started_at: f64::NEG_INFINITY,
            duration,
        }
    }

    pub fn retarget(&mut self, target: f32, now: f64) {
        if target == self.to {
            return;
        }
        self.from = self.value_at(now);
        self.to = target;
        self.started_at = now;
    }

    pub fn value_at(&self, now: f64) -> f32 {
        if self.duration <= 0.0 || self.is_settled(now) {
            return self.to;
        }
        let t = ((now - self.started_at) / self.duration as f64) as f32;
        lerp(self.from, self.to, Easing::EaseInOut.apply(t))
    }

    pub fn is_settled(&self, now: f64) -> bool {
        now - self.started_at >= self.duration as f64
    }
}
