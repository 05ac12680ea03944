//! Scalar tweens for doll rotation, velocity ease-out and the time bar

use serde::{Deserialize, Serialize};

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out
    #[default]
    Power1Out,
}

impl Ease {
    /// Map linear progress `t` in [0, 1] onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Interpolates `from` -> `to` over `duration_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f64,
    elapsed_ms: f64,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            ease,
        }
    }

    /// Value `elapsed_ms` into the tween, independent of internal progress
    pub fn value_at(&self, elapsed_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 || elapsed_ms >= self.duration_ms {
            return self.to;
        }
        let t = (elapsed_ms.max(0.0) / self.duration_ms) as f32;
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    /// Step forward and return the new value
    pub fn advance(&mut self, dt_ms: f64) -> f32 {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        self.value()
    }

    pub fn value(&self) -> f32 {
        self.value_at(self.elapsed_ms)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}
