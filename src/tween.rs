//! Minimal tweening: easing curves, single tweens and overwrite slots.
//!
//! A [`Tween`] interpolates between two values over a fixed duration. A
//! [`TweenSlot`] owns the current value of one animated property and at most
//! one in-flight tween for it. Starting a new tween on a slot replaces the
//! running one and continues from the value the property currently has, so
//! tweens never stack on the same target.

use cgmath::{Vector2, Vector3};

/// Easing curves mapping linear time `t ∈ [0, 1]` to eased progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out. This is the default ease for tweens.
    Power1Out,
    /// Quadratic ease-in-out.
    Power2InOut,
    /// Slow-motion ease: fast start and end around a linear middle section.
    ///
    /// `linear_ratio` is the share of the duration spent in the linear part,
    /// `power` how strongly the middle is flattened towards 0.5.
    SlowMo { linear_ratio: f32, power: f32 },
}

impl Ease {
    /// The slow-motion ease with its customary 0.7/0.7 parameters.
    pub const SLOW: Ease = Ease::SlowMo {
        linear_ratio: 0.7,
        power: 0.7,
    };

    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::SlowMo {
                linear_ratio,
                power,
            } => slow_mo(t, linear_ratio, power),
        }
    }
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power1Out
    }
}

fn slow_mo(t: f32, linear_ratio: f32, power: f32) -> f32 {
    let linear_ratio = linear_ratio.clamp(0.0, 1.0);
    let power = if linear_ratio < 1.0 { power } else { 0.0 };
    let edge = (1.0 - linear_ratio) / 2.0;
    let outer = edge + linear_ratio;
    let r = t + (0.5 - t) * power;
    if t < edge {
        let k = 1.0 - t / edge;
        r - k * k * k * k * r
    } else if t > outer {
        let k = (t - outer) / edge;
        r + (t - r) * k * k * k * k
    } else {
        r
    }
}

/// Values that can be linearly interpolated by a tween.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vector2<f32> {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vector3<f32> {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

#[derive(Clone, Debug)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    /// Linear time progress in `[0, 1]`. Zero-length tweens are always done.
    pub fn progress(&self) -> f32 {
        if self.duration <= f32::EPSILON {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn value(&self) -> T {
        let progress = self.progress();
        if progress >= 1.0 {
            // land exactly on the target, whatever the curve's rounding
            self.to
        } else {
            self.from.lerp(self.to, self.ease.apply(progress))
        }
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Moves the tween forward by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }
}

/// Outcome of advancing a [`TweenSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenStatus {
    /// No tween was running.
    Idle,
    Running,
    /// The tween reached its target during this advance and was removed.
    Completed,
}

/// The current value of one animated property plus its in-flight tween.
#[derive(Clone, Debug)]
pub struct TweenSlot<T> {
    value: T,
    tween: Option<Tween<T>>,
}

impl<T: Lerp> TweenSlot<T> {
    pub fn new(value: T) -> Self {
        Self { value, tween: None }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.tween.is_some()
    }

    /// Jumps to `value`, cancelling any running tween.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.tween = None;
    }

    /// Tweens from the current value to `target`, replacing a running tween.
    pub fn to(&mut self, target: T, duration: f32, ease: Ease) {
        self.tween = Some(Tween::new(self.value, target, duration, ease));
    }

    /// Tweens from `from` to `target`, replacing a running tween.
    pub fn from_to(&mut self, from: T, target: T, duration: f32, ease: Ease) {
        self.value = from;
        self.to(target, duration, ease);
    }

    pub fn advance(&mut self, dt: f32) -> TweenStatus {
        let Some(tween) = self.tween.as_mut() else {
            return TweenStatus::Idle;
        };
        self.value = tween.advance(dt);
        if tween.is_finished() {
            self.tween = None;
            TweenStatus::Completed
        } else {
            TweenStatus::Running
        }
    }
}
