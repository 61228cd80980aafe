//! Time-remapping curves behind each [`Interpolator`]. Most stay in `[0, 1]`; the overshoot
//! and anticipate variants leave it on purpose.

use crate::interpolator::Interpolator;
use keyframe::EasingFunction;
use std::f64::consts::PI;

/// Looks up an easing curve by its resource name, e.g.
/// `@android:interpolator/fast_out_slow_in`. Absent or unknown names give linear.
pub fn resolve(name: Option<&str>) -> Interpolator {
    Interpolator::resolve(name)
}

const FAST_OUT_SLOW_IN: CubicBezier = CubicBezier::new(0.4, 0.0, 0.2, 1.0);
const FAST_OUT_LINEAR_IN: CubicBezier = CubicBezier::new(0.4, 0.0, 1.0, 1.0);
const LINEAR_OUT_SLOW_IN: CubicBezier = CubicBezier::new(0.0, 0.0, 0.2, 1.0);

const OVERSHOOT_TENSION: f64 = 2.0;
const ANTICIPATE_OVERSHOOT_TENSION: f64 = 3.0;

impl EasingFunction for Interpolator {
    fn y(&self, t: f64) -> f64 {
        match self {
            Interpolator::Linear => keyframe::functions::Linear.y(t),
            Interpolator::Accelerate => t * t,
            Interpolator::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Interpolator::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
            Interpolator::FastOutSlowIn => FAST_OUT_SLOW_IN.y(t),
            Interpolator::FastOutLinearIn => FAST_OUT_LINEAR_IN.y(t),
            Interpolator::LinearOutSlowIn => LINEAR_OUT_SLOW_IN.y(t),
            Interpolator::Bounce => bounce(t),
            Interpolator::Overshoot => {
                let s = t - 1.0;
                s * s * ((OVERSHOOT_TENSION + 1.0) * s + OVERSHOOT_TENSION) + 1.0
            }
            Interpolator::Anticipate => {
                t * t * ((OVERSHOOT_TENSION + 1.0) * t - OVERSHOOT_TENSION)
            }
            Interpolator::AnticipateOvershoot => anticipate_overshoot(t),
        }
    }
}

fn bounce(t: f64) -> f64 {
    const K: f64 = 7.5625;
    if t < 1.0 / 2.75 {
        K * t * t
    } else if t < 2.0 / 2.75 {
        let s = t - 1.5 / 2.75;
        K * s * s + 0.75
    } else if t < 2.5 / 2.75 {
        let s = t - 2.25 / 2.75;
        K * s * s + 0.9375
    } else {
        let s = t - 2.625 / 2.75;
        K * s * s + 0.984375
    }
}

fn anticipate_overshoot(t: f64) -> f64 {
    let p = ANTICIPATE_OVERSHOOT_TENSION;
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * (t * t * ((p + 1.0) * t - p))
    } else {
        let s = t - 2.0;
        0.5 * (s * s * ((p + 1.0) * s + p) + 2.0)
    }
}

/// A unit cubic Bezier timing curve with implicit endpoints `(0,0)` and `(1,1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

const EPSILON: f64 = 1e-6;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_LIMIT: usize = 64;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(t: f64, p1: f64, p2: f64) -> f64 {
        let a = 1.0 - 3.0 * p2 + 3.0 * p1;
        let b = 3.0 * p2 - 6.0 * p1;
        let c = 3.0 * p1;
        ((a * t + b) * t + c) * t
    }

    fn sample_x(&self, t: f64) -> f64 {
        Self::sample(t, self.x1, self.x2)
    }

    fn sample_y(&self, t: f64) -> f64 {
        Self::sample(t, self.y1, self.y2)
    }

    fn derivative_x(&self, t: f64) -> f64 {
        let a = 1.0 - 3.0 * self.x2 + 3.0 * self.x1;
        let b = 3.0 * self.x2 - 6.0 * self.x1;
        let c = 3.0 * self.x1;
        (3.0 * a * t + 2.0 * b) * t + c
    }

    /// Finds the curve parameter whose x equals `x`: Newton-Raphson first, bisection when
    /// it fails to converge or the slope flattens out.
    pub fn solve(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample_x(t) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let slope = self.derivative_x(t);
            if slope.abs() < EPSILON {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        let mut t = x;
        if t < lo {
            return lo;
        }
        if t > hi {
            return hi;
        }
        for _ in 0..BISECTION_LIMIT {
            if lo >= hi {
                break;
            }
            let sampled = self.sample_x(t);
            if (sampled - x).abs() < EPSILON {
                return t;
            }
            if x > sampled {
                lo = t;
            } else {
                hi = t;
            }
            t = (hi - lo) * 0.5 + lo;
        }
        t
    }
}

impl EasingFunction for CubicBezier {
    fn y(&self, t: f64) -> f64 {
        self.sample_y(self.solve(t))
    }
}
