use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Named time-remapping curves an animator may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolator {
    #[default]
    Linear,
    Accelerate,
    Decelerate,
    AccelerateDecelerate,
    FastOutSlowIn,
    FastOutLinearIn,
    LinearOutSlowIn,
    Bounce,
    Overshoot,
    Anticipate,
    AnticipateOvershoot,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown interpolator `{0}`")]
pub struct UnknownInterpolator(pub String);

const RESOURCE_PREFIXES: [&str; 5] = [
    "@android:interpolator/",
    "@android:anime/",
    "@android:anim/",
    "@interpolator/",
    "@anim/",
];

impl Interpolator {
    pub const ALL: [Interpolator; 11] = [
        Interpolator::Linear,
        Interpolator::Accelerate,
        Interpolator::Decelerate,
        Interpolator::AccelerateDecelerate,
        Interpolator::FastOutSlowIn,
        Interpolator::FastOutLinearIn,
        Interpolator::LinearOutSlowIn,
        Interpolator::Bounce,
        Interpolator::Overshoot,
        Interpolator::Anticipate,
        Interpolator::AnticipateOvershoot,
    ];

    /// Resolves an `android:interpolator` attribute. Absent names are linear; unknown names are
    /// logged and fall back to linear.
    pub fn resolve(name: Option<&str>) -> Self {
        match name {
            None => Interpolator::Linear,
            Some(raw) => raw.parse().unwrap_or_else(|err: UnknownInterpolator| {
                warn!("{err}, falling back to linear");
                Interpolator::Linear
            }),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Interpolator::Linear => "linear",
            Interpolator::Accelerate => "accelerate_interpolator",
            Interpolator::Decelerate => "decelerate_interpolator",
            Interpolator::AccelerateDecelerate => "accelerate_decelerate_interpolator",
            Interpolator::FastOutSlowIn => "fast_out_slow_in",
            Interpolator::FastOutLinearIn => "fast_out_linear_in",
            Interpolator::LinearOutSlowIn => "linear_out_slow_in",
            Interpolator::Bounce => "bounce_interpolator",
            Interpolator::Overshoot => "overshoot_interpolator",
            Interpolator::Anticipate => "anticipate_interpolator",
            Interpolator::AnticipateOvershoot => "anticipate_overshoot_interpolator",
        }
    }

    /// Curves that leave `[0, 1]` on purpose.
    pub fn overshoots(&self) -> bool {
        matches!(
            self,
            Interpolator::Overshoot | Interpolator::Anticipate | Interpolator::AnticipateOvershoot
        )
    }
}

impl FromStr for Interpolator {
    type Err = UnknownInterpolator;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let stripped = RESOURCE_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);
        let key = stripped.to_ascii_lowercase();

        if key == "linear_interpolator" {
            return Ok(Interpolator::Linear);
        }
        Interpolator::ALL
            .iter()
            .copied()
            .find(|interp| interp.key() == key)
            .ok_or_else(|| UnknownInterpolator(raw.to_string()))
    }
}

impl fmt::Display for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
