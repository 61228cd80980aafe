use crate::color::Color;
use crate::error::ValueError;
use crate::morph;
use avd_data::parser::parse_float_prefix;
use avd_data::{AnimationDescriptor, AnimatorTable, EasingFunction, Property, ValueKind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// The value an animator writes over a node property at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum AnimatedValue {
    Float(f32),
    Color(Color),
    Path(String),
    /// A color or path that could not be produced. The property renders as absent.
    Invalid,
}

/// Sparse property overrides for one target, in the order they were first written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    entries: Vec<(Property, AnimatedValue)>,
}

impl Overrides {
    /// Replaces an earlier value for the same property in place.
    pub fn set(&mut self, property: Property, value: AnimatedValue) {
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn get(&self, property: &Property) -> Option<&AnimatedValue> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v)
    }

    pub fn float(&self, property: &Property) -> Option<f32> {
        match self.get(property) {
            Some(AnimatedValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Property, AnimatedValue)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for Overrides {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (property, value) in &self.entries {
            map.serialize_entry(property.name(), value)?;
        }
        map.end()
    }
}

pub struct Animator;

impl Animator {
    /// Overrides for `target` at `time_ms`. Descriptors are applied in table order, so a later
    /// animator on the same property wins; one that has not started yet contributes nothing.
    pub fn evaluate(table: &AnimatorTable, target: &str, time_ms: f64) -> Overrides {
        let mut overrides = Overrides::default();
        let Some(descriptors) = table.get(target) else {
            return overrides;
        };

        for desc in descriptors {
            if !desc.property.is_supported() || time_ms < desc.start_time_ms {
                continue;
            }
            overrides.set(desc.property.clone(), Self::value_at(desc, time_ms));
        }
        overrides
    }

    /// Every target's overrides, ordered by target name.
    pub fn evaluate_all(table: &AnimatorTable, time_ms: f64) -> BTreeMap<String, Overrides> {
        table
            .keys()
            .map(|target| (target.clone(), Self::evaluate(table, target, time_ms)))
            .collect()
    }

    /// Linear progress through the descriptor's window, clamped to `[0, 1]`. A descriptor
    /// without a positive duration is complete as soon as it starts.
    pub fn progress(desc: &AnimationDescriptor, time_ms: f64) -> f64 {
        if !(desc.duration_ms > 0.0) {
            return 1.0;
        }
        ((time_ms - desc.start_time_ms) / desc.duration_ms).clamp(0.0, 1.0)
    }

    pub fn value_at(desc: &AnimationDescriptor, time_ms: f64) -> AnimatedValue {
        let fraction = desc.interpolator.y(Self::progress(desc, time_ms));
        let from = desc.value_from.as_deref();
        let to = desc.value_to.as_deref();

        match desc.value_kind {
            ValueKind::Float => {
                let a = parse_number(from).unwrap_or_else(|err| log_invalid(err, f64::NAN));
                let b = parse_number(to).unwrap_or_else(|err| log_invalid(err, f64::NAN));
                AnimatedValue::Float((a + (b - a) * fraction) as f32)
            }
            ValueKind::Color => {
                if !fraction.is_finite() {
                    return AnimatedValue::Invalid;
                }
                match (parse_color(from), parse_color(to)) {
                    (Ok(a), Ok(b)) => AnimatedValue::Color(a.lerp(&b, fraction)),
                    (Err(err), _) | (_, Err(err)) => log_invalid(err, AnimatedValue::Invalid),
                }
            }
            ValueKind::Path => {
                if !fraction.is_finite() || (from.is_none() && to.is_none()) {
                    return AnimatedValue::Invalid;
                }
                AnimatedValue::Path(morph::morph(
                    from.unwrap_or_default(),
                    to.unwrap_or_default(),
                    fraction,
                ))
            }
        }
    }
}

fn parse_number(raw: Option<&str>) -> Result<f64, ValueError> {
    let raw = raw.unwrap_or_default();
    let value = parse_float_prefix(raw);
    if value.is_nan() {
        return Err(ValueError::InvalidNumber(raw.to_string()));
    }
    Ok(value)
}

/// Missing colors read as transparent.
fn parse_color(raw: Option<&str>) -> Result<Color, ValueError> {
    match raw {
        None => Ok(Color::TRANSPARENT),
        Some(literal) => Color::from_literal(literal),
    }
}

fn log_invalid<T>(err: ValueError, fallback: T) -> T {
    debug!(%err, "Invalid animated value");
    fallback
}
