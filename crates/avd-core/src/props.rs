//! Node attributes with animated overrides applied.
//!
//! Each node kind gets a typed copy of its base attributes; overrides are written onto it by
//! property. Values of the wrong kind for a property are ignored, and so are non-finite floats.

use crate::animator::{AnimatedValue, Overrides};
use crate::color::Color;
use avd_data::{ClipPath, FillRule, Group, LineCap, LineJoin, Paint, PathNode, Property};
use glam::Vec2;
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupProps {
    pub pivot: Vec2,
    pub translate: Vec2,
    pub scale: Vec2,
    /// Degrees.
    pub rotation: f32,
}

impl GroupProps {
    pub fn resolve(group: &Group, overrides: &Overrides) -> Self {
        let mut props = Self {
            pivot: Vec2::new(group.pivot_x, group.pivot_y),
            translate: Vec2::new(group.translate_x, group.translate_y),
            scale: Vec2::new(group.scale_x, group.scale_y),
            rotation: group.rotation,
        };
        props.apply(overrides);
        props
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        for (property, value) in overrides.iter() {
            let Some(v) = finite_float(value) else {
                continue;
            };
            match property {
                Property::Rotation => self.rotation = v,
                Property::PivotX => self.pivot.x = v,
                Property::PivotY => self.pivot.y = v,
                Property::ScaleX => self.scale.x = v,
                Property::ScaleY => self.scale.y = v,
                Property::TranslateX => self.translate.x = v,
                Property::TranslateY => self.translate.y = v,
                _ => {}
            }
        }
    }

    /// Translate to pivot plus translation, rotate, scale, then move the pivot back to the
    /// origin. The renderer issues the same steps one call at a time.
    #[cfg(test)]
    pub(crate) fn local_transform(&self) -> glam::Affine2 {
        use glam::Affine2;
        Affine2::from_translation(self.pivot + self.translate)
            * Affine2::from_angle(self.rotation.to_radians())
            * Affine2::from_scale(self.scale)
            * Affine2::from_translation(-self.pivot)
    }
}

/// Where a fill or stroke color comes from after overrides.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintSource<'a> {
    Model(&'a Paint),
    Animated(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathProps<'a> {
    pub path_data: Option<Cow<'a, str>>,
    pub fill: Option<PaintSource<'a>>,
    pub fill_alpha: f32,
    pub fill_rule: FillRule,
    pub stroke: Option<PaintSource<'a>>,
    pub stroke_alpha: f32,
    pub stroke_width: f32,
    pub stroke_line_cap: LineCap,
    pub stroke_line_join: LineJoin,
    pub stroke_miter_limit: f32,
    pub trim: Trim,
}

impl<'a> PathProps<'a> {
    pub fn resolve(path: &'a PathNode, overrides: &Overrides) -> Self {
        let mut props = Self {
            path_data: path.path_data.as_deref().map(Cow::Borrowed),
            fill: path.fill.as_ref().map(PaintSource::Model),
            fill_alpha: path.fill_alpha,
            fill_rule: path.fill_rule,
            stroke: path.stroke.as_ref().map(PaintSource::Model),
            stroke_alpha: path.stroke_alpha,
            stroke_width: path.stroke_width,
            stroke_line_cap: path.stroke_line_cap,
            stroke_line_join: path.stroke_line_join,
            stroke_miter_limit: path.stroke_miter_limit,
            trim: Trim {
                start: path.trim_path_start,
                end: path.trim_path_end,
                offset: path.trim_path_offset,
            },
        };
        props.apply(overrides);
        props
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        for (property, value) in overrides.iter() {
            match (property, value) {
                (Property::PathData, AnimatedValue::Path(data)) => {
                    self.path_data = Some(Cow::Owned(data.clone()))
                }
                (Property::PathData, AnimatedValue::Invalid) => self.path_data = None,
                (Property::FillColor, AnimatedValue::Color(c)) => {
                    self.fill = Some(PaintSource::Animated(*c))
                }
                (Property::FillColor, AnimatedValue::Invalid) => self.fill = None,
                (Property::StrokeColor, AnimatedValue::Color(c)) => {
                    self.stroke = Some(PaintSource::Animated(*c))
                }
                (Property::StrokeColor, AnimatedValue::Invalid) => self.stroke = None,
                (property, value) => {
                    let Some(v) = finite_float(value) else {
                        continue;
                    };
                    match property {
                        Property::FillAlpha => self.fill_alpha = v,
                        Property::StrokeAlpha => self.stroke_alpha = v,
                        Property::StrokeWidth => self.stroke_width = v,
                        Property::TrimPathStart => self.trim.start = v,
                        Property::TrimPathEnd => self.trim.end = v,
                        Property::TrimPathOffset => self.trim.offset = v,
                        _ => {}
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipProps<'a> {
    pub path_data: Option<Cow<'a, str>>,
}

impl<'a> ClipProps<'a> {
    pub fn resolve(clip: &'a ClipPath, overrides: &Overrides) -> Self {
        let path_data = match overrides.get(&Property::PathData) {
            Some(AnimatedValue::Path(data)) => Some(Cow::Owned(data.clone())),
            Some(AnimatedValue::Invalid) => None,
            _ => clip.path_data.as_deref().map(Cow::Borrowed),
        };
        Self { path_data }
    }
}

fn finite_float(value: &AnimatedValue) -> Option<f32> {
    match value {
        AnimatedValue::Float(v) if v.is_finite() => Some(*v),
        _ => None,
    }
}

/// Trim fractions of a path, each nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trim {
    pub start: f32,
    pub end: f32,
    pub offset: f32,
}

/// The part of a path that remains visible after trimming, as fractions of its length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrimWindow {
    Full,
    Empty,
    Range { start: f32, end: f32 },
    /// `[start, 1]` followed by `[0, end]`.
    Wrapped { start: f32, end: f32 },
}

impl Trim {
    pub fn window(&self) -> TrimWindow {
        let Trim { start, end, offset } = *self;
        if !(start.is_finite() && end.is_finite() && offset.is_finite()) {
            return TrimWindow::Full;
        }
        if (start == 0.0 && end == 1.0) || (end - start).abs() >= 1.0 {
            return TrimWindow::Full;
        }

        let s = (start + offset).rem_euclid(1.0);
        let e = (end + offset).rem_euclid(1.0);
        if s == e {
            TrimWindow::Empty
        } else if s < e {
            TrimWindow::Range { start: s, end: e }
        } else if e == 0.0 {
            TrimWindow::Range { start: s, end: 1.0 }
        } else {
            TrimWindow::Wrapped { start: s, end: e }
        }
    }
}
