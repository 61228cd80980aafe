use crate::animator::{Animator, Overrides};
use crate::color::Color;
use crate::props::{ClipProps, GroupProps, PaintSource, PathProps, TrimWindow};
use avd_data::{
    ClipPath, Document, FillRule, Gradient, GradientKind, Group, LineCap, LineJoin, Paint,
    PathNode, SceneNode, TileMode,
};
use glam::Vec2;
use serde::Serialize;
use tracing::{debug, instrument};

/// The drawing vocabulary the scene renderer needs from a backend. Paths are passed as path
/// data strings; transforms compose onto the current matrix and are scoped by `save`/`restore`.
pub trait Surface {
    /// Output size in pixels.
    fn size(&self) -> (f32, f32);
    /// Wipes all previous output and resets the transform and clip.
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// Intersects the current clip with the path.
    fn clip_path(&mut self, path_data: &str);
    fn fill_path(
        &mut self,
        path_data: &str,
        paint: &ResolvedPaint,
        opacity: f32,
        rule: FillRule,
        trim: TrimWindow,
    );
    fn stroke_path(
        &mut self,
        path_data: &str,
        paint: &ResolvedPaint,
        opacity: f32,
        style: &StrokeStyle,
        trim: TrimWindow,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// A paint ready for a backend: colors parsed, stops in ascending offset order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedPaint {
    Solid {
        color: Color,
    },
    Linear {
        start: Vec2,
        end: Vec2,
        stops: Vec<ColorStop>,
        tile_mode: TileMode,
    },
    /// Inner radius is always zero.
    Radial {
        center: Vec2,
        radius: f32,
        stops: Vec<ColorStop>,
        tile_mode: TileMode,
    },
    /// Starts at angle zero (the positive x axis).
    Sweep { center: Vec2, stops: Vec<ColorStop> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}

pub struct Renderer;

impl Renderer {
    /// Repaints the whole surface with the document's state at `time_ms`. Nothing carries over
    /// between calls, so frames can be drawn in any order.
    #[instrument(skip(document, surface))]
    pub fn draw(document: &Document, time_ms: f64, surface: &mut dyn Surface) {
        surface.clear();

        let (width, height) = surface.size();
        let sx = width / document.viewport_width;
        let sy = height / document.viewport_height;
        if !(sx.is_finite() && sy.is_finite()) {
            debug!(
                viewport_width = document.viewport_width,
                viewport_height = document.viewport_height,
                "Viewport is not drawable, leaving the frame empty"
            );
            return;
        }

        surface.save();
        surface.scale(sx, sy);
        let mut frame = Frame {
            document,
            time_ms,
            surface,
        };
        frame.draw_group(&document.root);
        frame.surface.restore();
    }
}

struct Frame<'a, 's> {
    document: &'a Document,
    time_ms: f64,
    surface: &'s mut dyn Surface,
}

impl<'a, 's> Frame<'a, 's> {
    fn overrides(&self, name: Option<&str>) -> Overrides {
        match name {
            Some(name) => Animator::evaluate(&self.document.animators, name, self.time_ms),
            None => Overrides::default(),
        }
    }

    fn draw_node(&mut self, node: &'a SceneNode) {
        match node {
            SceneNode::Group(group) => self.draw_group(group),
            SceneNode::Path(path) => self.draw_path(path),
            SceneNode::ClipPath(clip) => self.draw_clip(clip),
        }
    }

    fn draw_group(&mut self, group: &'a Group) {
        let props = GroupProps::resolve(group, &self.overrides(group.name.as_deref()));
        let origin = props.pivot + props.translate;

        self.surface.save();
        self.surface.translate(origin.x, origin.y);
        self.surface.rotate(props.rotation.to_radians());
        self.surface.scale(props.scale.x, props.scale.y);
        self.surface.translate(-props.pivot.x, -props.pivot.y);
        for child in &group.children {
            self.draw_node(child);
        }
        self.surface.restore();
    }

    fn draw_path(&mut self, path: &'a PathNode) {
        let overrides = self.overrides(path.name.as_deref());
        let props = PathProps::resolve(path, &overrides);
        let Some(data) = props.path_data.as_deref().filter(|d| !d.trim().is_empty()) else {
            return;
        };
        let trim = props.trim.window();
        if trim == TrimWindow::Empty {
            return;
        }

        if let Some(paint) = props.fill.as_ref().and_then(resolve_paint) {
            self.surface
                .fill_path(data, &paint, props.fill_alpha, props.fill_rule, trim);
        }
        if let Some(paint) = props.stroke.as_ref().and_then(resolve_paint) {
            let style = StrokeStyle {
                width: props.stroke_width,
                cap: props.stroke_line_cap,
                join: props.stroke_line_join,
                miter_limit: props.stroke_miter_limit,
            };
            self.surface
                .stroke_path(data, &paint, props.stroke_alpha, &style, trim);
        }
    }

    fn draw_clip(&mut self, clip: &'a ClipPath) {
        let props = ClipProps::resolve(clip, &self.overrides(clip.name.as_deref()));
        match props.path_data.as_deref() {
            Some(data) if !data.trim().is_empty() => self.surface.clip_path(data),
            _ => debug!(name = ?clip.name, "Skipping clip-path without path data"),
        }
    }
}

/// `None` when there is nothing to paint: the transparent sentinel, or a color that does not
/// parse.
pub fn resolve_paint(source: &PaintSource) -> Option<ResolvedPaint> {
    match source {
        PaintSource::Animated(color) => solid(*color),
        PaintSource::Model(Paint::Flat(literal)) => match Color::from_literal(literal) {
            Ok(color) => solid(color),
            Err(err) => {
                debug!(%err, "Dropping paint");
                None
            }
        },
        PaintSource::Model(Paint::Gradient(gradient)) => resolve_gradient(gradient),
    }
}

fn solid(color: Color) -> Option<ResolvedPaint> {
    if color.is_transparent_sentinel() {
        return None;
    }
    Some(ResolvedPaint::Solid { color })
}

fn resolve_gradient(gradient: &Gradient) -> Option<ResolvedPaint> {
    let stops: Vec<ColorStop> = gradient
        .stops
        .iter()
        .filter_map(|stop| match Color::from_literal(&stop.color) {
            // Stops are sorted on read, so a NaN offset can only trail the list.
            Ok(_) if !stop.offset.is_finite() => {
                debug!(offset = stop.offset, "Dropping gradient stop without offset");
                None
            }
            Ok(color) => Some(ColorStop {
                offset: stop.offset.clamp(0.0, 1.0),
                color,
            }),
            Err(err) => {
                debug!(%err, "Dropping gradient stop");
                None
            }
        })
        .collect();

    match stops.as_slice() {
        [] => return None,
        [only] => return Some(ResolvedPaint::Solid { color: only.color }),
        _ => {}
    }

    let paint = match gradient.kind {
        GradientKind::Linear => ResolvedPaint::Linear {
            start: Vec2::new(gradient.start_x, gradient.start_y),
            end: Vec2::new(gradient.end_x, gradient.end_y),
            stops,
            tile_mode: gradient.tile_mode,
        },
        GradientKind::Radial => ResolvedPaint::Radial {
            center: Vec2::new(gradient.center_x, gradient.center_y),
            radius: gradient.radius,
            stops,
            tile_mode: gradient.tile_mode,
        },
        GradientKind::Sweep => ResolvedPaint::Sweep {
            center: Vec2::new(gradient.center_x, gradient.center_y),
            stops,
        },
    };
    Some(paint)
}
