use crate::interpolator::Interpolator;
use serde::Serialize;
use std::collections::BTreeMap;

/// A parsed drawable: the shape tree, its animators and the overall timeline length.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// The `<vector>` element itself, treated as a group.
    pub root: Group,
    pub animators: AnimatorTable,
    pub total_duration_ms: f64,
}

impl Document {
    /// Number of frames a host samples at `fps` to cover the whole timeline.
    pub fn frame_count(&self, fps: f64) -> usize {
        if !(fps > 0.0) || !(self.total_duration_ms > 0.0) {
            return 0;
        }
        (self.total_duration_ms * fps / 1000.0).ceil() as usize
    }

    pub fn frame_time(&self, index: usize, fps: f64) -> f64 {
        if !(fps > 0.0) {
            return 0.0;
        }
        index as f64 * (1000.0 / fps)
    }

    pub fn is_animated(&self) -> bool {
        self.animators.values().any(|list| !list.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SceneNode {
    Group(Group),
    Path(PathNode),
    ClipPath(ClipPath),
}

impl SceneNode {
    pub fn name(&self) -> Option<&str> {
        match self {
            SceneNode::Group(g) => g.name.as_deref(),
            SceneNode::Path(p) => p.name.as_deref(),
            SceneNode::ClipPath(c) => c.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub name: Option<String>,
    pub pivot_x: f32,
    pub pivot_y: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Degrees.
    pub rotation: f32,
    pub children: Vec<SceneNode>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            name: None,
            pivot_x: 0.0,
            pivot_y: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            children: Vec::new(),
        }
    }
}

impl Group {
    /// Pre-order walk over every node below this group.
    pub fn descendants(&self) -> Vec<&SceneNode> {
        let mut out = Vec::new();
        fn walk<'a>(children: &'a [SceneNode], out: &mut Vec<&'a SceneNode>) {
            for child in children {
                out.push(child);
                if let SceneNode::Group(g) = child {
                    walk(&g.children, out);
                }
            }
        }
        walk(&self.children, &mut out);
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PathNode {
    pub name: Option<String>,
    pub path_data: Option<String>,
    pub fill: Option<Paint>,
    pub fill_alpha: f32,
    pub stroke: Option<Paint>,
    pub stroke_alpha: f32,
    pub stroke_width: f32,
    pub stroke_line_cap: LineCap,
    pub stroke_line_join: LineJoin,
    pub stroke_miter_limit: f32,
    pub trim_path_start: f32,
    pub trim_path_end: f32,
    pub trim_path_offset: f32,
    pub fill_rule: FillRule,
}

impl Default for PathNode {
    fn default() -> Self {
        Self {
            name: None,
            path_data: None,
            fill: None,
            fill_alpha: 1.0,
            stroke: None,
            stroke_alpha: 1.0,
            stroke_width: 0.0,
            stroke_line_cap: LineCap::Butt,
            stroke_line_join: LineJoin::Miter,
            stroke_miter_limit: 4.0,
            trim_path_start: 0.0,
            trim_path_end: 1.0,
            trim_path_offset: 0.0,
            fill_rule: FillRule::NonZero,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClipPath {
    pub name: Option<String>,
    pub path_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Paint {
    /// A color literal as written in the document (`#AARRGGBB`, `#RGB`, `@color/...`).
    Flat(String),
    Gradient(Gradient),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub kind: GradientKind,
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    pub tile_mode: TileMode,
    /// Sorted ascending by offset.
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Sweep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

// Animation

/// Target name -> descriptors in declaration order.
pub type AnimatorTable = BTreeMap<String, Vec<AnimationDescriptor>>;

#[derive(Debug, Clone, Serialize)]
pub struct AnimationDescriptor {
    pub start_time_ms: f64,
    pub duration_ms: f64,
    pub property: Property,
    pub value_kind: ValueKind,
    pub value_from: Option<String>,
    pub value_to: Option<String>,
    pub interpolator: Interpolator,
}

impl AnimationDescriptor {
    pub fn end_time_ms(&self) -> f64 {
        self.start_time_ms + self.duration_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Float,
    Color,
    Path,
}

/// The closed set of animatable properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Property {
    Rotation,
    PivotX,
    PivotY,
    ScaleX,
    ScaleY,
    TranslateX,
    TranslateY,
    PathData,
    FillColor,
    StrokeColor,
    StrokeWidth,
    StrokeAlpha,
    FillAlpha,
    TrimPathStart,
    TrimPathEnd,
    TrimPathOffset,
    /// Kept so that timing stays intact; never evaluated.
    Unsupported(String),
}

impl Property {
    pub fn from_name(name: &str) -> Self {
        match name {
            "rotation" => Property::Rotation,
            "pivotX" => Property::PivotX,
            "pivotY" => Property::PivotY,
            "scaleX" => Property::ScaleX,
            "scaleY" => Property::ScaleY,
            "translateX" => Property::TranslateX,
            "translateY" => Property::TranslateY,
            "pathData" => Property::PathData,
            "fillColor" => Property::FillColor,
            "strokeColor" => Property::StrokeColor,
            "strokeWidth" => Property::StrokeWidth,
            "strokeAlpha" => Property::StrokeAlpha,
            "fillAlpha" => Property::FillAlpha,
            "trimPathStart" => Property::TrimPathStart,
            "trimPathEnd" => Property::TrimPathEnd,
            "trimPathOffset" => Property::TrimPathOffset,
            other => Property::Unsupported(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Property::Rotation => "rotation",
            Property::PivotX => "pivotX",
            Property::PivotY => "pivotY",
            Property::ScaleX => "scaleX",
            Property::ScaleY => "scaleY",
            Property::TranslateX => "translateX",
            Property::TranslateY => "translateY",
            Property::PathData => "pathData",
            Property::FillColor => "fillColor",
            Property::StrokeColor => "strokeColor",
            Property::StrokeWidth => "strokeWidth",
            Property::StrokeAlpha => "strokeAlpha",
            Property::FillAlpha => "fillAlpha",
            Property::TrimPathStart => "trimPathStart",
            Property::TrimPathEnd => "trimPathEnd",
            Property::TrimPathOffset => "trimPathOffset",
            Property::Unsupported(name) => name,
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, Property::FillColor | Property::StrokeColor)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Property::Unsupported(_))
    }
}
