use crate::error::ParseError;
use crate::interpolator::Interpolator;
use crate::model::{
    AnimationDescriptor, AnimatorTable, ClipPath, Document, FillRule, Gradient, GradientKind,
    GradientStop, Group, LineCap, LineJoin, Paint, PathNode, Property, SceneNode, TileMode,
    ValueKind,
};
use roxmltree::Node;
use tracing::{debug, instrument, warn};

/// Parses either an `<animated-vector>` document or a bare `<vector>` document.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let xml = roxmltree::Document::parse(text)?;

    let Some(wrapper) = find_descendant(xml.root(), "animated-vector") else {
        let vector = find_descendant(xml.root(), "vector").ok_or(ParseError::MissingVector)?;
        let document = build_document(vector, AnimatorTable::new());
        debug!(
            nodes = document.root.descendants().len(),
            "Parsed static vector"
        );
        return Ok(document);
    };

    let vector = inline_drawable(wrapper).ok_or(ParseError::MissingDrawable)?;

    let mut animators = AnimatorTable::new();
    for target in wrapper
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "target")
    {
        let name = attr(target, "name").unwrap_or_default().to_string();
        let Some(animation) = aapt_attr(target, "animation")
            .and_then(|container| container.children().find(|n| n.is_element()))
        else {
            debug!(target = %name, "Target has no inline animation, skipping");
            continue;
        };

        let mut descriptors = Vec::new();
        parse_animation(animation, 0.0, &mut descriptors);
        animators.entry(name).or_default().extend(descriptors);
    }

    let document = build_document(vector, animators);
    debug!(
        nodes = document.root.descendants().len(),
        targets = document.animators.len(),
        descriptors = document.animators.values().map(Vec::len).sum::<usize>(),
        total_duration_ms = document.total_duration_ms,
        "Parsed animated vector"
    );
    Ok(document)
}

fn build_document(vector: Node, animators: AnimatorTable) -> Document {
    let total_duration_ms = animators
        .values()
        .flatten()
        .fold(0.0_f64, |acc, anim| acc.max(anim.end_time_ms()));

    Document {
        width: number(vector, "width"),
        height: number(vector, "height"),
        viewport_width: number(vector, "viewportWidth"),
        viewport_height: number(vector, "viewportHeight"),
        root: parse_group(vector),
        animators,
        total_duration_ms,
    }
}

/// The drawable is either a direct `<vector>` child or wrapped in
/// `<aapt:attr name="android:drawable">`.
fn inline_drawable<'a, 'input>(wrapper: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    wrapper
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "vector")
        .or_else(|| {
            aapt_attr(wrapper, "drawable")
                .and_then(|container| find_descendant(container, "vector"))
        })
}

// Shape tree

fn parse_group(node: Node) -> Group {
    let mut group = Group {
        name: attr(node, "name").map(str::to_string),
        pivot_x: number_or(node, "pivotX", 0.0),
        pivot_y: number_or(node, "pivotY", 0.0),
        translate_x: number_or(node, "translateX", 0.0),
        translate_y: number_or(node, "translateY", 0.0),
        scale_x: number_or(node, "scaleX", 1.0),
        scale_y: number_or(node, "scaleY", 1.0),
        rotation: number_or(node, "rotation", 0.0),
        children: Vec::new(),
    };

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "group" => group.children.push(SceneNode::Group(parse_group(child))),
            "path" => group.children.push(SceneNode::Path(parse_path(child))),
            "clip-path" => group.children.push(SceneNode::ClipPath(ClipPath {
                name: attr(child, "name").map(str::to_string),
                path_data: attr(child, "pathData").map(str::to_string),
            })),
            // aapt:attr containers belong to their parent element, not to the tree.
            "attr" => {}
            other => debug!(element = other, "Skipping unknown element"),
        }
    }
    group
}

fn parse_path(node: Node) -> PathNode {
    let mut fill = attr(node, "fillColor").map(|c| Paint::Flat(c.to_string()));
    let mut stroke = attr(node, "strokeColor").map(|c| Paint::Flat(c.to_string()));

    for container in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "attr")
    {
        match container.attribute("name").map(local_name) {
            Some("fillColor") => fill = parse_complex_color(container),
            Some("strokeColor") => stroke = parse_complex_color(container),
            _ => {}
        }
    }

    PathNode {
        name: attr(node, "name").map(str::to_string),
        path_data: attr(node, "pathData").map(str::to_string),
        fill,
        fill_alpha: number_or(node, "fillAlpha", 1.0),
        stroke,
        stroke_alpha: number_or(node, "strokeAlpha", 1.0),
        stroke_width: number_or(node, "strokeWidth", 0.0),
        stroke_line_cap: match attr(node, "strokeLineCap") {
            Some("round") => LineCap::Round,
            Some("square") => LineCap::Square,
            _ => LineCap::Butt,
        },
        stroke_line_join: match attr(node, "strokeLineJoin") {
            Some("round") => LineJoin::Round,
            Some("bevel") => LineJoin::Bevel,
            _ => LineJoin::Miter,
        },
        stroke_miter_limit: number_or(node, "strokeMiterLimit", 4.0),
        trim_path_start: number_or(node, "trimPathStart", 0.0),
        trim_path_end: number_or(node, "trimPathEnd", 1.0),
        trim_path_offset: number_or(node, "trimPathOffset", 0.0),
        fill_rule: match attr(node, "fillType") {
            Some("evenOdd") => FillRule::EvenOdd,
            _ => FillRule::NonZero,
        },
    }
}

/// Only `<gradient>` is understood; any other complex color (e.g. a `<selector>`) yields no paint.
fn parse_complex_color(container: Node) -> Option<Paint> {
    let gradient = container
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "gradient")?;

    let kind = match attr(gradient, "type") {
        None | Some("linear") => GradientKind::Linear,
        Some("radial") => GradientKind::Radial,
        Some("sweep") => GradientKind::Sweep,
        Some(other) => {
            warn!(gradient_type = other, "Unknown gradient type, using linear");
            GradientKind::Linear
        }
    };
    let tile_mode = match attr(gradient, "tileMode") {
        None | Some("clamp") => TileMode::Clamp,
        Some("repeat") => TileMode::Repeat,
        Some("mirror") => TileMode::Mirror,
        Some(other) => {
            warn!(tile_mode = other, "Unknown tile mode, using clamp");
            TileMode::Clamp
        }
    };

    let mut stops: Vec<GradientStop> = gradient
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "item")
        .map(|item| GradientStop {
            offset: number(item, "offset"),
            color: attr(item, "color").unwrap_or_default().to_string(),
        })
        .collect();

    if stops.is_empty() {
        let shorthand = [("startColor", 0.0), ("centerColor", 0.5), ("endColor", 1.0)];
        stops = shorthand
            .into_iter()
            .filter_map(|(key, offset)| {
                attr(gradient, key).map(|color| GradientStop {
                    offset,
                    color: color.to_string(),
                })
            })
            .collect();
    }
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    Some(Paint::Gradient(Gradient {
        kind,
        start_x: number_or(gradient, "startX", 0.0),
        start_y: number_or(gradient, "startY", 0.0),
        end_x: number_or(gradient, "endX", 0.0),
        end_y: number_or(gradient, "endY", 0.0),
        center_x: number_or(gradient, "centerX", 0.0),
        center_y: number_or(gradient, "centerY", 0.0),
        radius: number_or(gradient, "gradientRadius", 0.0),
        tile_mode,
        stops,
    }))
}

// Animations

fn parse_animation(node: Node, start_time_ms: f64, out: &mut Vec<AnimationDescriptor>) {
    match node.tag_name().name() {
        "set" => {
            let sequential = attr(node, "ordering") == Some("sequentially");
            let mut cursor = start_time_ms;

            for child in node.children().filter(|n| n.is_element()) {
                let first = out.len();
                parse_animation(child, cursor, out);

                if sequential {
                    let span = out[first..]
                        .iter()
                        .map(|anim| anim.end_time_ms() - cursor)
                        .fold(0.0_f64, f64::max);
                    cursor += span;
                }
            }
        }
        "objectAnimator" => out.push(parse_object_animator(node, start_time_ms)),
        other => debug!(element = other, "Skipping unsupported animation element"),
    }
}

fn parse_object_animator(node: Node, start_time_ms: f64) -> AnimationDescriptor {
    let property = Property::from_name(attr(node, "propertyName").unwrap_or_default());
    if !property.is_supported() {
        warn!(property = property.name(), "Animated property is not supported");
    }

    let value_from = attr(node, "valueFrom").map(str::to_string);
    let value_to = attr(node, "valueTo").map(str::to_string);

    let value_kind = match attr(node, "valueType") {
        Some("pathType") => ValueKind::Path,
        Some("colorType") => ValueKind::Color,
        _ if property.is_color() => ValueKind::Color,
        None if property == Property::PathData => ValueKind::Path,
        None if value_from.as_deref().is_some_and(|v| v.starts_with('#')) => ValueKind::Color,
        _ => ValueKind::Float,
    };

    AnimationDescriptor {
        start_time_ms: start_time_ms + integer_or(node, "startOffset", 0.0),
        duration_ms: integer_or(node, "duration", 0.0),
        property,
        value_kind,
        value_from,
        value_to,
        interpolator: Interpolator::resolve(attr(node, "interpolator")),
    }
}

// Helpers

fn find_descendant<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Finds `<aapt:attr name="android:{name}">` among the direct children.
fn aapt_attr<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| {
        n.is_element()
            && n.tag_name().name() == "attr"
            && n.attribute("name").map(local_name) == Some(name)
    })
}

/// Looks an attribute up by local name, whatever namespace prefix it carries.
fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

fn local_name(qualified: &str) -> &str {
    qualified
        .split_once(':')
        .map_or(qualified, |(_, local)| local)
}

/// Required numbers: missing or malformed values are `NaN`.
fn number(node: Node, name: &str) -> f32 {
    attr(node, name).map_or(f32::NAN, |v| parse_float_prefix(v) as f32)
}

fn number_or(node: Node, name: &str, default: f32) -> f32 {
    match attr(node, name) {
        Some(v) if !v.is_empty() => parse_float_prefix(v) as f32,
        _ => default,
    }
}

fn integer_or(node: Node, name: &str, default: f64) -> f64 {
    match attr(node, name) {
        Some(v) if !v.is_empty() => parse_int_prefix(v),
        _ => default,
    }
}

/// Parses the longest numeric prefix, so `"24dp"` reads as `24`. No prefix yields `NaN`.
pub fn parse_float_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Integer prefix, truncating any fraction: `"300.7"` reads as `300`.
pub fn parse_int_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return f64::NAN;
    }
    s[..end].parse().unwrap_or(f64::NAN)
}
