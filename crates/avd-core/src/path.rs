//! Path data tokenizing and conversion to geometry.
//!
//! The tokenizer is deliberately permissive: any ASCII letter starts a command and every number
//! that follows becomes one of its arguments, whatever the letter means. Geometry conversion is
//! where SVG semantics (relative forms, implicit repeats, reflected control points) apply.

use kurbo::{Arc, BezPath, Point, SvgArc, Vec2};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathCommand {
    pub letter: char,
    pub args: Vec<f64>,
}

/// Splits path data into commands. Numbers seen before the first letter are dropped.
pub fn parse(data: &str) -> Vec<PathCommand> {
    let bytes = data.as_bytes();
    let mut commands: Vec<PathCommand> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphabetic() {
            commands.push(PathCommand {
                letter: b as char,
                args: Vec::new(),
            });
            i += 1;
            continue;
        }
        match scan_number(bytes, i) {
            Some(end) => {
                let value = data[i..end].parse::<f64>().unwrap_or(f64::NAN);
                if let Some(current) = commands.last_mut() {
                    current.args.push(value);
                }
                i = end;
            }
            None => i += 1,
        }
    }
    commands
}

/// Matches `[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?` at `start`, returning the end offset.
fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = start;
    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        if frac_end > int_end + 1 {
            end = frac_end;
        }
    }
    if end == i {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    Some(end)
}

fn arity(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'C' => Some(6),
        'S' | 'Q' => Some(4),
        'A' => Some(7),
        'Z' => Some(0),
        _ => None,
    }
}

/// Builds geometry from a command sequence. Unknown letters and trailing incomplete argument
/// groups are ignored.
pub fn to_bez_path(commands: &[PathCommand]) -> BezPath {
    let mut path = BezPath::new();
    let mut current = Point::ZERO;
    let mut subpath_start = Point::ZERO;
    // Control point of the previous C/S (cubic) or Q/T (quad) segment, for reflection.
    let mut last_cubic: Option<Point> = None;
    let mut last_quad: Option<Point> = None;
    let mut open = false;

    for cmd in commands {
        let Some(n) = arity(cmd.letter) else {
            debug!(letter = %cmd.letter, "Skipping unknown path command");
            continue;
        };
        let relative = cmd.letter.is_ascii_lowercase();
        let upper = cmd.letter.to_ascii_uppercase();

        if n == 0 {
            if open {
                path.close_path();
                open = false;
            }
            current = subpath_start;
            last_cubic = None;
            last_quad = None;
            continue;
        }

        for (index, a) in cmd.args.chunks_exact(n).enumerate() {
            let base = if relative { current.to_vec2() } else { Vec2::ZERO };
            let pt = |x: f64, y: f64| Point::new(x, y) + base;

            // Anything drawn before a moveto starts at the current point.
            if upper != 'M' && !open {
                path.move_to(current);
                subpath_start = current;
                open = true;
            }

            let (next_cubic, next_quad) = match upper {
                'M' if index == 0 => {
                    current = pt(a[0], a[1]);
                    path.move_to(current);
                    subpath_start = current;
                    open = true;
                    (None, None)
                }
                'M' | 'L' => {
                    current = pt(a[0], a[1]);
                    path.line_to(current);
                    (None, None)
                }
                'H' => {
                    current = Point::new(a[0] + base.x, current.y);
                    path.line_to(current);
                    (None, None)
                }
                'V' => {
                    current = Point::new(current.x, a[0] + base.y);
                    path.line_to(current);
                    (None, None)
                }
                'C' => {
                    let c1 = pt(a[0], a[1]);
                    let c2 = pt(a[2], a[3]);
                    current = pt(a[4], a[5]);
                    path.curve_to(c1, c2, current);
                    (Some(c2), None)
                }
                'S' => {
                    let c1 = reflect(last_cubic, current);
                    let c2 = pt(a[0], a[1]);
                    current = pt(a[2], a[3]);
                    path.curve_to(c1, c2, current);
                    (Some(c2), None)
                }
                'Q' => {
                    let c = pt(a[0], a[1]);
                    current = pt(a[2], a[3]);
                    path.quad_to(c, current);
                    (None, Some(c))
                }
                'T' => {
                    let c = reflect(last_quad, current);
                    current = pt(a[0], a[1]);
                    path.quad_to(c, current);
                    (None, Some(c))
                }
                'A' => {
                    let to = pt(a[5], a[6]);
                    let arc = SvgArc {
                        from: current,
                        to,
                        radii: Vec2::new(a[0].abs(), a[1].abs()),
                        x_rotation: a[2].to_radians(),
                        large_arc: a[3] != 0.0,
                        sweep: a[4] != 0.0,
                    };
                    match Arc::from_svg_arc(&arc) {
                        Some(arc) => path.extend(arc.append_iter(0.1)),
                        None => path.line_to(to),
                    }
                    current = to;
                    (None, None)
                }
                _ => (None, None),
            };
            last_cubic = next_cubic;
            last_quad = next_quad;
        }
    }
    path
}

fn reflect(control: Option<Point>, around: Point) -> Point {
    match control {
        Some(c) => around + (around - c),
        None => around,
    }
}

/// Convenience for backends: tokenize then build geometry.
pub fn bez_path_from_data(data: &str) -> BezPath {
    to_bez_path(&parse(data))
}
