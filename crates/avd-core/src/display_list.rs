use crate::props::TrimWindow;
use crate::renderer::{ResolvedPaint, StrokeStyle, Surface};
use avd_data::FillRule;
use glam::{Affine2, Vec2};
use serde::Serialize;

/// One recorded surface call. Geometry ops carry the absolute transform in effect when they
/// were issued, as column-major `[a, b, c, d, tx, ty]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Clear,
    Save,
    Restore,
    Clip {
        path: String,
        transform: [f32; 6],
    },
    Fill {
        path: String,
        paint: ResolvedPaint,
        opacity: f32,
        rule: FillRule,
        trim: TrimWindow,
        transform: [f32; 6],
    },
    Stroke {
        path: String,
        paint: ResolvedPaint,
        opacity: f32,
        style: StrokeStyle,
        trim: TrimWindow,
        transform: [f32; 6],
    },
}

/// A headless surface that records what would be drawn.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayList {
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
    #[serde(skip)]
    current: Affine2,
    #[serde(skip)]
    stack: Vec<Affine2>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            current: Affine2::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Paths that were filled or stroked, in paint order.
    pub fn painted_paths(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { path, .. } | DrawOp::Stroke { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    fn snapshot(&self) -> [f32; 6] {
        self.current.to_cols_array()
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.stack.clear();
        self.current = Affine2::IDENTITY;
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.stack.push(self.current);
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        // Unbalanced restores are ignored, as on a canvas.
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
            self.ops.push(DrawOp::Restore);
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.current = self.current * Affine2::from_translation(Vec2::new(dx, dy));
    }

    fn rotate(&mut self, radians: f32) {
        self.current = self.current * Affine2::from_angle(radians);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.current = self.current * Affine2::from_scale(Vec2::new(sx, sy));
    }

    fn clip_path(&mut self, path_data: &str) {
        self.ops.push(DrawOp::Clip {
            path: path_data.to_string(),
            transform: self.snapshot(),
        });
    }

    fn fill_path(
        &mut self,
        path_data: &str,
        paint: &ResolvedPaint,
        opacity: f32,
        rule: FillRule,
        trim: TrimWindow,
    ) {
        self.ops.push(DrawOp::Fill {
            path: path_data.to_string(),
            paint: paint.clone(),
            opacity,
            rule,
            trim,
            transform: self.snapshot(),
        });
    }

    fn stroke_path(
        &mut self,
        path_data: &str,
        paint: &ResolvedPaint,
        opacity: f32,
        style: &StrokeStyle,
        trim: TrimWindow,
    ) {
        self.ops.push(DrawOp::Stroke {
            path: path_data.to_string(),
            paint: paint.clone(),
            opacity,
            style: *style,
            trim,
            transform: self.snapshot(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_stack() {
        let mut list = DisplayList::new(10.0, 10.0);
        list.clear();
        list.save();
        list.translate(5.0, 0.0);
        list.scale(2.0, 2.0);
        let p = list.current.transform_point2(Vec2::new(1.0, 1.0));
        assert_eq!(p, Vec2::new(7.0, 2.0));
        list.restore();
        assert_eq!(list.current, Affine2::IDENTITY);
        // Extra restores are dropped.
        list.restore();
        assert_eq!(list.ops(), &[DrawOp::Clear, DrawOp::Save, DrawOp::Restore]);
    }

    #[test]
    fn test_clear_discards_previous_frame() {
        let mut list = DisplayList::new(10.0, 10.0);
        list.save();
        list.clip_path("M0,0 L1,1");
        list.clear();
        assert_eq!(list.ops(), &[DrawOp::Clear]);
    }
}
