//! Skia raster backend: a [`Surface`] over a Skia canvas, plus helpers that rasterize a whole
//! frame to pixels or PNG.

use avd_core::color::Color as AvdColor;
use avd_core::path::bez_path_from_data;
use avd_core::props::TrimWindow;
use avd_core::renderer::{ColorStop, Renderer, ResolvedPaint, StrokeStyle, Surface};
use avd_data::{Document, FillRule, LineCap, LineJoin, TileMode as AvdTileMode};
use glam::{Vec2, Vec4};
use kurbo::{BezPath, PathEl};
use skia_safe::{
    gradient_shader, surfaces, trim_path_effect, AlphaType, Canvas, ClipOp, Color, Color4f,
    ColorType, EncodedImageFormat, ImageInfo, Paint, PaintCap, PaintJoin, PaintStyle, Path,
    PathEffect, PathFillType, Point, Shader, TileMode,
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Largest edge we are willing to allocate a raster for.
pub const MAX_DIMENSION: u32 = 16_384;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Failed to create surface")]
    SurfaceFailure,
    #[error("Failed to encode image")]
    EncodeFailure,
    #[error("Invalid output size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Output raster dimensions and the color every frame is cleared to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    pub background: AvdColor,
}

impl RasterConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: AvdColor::TRANSPARENT,
        }
    }

    /// `viewport × scale`, rounded, never smaller than one pixel.
    pub fn for_document(document: &Document, scale: f32) -> Self {
        let edge = |v: f32| (v * scale).round().max(1.0) as u32;
        Self::new(
            edge(document.viewport_width),
            edge(document.viewport_height),
        )
    }

    pub fn with_background(mut self, background: AvdColor) -> Self {
        self.background = background;
        self
    }

    fn validate(&self) -> Result<(i32, i32), RenderError> {
        let invalid = || RenderError::InvalidSize {
            width: self.width,
            height: self.height,
        };
        if self.width == 0 || self.height == 0 {
            return Err(invalid());
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(invalid());
        }
        Ok((self.width as i32, self.height as i32))
    }
}

/// Straight-alpha RGBA8888 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterFrame {
    /// `[r, g, b, a]`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = self.pixels.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Draws `document` at `time_ms` into a fresh raster surface.
fn rasterize(
    document: &Document,
    time_ms: f64,
    config: &RasterConfig,
) -> Result<skia_safe::Surface, RenderError> {
    let (width, height) = config.validate()?;
    let mut surface =
        surfaces::raster_n32_premul((width, height)).ok_or(RenderError::SurfaceFailure)?;
    {
        let mut target = SkiaSurface::new(surface.canvas(), width as f32, height as f32)
            .with_background(config.background);
        Renderer::draw(document, time_ms, &mut target);
    }
    Ok(surface)
}

#[instrument(skip(document), fields(width = config.width, height = config.height))]
pub fn render_pixels(
    document: &Document,
    time_ms: f64,
    config: &RasterConfig,
) -> Result<RasterFrame, RenderError> {
    let mut surface = rasterize(document, time_ms, config)?;
    let info = ImageInfo::new(
        (config.width as i32, config.height as i32),
        ColorType::RGBA8888,
        AlphaType::Unpremul,
        None,
    );
    let row_bytes = config.width as usize * 4;
    let mut pixels = vec![0u8; row_bytes * config.height as usize];
    if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
        return Err(RenderError::SurfaceFailure);
    }
    Ok(RasterFrame {
        width: config.width,
        height: config.height,
        pixels,
    })
}

#[instrument(skip(document), fields(width = config.width, height = config.height))]
pub fn render_png(
    document: &Document,
    time_ms: f64,
    config: &RasterConfig,
) -> Result<Vec<u8>, RenderError> {
    let mut surface = rasterize(document, time_ms, config)?;
    let image = surface.image_snapshot();
    let data = image
        .encode(None, EncodedImageFormat::PNG, 100)
        .ok_or(RenderError::EncodeFailure)?;
    Ok(data.as_bytes().to_vec())
}

/// [`Surface`] implementation drawing straight onto a Skia canvas.
pub struct SkiaSurface<'a> {
    canvas: &'a Canvas,
    width: f32,
    height: f32,
    background: Color,
    base_save_count: usize,
}

impl<'a> SkiaSurface<'a> {
    pub fn new(canvas: &'a Canvas, width: f32, height: f32) -> Self {
        let base_save_count = canvas.save_count();
        Self {
            canvas,
            width,
            height,
            background: Color::TRANSPARENT,
            base_save_count,
        }
    }

    pub fn with_background(mut self, background: AvdColor) -> Self {
        self.background = to_skia_color(background);
        self
    }
}

impl Surface for SkiaSurface<'_> {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.canvas.restore_to_count(self.base_save_count);
        self.canvas.reset_matrix();
        self.canvas.clear(self.background);
    }

    fn save(&mut self) {
        self.canvas.save();
    }

    fn restore(&mut self) {
        if self.canvas.save_count() > self.base_save_count {
            self.canvas.restore();
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.canvas.translate((sanitize(dx), sanitize(dy)));
    }

    fn rotate(&mut self, radians: f32) {
        self.canvas.rotate(sanitize(radians.to_degrees()), None);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.canvas.scale((sanitize(sx), sanitize(sy)));
    }

    fn clip_path(&mut self, path_data: &str) {
        let path = kurbo_to_skia_path(&bez_path_from_data(path_data));
        self.canvas.clip_path(&path, ClipOp::Intersect, true);
    }

    fn fill_path(
        &mut self,
        path_data: &str,
        paint: &ResolvedPaint,
        opacity: f32,
        rule: FillRule,
        trim: TrimWindow,
    ) {
        let Some(mut skia_paint) = build_paint(paint, opacity, trim) else {
            return;
        };
        skia_paint.set_style(PaintStyle::Fill);

        let mut path = kurbo_to_skia_path(&bez_path_from_data(path_data));
        path.set_fill_type(convert_fill_rule(rule));
        self.canvas.draw_path(&path, &skia_paint);
    }

    fn stroke_path(
        &mut self,
        path_data: &str,
        paint: &ResolvedPaint,
        opacity: f32,
        style: &StrokeStyle,
        trim: TrimWindow,
    ) {
        let Some(mut skia_paint) = build_paint(paint, opacity, trim) else {
            return;
        };
        skia_paint.set_style(PaintStyle::Stroke);
        skia_paint.set_stroke_width(sanitize(style.width).max(0.0));
        skia_paint.set_stroke_cap(convert_cap(style.cap));
        skia_paint.set_stroke_join(convert_join(style.join));
        skia_paint.set_stroke_miter(sanitize(style.miter_limit).max(0.0));

        let path = kurbo_to_skia_path(&bez_path_from_data(path_data));
        self.canvas.draw_path(&path, &skia_paint);
    }
}

/// `None` when the trim leaves nothing to draw or the gradient cannot be built.
fn build_paint(paint: &ResolvedPaint, opacity: f32, trim: TrimWindow) -> Option<Paint> {
    let mut skia_paint = Paint::default();
    skia_paint.set_anti_alias(true);
    let opacity = sanitize(opacity).clamp(0.0, 1.0);

    match paint {
        ResolvedPaint::Solid { color } => {
            let mut c = glam_to_skia_color4f(color.to_vec4());
            c.a *= opacity;
            skia_paint.set_color4f(c, None);
        }
        gradient => {
            skia_paint.set_shader(build_shader(gradient)?);
            skia_paint.set_alpha_f(opacity);
        }
    }

    let effect = match trim {
        TrimWindow::Full => None,
        TrimWindow::Empty => return None,
        TrimWindow::Range { start, end } => {
            PathEffect::trim(start, end, trim_path_effect::Mode::Normal)
        }
        // Everything outside the gap between `end` and `start`.
        TrimWindow::Wrapped { start, end } => {
            PathEffect::trim(end, start, trim_path_effect::Mode::Inverted)
        }
    };
    if let Some(effect) = effect {
        skia_paint.set_path_effect(effect);
    }
    Some(skia_paint)
}

fn build_shader(paint: &ResolvedPaint) -> Option<Shader> {
    let shader = match paint {
        ResolvedPaint::Solid { .. } => None,
        ResolvedPaint::Linear {
            start,
            end,
            stops,
            tile_mode,
        } => {
            let (colors, pos) = split_stops(stops);
            gradient_shader::linear(
                (to_point(*start), to_point(*end)),
                colors.as_slice(),
                Some(pos.as_slice()),
                convert_tile_mode(*tile_mode),
                None,
                None,
            )
        }
        ResolvedPaint::Radial {
            center,
            radius,
            stops,
            tile_mode,
        } => {
            let (colors, pos) = split_stops(stops);
            gradient_shader::radial(
                to_point(*center),
                sanitize(*radius),
                colors.as_slice(),
                Some(pos.as_slice()),
                convert_tile_mode(*tile_mode),
                None,
                None,
            )
        }
        ResolvedPaint::Sweep { center, stops } => {
            let (colors, pos) = split_stops(stops);
            gradient_shader::sweep(
                to_point(*center),
                colors.as_slice(),
                Some(pos.as_slice()),
                TileMode::Clamp,
                None,
                None,
                None,
            )
        }
    };
    if shader.is_none() {
        debug!("Gradient shader could not be built, painting nothing");
    }
    shader
}

fn split_stops(stops: &[ColorStop]) -> (Vec<Color>, Vec<f32>) {
    stops
        .iter()
        .map(|s| (to_skia_color(s.color), sanitize(s.offset).clamp(0.0, 1.0)))
        .unzip()
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn to_point(v: Vec2) -> Point {
    Point::new(sanitize(v.x), sanitize(v.y))
}

fn to_skia_color(c: AvdColor) -> Color {
    Color::from_argb(c.a, c.r, c.g, c.b)
}

fn glam_to_skia_color4f(v: Vec4) -> Color4f {
    Color4f::new(sanitize(v.x), sanitize(v.y), sanitize(v.z), sanitize(v.w))
}

fn kurbo_to_skia_path(bez_path: &BezPath) -> Path {
    let mut path = Path::new();
    let pt = |p: kurbo::Point| (sanitize(p.x as f32), sanitize(p.y as f32));
    for el in bez_path.elements() {
        match el {
            PathEl::MoveTo(p) => {
                path.move_to(pt(*p));
            }
            PathEl::LineTo(p) => {
                path.line_to(pt(*p));
            }
            PathEl::QuadTo(p1, p2) => {
                path.quad_to(pt(*p1), pt(*p2));
            }
            PathEl::CurveTo(p1, p2, p3) => {
                path.cubic_to(pt(*p1), pt(*p2), pt(*p3));
            }
            PathEl::ClosePath => {
                path.close();
            }
        }
    }
    path
}

fn convert_fill_rule(rule: FillRule) -> PathFillType {
    match rule {
        FillRule::NonZero => PathFillType::Winding,
        FillRule::EvenOdd => PathFillType::EvenOdd,
    }
}

fn convert_cap(cap: LineCap) -> PaintCap {
    match cap {
        LineCap::Butt => PaintCap::Butt,
        LineCap::Round => PaintCap::Round,
        LineCap::Square => PaintCap::Square,
    }
}

fn convert_join(join: LineJoin) -> PaintJoin {
    match join {
        LineJoin::Miter => PaintJoin::Miter,
        LineJoin::Round => PaintJoin::Round,
        LineJoin::Bevel => PaintJoin::Bevel,
    }
}

fn convert_tile_mode(mode: AvdTileMode) -> TileMode {
    match mode {
        AvdTileMode::Clamp => TileMode::Clamp,
        AvdTileMode::Repeat => TileMode::Repeat,
        AvdTileMode::Mirror => TileMode::Mirror,
    }
}
