//! # AVD Engine
//!
//! Renders Android animated vector drawables at arbitrary points in time.
//!
//! The work is split across three crates that this one re-exports:
//! - [`avd_data`]: the document model and XML parser.
//! - [`avd_core`]: easing, path morphing, animation evaluation and the scene renderer, written
//!   against an abstract [`Surface`].
//! - [`avd_skia`]: a Skia raster [`Surface`] and PNG output.
//!
//! ```no_run
//! let text = std::fs::read_to_string("ic_spinner.xml").unwrap();
//! let document = avd_engine::parse_document(&text).unwrap();
//! let config = avd_engine::RasterConfig::for_document(&document, 4.0);
//! let png = avd_engine::render_png(&document, 250.0, &config).unwrap();
//! std::fs::write("frame.png", png).unwrap();
//! ```

pub use avd_core::{self, DisplayList, Surface};
pub use avd_data::{self, Document, ParseError};
pub use avd_skia::{self, RasterConfig, RasterFrame, RenderError};

use avd_core::Renderer;
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Parses drawable XML, either a bare `<vector>` or an `<animated-vector>` with an inline
/// drawable.
pub fn parse_document(text: &str) -> Result<Document, ParseError> {
    avd_data::parse(text)
}

/// Repaints `surface` with the document as it looks at `time_ms`.
pub fn render_frame(document: &Document, time_ms: f64, surface: &mut dyn Surface) {
    Renderer::draw(document, time_ms, surface);
}

/// Rasterizes one frame and encodes it as PNG.
pub fn render_png(
    document: &Document,
    time_ms: f64,
    config: &RasterConfig,
) -> Result<Vec<u8>, RenderError> {
    avd_skia::render_png(document, time_ms, config)
}

/// Parse and rasterize in one step, sizing the output as `viewport × scale`.
#[instrument(skip(text))]
pub fn render_text_to_png(text: &str, time_ms: f64, scale: f32) -> Result<Vec<u8>, EngineError> {
    let document = parse_document(text)?;
    let config = RasterConfig::for_document(&document, scale);
    Ok(render_png(&document, time_ms, &config)?)
}
