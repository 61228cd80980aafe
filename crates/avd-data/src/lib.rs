//! Document model for animated vector drawables and the XML parser that builds it.
pub mod easing;
pub mod error;
pub mod interpolator;
pub mod model;
pub mod parser;

pub use error::ParseError;
pub use interpolator::Interpolator;
pub use keyframe::EasingFunction;
pub use model::*;
pub use parser::parse;
