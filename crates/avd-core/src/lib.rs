//! Animation evaluation and scene rendering for animated vector drawables.
//!
//! [`animator::Animator`] turns an [`avd_data::AnimatorTable`] into per-target property
//! overrides for a point in time, and [`renderer::Renderer`] walks the shape tree with those
//! overrides applied, issuing calls against any [`renderer::Surface`].

pub mod animator;
pub mod color;
pub mod display_list;
pub mod error;
pub mod morph;
pub mod path;
pub mod props;
pub mod renderer;

pub use animator::{AnimatedValue, Animator, Overrides};
pub use color::Color;
pub use display_list::{DisplayList, DrawOp};
pub use avd_data::{easing, EasingFunction};
pub use error::ValueError;
pub use renderer::{Renderer, ResolvedPaint, StrokeStyle, Surface};
