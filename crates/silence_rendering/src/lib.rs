pub mod badge;
pub mod error;
pub mod icons;
pub mod layout;
pub mod pixels;
pub mod text;
pub mod types;

pub use badge::{BackgroundStyle, BadgeBitmap, BadgeContent, BadgeRenderer, BadgeStyle, IconStyle};
pub use error::{RenderError, RenderResult};
pub use layout::{BadgeLayout, anchor_shift};
pub use text::{FixedAdvanceMeasurer, SvgTextEngine, TextMeasurer};
pub use types::{Color, Point, Rectangle, Size};
