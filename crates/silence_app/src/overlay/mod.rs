//! Overlay badge: placement, visibility, fades and drag positioning.

pub mod animation;
pub mod model;
pub mod placement;
pub mod snap;
pub mod visibility;

pub use model::{Action, Effect, Model, OverlayVisual, Phase, PointerState};
pub use placement::{Monitor, MonitorId, OverlayPlacement, resolve_work_area};
pub use visibility::{VisibilityMode, VisibilityPolicy};
