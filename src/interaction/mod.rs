//! Interaction core
//!
//! - [`registry`]: render node to body resolution
//! - [`picking`]: pointer position to body under the cursor
//! - [`transition`]: the camera fly-to state machine

pub mod picking;
pub mod registry;
pub mod transition;

pub use picking::{PickHit, PointerEvent, Viewport, pick};
pub use registry::{Entity, EntityId, EntityRegistry};
pub use transition::{CameraTransition, Flight, TransitionStatus};
