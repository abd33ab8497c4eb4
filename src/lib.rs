//! # Orrery
//!
//! Interaction core of an Earth and exoplanet viewer: clicking bodies in a 3D
//! scene and flying the camera to them.
//!
//! - [`scene`]: CPU-side scene graph with pick colliders and a perspective camera
//! - [`interaction`]: entity registry, picking resolver, camera transitions
//! - [`app`]: the [`Viewer`] tying it together per frame
//! - [`catalog`]: planet list and planet detail payloads
//! - [`assets`]: channel delivering asynchronously loaded bodies
//!
//! ```rust,ignore
//! use orrery::{Viewer, ViewerSettings};
//!
//! let mut viewer = Viewer::new(ViewerSettings::default())?;
//! viewer.resize(1280, 720);
//! let outcome = viewer.handle_click(glam::Vec2::new(640.0, 360.0), viewer.viewport());
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod app;
pub mod assets;
pub mod bodies;
pub mod catalog;
pub mod errors;
pub mod interaction;
pub mod scene;
pub mod settings;
pub mod utils;

pub use app::input::Input;
pub use app::{ClickOutcome, Viewer};
pub use assets::{AssetEvent, AssetSender, Placement, asset_channel};
pub use catalog::{Catalog, PlanetDetails, PlanetRecord};
pub use errors::{OrreryError, Result};
pub use interaction::{CameraTransition, EntityId, EntityRegistry, PickHit, PointerEvent, TransitionStatus, Viewport};
pub use scene::{Camera, Collider, Node, NodeHandle, Prefab, PrefabNode, Ray, Scene, Transform};
pub use settings::ViewerSettings;
pub use utils::{OrbitControls, Timer};
