//! Viewer
//!
//! [`Viewer`] owns everything the interaction core needs for one window: the
//! scene, the camera node, orbit controls, the entity registry, the camera
//! transition and the receiving end of the asset channel. The host drives it:
//!
//! - window events go into [`Viewer::input`] (and [`Viewer::resize`]),
//! - asset loaders post results through [`Viewer::asset_sender`],
//! - once per displayed frame the host calls [`Viewer::frame`] with a
//!   monotonic timestamp in milliseconds.
//!
//! ```rust,ignore
//! let mut viewer = Viewer::new(ViewerSettings::default())?;
//! viewer.resize(1280, 720);
//! let loader = viewer.asset_sender();
//! // ... hand `loader` to whatever loads the models ...
//! loop {
//!     viewer.frame(timer.timestamp_ms());
//! }
//! ```

pub mod input;

use glam::{Quat, Vec2, Vec3};

use crate::assets::{AssetEvent, AssetReceiver, AssetSender, asset_channel};
use crate::bodies::{self, SpawnedBody};
use crate::catalog::{Catalog, PlanetRecord};
use crate::errors::Result;
use crate::interaction::picking::{self, PickHit, PointerEvent, Viewport};
use crate::interaction::registry::{EntityId, EntityRegistry};
use crate::interaction::transition::{CameraTransition, TransitionStatus};
use crate::scene::{Camera, NodeHandle, Scene};
use crate::settings::ViewerSettings;
use crate::utils::orbit_control::OrbitControls;

use self::input::Input;

/// What a click should do to the info display.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Show `text` for `entity` next to the cursor at `anchor`.
    Info {
        entity: EntityId,
        text: String,
        anchor: Vec2,
    },
    /// Nothing was hit; hide the info display.
    Hidden,
}

pub struct Viewer {
    pub settings: ViewerSettings,
    pub scene: Scene,
    pub registry: EntityRegistry,
    pub controls: OrbitControls,
    pub transition: CameraTransition,
    pub input: Input,

    camera: NodeHandle,
    viewport: Viewport,
    spinning: Vec<NodeHandle>,

    assets_tx: AssetSender,
    assets_rx: AssetReceiver,
    selected_planet: Option<String>,

    last_frame_ms: Option<f64>,
    last_click: Option<ClickOutcome>,
}

impl Viewer {
    /// Builds the scene with the camera and the Earth in place.
    pub fn new(settings: ViewerSettings) -> Result<Self> {
        settings.validate()?;

        let mut scene = Scene::new();
        let camera = scene.add_camera(Camera::new_perspective(
            settings.camera_fov_degrees,
            1.0,
            settings.camera_near,
            settings.camera_far,
        ));
        scene.active_camera = Some(camera);

        let mut controls = OrbitControls::new(Vec3::ZERO, 1.0);
        if let Some(node) = scene.get_node_mut(camera) {
            node.transform.position = settings.camera_start;
            node.transform.look_at(Vec3::ZERO, Vec3::Y);
            controls.sync(&node.transform);
        }

        let mut registry = EntityRegistry::new();
        let earth = bodies::spawn_earth(&mut scene, &settings);
        registry.register(EntityId::Earth, earth.root, Vec3::ZERO);

        scene.update_matrix_world();

        let (assets_tx, assets_rx) = asset_channel();
        log::info!("Viewer ready, camera at {}", settings.camera_start);

        Ok(Self {
            settings,
            scene,
            registry,
            controls,
            transition: CameraTransition::new(),
            input: Input::new(),

            camera,
            viewport: Viewport::new(1.0, 1.0),
            spinning: earth.spin.into_iter().collect(),

            assets_tx,
            assets_rx,
            selected_planet: None,

            last_frame_ms: None,
            last_click: None,
        })
    }

    /// A sender for asset loaders. Results are picked up on the next frame.
    #[must_use]
    pub fn asset_sender(&self) -> AssetSender {
        self.assets_tx.clone()
    }

    /// Planet to fly to as soon as it finishes loading.
    pub fn select_planet(&mut self, name: Option<String>) {
        if let Some(name) = &name {
            log::info!("Preselected planet: {name}");
        }
        self.selected_planet = name;
    }

    #[must_use]
    pub fn selected_planet(&self) -> Option<&str> {
        self.selected_planet.as_deref()
    }

    /// Catalog planets close enough to the camera to be worth loading.
    #[must_use]
    pub fn planets_to_load<'a>(&self, catalog: &'a Catalog) -> Vec<&'a PlanetRecord> {
        let origin = self.camera_position();
        catalog
            .within(origin, self.settings.catalog_max_distance)
            .collect()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.input.inject_resize(width, height);
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::new(width as f32, height as f32);
        if let Some((_, camera)) = self.scene.query_camera_bundle(self.camera) {
            camera.resize(width, height);
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn camera_node(&self) -> NodeHandle {
        self.camera
    }

    #[must_use]
    pub fn camera_position(&self) -> Vec3 {
        self.scene
            .get_node(self.camera)
            .map_or(Vec3::ZERO, |node| node.transform.position)
    }

    /// The outcome of the most recent click, if any.
    #[must_use]
    pub fn last_click(&self) -> Option<&ClickOutcome> {
        self.last_click.as_ref()
    }

    // ========================================================================
    // Picking
    // ========================================================================

    /// Picks the body under `cursor` without acting on it.
    pub fn pick(&mut self, cursor: Vec2, viewport: Viewport) -> Option<PickHit> {
        self.scene.update_matrix_world();
        let camera = self.scene.get_camera(self.camera)?;
        let roots = self.registry.roots();
        picking::pick(
            PointerEvent::from(cursor),
            viewport,
            camera,
            &self.scene,
            &roots,
            &self.registry,
        )
    }

    /// Handles a click at `cursor`: reports the info text of the body hit and
    /// starts flying to it when it is an exoplanet.
    pub fn handle_click(&mut self, cursor: Vec2, viewport: Viewport) -> ClickOutcome {
        let outcome = match self.pick(cursor, viewport) {
            Some(hit) => {
                if hit.entity.is_exoplanet() {
                    self.jump_to(&hit.entity);
                }
                ClickOutcome::Info {
                    text: hit.entity.info_text(),
                    entity: hit.entity,
                    anchor: cursor,
                }
            }
            None => ClickOutcome::Hidden,
        };
        self.last_click = Some(outcome.clone());
        outcome
    }

    // ========================================================================
    // Camera
    // ========================================================================

    /// Starts flying the camera to `entity`. Returns `false` when the entity
    /// is not loaded (yet).
    pub fn jump_to(&mut self, entity: &EntityId) -> bool {
        let Some(root) = self.registry.root(entity) else {
            log::warn!("Cannot jump to {entity}: not loaded");
            return false;
        };
        let Some(target) = self
            .scene
            .world_position(root)
            .or_else(|| self.registry.position(entity))
        else {
            return false;
        };
        let Some(camera) = self.scene.get_node(self.camera) else {
            return false;
        };

        self.transition.begin(
            &camera.transform,
            target,
            self.settings.jump_offset,
            self.settings.jump_duration_seconds,
        );
        true
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advances the viewer to the frame at `timestamp_ms`:
    /// 1. spawns and registers bodies whose loads completed,
    /// 2. handles a click completed since the last frame,
    /// 3. spins the bodies,
    /// 4. moves the camera (flight in progress, otherwise orbit controls),
    /// 5. refreshes world matrices and the camera's view-projection.
    pub fn frame(&mut self, timestamp_ms: f64) -> TransitionStatus {
        let dt = self
            .last_frame_ms
            .map_or(0.0, |last| ((timestamp_ms - last) / 1000.0).max(0.0) as f32);
        self.last_frame_ms = Some(timestamp_ms);

        self.process_asset_events();

        if let Some(cursor) = self.input.click() {
            self.handle_click(cursor, self.viewport);
        }

        let spin = Quat::from_rotation_y(self.settings.body_spin_rate * dt);
        for &handle in &self.spinning {
            if let Some(node) = self.scene.get_node_mut(handle) {
                node.transform.rotation = node.transform.rotation * spin;
            }
        }

        let fov = self
            .scene
            .get_camera(self.camera)
            .map_or(self.settings.camera_fov_degrees, Camera::fov_degrees);
        let status = match self.scene.get_node_mut(self.camera) {
            Some(camera) => {
                let status = self
                    .transition
                    .tick(timestamp_ms, &mut camera.transform, &mut self.controls);
                if status == TransitionStatus::Idle {
                    self.controls
                        .update(&mut camera.transform, &self.input, fov, dt);
                }
                status
            }
            None => TransitionStatus::Idle,
        };

        self.scene.update_matrix_world();
        self.input.start_frame();
        status
    }

    fn process_asset_events(&mut self) {
        for event in self.assets_rx.drain() {
            match event {
                AssetEvent::Loaded {
                    entity,
                    prefab,
                    placement,
                } => {
                    let body =
                        bodies::spawn_body(&mut self.scene, &entity, &prefab, placement, &self.settings);
                    self.add_body(entity, &body);
                }
                AssetEvent::Failed { entity, reason } => {
                    log::error!("Failed to load {entity}: {reason}");
                }
            }
        }
    }

    fn add_body(&mut self, entity: EntityId, body: &SpawnedBody) {
        if let Some(previous) = self.registry.root(&entity) {
            log::warn!("{entity} loaded again, replacing its previous nodes");
            self.scene.remove_node(previous);
            self.spinning.retain(|&handle| self.scene.get_node(handle).is_some());
        }

        let position = self.scene.world_position(body.root).unwrap_or(Vec3::ZERO);
        self.registry.register(entity.clone(), body.root, position);
        self.spinning.extend(body.spin);

        if let EntityId::Exoplanet(name) = &entity
            && self.selected_planet.as_deref() == Some(name.as_str())
        {
            log::info!("Preselected planet {name} loaded, jumping");
            self.jump_to(&entity);
        }
    }
}
