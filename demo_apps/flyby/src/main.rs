//! Flyby
//!
//! Runs the viewer without a window: a loader thread delivers the Sun and two
//! exoplanets, the demo clicks whatever sits under a planet's projection and
//! steps frames until the camera has arrived.
//!
//! Planets from a catalog file need a model at
//! `models/exoplanet/<Name>/scene.gltf` next to the catalog; the file only has
//! to exist, a sphere stands in for it.
//!
//! ```text
//! cargo run -p flyby -- [?planet=Name] [planets.json]
//! RUST_LOG=debug cargo run -p flyby
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use glam::{Vec2, Vec3};
use orrery::catalog::{Catalog, selected_planet_from_query};
use orrery::{
    AssetSender, ClickOutcome, EntityId, OrreryError, Placement, Prefab, Timer, TransitionStatus,
    Viewer, ViewerSettings,
};

const FRAME: Duration = Duration::from_millis(16);

/// One body for the loader thread. `model` is `None` for bundled bodies.
struct LoadJob {
    entity: EntityId,
    placement: Placement,
    model: Option<PathBuf>,
}

/// Bodies the viewer always ships with, besides the Earth.
fn builtin_bodies() -> Vec<LoadJob> {
    [
        (EntityId::Sun, Placement::new(Vec3::new(50.0, 0.0, 0.0), 3.0)),
        (
            EntityId::exoplanet("Kepler-186F"),
            Placement::new(Vec3::new(278.0, 0.0, 0.0), 1.5),
        ),
        (
            EntityId::exoplanet("LP 791-18d"),
            Placement::new(Vec3::new(100.0, -43.0, 0.0), 1.2),
        ),
    ]
    .into_iter()
    .map(|(entity, placement)| LoadJob {
        entity,
        placement,
        model: None,
    })
    .collect()
}

fn load_model(job: &LoadJob) -> orrery::Result<(Prefab, Placement)> {
    if let Some(path) = &job.model
        && !path.is_file()
    {
        return Err(OrreryError::AssetLoadFailed {
            entity: job.entity.label().to_string(),
            reason: format!("no model at {}", path.display()),
        });
    }
    let prefab = Prefab::sphere(&format!("{}_mesh", job.entity.label()), 1.0);
    Ok((prefab, job.placement))
}

fn spawn_loader(sender: AssetSender, jobs: Vec<LoadJob>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for job in jobs {
            // Pretend the model download takes a few frames.
            thread::sleep(FRAME * 3);
            let result = load_model(&job);
            if let Err(e) = sender.send_result(job.entity, result) {
                log::error!("Loader stopped: {e}");
                return;
            }
        }
    })
}

/// Steps frames in real time until `done` holds or `limit` frames have passed.
fn run_frames(
    viewer: &mut Viewer,
    timer: &mut Timer,
    limit: usize,
    mut done: impl FnMut(&Viewer, TransitionStatus) -> bool,
) -> TransitionStatus {
    let mut status = TransitionStatus::Idle;
    for _ in 0..limit {
        timer.tick();
        status = viewer.frame(timer.timestamp_ms());
        if done(viewer, status) {
            break;
        }
        thread::sleep(FRAME);
    }
    status
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut query = None;
    let mut catalog_path = None;
    for arg in std::env::args().skip(1) {
        if arg.starts_with('?') {
            query = Some(arg);
        } else {
            catalog_path = Some(arg);
        }
    }

    // 1. Viewer
    let mut viewer = Viewer::new(ViewerSettings::default())?;
    viewer.resize(1280, 720);
    viewer.select_planet(query.as_deref().and_then(selected_planet_from_query));

    // 2. Bodies to load
    let mut bodies = builtin_bodies();
    if let Some(path) = catalog_path {
        let path = PathBuf::from(path);
        let catalog = Catalog::from_json(&std::fs::read_to_string(&path)?)?;
        let models = path.parent().unwrap_or(&path).join("models").join("exoplanet");
        for planet in viewer.planets_to_load(&catalog) {
            bodies.push(LoadJob {
                entity: EntityId::exoplanet(planet.name.clone()),
                placement: Placement::new(planet.position, planet.size_earth_radii),
                model: Some(models.join(&planet.name).join("scene.gltf")),
            });
        }
    }
    let loader = spawn_loader(viewer.asset_sender(), bodies);

    // 3. Wait for the loads
    let mut timer = Timer::new();
    run_frames(&mut viewer, &mut timer, 600, |_, _| loader.is_finished());
    if loader.join().is_err() {
        log::error!("Loader thread panicked");
    }
    // Events sent after the last frame's drain.
    timer.tick();
    viewer.frame(timer.timestamp_ms());
    log::info!("{} bodies registered", viewer.registry.len());

    // 4. Click a planet unless one was preselected
    if !viewer.transition.is_running() {
        let target = EntityId::exoplanet("LP 791-18d");
        let Some(position) = viewer.registry.position(&target) else {
            anyhow::bail!("{target} never loaded");
        };
        let Some(camera) = viewer.scene.get_camera(viewer.camera_node()) else {
            anyhow::bail!("viewer has no camera");
        };
        let ndc = camera.project(position).truncate();
        if ndc.abs().max_element() <= 1.0 {
            let at = viewer.viewport().pointer_at(ndc);
            match viewer.handle_click(Vec2::new(at.x, at.y), viewer.viewport()) {
                ClickOutcome::Info { text, .. } => log::info!("Clicked: {text}"),
                ClickOutcome::Hidden => log::warn!("Nothing under the cursor at ({}, {})", at.x, at.y),
            }
        } else {
            log::info!("{target} is off screen, jumping without a click");
            viewer.jump_to(&target);
        }
    }

    // 5. Fly
    let status = run_frames(&mut viewer, &mut timer, 600, |v, status| {
        if let TransitionStatus::Running { t } = status {
            log::debug!("t = {t:.2}, camera at {}", v.camera_position());
        }
        status == TransitionStatus::Finished
    });

    if status == TransitionStatus::Finished {
        log::info!("Arrived at {}", viewer.camera_position());
    } else {
        log::info!("No flight; camera stays at {}", viewer.camera_position());
    }
    Ok(())
}
