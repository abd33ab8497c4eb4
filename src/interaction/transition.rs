//! Camera transition controller.
//!
//! Flies the camera from wherever it is to a fixed offset from a target body,
//! keeping the camera aimed at the body and the orbit controls anchored on it
//! for the whole flight.
//!
//! The controller is an explicit state machine fed by the frame loop:
//!
//! ```text
//!            begin()                     t >= 1
//!   Idle ───────────────▶ Running ───────────────▶ Idle
//!     ▲                    │  ▲ tick(): t < 1
//!     └──── cancel() ──────┘  └──┘
//! ```
//!
//! Calling [`CameraTransition::begin`] while a flight is in progress replaces
//! it; the old flight never gets another tick.

use glam::Vec3;

use crate::scene::transform::Transform;
use crate::utils::orbit_control::OrbitControls;

/// What a call to [`CameraTransition::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStatus {
    /// No flight in progress; nothing was touched.
    Idle,
    /// The camera moved; `t` is the normalized progress in `[0, 1)`.
    Running { t: f32 },
    /// The camera was snapped onto the end position. The controller is idle
    /// again.
    Finished,
}

/// An in-flight camera move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    pub start_position: Vec3,
    pub end_position: Vec3,
    /// Point the camera keeps looking at (the target body).
    pub look_target: Vec3,
    pub duration_seconds: f32,
    /// Frame timestamp of the first tick, in milliseconds.
    start_time_ms: Option<f64>,
}

impl Flight {
    /// Camera position at normalized progress `t` (clamped to `[0, 1]`).
    ///
    /// Plain linear interpolation, no easing. `t = 1` yields exactly the end
    /// position.
    #[must_use]
    pub fn position_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return self.end_position;
        }
        self.start_position.lerp(self.end_position, t)
    }

    /// Normalized progress at `timestamp_ms`, once the flight has started.
    #[must_use]
    pub fn progress(&self, timestamp_ms: f64) -> Option<f32> {
        let start = self.start_time_ms?;
        if self.duration_seconds <= 0.0 {
            return Some(1.0);
        }
        let elapsed_seconds = (timestamp_ms - start) / 1000.0;
        Some((elapsed_seconds / f64::from(self.duration_seconds)).clamp(0.0, 1.0) as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum State {
    #[default]
    Idle,
    Running(Flight),
}

/// Drives camera fly-to animations from per-frame timestamps.
#[derive(Debug, Clone, Default)]
pub struct CameraTransition {
    state: State,
}

impl CameraTransition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts flying the camera in `camera` towards `target + offset`.
    ///
    /// The start position is captured now; the clock starts at the first
    /// [`tick`](Self::tick). Supersedes any flight already in progress.
    pub fn begin(&mut self, camera: &Transform, target: Vec3, offset: Vec3, duration_seconds: f32) {
        debug_assert!(target.is_finite(), "transition target must be a finite position");
        debug_assert!(offset.is_finite(), "transition offset must be finite");

        if let State::Running(previous) = self.state {
            log::debug!("Superseding camera flight towards {}", previous.look_target);
        }

        let flight = Flight {
            start_position: camera.position,
            end_position: target + offset,
            look_target: target,
            duration_seconds,
            start_time_ms: None,
        };
        log::info!(
            "Camera flight {} -> {} over {duration_seconds}s",
            flight.start_position,
            flight.end_position
        );
        self.state = State::Running(flight);
    }

    /// Drops the flight in progress, leaving the camera where it is.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// The flight in progress, if any.
    #[must_use]
    pub fn flight(&self) -> Option<&Flight> {
        match &self.state {
            State::Running(flight) => Some(flight),
            State::Idle => None,
        }
    }

    /// Camera position the flight in progress would have at normalized
    /// progress `t`, without touching any state.
    #[must_use]
    pub fn sample(&self, t: f32) -> Option<Vec3> {
        self.flight().map(|flight| flight.position_at(t))
    }

    /// Advances the flight to the frame at `timestamp_ms`.
    ///
    /// `timestamp_ms` must come from a monotonic frame clock. The camera is
    /// moved along the line, re-aimed at the target, and the orbit anchor is
    /// set to the target. Once the duration has elapsed the camera is snapped
    /// exactly onto the end position and the controller goes idle.
    pub fn tick(&mut self, timestamp_ms: f64, camera: &mut Transform, controls: &mut OrbitControls) -> TransitionStatus {
        let State::Running(flight) = &mut self.state else {
            return TransitionStatus::Idle;
        };

        let start = *flight.start_time_ms.get_or_insert(timestamp_ms);
        if timestamp_ms < start {
            log::warn!("Frame timestamp went backwards ({timestamp_ms} < {start})");
        }

        let t = flight.progress(timestamp_ms).unwrap_or(0.0);
        let flight = *flight;

        if t >= 1.0 {
            camera.position = flight.end_position;
            Self::aim(&flight, camera, controls);
            self.state = State::Idle;
            log::debug!("Camera flight finished at {}", flight.end_position);
            return TransitionStatus::Finished;
        }

        camera.position = flight.position_at(t);
        Self::aim(&flight, camera, controls);
        TransitionStatus::Running { t }
    }

    fn aim(flight: &Flight, camera: &mut Transform, controls: &mut OrbitControls) {
        camera.look_at(flight.look_target, Vec3::Y);
        controls.target = flight.look_target;
        controls.sync(camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Transform, OrbitControls) {
        let camera = Transform::from_position(Vec3::new(0.0, 0.0, 10.0));
        let controls = OrbitControls::looking_from(&camera, Vec3::ZERO);
        (camera, controls)
    }

    #[test]
    fn idle_tick_does_nothing() {
        let (mut camera, mut controls) = setup();
        let mut transition = CameraTransition::new();

        assert_eq!(transition.tick(0.0, &mut camera, &mut controls), TransitionStatus::Idle);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn first_tick_starts_the_clock() {
        let (mut camera, mut controls) = setup();
        let mut transition = CameraTransition::new();
        transition.begin(&camera, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 1.0);

        let status = transition.tick(5_000.0, &mut camera, &mut controls);
        assert_eq!(status, TransitionStatus::Running { t: 0.0 });
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(controls.target, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn zero_duration_snaps_on_first_tick() {
        let (mut camera, mut controls) = setup();
        let mut transition = CameraTransition::new();
        transition.begin(&camera, Vec3::new(3.0, 4.0, 5.0), Vec3::Y, 0.0);

        assert_eq!(transition.tick(0.0, &mut camera, &mut controls), TransitionStatus::Finished);
        assert_eq!(camera.position, Vec3::new(3.0, 5.0, 5.0));
        assert!(!transition.is_running());
    }

    #[test]
    fn sample_follows_the_line() {
        let (camera, _) = setup();
        let mut transition = CameraTransition::new();
        assert_eq!(transition.sample(0.5), None);

        transition.begin(&camera, Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO, 2.0);
        assert_eq!(transition.sample(0.0), Some(Vec3::new(0.0, 0.0, 10.0)));
        assert_eq!(transition.sample(0.5), Some(Vec3::ZERO));
        assert_eq!(transition.sample(1.0), Some(Vec3::new(0.0, 0.0, -10.0)));
        assert_eq!(transition.sample(7.0), Some(Vec3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn cancel_leaves_camera_in_place() {
        let (mut camera, mut controls) = setup();
        let mut transition = CameraTransition::new();
        transition.begin(&camera, Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO, 1.0);
        transition.tick(0.0, &mut camera, &mut controls);
        transition.tick(500.0, &mut camera, &mut controls);
        let halfway = camera.position;

        transition.cancel();
        assert_eq!(transition.tick(2_000.0, &mut camera, &mut controls), TransitionStatus::Idle);
        assert_eq!(camera.position, halfway);
    }
}
