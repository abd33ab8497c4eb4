//! Utility Module
//!
//! - [`OrbitControls`]: orbit-style camera controller
//! - [`Timer`]: frame clock supplying deltas and millisecond timestamps

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;
pub use time::Timer;
