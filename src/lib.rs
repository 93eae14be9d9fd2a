//! Big Ball - a discrete-time 2D ball simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, termination)
//! - `display`: Per-tick state output (text and JSON)
//! - `runner`: Paced run loop with cooperative stop
//! - `settings`: Run configuration

pub mod display;
pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{OutputFormat, Settings};

/// Simulation constants
pub mod consts {
    /// Radius range for generated balls (lower inclusive, upper exclusive)
    pub const MIN_RADIUS: f64 = 5.0;
    pub const MAX_RADIUS: f64 = 15.0;

    /// Velocity component range for moving balls
    pub const MIN_SPEED: f64 = -1.0;
    pub const MAX_SPEED: f64 = 1.0;

    /// Default canvas
    pub const DEFAULT_WIDTH: f64 = 500.0;
    pub const DEFAULT_HEIGHT: f64 = 500.0;

    /// Default population
    pub const DEFAULT_REGULAR: u32 = 10;
    pub const DEFAULT_MONSTER: u32 = 2;
    pub const DEFAULT_REPELLENT: u32 = 3;

    /// Pause between ticks when running interactively
    pub const DEFAULT_TICK_DELAY_MS: u64 = 100;
}
