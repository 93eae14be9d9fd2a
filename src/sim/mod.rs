//! Deterministic simulation module
//!
//! All ball behavior lives here. This module must stay pure:
//! - Seeded RNG only, used once to build the population
//! - Stable iteration order (creation order, compaction keeps it)
//! - No terminal, pacing or output dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, is_colliding, mix_colors, reflect_off_walls, resolve};
pub use state::{Ball, BallKind, Census, Rgb, SimPhase, SimState, WorldConfig};
pub use tick::{TickInput, TickReport, advance, collide_all, compact, tick};
