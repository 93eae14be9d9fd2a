//! Simulation state and entity types
//!
//! Everything a run needs to reproduce itself lives here: the seed, the canvas
//! and the ordered population.

use std::fmt;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Behavioral category of a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallKind {
    /// Moves, merges with other regulars, feeds monsters
    Regular,
    /// Stationary, eats regulars, halves repellents
    Monster,
    /// Moves, bounces regulars away and takes their color
    Repellent,
}

impl BallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallKind::Regular => "Regular",
            BallKind::Monster => "Monster",
            BallKind::Repellent => "Repellent",
        }
    }
}

impl fmt::Display for BallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A ball entity
///
/// `kind` is fixed at construction and velocity is private so that a monster
/// can never be given a non-zero velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    kind: BallKind,
    pub radius: f64,
    pub pos: DVec2,
    vel: DVec2,
    pub color: Rgb,
}

impl Ball {
    /// Build a ball. Monsters ignore `vel` and are pinned at rest.
    pub fn new(kind: BallKind, radius: f64, pos: DVec2, color: Rgb, vel: DVec2) -> Self {
        let vel = if kind == BallKind::Monster {
            DVec2::ZERO
        } else {
            vel
        };
        Self {
            kind,
            radius,
            pos,
            vel,
            color,
        }
    }

    #[inline]
    pub fn kind(&self) -> BallKind {
        self.kind
    }

    #[inline]
    pub fn vel(&self) -> DVec2 {
        self.vel
    }

    /// A radius of zero (or less) marks a consumed ball awaiting removal
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.radius > 0.0
    }

    /// Reverse both velocity components
    pub(crate) fn reverse(&mut self) {
        self.vel = -self.vel;
    }

    pub(crate) fn flip_x(&mut self) {
        self.vel.x = -self.vel.x;
    }

    pub(crate) fn flip_y(&mut self) {
        self.vel.y = -self.vel.y;
    }
}

/// Run state machine. Both finished phases are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    Running,
    /// No regular balls left
    FinishedNoRegulars,
    /// Stopped by an external signal
    FinishedCancelled,
}

/// Population and canvas for a new run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub num_regular: u32,
    pub num_monster: u32,
    pub num_repellent: u32,
    pub width: f64,
    pub height: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            num_regular: DEFAULT_REGULAR,
            num_monster: DEFAULT_MONSTER,
            num_repellent: DEFAULT_REPELLENT,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Live ball counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub regular: usize,
    pub monster: usize,
    pub repellent: usize,
}

impl Census {
    pub fn total(&self) -> usize {
        self.regular + self.monster + self.repellent
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Seed the population was generated from
    pub seed: u64,
    pub width: f64,
    pub height: f64,
    /// Completed ticks
    pub time_ticks: u64,
    pub phase: SimPhase,
    /// Live population in creation order
    pub balls: Vec<Ball>,
}

impl SimState {
    /// Generate a random population from `config`.
    ///
    /// Balls are laid out regulars first, then monsters, then repellents.
    /// Counts and canvas size are trusted; callers validate them first.
    pub fn new(config: &WorldConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let total = (config.num_regular + config.num_monster + config.num_repellent) as usize;
        let mut balls = Vec::with_capacity(total);

        let plan = [
            (BallKind::Regular, config.num_regular),
            (BallKind::Monster, config.num_monster),
            (BallKind::Repellent, config.num_repellent),
        ];
        for (kind, count) in plan {
            for _ in 0..count {
                balls.push(spawn_ball(&mut rng, kind, config.width, config.height));
            }
        }

        log::debug!(
            "Generated {} balls on {}x{} canvas (seed {})",
            balls.len(),
            config.width,
            config.height,
            seed
        );

        Self::with_balls(config.width, config.height, balls).with_seed(seed)
    }

    /// Build a state around a hand-placed population
    pub fn with_balls(width: f64, height: f64, balls: Vec<Ball>) -> Self {
        Self {
            seed: 0,
            width,
            height,
            time_ticks: 0,
            phase: SimPhase::Running,
            balls,
        }
    }

    fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for ball in &self.balls {
            match ball.kind() {
                BallKind::Regular => census.regular += 1,
                BallKind::Monster => census.monster += 1,
                BallKind::Repellent => census.repellent += 1,
            }
        }
        census
    }

    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    /// Move to `FinishedNoRegulars` once the last regular ball is gone
    pub fn check_termination(&mut self) -> SimPhase {
        if self.is_running() && !self.balls.iter().any(|b| b.kind() == BallKind::Regular) {
            self.phase = SimPhase::FinishedNoRegulars;
        }
        self.phase
    }

    /// Raise the external stop signal. No effect once finished.
    pub fn cancel(&mut self) {
        if self.is_running() {
            self.phase = SimPhase::FinishedCancelled;
        }
    }
}

fn spawn_ball(rng: &mut Pcg32, kind: BallKind, width: f64, height: f64) -> Ball {
    let radius = rng.random_range(MIN_RADIUS..MAX_RADIUS);
    let pos = DVec2::new(rng.random_range(0.0..width), rng.random_range(0.0..height));
    let color = Rgb::new(rng.random(), rng.random(), rng.random());
    let vel = match kind {
        BallKind::Monster => DVec2::ZERO,
        _ => DVec2::new(
            rng.random_range(MIN_SPEED..MAX_SPEED),
            rng.random_range(MIN_SPEED..MAX_SPEED),
        ),
    };
    Ball::new(kind, radius, pos, color, vel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(regular: u32, monster: u32, repellent: u32) -> WorldConfig {
        WorldConfig {
            num_regular: regular,
            num_monster: monster,
            num_repellent: repellent,
            width: 300.0,
            height: 200.0,
        }
    }

    #[test]
    fn test_generation_counts_and_order() {
        let state = SimState::new(&config(4, 2, 3), 7);
        let kinds: Vec<_> = state.balls.iter().map(Ball::kind).collect();
        assert_eq!(kinds.len(), 9);
        assert!(kinds[..4].iter().all(|k| *k == BallKind::Regular));
        assert!(kinds[4..6].iter().all(|k| *k == BallKind::Monster));
        assert!(kinds[6..].iter().all(|k| *k == BallKind::Repellent));
        assert_eq!(state.phase, SimPhase::Running);
        assert_eq!(state.seed, 7);
    }

    #[test]
    fn test_generation_ranges() {
        let state = SimState::new(&config(50, 50, 50), 42);
        for ball in &state.balls {
            assert!(ball.radius >= MIN_RADIUS && ball.radius < MAX_RADIUS);
            assert!(ball.pos.x >= 0.0 && ball.pos.x < 300.0);
            assert!(ball.pos.y >= 0.0 && ball.pos.y < 200.0);
            let v = ball.vel();
            if ball.kind() == BallKind::Monster {
                assert_eq!(v, DVec2::ZERO);
            } else {
                assert!((MIN_SPEED..MAX_SPEED).contains(&v.x));
                assert!((MIN_SPEED..MAX_SPEED).contains(&v.y));
            }
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = SimState::new(&config(5, 1, 2), 1234);
        let b = SimState::new(&config(5, 1, 2), 1234);
        assert_eq!(a.balls, b.balls);

        let c = SimState::new(&config(5, 1, 2), 4321);
        assert_ne!(a.balls, c.balls);
    }

    #[test]
    fn test_monster_velocity_pinned_at_construction() {
        let m = Ball::new(
            BallKind::Monster,
            10.0,
            DVec2::new(50.0, 50.0),
            Rgb::default(),
            DVec2::new(3.0, -2.0),
        );
        assert_eq!(m.vel(), DVec2::ZERO);
    }

    #[test]
    fn test_census() {
        let state = SimState::new(&config(3, 1, 2), 9);
        let census = state.census();
        assert_eq!(census.regular, 3);
        assert_eq!(census.monster, 1);
        assert_eq!(census.repellent, 2);
        assert_eq!(census.total(), 6);
    }

    #[test]
    fn test_termination_without_regulars() {
        let mut state = SimState::new(&config(0, 2, 2), 3);
        assert_eq!(state.phase, SimPhase::Running);
        assert_eq!(state.check_termination(), SimPhase::FinishedNoRegulars);
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut state = SimState::new(&config(2, 0, 0), 3);
        state.cancel();
        assert_eq!(state.phase, SimPhase::FinishedCancelled);

        // Finished phases do not change
        state.balls.clear();
        assert_eq!(state.check_termination(), SimPhase::FinishedCancelled);
    }
}
