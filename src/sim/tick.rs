//! Fixed-step simulation tick
//!
//! Motion, pairwise collisions in index order, compaction, termination.

use super::collision::{CollisionOutcome, is_colliding, reflect_off_walls, resolve};
use super::state::{BallKind, SimPhase, SimState};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// External stop request, observed before the step runs
    pub stop: bool,
}

/// Counters for one tick (for logging)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Colliding pairs resolved, including monster/monster no-ops
    pub collisions: usize,
    /// Balls dropped during compaction
    pub removed: usize,
}

/// Advance the simulation by one step.
///
/// A stop request or an already finished state leaves the population
/// untouched. Returns the phase after the termination check.
pub fn tick(state: &mut SimState, input: &TickInput) -> (SimPhase, TickReport) {
    if input.stop {
        state.cancel();
    }
    if !state.is_running() {
        return (state.phase, TickReport::default());
    }

    state.time_ticks += 1;

    advance(state);
    let collisions = collide_all(state);
    let removed = compact(state);

    let report = TickReport {
        collisions,
        removed,
    };
    (state.check_termination(), report)
}

/// Move every non-monster ball and bounce it off the canvas edges
pub fn advance(state: &mut SimState) {
    let (width, height) = (state.width, state.height);
    for ball in state
        .balls
        .iter_mut()
        .filter(|b| b.kind() != BallKind::Monster)
    {
        ball.pos += ball.vel();
        reflect_off_walls(ball, width, height);
    }
}

/// Resolve every colliding pair `(i, j)`, `i < j`, in order.
///
/// Later pairs see the effects of earlier ones, including radii already
/// driven to zero.
pub fn collide_all(state: &mut SimState) -> usize {
    let mut resolved = 0;
    let n = state.balls.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = state.balls.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if !is_colliding(a, b) {
                continue;
            }
            let outcome = resolve(a, b);
            resolved += 1;
            if outcome != CollisionOutcome::Ignored {
                log::trace!(
                    "tick {}: {} #{} x {} #{} -> {:?}",
                    state.time_ticks,
                    a.kind(),
                    i,
                    b.kind(),
                    j,
                    outcome
                );
            }
        }
    }
    resolved
}

/// Drop consumed balls, keeping survivors in order
pub fn compact(state: &mut SimState) -> usize {
    let before = state.balls.len();
    state.balls.retain(|b| b.is_alive());
    before - state.balls.len()
}
