//! Collision detection and kind-pair resolution
//!
//! Resolution is keyed on the ordered pair `(a.kind, b.kind)`. Most rules
//! have the same effect in both orders, but regular/regular ties go to `b`,
//! so pairs are never normalized.

use super::state::{Ball, BallKind, Rgb};

/// What a resolved collision did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Regular absorbed another regular
    Merged,
    /// Monster ate a regular
    Eaten,
    /// Regular bounced off a repellent, repellent took its color
    Repelled,
    /// Two repellents traded colors
    ColorsSwapped,
    /// Repellent touched a monster and lost half its radius
    Halved,
    /// Two monsters, nothing happens
    Ignored,
}

/// Circles collide when centers are no farther apart than the summed radii
#[inline]
pub fn is_colliding(a: &Ball, b: &Ball) -> bool {
    a.pos.distance(b.pos) <= a.radius + b.radius
}

/// Flip velocity components for a ball touching the canvas edges.
///
/// Each axis is checked once; position is left alone, overshoot corrects
/// itself on the following ticks.
pub fn reflect_off_walls(ball: &mut Ball, width: f64, height: f64) {
    if ball.pos.x <= ball.radius || ball.pos.x >= width - ball.radius {
        ball.flip_x();
    }
    if ball.pos.y <= ball.radius || ball.pos.y >= height - ball.radius {
        ball.flip_y();
    }
}

/// Apply the collision rule for `(a.kind, b.kind)`
pub fn resolve(a: &mut Ball, b: &mut Ball) -> CollisionOutcome {
    use BallKind::*;

    match (a.kind(), b.kind()) {
        (Regular, Regular) => {
            if a.radius > b.radius {
                absorb(a, b);
            } else {
                absorb(b, a);
            }
            CollisionOutcome::Merged
        }
        (Regular, Monster) => {
            eat(b, a);
            CollisionOutcome::Eaten
        }
        (Monster, Regular) => {
            eat(a, b);
            CollisionOutcome::Eaten
        }
        (Regular, Repellent) => {
            repel(a, b);
            CollisionOutcome::Repelled
        }
        (Repellent, Regular) => {
            repel(b, a);
            CollisionOutcome::Repelled
        }
        (Repellent, Repellent) => {
            std::mem::swap(&mut a.color, &mut b.color);
            CollisionOutcome::ColorsSwapped
        }
        (Repellent, Monster) => {
            a.radius /= 2.0;
            CollisionOutcome::Halved
        }
        (Monster, Repellent) => {
            b.radius /= 2.0;
            CollisionOutcome::Halved
        }
        (Monster, Monster) => CollisionOutcome::Ignored,
    }
}

fn absorb(winner: &mut Ball, loser: &mut Ball) {
    winner.radius += loser.radius;
    winner.color = mix_colors(winner.color, loser.color, winner.radius, loser.radius);
    loser.radius = 0.0;
}

fn eat(monster: &mut Ball, regular: &mut Ball) {
    monster.radius += regular.radius;
    regular.radius = 0.0;
}

fn repel(regular: &mut Ball, repellent: &mut Ball) {
    repellent.color = regular.color;
    regular.reverse();
}

/// Radius-weighted average of two colors, truncated per channel.
///
/// Zero total weight (two consumed balls) keeps `c1`.
pub fn mix_colors(c1: Rgb, c2: Rgb, w1: f64, w2: f64) -> Rgb {
    let total = w1 + w2;
    if total <= 0.0 {
        return c1;
    }
    let channel = |x: u8, y: u8| ((f64::from(x) * w1 + f64::from(y) * w2) / total) as u8;
    Rgb::new(channel(c1.r, c2.r), channel(c1.g, c2.g), channel(c1.b, c2.b))
}
