//! Player entity: identity, position, score and the movement rule.

use crate::collectible::Collectible;
use crate::geometry::{move_along_axis, overlaps, Aabb};
use crate::{ARENA_MAX_X, ARENA_MAX_Y, ARENA_MIN_X, ARENA_MIN_Y, PLAYER_SIZE};
use serde::{Deserialize, Serialize};

/// Movement direction. This is a closed enum on purpose: any key that does
/// not map to one of these four values never reaches the wire, and a
/// datagram carrying an unknown discriminant fails deserialization before
/// it can touch arena state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub score: u32,
    pub size: i32,
    /// Rendering-only marker for the connection that owns this player.
    pub local: bool,
}

impl Player {
    pub fn new(id: u32, x: i32, y: i32) -> Self {
        Self {
            id,
            x,
            y,
            score: 0,
            size: PLAYER_SIZE,
            local: false,
        }
    }

    /// Moves exactly one axis by `speed`, clamped so the whole bounding box
    /// stays inside the arena: the far edge is `max - size` per axis.
    ///
    /// Speed is wire-supplied and accepted for any `i32`; negation saturates
    /// so `i32::MIN` cannot overflow.
    pub fn apply_move(&mut self, direction: Direction, speed: i32) {
        match direction {
            Direction::Up => {
                self.y = move_along_axis(
                    self.y,
                    speed.saturating_neg(),
                    ARENA_MIN_Y,
                    ARENA_MAX_Y - self.size,
                );
            }
            Direction::Down => {
                self.y = move_along_axis(self.y, speed, ARENA_MIN_Y, ARENA_MAX_Y - self.size);
            }
            Direction::Left => {
                self.x = move_along_axis(
                    self.x,
                    speed.saturating_neg(),
                    ARENA_MIN_X,
                    ARENA_MAX_X - self.size,
                );
            }
            Direction::Right => {
                self.x = move_along_axis(self.x, speed, ARENA_MIN_X, ARENA_MAX_X - self.size);
            }
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            size: self.size,
        }
    }

    /// Pure overlap predicate against the active collectible. Scoring is
    /// the arena's job, not a side effect of the check.
    pub fn collides_with(&self, goal: &Collectible) -> bool {
        overlaps(&self.bounds(), &goal.bounds())
    }
}
