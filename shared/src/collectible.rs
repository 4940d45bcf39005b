//! Collectible entity: the single active pickup in the arena.

use crate::geometry::Aabb;
use crate::{COLLECTIBLE_SIZE, COLLECTIBLE_VALUE};
use serde::{Deserialize, Serialize};

/// The one active pickup. Never mutated in place: collecting it destroys
/// this instance and constructs a replacement with a fresh id at a newly
/// sampled position (the server owns the sampling).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Collectible {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub value: u32,
}

impl Collectible {
    pub fn new(id: u32, x: i32, y: i32) -> Self {
        Self {
            id,
            x,
            y,
            size: COLLECTIBLE_SIZE,
            value: COLLECTIBLE_VALUE,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collectible_creation() {
        let goal = Collectible::new(3, 40, 60);
        assert_eq!(goal.id, 3);
        assert_eq!(goal.x, 40);
        assert_eq!(goal.y, 60);
        assert_eq!(goal.size, COLLECTIBLE_SIZE);
        assert_eq!(goal.value, COLLECTIBLE_VALUE);
    }

    #[test]
    fn test_collectible_bounds() {
        let goal = Collectible::new(3, 40, 60);
        let bounds = goal.bounds();
        assert_eq!(bounds.x, 40);
        assert_eq!(bounds.y, 60);
        assert_eq!(bounds.size, COLLECTIBLE_SIZE);
    }
}
