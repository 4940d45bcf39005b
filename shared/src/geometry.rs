//! Axis-aligned geometry primitives used by movement and pickup detection.

use serde::{Deserialize, Serialize};

/// Square axis-aligned bounding box.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Aabb {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

/// Restricts `value` to `[min, max]`, inclusive on both ends.
pub fn clamp_axis(value: i32, min: i32, max: i32) -> i32 {
    value.max(min).min(max)
}

/// Applies a signed delta along one axis and clamps the result back into
/// `[min, max]`. The addition saturates: deltas come straight off the wire,
/// so an extreme value must pin to the range edge instead of wrapping.
pub fn move_along_axis(position: i32, delta: i32, min: i32, max: i32) -> i32 {
    clamp_axis(position.saturating_add(delta), min, max)
}

/// Boundary-inclusive overlap test: two boxes whose edges exactly touch
/// count as overlapping. The pickup rules were built against this exact
/// comparison, so the `>` / `<` operators must not be tightened to their
/// inclusive forms.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let x_separated = a.x > b.x + b.size || a.x + a.size < b.x;
    let y_separated = a.y > b.y + b.size || a.y + a.size < b.y;
    !x_separated && !y_separated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_range() {
        assert_eq!(clamp_axis(50, 0, 100), 50);
    }

    #[test]
    fn test_clamp_below_min() {
        assert_eq!(clamp_axis(-10, 0, 100), 0);
    }

    #[test]
    fn test_clamp_above_max() {
        assert_eq!(clamp_axis(250, 0, 100), 100);
    }

    #[test]
    fn test_move_along_axis_clamps_low() {
        // Player at x=0 moving left with speed 10 stays pinned at 0
        assert_eq!(move_along_axis(0, -10, 0, 630), 0);
    }

    #[test]
    fn test_move_along_axis_clamps_high() {
        assert_eq!(move_along_axis(625, 10, 0, 630), 630);
    }

    #[test]
    fn test_move_along_axis_unobstructed() {
        assert_eq!(move_along_axis(100, 10, 0, 630), 110);
        assert_eq!(move_along_axis(100, -10, 0, 630), 90);
    }

    #[test]
    fn test_move_along_axis_saturates_extreme_deltas() {
        // Extreme deltas pin to the range edge instead of overflowing
        assert_eq!(move_along_axis(100, i32::MAX, 0, 630), 630);
        assert_eq!(move_along_axis(100, i32::MIN, 0, 630), 0);
        assert_eq!(move_along_axis(i32::MAX - 1, 10, 0, 630), 630);
    }

    #[test]
    fn test_overlap_edges_touching() {
        let a = Aabb {
            x: 100,
            y: 100,
            size: 10,
        };
        let b = Aabb {
            x: 105,
            y: 105,
            size: 15,
        };
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_overlap_exact_edge_contact_counts() {
        // a's right edge sits exactly on b's left edge
        let a = Aabb {
            x: 0,
            y: 0,
            size: 10,
        };
        let b = Aabb {
            x: 10,
            y: 0,
            size: 15,
        };
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_no_overlap_when_separated() {
        let a = Aabb {
            x: 0,
            y: 0,
            size: 10,
        };
        let b = Aabb {
            x: 50,
            y: 50,
            size: 15,
        };
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_no_overlap_on_single_axis_separation() {
        // Overlapping in y but separated in x is not a collision
        let a = Aabb {
            x: 0,
            y: 100,
            size: 10,
        };
        let b = Aabb {
            x: 200,
            y: 100,
            size: 15,
        };
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = Aabb {
            x: 100,
            y: 100,
            size: 10,
        };
        let b = Aabb {
            x: 105,
            y: 105,
            size: 15,
        };
        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }
}
