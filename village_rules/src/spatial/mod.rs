//! Directional selection between houses.
//!
//! Given the currently selected house and a direction, the next house is the
//! candidate ahead of the selection with the lowest `distance² / dot²` score,
//! where `dot` is the projection of the displacement onto the direction. The
//! score grows with angular deviation faster than with raw distance, so the
//! selection prefers houses lying close to the requested axis.

use serde::{Deserialize, Serialize};

use crate::entities::Position;
use crate::mechanics::Direction;

/// Pick the next index when moving from `current` along `(dx, dy)`.
///
/// Candidates behind or perpendicular to the direction are ignored. Ties go to
/// the lowest index. Returns `current` unchanged when nothing qualifies or
/// `current` is out of range.
pub fn move_selection(current: usize, dx: f64, dy: f64, positions: &[Position]) -> usize {
    let Some(origin) = positions.get(current) else {
        return current;
    };

    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in positions.iter().enumerate() {
        if index == current {
            continue;
        }
        let (vx, vy) = origin.delta_to(*candidate);
        let dot = vx * dx + vy * dy;
        if dot <= 0.0 {
            continue;
        }
        let score = (vx * vx + vy * vy) / (dot * dot);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    best.map(|(index, _)| index).unwrap_or(current)
}

/// Tracks the selected house and applies directional input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialSelector {
    selected: usize,
}

impl SpatialSelector {
    pub fn new(selected: usize) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Jump straight to an index (e.g. a mouse click).
    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    /// Move in `direction`. Returns true if the selection changed.
    pub fn step(&mut self, direction: Direction, positions: &[Position]) -> bool {
        let (dx, dy) = direction.vector();
        let next = move_selection(self.selected, dx, dy, positions);
        let changed = next != self.selected;
        self.selected = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout() -> Vec<Position> {
        vec![
            Position::new(0.0, 0.0),
            Position::new(100.0, 10.0),
            Position::new(60.0, 60.0),
            Position::new(-80.0, 0.0),
            Position::new(0.0, -90.0),
        ]
    }

    #[test]
    fn test_moves_along_axis() {
        let positions = layout();
        assert_eq!(move_selection(0, 1.0, 0.0, &positions), 1);
        assert_eq!(move_selection(0, -1.0, 0.0, &positions), 3);
        assert_eq!(move_selection(0, 0.0, -1.0, &positions), 4);
        assert_eq!(move_selection(0, 0.0, 1.0, &positions), 2);
    }

    #[test]
    fn test_cone_beats_distance() {
        // A near house well off-axis loses to a farther house on the axis.
        let positions = vec![
            Position::new(0.0, 0.0),
            Position::new(30.0, 30.0),
            Position::new(200.0, 0.0),
        ];
        assert_eq!(move_selection(0, 1.0, 0.0, &positions), 2);
    }

    #[test]
    fn test_nothing_ahead_keeps_selection() {
        let positions = layout();
        assert_eq!(move_selection(1, 1.0, 0.0, &positions), 1);
        assert_eq!(move_selection(9, 1.0, 0.0, &positions), 9);
        assert_eq!(move_selection(0, 1.0, 0.0, &[Position::new(0.0, 0.0)]), 0);
    }

    #[test]
    fn test_perpendicular_ignored() {
        let positions = vec![Position::new(0.0, 0.0), Position::new(0.0, 50.0)];
        assert_eq!(move_selection(0, 1.0, 0.0, &positions), 0);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let positions = vec![
            Position::new(0.0, 0.0),
            Position::new(50.0, 0.0),
            Position::new(50.0, 0.0),
        ];
        assert_eq!(move_selection(0, 1.0, 0.0, &positions), 1);
    }

    #[test]
    fn test_selector_step() {
        let positions = layout();
        let mut selector = SpatialSelector::default();
        assert!(selector.step(Direction::East, &positions));
        assert_eq!(selector.selected(), 1);
        assert!(!selector.step(Direction::East, &positions));
        assert_eq!(selector.selected(), 1);
    }

    proptest! {
        #[test]
        fn prop_move_selection_is_pure(
            coords in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..12),
            current in 0usize..12,
            dir in 0usize..4,
        ) {
            let positions: Vec<Position> =
                coords.iter().map(|(x, y)| Position::new(*x, *y)).collect();
            let direction = [Direction::North, Direction::South, Direction::East, Direction::West][dir];
            let (dx, dy) = direction.vector();

            let first = move_selection(current, dx, dy, &positions);
            let second = move_selection(current, dx, dy, &positions);
            prop_assert_eq!(first, second);

            if first != current {
                let (vx, vy) = positions[current].delta_to(positions[first]);
                prop_assert!(vx * dx + vy * dy > 0.0);
            }
        }
    }
}
