//! Hit testing: point → entity lookup.
//!
//! Walks the entity list in its stored order (highest z first) and stops at
//! the first entity whose geometry contains the point, so the visually
//! topmost entity wins overlaps.

use kurbo::Point;
use nm_core::model::Entity;

/// Index of the topmost entity containing `p` (abstract coordinates).
/// Returns `None` if the point is over the background.
pub fn hit_index(entities: &[Entity], p: Point) -> Option<usize> {
    entities.iter().position(|e| e.contains_point(p))
}

/// The topmost entity containing `p`.
pub fn hit_test(entities: &[Entity], p: Point) -> Option<&Entity> {
    hit_index(entities, p).map(|i| &entities[i])
}
