use super::grid::Pos;
use super::input::{InputAction, InputSnapshot};
use super::scene::Scene;

/// Movement request for one frame, normalized so diagonal speed never exceeds
/// axis-aligned speed.
pub fn movement_delta(input: &InputSnapshot, dt_seconds: f32, speed: f32) -> Pos {
    let mut x = 0.0f32;
    let mut y = 0.0f32;

    if input.is_down(InputAction::MoveRight) {
        x += 1.0;
    }
    if input.is_down(InputAction::MoveLeft) {
        x -= 1.0;
    }
    if input.is_down(InputAction::MoveDown) {
        y += 1.0;
    }
    if input.is_down(InputAction::MoveUp) {
        y -= 1.0;
    }

    let len_sq = x * x + y * y;
    if len_sq > 0.0 {
        let inv_len = len_sq.sqrt().recip();
        x *= inv_len;
        y *= inv_len;
    }

    Pos {
        x: x * speed * dt_seconds,
        y: y * speed * dt_seconds,
    }
}

/// Whether an actor of footprint half-width `half_width` can stand at
/// `candidate`.
///
/// The actor is modeled with two probe points, the left and right edge of its
/// visual footprint, both taken at the candidate position (one consistent
/// convention for every movement axis). A probe landing outside the tile grid
/// is an implicit map boundary and rejects the move.
pub fn position_clear(scene: &Scene, candidate: Pos, half_width: f32) -> bool {
    let left = Pos::new(candidate.x - half_width, candidate.y);
    let right = Pos::new(candidate.x + half_width, candidate.y);
    probe_clear(scene, left) && probe_clear(scene, right)
}

fn probe_clear(scene: &Scene, probe: Pos) -> bool {
    match scene.tile(probe.to_tile()) {
        Some(tile) => !tile.rule.blocks(probe.tile_local()),
        None => false,
    }
}

/// Applies `delta` to `pos` one axis at a time, committing each component only
/// if the resulting candidate position is clear. Never mutates speculatively;
/// a blocked axis simply stays put, which lets the actor slide along walls.
pub fn resolve_movement(scene: &Scene, pos: Pos, delta: Pos, half_width: f32) -> Pos {
    let mut next = pos;
    if delta.x != 0.0 {
        let candidate = Pos::new(next.x + delta.x, next.y);
        if position_clear(scene, candidate, half_width) {
            next = candidate;
        }
    }
    if delta.y != 0.0 {
        let candidate = Pos::new(next.x, next.y + delta.y);
        if position_clear(scene, candidate, half_width) {
            next = candidate;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::grid::{CollisionRule, TileCoord, TILE_SIZE_PX};

    const HALF_WIDTH: f32 = 6.0;

    fn open_room(width: i32, height: i32) -> Scene {
        let mut scene = Scene::new("test");
        for y in 0..height {
            for x in 0..width {
                scene.set_tile(TileCoord::new(x, y), CollisionRule::None, Vec::new());
            }
        }
        scene
    }

    fn snapshot(actions: &[InputAction]) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty();
        for action in actions {
            snapshot = snapshot.with_action_down(*action, true);
        }
        snapshot
    }

    #[test]
    fn diagonal_delta_matches_axis_aligned_magnitude() {
        let straight = movement_delta(&snapshot(&[InputAction::MoveRight]), 1.0, 100.0);
        let diagonal = movement_delta(
            &snapshot(&[InputAction::MoveRight, InputAction::MoveDown]),
            1.0,
            100.0,
        );
        let straight_len = straight.distance(Pos::default());
        let diagonal_len = diagonal.distance(Pos::default());
        assert!((straight_len - diagonal_len).abs() < 1e-3);
        assert!(diagonal.x > 0.0 && diagonal.y > 0.0);
    }

    #[test]
    fn opposing_inputs_cancel() {
        let delta = movement_delta(
            &snapshot(&[InputAction::MoveLeft, InputAction::MoveRight]),
            1.0,
            100.0,
        );
        assert_eq!(delta, Pos::default());
    }

    #[test]
    fn probe_outside_the_grid_rejects_movement() {
        let scene = open_room(2, 2);
        let inside = Pos::new(TILE_SIZE_PX, TILE_SIZE_PX);
        assert!(position_clear(&scene, inside, HALF_WIDTH));
        // Right probe pokes past the map edge.
        let edge = Pos::new(TILE_SIZE_PX * 2.0 - HALF_WIDTH + 1.0, TILE_SIZE_PX);
        assert!(!position_clear(&scene, edge, HALF_WIDTH));
    }

    #[test]
    fn solid_tile_blocks_and_walkable_tile_does_not() {
        let mut scene = open_room(3, 1);
        scene.set_tile(TileCoord::new(2, 0), CollisionRule::Solid, Vec::new());
        let open = Pos::new(TILE_SIZE_PX * 1.5, 4.0);
        let blocked = Pos::new(TILE_SIZE_PX * 2.5, 4.0);
        assert!(position_clear(&scene, open, HALF_WIDTH));
        assert!(!position_clear(&scene, blocked, HALF_WIDTH));
    }

    #[test]
    fn corner_rule_blocks_one_corner_and_passes_the_opposite() {
        let mut scene = open_room(3, 3);
        scene.set_tile(
            TileCoord::new(1, 1),
            CollisionRule::SouthEastCorner,
            Vec::new(),
        );
        let origin = TileCoord::new(1, 1).origin_pos();

        // Standing in the north-west quadrant: both probes clear.
        let north_west = origin + Pos::new(8.0, 8.0);
        assert!(position_clear(&scene, north_west, HALF_WIDTH));

        // Centered over the south-east quadrant: the left probe falls inside
        // the blocked rectangle.
        let south_east = origin + Pos::new(24.0, 24.0);
        assert!(!position_clear(&scene, south_east, HALF_WIDTH));
    }

    #[test]
    fn blocked_axis_slides_instead_of_stopping() {
        let mut scene = open_room(3, 3);
        for x in 0..3 {
            scene.set_tile(TileCoord::new(x, 0), CollisionRule::Solid, Vec::new());
        }
        let start = Pos::new(TILE_SIZE_PX * 1.5, TILE_SIZE_PX + 2.0);
        let next = resolve_movement(&scene, start, Pos::new(5.0, -5.0), HALF_WIDTH);
        // X advances, Y is rejected by the solid row above.
        assert_eq!(next, Pos::new(start.x + 5.0, start.y));
    }

    #[test]
    fn clear_path_commits_both_axes() {
        let scene = open_room(3, 3);
        let start = Pos::new(TILE_SIZE_PX, TILE_SIZE_PX);
        let next = resolve_movement(&scene, start, Pos::new(3.0, 4.0), HALF_WIDTH);
        assert_eq!(next, Pos::new(start.x + 3.0, start.y + 4.0));
    }
}
