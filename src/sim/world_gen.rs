//! Procedural world streaming
//!
//! Content is generated around the player as the world offset moves:
//! grass is regenerated in bulk, obstacles are sprinkled around the highway
//! every few hundred pixels, and roadblock gates are snapped to a fixed grid.
//! Entities that fall far behind (or ahead of) the player are evicted so long
//! sessions stay bounded.

use glam::Vec2;
use rand::Rng;

use super::collision::too_close;
use super::roadblock::Roadblock;
use super::state::{GameState, GrassPatch, Obstacle, ObstacleKind};

/// Grass blot color
const GRASS_COLOR: &str = "#4e7a3a";
/// Grass blot radius range
const GRASS_SIZE_MIN: f32 = 40.0;
const GRASS_SIZE_MAX: f32 = 100.0;
/// Clearance between the highway edge and the nearest obstacle center
const OBSTACLE_MIN_CLEARANCE: f32 = 30.0;
/// Base and random extra reach of the obstacle band beyond the highway edge
const OBSTACLE_BAND_BASE: f32 = 200.0;
const OBSTACLE_BAND_JITTER: f32 = 180.0;

/// Uniform integer-valued sample in `[lo, hi)` (returns `lo` for empty ranges)
fn random_in<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo.floor();
    }
    rng.random_range(lo..hi).floor()
}

/// Replace the grass set with a fresh scatter around `center`
pub fn generate_grass_patches(state: &mut GameState, center: Vec2) {
    let radius = state.settings.grass_patch_radius;
    let count = state.settings.grass_patch_density;

    let rng = &mut state.rng;
    state.grass_patches = (0..count)
        .map(|_| {
            let x = center.x + random_in(rng, -radius, radius);
            let y = center.y + random_in(rng, -radius, radius);
            let size = random_in(rng, GRASS_SIZE_MIN, GRASS_SIZE_MAX);
            GrassPatch {
                pos: Vec2::new(x, y),
                size,
                color: GRASS_COLOR.to_string(),
            }
        })
        .collect();
}

/// Try to place a batch of obstacles above and below the highway.
///
/// Candidates too close to any existing obstacle are skipped, not retried.
/// Returns how many were placed.
pub fn generate_obstacles_around_highway(state: &mut GameState, center_x: f32) -> usize {
    let attempts = state.settings.obstacles_per_pass;
    let spawn_x_min = center_x - state.settings.viewport_width;
    let spawn_x_max = center_x + state.settings.viewport_width;
    let highway_y = state.settings.highway_y();
    let half_highway = state.settings.highway_width / 2.0;
    let highway_width = state.settings.highway_width;
    let min_distance = state.settings.obstacle_distance;

    let mut placed = 0;
    for _ in 0..attempts {
        let rng = &mut state.rng;
        let ox = random_in(rng, spawn_x_min, spawn_x_max);
        let above = rng.random_bool(0.5);
        let min_dist = half_highway + OBSTACLE_MIN_CLEARANCE;
        let max_dist = half_highway + OBSTACLE_BAND_BASE + random_in(rng, 0.0, OBSTACLE_BAND_JITTER);
        let dist = random_in(rng, min_dist, max_dist);
        let oy = if above { highway_y - dist } else { highway_y + dist };

        // More trees farther from the road, more rocks close in
        let pool: &[ObstacleKind] = if dist > highway_width {
            &[ObstacleKind::Tree, ObstacleKind::Tree, ObstacleKind::Rock]
        } else {
            &[ObstacleKind::Rock, ObstacleKind::Tree]
        };
        let kind = pool[random_in(rng, 0.0, pool.len() as f32) as usize];

        let pos = Vec2::new(ox, oy);
        if state
            .obstacles
            .iter()
            .any(|ob| too_close(ob.pos, pos, min_distance))
        {
            continue;
        }

        let tree_id = match kind {
            ObstacleKind::Tree => Some(state.next_tree_id()),
            ObstacleKind::Rock => None,
        };
        state.obstacles.push(Obstacle::new(pos, kind, tree_id));
        placed += 1;
    }

    log::trace!(
        "Obstacle pass at x={}: placed {}, rejected {}",
        center_x,
        placed,
        attempts as usize - placed
    );
    placed
}

/// Place a gate on every grid line within one viewport width of `center_x`
/// that does not already hold one. Returns how many were placed.
pub fn generate_roadblocks(state: &mut GameState, center_x: f32) -> usize {
    let freq = state.settings.roadblock_freq;
    let width = state.settings.viewport_width;
    let size = Vec2::new(state.settings.roadblock_width, state.settings.roadblock_height);
    let y = state.settings.highway_y();

    let start = ((center_x - width) / freq).floor() as i64;
    let end = ((center_x + width) / freq).floor() as i64;

    let mut placed = 0;
    for gate in start..=end {
        let x = gate as f32 * freq;
        if state
            .roadblocks
            .iter()
            .any(|rb| (rb.pos.x - x).abs() < freq / 2.0)
        {
            continue;
        }

        let pos = Vec2::new(x, y);
        let rb = if state.passed_gates.contains(&gate) {
            Roadblock::passed(gate, pos, size)
        } else {
            Roadblock::new(gate, pos, size)
        };
        state.roadblocks.push(rb);
        placed += 1;
    }
    placed
}

/// Drop obstacles and gates farther than `retain_distance` from the player.
///
/// Cleared gates are remembered by grid index before they go.
pub fn evict_distant(state: &mut GameState) {
    let center_x = state.world.offset.x;
    let keep = state.settings.retain_distance;

    let before = state.obstacles.len();
    state
        .obstacles
        .retain(|ob| (ob.pos.x - center_x).abs() <= keep);
    let dropped_obstacles = before - state.obstacles.len();

    let before = state.roadblocks.len();
    let passed = &mut state.passed_gates;
    state.roadblocks.retain(|rb| {
        let near = (rb.pos.x - center_x).abs() <= keep;
        if !near && rb.blocked_once() {
            passed.insert(rb.id);
        }
        near
    });
    let dropped_roadblocks = before - state.roadblocks.len();

    if dropped_obstacles > 0 || dropped_roadblocks > 0 {
        log::debug!(
            "Evicted {} obstacles and {} roadblocks beyond {}px",
            dropped_obstacles,
            dropped_roadblocks,
            keep
        );
    }
}

/// Run whichever generators are due after the offset moved
pub fn stream_around_player(state: &mut GameState) {
    let offset = state.world.offset;

    if (offset.x - state.grass_origin.x).abs() > state.settings.grass_patch_radius / 2.0 {
        state.grass_origin.x = offset.x;
        let center = state.player_world_pos();
        generate_grass_patches(state, center);
        log::debug!("Grass regenerated around x={}", offset.x);
    }

    if (offset.x - state.last_obstacle_spawn.x).abs() > state.settings.obstacle_spawn_distance {
        generate_obstacles_around_highway(state, offset.x);
        state.last_obstacle_spawn = offset;
        evict_distant(state);
    }

    generate_roadblocks(state, offset.x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use proptest::prelude::*;

    fn assert_separated(state: &GameState) {
        let min = state.settings.obstacle_distance;
        for (i, a) in state.obstacles.iter().enumerate() {
            for b in &state.obstacles[i + 1..] {
                assert!(
                    !too_close(a.pos, b.pos, min),
                    "obstacles at {:?} and {:?} closer than {}",
                    a.pos,
                    b.pos,
                    min
                );
            }
        }
    }

    #[test]
    fn test_grass_replaced_in_bulk() {
        let mut state = GameState::new(3, Settings::default());
        let center = Vec2::new(5000.0, 300.0);
        generate_grass_patches(&mut state, center);
        assert_eq!(state.grass_patches.len(), 40);
        for patch in &state.grass_patches {
            assert!((patch.pos.x - center.x).abs() <= 1000.0);
            assert!((patch.pos.y - center.y).abs() <= 1000.0);
            assert!(patch.size >= 40.0 && patch.size < 100.0);
        }
    }

    #[test]
    fn test_obstacles_stay_off_highway_and_in_window() {
        let mut state = GameState::new(11, Settings::default());
        state.obstacles.clear();
        generate_obstacles_around_highway(&mut state, 2000.0);
        assert!(!state.obstacles.is_empty());
        for ob in &state.obstacles {
            assert!(ob.pos.x >= 1200.0 && ob.pos.x < 2800.0);
            let dist = (ob.pos.y - 300.0).abs();
            assert!(dist >= 60.0, "obstacle {} from centerline", dist);
            assert!(state.settings.is_off_road(ob.pos.y));
        }
    }

    #[test]
    fn test_only_trees_get_ids() {
        let mut state = GameState::new(5, Settings::default());
        for x in [0.0, 2000.0, 4000.0] {
            generate_obstacles_around_highway(&mut state, x);
        }
        let mut ids = Vec::new();
        for ob in &state.obstacles {
            match ob.kind {
                ObstacleKind::Tree => ids.push(ob.tree_id.expect("tree id")),
                ObstacleKind::Rock => assert!(ob.tree_id.is_none()),
            }
        }
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "tree ids must be unique");
        assert_eq!(ids, sorted, "tree ids allocated in placement order");
    }

    #[test]
    fn test_second_pass_respects_first() {
        let mut state = GameState::new(2024, Settings::default());
        state.obstacles.clear();
        generate_obstacles_around_highway(&mut state, 0.0);
        let first: Vec<Vec2> = state.obstacles.iter().map(|ob| ob.pos).collect();

        generate_obstacles_around_highway(&mut state, 0.0);
        // Everything from the first pass survives untouched
        for (i, pos) in first.iter().enumerate() {
            assert_eq!(state.obstacles[i].pos, *pos);
        }
        // New arrivals clear every earlier obstacle
        for added in &state.obstacles[first.len()..] {
            for old in &first {
                assert!(!too_close(added.pos, *old, 120.0));
            }
        }
        assert_separated(&state);
    }

    #[test]
    fn test_roadblocks_snap_to_grid_and_are_idempotent() {
        let mut state = GameState::new(1, Settings::default());
        state.roadblocks.clear();
        // [2200, 3800] covers grid lines 1..=3
        assert_eq!(generate_roadblocks(&mut state, 3000.0), 3);
        let mut xs: Vec<f32> = state.roadblocks.iter().map(|rb| rb.pos.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![1200.0, 2400.0, 3600.0]);

        assert_eq!(generate_roadblocks(&mut state, 3000.0), 0);
        assert_eq!(state.roadblocks.len(), 3);
        for rb in &state.roadblocks {
            assert_eq!(rb.pos.y, 300.0);
            assert_eq!(rb.pos.x, rb.id as f32 * 1200.0);
        }
    }

    #[test]
    fn test_roadblocks_negative_direction() {
        let mut state = GameState::new(1, Settings::default());
        state.roadblocks.clear();
        generate_roadblocks(&mut state, -2500.0);
        let mut ids: Vec<i64> = state.roadblocks.iter().map(|rb| rb.id).collect();
        ids.sort();
        // [-3300, -1700] covers grid lines -3 and -2
        assert_eq!(ids, vec![-3, -2]);
    }

    #[test]
    fn test_eviction_remembers_passed_gates() {
        let mut state = GameState::new(8, Settings::default());
        let wait = state.settings.roadblock_wait_ms;
        let gate = state.roadblock_mut(-1).expect("gate");
        gate.begin_blocking(wait);
        gate.mark_passed();

        state.world.offset.x = 20_000.0;
        evict_distant(&mut state);
        assert!(state.roadblock(-1).is_none());
        assert!(state.obstacles.iter().all(|ob| (ob.pos.x - 20_000.0).abs() <= 3200.0));
        assert!(state.passed_gates.contains(&-1));

        // Coming back regenerates the gate already passed
        state.world.offset.x = -1200.0;
        generate_roadblocks(&mut state, -1200.0);
        assert!(state.roadblock(-1).expect("regenerated").blocked_once());
        assert!(state.roadblock(-2).expect("fresh gate").active());
    }

    #[test]
    fn test_stream_respects_thresholds() {
        let mut state = GameState::new(9, Settings::default());
        let grass_before: Vec<Vec2> = state.grass_patches.iter().map(|g| g.pos).collect();
        let obstacles_before = state.obstacles.len();

        state.world.offset.x = 400.0;
        stream_around_player(&mut state);
        // Neither threshold crossed yet (strictly greater than)
        let grass_after: Vec<Vec2> = state.grass_patches.iter().map(|g| g.pos).collect();
        assert_eq!(grass_before, grass_after);
        assert_eq!(state.obstacles.len(), obstacles_before);
        assert_eq!(state.last_obstacle_spawn.x, 0.0);

        state.world.offset.x = 450.0;
        stream_around_player(&mut state);
        assert_eq!(state.last_obstacle_spawn.x, 450.0);
        assert_eq!(state.grass_origin.x, 0.0);

        state.world.offset.x = 510.0;
        stream_around_player(&mut state);
        assert_eq!(state.grass_origin.x, 510.0);
        assert_separated(&state);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_obstacles_never_too_close(seed in any::<u64>(), centers in prop::collection::vec(-5000i32..5000, 1..8)) {
            let mut state = GameState::new(seed, Settings::default());
            for c in centers {
                generate_obstacles_around_highway(&mut state, c as f32);
            }
            let min = state.settings.obstacle_distance;
            for (i, a) in state.obstacles.iter().enumerate() {
                for b in &state.obstacles[i + 1..] {
                    prop_assert!(!too_close(a.pos, b.pos, min));
                }
            }
        }
    }
}
