//! Fixed timestep simulation tick
//!
//! One tick per displayed frame: resolve roadblock gates, test the attempted
//! move against off-road obstacles, commit it, then stream new content.

use glam::Vec2;

use super::collision::Aabb;
use super::roadblock::advance_roadblocks;
use super::state::GameState;
use super::world_gen::stream_around_player;
use crate::world_to_screen;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired horizontal velocity (px per frame)
    pub dx: f32,
}

/// Advance the game state by one frame of `settings.frame_dt_ms`
pub fn tick(state: &mut GameState, input: &TickInput) {
    let dt = state.settings.frame_dt_ms;
    state.time_ticks += 1;

    state.player.dx = input.dx;
    state.player.dy = 0.0;

    // Countdowns only run for blocks that began on an earlier frame
    let was_blocked = !state.player.can_move();
    advance_roadblocks(&mut state.roadblocks, dt);

    let step = if state.player.can_move() {
        state.player.dx
    } else {
        0.0
    };
    let next_x = state.world.offset.x + step;

    if state.player.can_move() {
        if let Some(id) = find_blocking_roadblock(state, next_x) {
            enter_block(state, id);
        }
    }

    if was_blocked {
        state.player.block_timer -= dt;
        if state.player.block_timer <= 0.0 {
            release_block(state);
        }
    }

    let collided = obstacle_collision(state, next_x);
    if !collided && state.player.can_move() {
        state.world.offset.x = next_x;
        stream_around_player(state);
    }
}

/// First pending gate the player would touch with the world at `next_x`
fn find_blocking_roadblock(state: &GameState, next_x: f32) -> Option<i64> {
    let player = state.player.bounds();
    let offset = Vec2::new(next_x, state.world.offset.y);
    let width = state.settings.viewport_width;

    let mut hits = state.roadblocks.iter().filter(|rb| {
        if !rb.active() {
            return false;
        }
        let screen = Aabb::new(world_to_screen(rb.pos, offset, width), rb.size);
        player.overlaps(&screen)
    });

    let first = hits.next();
    let second = hits.next();
    if let (Some(a), Some(b)) = (first, second) {
        log::warn!(
            "Gates {} and {} both in blocking range at x={}",
            a.id,
            b.id,
            next_x
        );
    }
    debug_assert!(second.is_none(), "more than one pending roadblock in blocking range");
    first.map(|rb| rb.id)
}

/// Stop the player at gate `id` and start both countdowns
fn enter_block(state: &mut GameState, id: i64) {
    let wait = state.settings.roadblock_wait_ms;
    let Some(rb) = state.roadblock_mut(id) else {
        return;
    };
    if !rb.begin_blocking(wait) {
        return;
    }
    state.player.block_timer = wait;
    state.player.blocking_roadblock = Some(id);
    log::debug!("Blocked at roadblock {} for {}ms", id, wait);
}

/// Let the player go and clear the gate captured at block entry
fn release_block(state: &mut GameState) {
    state.player.block_timer = 0.0;
    if let Some(id) = state.player.blocking_roadblock.take() {
        match state.roadblock_mut(id) {
            Some(rb) => rb.mark_passed(),
            None => log::warn!("Blocking roadblock {} no longer retained", id),
        }
        state.passed_gates.insert(id);
        log::debug!("Released from roadblock {}", id);
    }
}

/// Whether the player overlaps any off-road obstacle with the world at `next_x`.
///
/// Obstacles inside the highway band are never checked.
fn obstacle_collision(state: &GameState, next_x: f32) -> bool {
    let player = state.player.bounds();
    let offset = Vec2::new(next_x, state.world.offset.y);
    let width = state.settings.viewport_width;

    state
        .obstacles
        .iter()
        .filter(|ob| state.settings.is_off_road(ob.pos.y))
        .any(|ob| {
            let screen = Aabb::new(world_to_screen(ob.pos, offset, width), ob.size);
            player.overlaps(&screen)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use crate::sim::world_gen::generate_roadblocks;
    use proptest::prelude::*;

    const RIGHT: TickInput = TickInput { dx: 5.0 };
    const LEFT: TickInput = TickInput { dx: -5.0 };

    /// Empty world with the player 30px short of the first gate east of the start
    fn at_gate() -> GameState {
        let mut state = GameState::new(12345, Settings::default());
        state.obstacles.clear();
        state.world.offset.x = 1170.0;
        generate_roadblocks(&mut state, 1170.0);
        assert!(state.roadblock(1).expect("gate 1").active());
        state
    }

    #[test]
    fn test_roadblock_blocks_on_contact() {
        let mut state = at_gate();
        tick(&mut state, &RIGHT);

        assert_eq!(state.world.offset.x, 1170.0, "move must be rejected");
        assert!(!state.player.can_move());
        assert_eq!(state.player.block_timer, 4000.0);
        assert_eq!(state.player.blocking_roadblock, Some(1));

        let rb = state.roadblock(1).expect("gate 1");
        assert!(!rb.active());
        assert!(!rb.blocked_once());
        assert_eq!(rb.timer(), 4000.0);
    }

    #[test]
    fn test_roadblock_releases_after_wait() {
        let mut state = at_gate();
        tick(&mut state, &RIGHT);

        // 4000ms of 16ms frames
        for frame in 1..=250 {
            assert!(!state.player.can_move(), "still blocked before frame {}", frame);
            tick(&mut state, &RIGHT);
            assert_eq!(state.world.offset.x, 1170.0);
        }

        assert!(state.player.can_move());
        assert_eq!(state.player.block_timer, 0.0);
        assert_eq!(state.player.blocking_roadblock, None);
        assert!(state.roadblock(1).expect("gate 1").blocked_once());

        // Drive across the gate and back again without another stop
        for _ in 0..40 {
            tick(&mut state, &RIGHT);
            assert!(state.player.can_move());
        }
        assert_eq!(state.world.offset.x, 1370.0);
        for _ in 0..80 {
            tick(&mut state, &LEFT);
            assert!(state.player.can_move());
        }
        assert_eq!(state.world.offset.x, 970.0);
        assert!(state.roadblock(1).expect("gate 1").blocked_once());
    }

    /// Empty world with the start gate already cleared
    fn open_road(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        state.obstacles.clear();
        state.roadblock_mut(0).expect("start gate").phase = crate::sim::RoadblockPhase::Passed;
        state.passed_gates.insert(0);
        state
    }

    #[test]
    fn test_session_opens_with_wait() {
        let mut state = GameState::new(1, Settings::default());
        tick(&mut state, &TickInput::default());

        assert!(!state.player.can_move());
        assert_eq!(state.player.block_timer, 4000.0);
        assert_eq!(state.player.blocking_roadblock, Some(0));

        // Holding a direction does not shorten it
        for _ in 0..250 {
            tick(&mut state, &RIGHT);
            assert_eq!(state.world.offset.x, 0.0);
        }
        assert!(state.player.can_move());
        assert!(state.roadblock(0).expect("start gate").blocked_once());

        tick(&mut state, &RIGHT);
        assert_eq!(state.world.offset.x, 5.0);
    }

    #[test]
    fn test_idle_player_is_gated() {
        let mut state = at_gate();
        state.world.offset.x = 1190.0;
        tick(&mut state, &TickInput::default());

        assert!(!state.player.can_move());
        assert_eq!(state.player.blocking_roadblock, Some(1));
        assert!(!state.roadblock(1).expect("gate 1").active());
    }

    #[test]
    fn test_cleared_gates_are_remembered_once() {
        let mut state = at_gate();
        for _ in 0..251 {
            tick(&mut state, &RIGHT);
        }
        assert!(state.player.can_move());
        assert_eq!(state.passed_gates.iter().copied().collect::<Vec<_>>(), vec![1]);

        // Driving back and forth over the cleared gate adds nothing
        for _ in 0..40 {
            tick(&mut state, &RIGHT);
        }
        for _ in 0..40 {
            tick(&mut state, &LEFT);
        }
        assert_eq!(state.passed_gates.len(), 1);
    }

    #[test]
    fn test_blocked_input_is_ignored() {
        let mut state = at_gate();
        tick(&mut state, &RIGHT);
        for _ in 0..10 {
            tick(&mut state, &LEFT);
        }
        assert_eq!(state.world.offset.x, 1170.0);
        assert_eq!(state.player.block_timer, 4000.0 - 10.0 * 16.0);
    }

    #[test]
    fn test_dense_gates_are_rejected_before_play() {
        let settings = Settings::from_json(r#"{"roadblock_freq": 30}"#);
        assert!(settings.is_err());

        // The smallest accepted spacing never puts two gates in reach
        let settings = Settings::from_json(r#"{"roadblock_freq": 78}"#).expect("valid");
        let mut state = GameState::new(3, settings);
        for _ in 0..600 {
            tick(&mut state, &RIGHT);
            assert!(state.player.blocking_roadblock.is_none() || !state.player.can_move());
        }
    }

    #[test]
    fn test_obstacle_stops_movement() {
        let mut state = open_road(1);
        let y = state.settings.highway_y();
        // Just off the highway band, close enough to clip the vehicle
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(100.0, y + 32.0), ObstacleKind::Rock, None));

        for _ in 0..30 {
            let before = state.world.offset.x;
            tick(&mut state, &RIGHT);
            let moved = state.world.offset.x != before;
            let would_hit = (100.0 - (before + 5.0)).abs() < 38.0;
            assert!(!(moved && would_hit), "committed a move into an obstacle");
        }
        // 60 + 5 puts the rock within reach (20 + 18)
        assert_eq!(state.world.offset.x, 60.0);

        // Backing away is still allowed
        tick(&mut state, &LEFT);
        assert_eq!(state.world.offset.x, 55.0);
    }

    #[test]
    fn test_tree_canopy_collides() {
        let mut state = open_road(1);
        let y = state.settings.highway_y();
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(-200.0, y - 45.0), ObstacleKind::Tree, Some(1)));

        for _ in 0..60 {
            tick(&mut state, &LEFT);
        }
        // Tree half width 25 + vehicle 18
        assert_eq!(state.world.offset.x, -155.0);
    }

    #[test]
    fn test_on_road_obstacles_are_ignored() {
        let mut state = open_road(1);
        let y = state.settings.highway_y();
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(100.0, y + 10.0), ObstacleKind::Rock, None));

        for _ in 0..40 {
            tick(&mut state, &RIGHT);
        }
        assert_eq!(state.world.offset.x, 200.0);
    }

    #[test]
    fn test_obstacle_wins_over_free_gate() {
        let mut state = at_gate();
        let y = state.settings.highway_y();
        // Rock right in front of the vehicle, gate already passed
        state.roadblock_mut(1).expect("gate 1").phase = crate::sim::RoadblockPhase::Passed;
        state
            .obstacles
            .push(Obstacle::new(Vec2::new(1205.0, y + 32.0), ObstacleKind::Rock, None));

        tick(&mut state, &RIGHT);
        assert!(state.player.can_move());
        assert_eq!(state.world.offset.x, 1170.0);
    }

    #[test]
    fn test_streaming_follows_player() {
        let mut state = open_road(77);
        state.passed_gates.insert(1);
        state.roadblocks.clear();

        for _ in 0..200 {
            tick(&mut state, &RIGHT);
        }
        assert_eq!(state.world.offset.x, 1000.0);
        assert_eq!(state.last_obstacle_spawn.x, 810.0);
        assert_eq!(state.grass_origin.x, 505.0);
        // Gates ahead within one viewport width exist
        assert!(state.roadblock(1).is_some());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999, Settings::default());
        let mut b = GameState::new(99999, Settings::default());
        let inputs = [RIGHT, RIGHT, TickInput::default(), LEFT, RIGHT];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.world.offset, b.world.offset);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.player.block_timer, b.player.block_timer);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_block_timer_tracks_gate(moves in prop::collection::vec(prop_oneof![
            3 => Just(5.0f32),
            1 => Just(-5.0f32),
            1 => Just(0.0f32),
        ], 200..1200)) {
            let mut state = GameState::new(4242, Settings::default());
            let mut passed = std::collections::BTreeSet::new();

            for dx in moves {
                tick(&mut state, &TickInput { dx });

                let blocked = state.player.block_timer > 0.0;
                prop_assert_eq!(!blocked, state.player.can_move());
                prop_assert_eq!(blocked, state.player.blocking_roadblock.is_some());

                if let Some(id) = state.player.blocking_roadblock {
                    let rb = state.roadblock(id).expect("blocking gate retained");
                    prop_assert_eq!(rb.timer(), state.player.block_timer);
                }

                // Passed gates stay passed
                for rb in &state.roadblocks {
                    if passed.contains(&rb.id) {
                        prop_assert!(rb.blocked_once());
                    }
                    if rb.blocked_once() {
                        passed.insert(rb.id);
                    }
                }
            }
        }
    }
}
