//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::Vec2;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of the play area, in pixels.
pub const ARENA_SIZE: Vec2 = Vec2::new(960.0, 540.0);
/// The vertical line villagers stand on, in pixels from the top of the arena.
pub const GROUND_Y: f32 = 500.0;

/// Where the ghost (re)spawns.
pub const PLAYER_SPAWN: Vec2 = Vec2::new(480.0, 160.0);
/// Where the level's villager spawns (feet on the ground line).
pub const NPC_SPAWN_X: f32 = 640.0;
/// Where the witch's cat waits (feet on the ground line).
pub const CAT_SPAWN_X: f32 = 240.0;

/// Collision half-extents, in pixels.
pub const PLAYER_HALF_SIZE: Vec2 = Vec2::new(18.0, 22.0);
pub const NPC_HALF_SIZE: Vec2 = Vec2::new(16.0, 24.0);
pub const CAT_HALF_SIZE: Vec2 = Vec2::new(12.0, 9.0);

/// Maximum vertical speed of the ghost, in pixels per second.
pub const VERTICAL_SPEED: f32 = 150.0;
/// How fast vertical velocity may change, in pixels per second squared.
pub const VERTICAL_ACCEL: f32 = 900.0;
/// Velocity magnitude above which the ghost switches to its flying animation.
pub const MOVE_ANIM_THRESHOLD: f32 = 12.0;

/// Total duration of a float impulse, in seconds. Independent of the force tier.
pub const FLOAT_DURATION: f32 = 0.8;
/// Fraction of the float spent at full speed before deceleration begins.
pub const FLOAT_FULL_SPEED_FRACTION: f32 = 0.45;
/// The deceleration phase eases down to this fraction of the tier force, never to zero.
pub const FLOAT_FLOOR: f32 = 0.2;
/// Gentle upward drift applied while a float is active, in pixels per second.
pub const FLOAT_LIFT: f32 = -26.0;

/// Seconds between wind gust changes while the level has wind enabled.
pub const WIND_CHANGE_INTERVAL: f32 = 1.6;
/// Gust strength range, in pixels per second.
pub const WIND_STRENGTH_MIN: f32 = 12.0;
pub const WIND_STRENGTH_MAX: f32 = 70.0;
/// Vertical gust component is scaled down relative to horizontal.
pub const WIND_VERTICAL_SCALE: f32 = 0.35;
/// Blend factor for folding a fresh gust into the current wind velocity.
pub const WIND_INERTIA: f32 = 0.4;
/// Exponential decay rate (per second) applied to wind velocity while gusts fire.
pub const WIND_DECAY: f32 = 0.35;
/// Faster decay rate used when the level has wind disabled.
pub const WIND_CALM_DECAY: f32 = 3.0;

/// Seconds a villager waits between ambient walks.
pub const NPC_WAIT_MIN: f32 = 0.8;
pub const NPC_WAIT_MAX: f32 = 2.4;
/// Seconds a single ambient walk lasts.
pub const NPC_WALK_TIME_MIN: f32 = 0.6;
pub const NPC_WALK_TIME_MAX: f32 = 1.8;
/// Base ambient walk speed, in pixels per second.
pub const NPC_WALK_SPEED: f32 = 45.0;
/// Each ambient walk draws a speed multiplier from this range.
pub const NPC_SPEED_MUL_MIN: f32 = 0.6;
pub const NPC_SPEED_MUL_MAX: f32 = 1.4;

/// Horizontal speed of a fleeing villager, in pixels per second.
pub const ESCAPE_SPEED: f32 = 260.0;
/// The witch doubles back for her cat at this fraction of the escape speed.
pub const ESCAPE_RETURN_FRACTION: f32 = 0.55;
/// Slack distance (beyond edge contact) at which a companion counts as reached.
pub const PICKUP_DISTANCE: f32 = 6.0;

/// Frame interval shared by the stock animation sets, in seconds.
pub const FRAME_INTERVAL: f32 = 0.12;
/// Delay before a fleeing witch turns back for her cat: half of one frame interval.
pub const RESCUE_DELAY: f32 = FRAME_INTERVAL * 0.5;

/// Frame advances in the player's swirl (dizzy) animation before knockout.
pub const SWIRL_PLAYS: u32 = 8;
/// Frame advances in the player's laugh animation after clearing a level.
pub const LAUGH_PLAYS: u32 = 6;
/// How long a villager's scared pose plays before it breaks into a run.
pub const SCARED_TIME: f32 = 0.72;

/// How long the level-clear / busted banners stay up, in seconds.
pub const BANNER_TIME: f32 = 1.5;
/// How long the per-combo hit flash stays up, in seconds.
pub const COMBO_FLASH_TIME: f32 = 0.45;

/// Ground-line x positions for gravestone decorations.
pub const GRAVE_XS: [f32; 3] = [140.0, 330.0, 790.0];
/// Positions for bat decorations.
pub const BAT_POSITIONS: [Vec2; 2] = [Vec2::new(220.0, 90.0), Vec2::new(720.0, 130.0)];
/// Position for the fog overlay decoration.
pub const FOG_POSITION: Vec2 = Vec2::new(480.0, 470.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_spawns_inside_arena() {
        assert!(PLAYER_SPAWN.x > PLAYER_HALF_SIZE.x);
        assert!(PLAYER_SPAWN.x < ARENA_SIZE.x - PLAYER_HALF_SIZE.x);
        assert!(PLAYER_SPAWN.y > PLAYER_HALF_SIZE.y);
        assert!(PLAYER_SPAWN.y < ARENA_SIZE.y - PLAYER_HALF_SIZE.y);
        assert!(NPC_SPAWN_X < ARENA_SIZE.x - NPC_HALF_SIZE.x);
        assert!(CAT_SPAWN_X > CAT_HALF_SIZE.x);
    }

    #[test]
    fn test_ground_below_spawns() {
        assert!(GROUND_Y > PLAYER_SPAWN.y);
        assert!(GROUND_Y <= ARENA_SIZE.y);
    }

    #[test]
    fn test_float_fractions() {
        assert!(FLOAT_DURATION > 0.0);
        assert!(FLOAT_FULL_SPEED_FRACTION > 0.0 && FLOAT_FULL_SPEED_FRACTION < 1.0);
        assert!(FLOAT_FLOOR > 0.0 && FLOAT_FLOOR < 1.0);
    }

    #[test]
    fn test_wind_ranges() {
        assert!(WIND_STRENGTH_MIN < WIND_STRENGTH_MAX);
        assert!(WIND_VERTICAL_SCALE > 0.0 && WIND_VERTICAL_SCALE <= 1.0);
        assert!(WIND_INERTIA > 0.0 && WIND_INERTIA <= 1.0);
        // Calm air must settle faster than gusting air
        assert!(WIND_CALM_DECAY > WIND_DECAY);
    }

    #[test]
    fn test_npc_ranges() {
        assert!(NPC_WAIT_MIN < NPC_WAIT_MAX);
        assert!(NPC_WALK_TIME_MIN < NPC_WALK_TIME_MAX);
        assert!(NPC_SPEED_MUL_MIN < NPC_SPEED_MUL_MAX);
        assert!(ESCAPE_RETURN_FRACTION > 0.0 && ESCAPE_RETURN_FRACTION < 1.0);
    }

    #[test]
    fn test_rescue_delay_is_half_a_frame() {
        assert_eq!(RESCUE_DELAY, FRAME_INTERVAL * 0.5);
    }

    #[test]
    fn test_decor_positions_inside_arena() {
        for x in GRAVE_XS {
            assert!(x > 0.0 && x < ARENA_SIZE.x);
        }
        for pos in BAT_POSITIONS {
            assert!(pos.x > 0.0 && pos.x < ARENA_SIZE.x);
            assert!(pos.y > 0.0 && pos.y < ARENA_SIZE.y);
        }
        assert!(FOG_POSITION.y < ARENA_SIZE.y);
    }
}
