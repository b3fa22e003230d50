#![allow(dead_code)]

use bevy_ecs::{event::EventRegistry, query::With, schedule::Schedule, world::World};
use glam::Vec2;
use rand::{rngs::SmallRng, SeedableRng};

use spooked::{
    animation::{AnimationRuntime, AnimationSet, AnimationSpec, FrameId},
    constants::LOOP_TIME,
    error::GameError,
    events::GameEvent,
    game::Game,
    sprites::SpriteLibrary,
    systems::{
        components::{DeltaTime, GameRng, Player, Position, Velocity},
        interaction::InteractionSession,
        npc::npc_system,
        player::FloatState,
    },
};

/// A game with the placeholder sprite layout and a deterministic generator.
pub fn make_game() -> Game {
    let mut game = Game::new(SpriteLibrary::placeholder()).expect("placeholder layout is complete");
    game.world.insert_resource(GameRng(SmallRng::seed_from_u64(42)));
    game
}

pub const TICK: f32 = 1.0 / 60.0;

/// Runs the game forward by roughly `seconds` at the fixed demo timestep.
pub fn step(game: &mut Game, seconds: f32) {
    let ticks = (seconds / TICK).round().max(1.0) as u32;
    for _ in 0..ticks {
        game.tick(TICK);
    }
}

pub fn player_position(game: &mut Game) -> Vec2 {
    let mut query = game.world.query_filtered::<&Position, With<Player>>();
    query.single(&game.world).expect("player exists").0
}

pub fn player_velocity(game: &mut Game) -> Vec2 {
    let mut query = game.world.query_filtered::<&Velocity, With<Player>>();
    query.single(&game.world).expect("player exists").0
}

pub fn player_float(game: &mut Game) -> FloatState {
    let mut query = game.world.query_filtered::<&FloatState, With<Player>>();
    query.single(&game.world).expect("player exists").clone()
}

pub fn set_player_position(game: &mut Game, position: Vec2) {
    let mut query = game.world.query_filtered::<&mut Position, With<Player>>();
    query.single_mut(&mut game.world).expect("player exists").0 = position;
}

pub fn session(game: &Game) -> InteractionSession {
    game.world.resource::<InteractionSession>().clone()
}

/// A three-frame test animation set with a 0.1s interval.
pub fn test_animation_set() -> AnimationSet {
    let frames = |start: u32, count: u32| (start..start + count).map(FrameId).collect();
    AnimationSet::new("idle")
        .with_spec(AnimationSpec::new("idle", frames(0, 3), 0.1, true).unwrap())
        .with_spec(AnimationSpec::new("spin", frames(3, 4), 0.1, true).unwrap())
        .with_spec(AnimationSpec::new("down", frames(7, 2), 0.1, false).unwrap())
        .with_terminal("down")
}

pub fn test_runtime() -> AnimationRuntime {
    AnimationRuntime::new(test_animation_set())
}

/// A bare world + schedule running only the villager system, for driving
/// escape sequences without the rest of the game.
pub fn npc_test_world() -> (World, Schedule) {
    let mut world = World::default();
    EventRegistry::register_event::<GameEvent>(&mut world);
    EventRegistry::register_event::<GameError>(&mut world);
    world.insert_resource(DeltaTime(TICK));
    world.insert_resource(InteractionSession::default());
    world.insert_resource(GameRng(SmallRng::seed_from_u64(7)));

    let mut schedule = Schedule::default();
    schedule.add_systems(npc_system);
    (world, schedule)
}

/// Sanity helper so tests can reference the demo tick length.
pub fn loop_time_seconds() -> f32 {
    LOOP_TIME.as_secs_f32()
}
