use bevy_ecs::query::With;
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use spooked::animation::AnimationRuntime;
use spooked::constants::PLAYER_SPAWN;
use spooked::direction::Direction;
use spooked::game::Game;
use spooked::level::{DecorKind, NpcKind};
use spooked::sprites::anim;
use spooked::systems::components::{EntityKind, NpcTag, Player};
use spooked::systems::interaction::BannerKind;
use spooked::systems::sequence::Sequence;

mod common;

fn raw_key(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "ArrowUp",
        Direction::Down => "ArrowDown",
        Direction::Left => "ArrowLeft",
        Direction::Right => "ArrowRight",
    }
}

fn release_all(game: &mut Game) {
    for direction in Direction::DIRECTIONS {
        game.key_up(raw_key(direction));
    }
}

fn npc_position(game: &mut Game) -> Vec2 {
    let views = game.sprite_views();
    views
        .iter()
        .find(|view| matches!(view.kind, EntityKind::Npc(_)))
        .expect("villager view")
        .position
}

fn player_anim_state(game: &mut Game) -> String {
    let mut query = game.world.query_filtered::<&AnimationRuntime, With<Player>>();
    query.single(&game.world).expect("player exists").state().to_string()
}

fn npc_anim_state(game: &mut Game) -> String {
    let mut query = game.world.query_filtered::<&AnimationRuntime, With<NpcTag>>();
    query.single(&game.world).expect("villager exists").state().to_string()
}

/// Drops the ghost directly onto the villager so the contact is a stomp.
fn stomp_npc(game: &mut Game) {
    let npc = npc_position(game);
    common::set_player_position(game, npc - Vec2::new(0.0, 40.0));
    game.tick(common::TICK);
}

/// Releases everything, then freshly presses the current challenge's keys.
fn answer_combo(game: &mut Game) {
    release_all(game);
    game.tick(common::TICK);

    let combo = game.hud().combo.expect("challenge live");
    game.key_down(raw_key(combo.first));
    game.key_down(raw_key(combo.second));
    game.tick(common::TICK);
}

#[test]
fn test_initial_scene() {
    let mut game = common::make_game();
    game.tick(common::TICK);

    let hud = game.hud().clone();
    assert_eq!(hud.level, 1);
    assert_eq!(hud.combos_done, 0);
    assert_that(&hud.interaction_visible).is_false();
    assert_that(&hud.combo).is_none();

    // Level 1: ghost, one villager, three graves
    let views = game.sprite_views();
    assert_eq!(views.len(), 5);
    assert_that(&views.iter().any(|view| view.kind == EntityKind::Ghost)).is_true();
    assert_that(&views.iter().any(|view| view.kind == EntityKind::Npc(NpcKind::Idle))).is_true();
    let graves = views
        .iter()
        .filter(|view| view.kind == EntityKind::Decor(DecorKind::Grave))
        .count();
    assert_eq!(graves, 3);
    // Every view carries a frame handle to draw
    assert_that(&views.iter().all(|view| view.frame.is_some())).is_true();
}

#[test]
fn test_stomp_starts_an_interaction() {
    let mut game = common::make_game();
    game.tick(common::TICK);
    stomp_npc(&mut game);

    let session = common::session(&game);
    assert_that(&session.interaction_active()).is_true();
    assert_that(&session.movement_locked()).is_true();

    let hud = game.hud().clone();
    assert_that(&hud.interaction_visible).is_true();
    assert_that(&hud.combo).is_some();
    // Full time budget remains at the start
    assert!((hud.progress - 1.0).abs() < 0.01);

    assert_eq!(player_anim_state(&mut game), anim::SCARE);
    assert_eq!(npc_anim_state(&mut game), anim::ALARMED);
}

#[test]
fn test_combo_success_advances_the_quota() {
    let mut game = common::make_game();
    game.tick(common::TICK);
    stomp_npc(&mut game);

    let first = game.hud().combo.expect("challenge live");
    answer_combo(&mut game);

    let hud = game.hud().clone();
    assert_eq!(hud.combos_done, 1);
    assert_eq!(hud.banner, Some(BannerKind::ComboHit));
    let second = hud.combo.expect("next challenge live");
    // The next challenge is never the one just completed
    assert_ne!((second.first, second.second), (first.first, first.second));
}

#[test]
fn test_clearing_the_quota_reaches_the_next_level() {
    let mut game = common::make_game();
    game.tick(common::TICK);
    stomp_npc(&mut game);

    // Level 1 requires three combos
    for _ in 0..3 {
        answer_combo(&mut game);
    }
    release_all(&mut game);

    let session = common::session(&game);
    assert_that(&session.scripted()).is_true();
    assert_that(&session.interaction_active()).is_false();

    // Scare → flee → banner → reset into level 2
    let mut reached = false;
    for _ in 0..(10.0 / common::TICK) as u32 {
        game.tick(common::TICK);
        if game.hud().level == 2 {
            reached = true;
            break;
        }
    }
    assert_that(&reached).is_true();

    let session = common::session(&game);
    assert_that(&session.movement_locked()).is_false();
    // Back at spawn (level 2 wind may have drifted a fraction of a pixel)
    assert_that(&(common::player_position(&mut game).distance(PLAYER_SPAWN) < 1.0)).is_true();
    // Level 2 features the business man
    let views = game.sprite_views();
    assert_that(&views.iter().any(|view| view.kind == EntityKind::Npc(NpcKind::Business))).is_true();
    assert_that(&views.iter().any(|view| view.kind == EntityKind::Decor(DecorKind::Bat))).is_true();
}

#[test]
fn test_side_collision_fails_without_an_interaction() {
    let mut game = common::make_game();
    game.tick(common::TICK);

    let npc = npc_position(&mut game);
    common::set_player_position(&mut game, npc - Vec2::new(30.0, 0.0));
    game.tick(common::TICK);

    let session = common::session(&game);
    // Failure collision never opens an interaction
    assert_that(&session.interaction_active()).is_false();
    assert_that(&session.scripted()).is_true();
    assert_eq!(*game.world.resource::<Sequence>(), Sequence::Swirl);
    assert_eq!(player_anim_state(&mut game), anim::SWIRL);

    // Swirl → knockout → banner → same-level reset
    common::step(&mut game, 3.0);
    let session = common::session(&game);
    assert_eq!(session.level(), 1);
    assert_that(&session.movement_locked()).is_false();
    assert_eq!(common::player_position(&mut game), PLAYER_SPAWN);
    assert_eq!(player_anim_state(&mut game), anim::IDLE);
}

#[test]
fn test_timeout_runs_the_failure_sequence() {
    let mut game = common::make_game();
    game.tick(common::TICK);
    stomp_npc(&mut game);

    // Let the whole budget elapse without touching a key (level 1: 10s),
    // then ride out the failure sequence
    common::step(&mut game, 10.1);
    assert_eq!(player_anim_state(&mut game), anim::SWIRL);

    common::step(&mut game, 3.0);
    let session = common::session(&game);
    assert_eq!(session.level(), 1);
    assert_that(&session.movement_locked()).is_false();
}

#[test]
fn test_pause_freezes_the_simulation() {
    let mut game = common::make_game();
    game.key_down("ArrowDown");
    common::step(&mut game, 0.2);
    let before = common::player_position(&mut game);

    game.key_down("p");
    assert_that(&game.paused()).is_true();
    common::step(&mut game, 1.0);
    assert_eq!(common::player_position(&mut game), before);

    game.key_down("p");
    common::step(&mut game, 0.2);
    assert_ne!(common::player_position(&mut game), before);
}

#[test]
fn test_explicit_reset_returns_to_level_one() {
    let mut game = common::make_game();
    game.tick(common::TICK);
    stomp_npc(&mut game);
    for _ in 0..3 {
        answer_combo(&mut game);
    }
    release_all(&mut game);
    for _ in 0..(10.0 / common::TICK) as u32 {
        game.tick(common::TICK);
        if game.hud().level == 2 {
            break;
        }
    }
    assert_eq!(game.hud().level, 2);

    game.key_down("r");
    game.tick(common::TICK);

    let session = common::session(&game);
    assert_eq!(session.level(), 1);
    assert_that(&session.movement_locked()).is_false();
    assert_eq!(common::player_position(&mut game), PLAYER_SPAWN);
}

#[test]
fn test_touch_buttons_share_the_keyboard_identifier_space() {
    let mut game = common::make_game();
    game.press_button(Direction::Down);
    game.tick(common::TICK);
    assert_that(&(common::player_velocity(&mut game).y > 0.0)).is_true();

    game.release_button(Direction::Down);
    // Keyboard release of the same identifier is equivalent
    game.key_up("ArrowDown");
    common::step(&mut game, 0.5);
    assert!(common::player_velocity(&mut game).y.abs() < 0.001);
}
