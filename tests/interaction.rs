use pretty_assertions::assert_eq;
use rand::{rngs::SmallRng, SeedableRng};
use speculoos::prelude::*;

use spooked::direction::Direction;
use spooked::level::{max_level, LevelConfig};
use spooked::systems::hud::HudModel;
use spooked::systems::interaction::{ComboOutcome, InteractionSession};
use spooked::systems::sequence::Sequence;

mod common;

#[test]
fn test_challenge_keys_are_always_distinct() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut session = InteractionSession::default();
    session.start_interaction(10.0, &mut rng);

    for _ in 0..500 {
        let challenge = *session.challenge().expect("challenge live");
        assert_ne!(challenge.first, challenge.second);
        session.next_combo(10.0, &mut rng);
    }
}

#[test]
fn test_challenge_never_repeats_immediately() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut session = InteractionSession::default();
    session.start_interaction(10.0, &mut rng);

    let mut previous = session.challenge().expect("challenge live").pair();
    for _ in 0..500 {
        session.next_combo(10.0, &mut rng);
        let current = session.challenge().expect("challenge live").pair();
        assert_ne!(current, previous);
        previous = current;
    }
}

#[test]
fn test_select_pair_excludes_only_the_previous_pair() {
    let mut rng = SmallRng::seed_from_u64(3);
    let alphabet = [Direction::Up, Direction::Down];

    // Two ordered pairs exist; excluding one always yields the other
    for _ in 0..50 {
        let pair = InteractionSession::select_pair(&mut rng, &alphabet, Some((Direction::Up, Direction::Down)));
        assert_eq!(pair, Some((Direction::Down, Direction::Up)));
    }
}

#[test]
fn test_select_pair_degenerate_alphabets() {
    let mut rng = SmallRng::seed_from_u64(4);

    assert_eq!(InteractionSession::select_pair(&mut rng, &[], None), None);
    assert_eq!(InteractionSession::select_pair(&mut rng, &[Direction::Up], None), None);
    // Duplicate entries never pair with themselves
    assert_eq!(
        InteractionSession::select_pair(&mut rng, &[Direction::Up, Direction::Up], None),
        None
    );
}

#[test]
fn test_start_interaction_is_idempotent() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut session = InteractionSession::default();

    assert_that(&session.start_interaction(10.0, &mut rng)).is_true();
    let first = session.challenge().expect("challenge live").pair();

    // A second start while active is a no-op
    assert_that(&session.start_interaction(10.0, &mut rng)).is_false();
    assert_eq!(session.challenge().expect("challenge live").pair(), first);
}

#[test]
fn test_quota_outcomes() {
    let mut rng = SmallRng::seed_from_u64(6);
    let mut session = InteractionSession::default();
    session.start_interaction(10.0, &mut rng);

    // Quota of 3: two completions continue, the third clears the level
    assert_eq!(session.process_combo_success(3, max_level()), ComboOutcome::Continue);
    assert_eq!(session.process_combo_success(3, max_level()), ComboOutcome::Continue);
    assert_eq!(session.process_combo_success(3, max_level()), ComboOutcome::LevelComplete);
    assert_that(&session.scripted()).is_true();
    assert_that(&session.interaction_active()).is_false();
}

#[test]
fn test_quota_on_final_level_completes_the_game() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut session = InteractionSession::default();
    while session.level() < max_level() {
        session.advance_level(max_level());
    }

    session.start_interaction(6.5, &mut rng);
    assert_eq!(session.process_combo_success(1, max_level()), ComboOutcome::GameComplete);
}

#[test]
fn test_advance_level_wraps_after_the_last() {
    let mut session = InteractionSession::default();
    for expected in 2..=max_level() {
        session.advance_level(max_level());
        assert_eq!(session.level(), expected);
    }
    session.advance_level(max_level());
    assert_eq!(session.level(), 1);
}

#[test]
fn test_reset_keeps_level_but_clears_exclusion() {
    let mut rng = SmallRng::seed_from_u64(8);
    let mut session = InteractionSession::default();
    session.advance_level(max_level());
    session.start_interaction(8.0, &mut rng);
    assert_that(&session.last_pair()).is_some();

    session.reset();
    assert_eq!(session.level(), 2);
    assert_that(&session.interaction_active()).is_false();
    // No leftover exclusion: the next interaction draws from the full pair set
    assert_that(&session.last_pair()).is_none();

    session.start_interaction(8.0, &mut rng);
    assert_that(&session.challenge()).is_some();
}

#[test]
fn test_reset_progress_returns_to_level_one() {
    let mut session = InteractionSession::default();
    session.advance_level(max_level());
    session.advance_level(max_level());
    assert_eq!(session.level(), 3);

    session.reset_progress();
    assert_eq!(session.level(), 1);
}

#[test]
fn test_timeout_scenario() {
    let mut game = common::make_game();

    // Level 1 has a 10 second combo budget
    assert_eq!(LevelConfig::get(1).combo_duration, 10.0);
    {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut session = game.world.resource_mut::<InteractionSession>();
        session.start_interaction(10.0, &mut rng);
    }

    // Advance 11 seconds without any key press
    common::step(&mut game, 11.0);

    let session = common::session(&game);
    // The timeout fired: challenge gone, scripted failure window running
    assert_that(&session.challenge()).is_none();
    assert_that(&session.interaction_active()).is_false();
    assert_that(&session.scripted()).is_true();

    // Progress reads 0.0 at and after the budget mark
    let hud = game.world.resource::<HudModel>();
    assert_eq!(hud.progress, 0.0);
    assert_that(&hud.combo).is_none();

    // A subsequent update does not fire a second timeout: the failure
    // sequence keeps progressing instead of restarting
    let sequence_before = *game.world.resource::<Sequence>();
    assert_ne!(sequence_before, Sequence::Idle);
    game.tick(common::TICK);
    let session = common::session(&game);
    assert_that(&session.challenge()).is_none();
}
