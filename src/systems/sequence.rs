//! Scripted success/failure sequencing.
//!
//! Consumes collision, interaction, and animation-completion events and
//! drives the non-interruptible windows between free roam and the next
//! level: scare → flee (→ rescue) → banner → reset, or swirl → knockout →
//! banner → reset.

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};

use crate::{
    animation::{AnimationRuntime, SetStateOpts},
    constants::{ARENA_SIZE, BANNER_TIME, LAUGH_PLAYS, SCARED_TIME, SWIRL_PLAYS},
    error::GameError,
    events::{AnimationFinished, CollisionKind, GameCommand, GameEvent, InteractionEvent},
    level::LevelConfig,
    sprites::anim,
    systems::{
        components::{DeltaTime, GameRng, NpcTag, Player, Position},
        input::InputState,
        interaction::{BannerKind, ComboOutcome, InteractionSession},
        npc::Npc,
    },
};

/// The scripted-window state machine.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub enum Sequence {
    #[default]
    Idle,
    /// Waiting for the villager's scared animation to finish.
    NpcScare { game_complete: bool },
    /// Waiting for the escape run to report completion.
    Escape { game_complete: bool },
    /// Success banner window; ends in a level advance (or wraparound).
    Celebrate { remaining: f32 },
    /// Waiting for the player's swirl animation to finish.
    Swirl,
    /// Failure banner window; ends in a same-level reset.
    Knockout { remaining: f32 },
}

/// Scene work the facade performs after the schedule runs. Spawning and
/// despawning level entities needs full world access.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingReset {
    #[default]
    None,
    /// Advance to the next level (wrapping after the last) and rebuild.
    NextLevel,
    /// Rebuild the current level after a failure.
    SameLevel,
    /// Back to level 1, explicit game reset.
    FullReset,
}

#[allow(clippy::type_complexity)]
#[allow(clippy::too_many_arguments)]
pub fn sequence_system(
    delta_time: Res<DeltaTime>,
    mut sequence: ResMut<Sequence>,
    mut pending: ResMut<PendingReset>,
    mut session: ResMut<InteractionSession>,
    mut input: ResMut<InputState>,
    mut rng: ResMut<GameRng>,
    mut game_events: EventReader<GameEvent>,
    mut interaction_events: EventReader<InteractionEvent>,
    mut animation_events: EventReader<AnimationFinished>,
    mut errors: EventWriter<GameError>,
    mut players: Query<(Entity, &mut AnimationRuntime), With<Player>>,
    mut npcs: Query<(Entity, &mut Npc, &mut AnimationRuntime, &Position), (With<NpcTag>, Without<Player>)>,
) {
    let dt = delta_time.0;

    for event in game_events.read() {
        match *event {
            GameEvent::Collision { npc, kind, .. } => {
                if *sequence != Sequence::Idle || session.scripted() {
                    continue;
                }
                match kind {
                    CollisionKind::Stomp => {
                        let config = LevelConfig::get(session.level());
                        if session.start_interaction(config.combo_duration, &mut rng.0) {
                            input.start_combo_tracking();
                            if let Ok((_, mut animation)) = players.single_mut() {
                                animation.set_state(anim::SCARE, SetStateOpts::default());
                            }
                            if let Ok((_, _, mut animation, _)) = npcs.get_mut(npc) {
                                animation.set_state(anim::ALARMED, SetStateOpts::default());
                            }
                        }
                    }
                    CollisionKind::Clip => {
                        session.end_interaction("failure collision");
                        session.begin_scripted();
                        if let Ok((_, mut animation)) = players.single_mut() {
                            animation.set_state(
                                anim::SWIRL,
                                SetStateOpts {
                                    play_limit: Some(SWIRL_PLAYS),
                                    start_at_interval_offset: true,
                                    ..Default::default()
                                },
                            );
                        }
                        *sequence = Sequence::Swirl;
                    }
                }
            }
            GameEvent::Command(GameCommand::ResetGame) => {
                *pending = PendingReset::FullReset;
            }
            GameEvent::EscapeFinished { .. } => {
                if let Sequence::Escape { game_complete } = *sequence {
                    let kind = if game_complete {
                        BannerKind::GameClear
                    } else {
                        BannerKind::LevelClear
                    };
                    session.show_banner(kind, BANNER_TIME);
                    *sequence = Sequence::Celebrate { remaining: BANNER_TIME };
                }
            }
            _ => {}
        }
    }

    for event in interaction_events.read() {
        match *event {
            InteractionEvent::ComboCompleted(outcome) => {
                let game_complete = match outcome {
                    ComboOutcome::Continue => continue,
                    ComboOutcome::LevelComplete => false,
                    ComboOutcome::GameComplete => true,
                };
                if let Ok((_, mut animation)) = players.single_mut() {
                    animation.set_state(
                        anim::LAUGH,
                        SetStateOpts {
                            play_limit: Some(LAUGH_PLAYS),
                            start_at_interval_offset: true,
                            ..Default::default()
                        },
                    );
                }
                for (_, _, mut animation, _) in npcs.iter_mut() {
                    animation.set_state(
                        anim::SCARED,
                        SetStateOpts {
                            duration: Some(SCARED_TIME),
                            start_at_interval_offset: true,
                            ..Default::default()
                        },
                    );
                }
                *sequence = Sequence::NpcScare { game_complete };
            }
            InteractionEvent::TimedOut => {
                if let Ok((_, mut animation)) = players.single_mut() {
                    animation.set_state(
                        anim::SWIRL,
                        SetStateOpts {
                            play_limit: Some(SWIRL_PLAYS),
                            start_at_interval_offset: true,
                            ..Default::default()
                        },
                    );
                }
                *sequence = Sequence::Swirl;
            }
        }
    }

    for event in animation_events.read() {
        match (*sequence, event.state.as_str()) {
            (Sequence::NpcScare { game_complete }, anim::SCARED) => {
                match npcs.get_mut(event.entity) {
                    Ok((_, mut npc, mut animation, position)) => {
                        // Flee toward the nearest edge
                        let dir = if position.0.x >= ARENA_SIZE.x * 0.5 { 1.0 } else { -1.0 };
                        npc.start_escape(dir);
                        animation.set_state(anim::FLEE, SetStateOpts::default());
                        *sequence = Sequence::Escape { game_complete };
                    }
                    Err(_) => {
                        errors.write(GameError::InvalidState(
                            "Scared animation finished for a missing villager".to_string(),
                        ));
                    }
                }
            }
            (Sequence::Swirl, anim::SWIRL) => {
                if let Ok((player_entity, mut animation)) = players.single_mut() {
                    if event.entity == player_entity {
                        animation.set_state(anim::KO, SetStateOpts::default());
                        session.show_banner(BannerKind::Busted, BANNER_TIME);
                        *sequence = Sequence::Knockout { remaining: BANNER_TIME };
                    }
                }
            }
            _ => {}
        }
    }

    match *sequence {
        Sequence::Celebrate { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                *pending = PendingReset::NextLevel;
                *sequence = Sequence::Idle;
            } else {
                *sequence = Sequence::Celebrate { remaining };
            }
        }
        Sequence::Knockout { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                *pending = PendingReset::SameLevel;
                *sequence = Sequence::Idle;
            } else {
                *sequence = Sequence::Knockout { remaining };
            }
        }
        _ => {}
    }
}
