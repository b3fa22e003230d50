//! Villager movement: ambient idle/walk behavior and the multi-phase escape
//! sequence that follows a successful scare.

use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use rand::Rng;

use crate::{
    animation::{AnimationRuntime, SetStateOpts},
    constants::{
        ARENA_SIZE, ESCAPE_RETURN_FRACTION, ESCAPE_SPEED, NPC_SPEED_MUL_MAX, NPC_SPEED_MUL_MIN, NPC_WAIT_MAX,
        NPC_WAIT_MIN, NPC_WALK_SPEED, NPC_WALK_TIME_MAX, NPC_WALK_TIME_MIN, PICKUP_DISTANCE, RESCUE_DELAY,
    },
    error::{EntityError, GameError},
    events::GameEvent,
    level::NpcKind,
    sprites::anim,
    systems::{
        components::{Collider, Companion, DeltaTime, Facing, GameRng, NpcTag, Position, Velocity},
        interaction::InteractionSession,
    },
};

/// Escape sub-phases. `ReturningForCompanion` is only entered through the
/// rescue countdown, and only when a companion reference exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapePhase {
    Initial,
    ReturningForCompanion,
    FinalEscape,
}

/// Ambient behavior: wait in place, then commit to a randomized walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ambient {
    Waiting { remaining: f32 },
    Walking { remaining: f32, dir: f32, speed: f32 },
}

/// A running escape sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Escape {
    pub phase: EscapePhase,
    /// +1.0 flees right, -1.0 flees left.
    pub dir: f32,
    /// Whether this run detours back for a companion.
    pub rescue_requested: bool,
    /// Countdown armed once the villager is off-screen; fires the detour.
    pub rescue_timer: Option<f32>,
    rescue_fired: bool,
    pub victory_reported: bool,
}

impl Escape {
    pub fn new(dir: f32, rescue_requested: bool) -> Self {
        Self {
            phase: EscapePhase::Initial,
            dir,
            rescue_requested,
            rescue_timer: None,
            rescue_fired: false,
            victory_reported: false,
        }
    }
}

/// Behavior state for one villager. The companion reference is non-owning;
/// the cat's lifecycle belongs to the level spawner.
#[derive(Component, Debug, Clone, Copy)]
pub struct Npc {
    pub kind: NpcKind,
    pub ambient: Ambient,
    pub escape: Option<Escape>,
    pub companion: Option<Entity>,
}

impl Npc {
    pub fn new(kind: NpcKind, companion: Option<Entity>) -> Self {
        Self {
            kind,
            ambient: Ambient::Waiting { remaining: 1.2 },
            escape: None,
            companion,
        }
    }

    /// Begins the escape sequence, fleeing in `dir`. The rescue detour is
    /// taken only when a companion exists.
    pub fn start_escape(&mut self, dir: f32) {
        self.escape = Some(Escape::new(dir, self.companion.is_some()));
    }
}

/// Whether an entity's box has fully crossed the arena bound it is fleeing
/// toward — not merely its center.
pub fn fully_outside(x: f32, half_width: f32, dir: f32) -> bool {
    if dir > 0.0 {
        x - half_width > ARENA_SIZE.x
    } else {
        x + half_width < 0.0
    }
}

#[allow(clippy::type_complexity)]
#[allow(clippy::too_many_arguments)]
pub fn npc_system(
    delta_time: Res<DeltaTime>,
    session: Res<InteractionSession>,
    mut rng: ResMut<GameRng>,
    mut events: EventWriter<GameEvent>,
    mut errors: EventWriter<GameError>,
    mut npcs: Query<
        (
            Entity,
            &mut Npc,
            &mut Position,
            &mut Velocity,
            &mut Facing,
            &Collider,
            &mut AnimationRuntime,
        ),
        (With<NpcTag>, Without<Companion>),
    >,
    mut companions: Query<
        (&mut Position, &mut Velocity, &Collider, &mut AnimationRuntime),
        (With<Companion>, Without<NpcTag>),
    >,
) {
    let dt = delta_time.0;

    for (entity, mut npc, mut position, mut velocity, mut facing, collider, mut animation) in npcs.iter_mut() {
        if let Some(mut escape) = npc.escape {
            match escape.phase {
                EscapePhase::Initial => {
                    velocity.0.x = escape.dir * ESCAPE_SPEED;
                    position.0.x += velocity.0.x * dt;
                    facing.left = escape.dir < 0.0;

                    let off_screen = fully_outside(position.0.x, collider.half.x, escape.dir);
                    if escape.rescue_requested {
                        if off_screen && !escape.rescue_fired && escape.rescue_timer.is_none() {
                            escape.rescue_timer = Some(RESCUE_DELAY);
                        }
                        if let Some(remaining) = escape.rescue_timer {
                            let remaining = remaining - dt;
                            if remaining <= 0.0 {
                                escape.rescue_timer = None;
                                escape.rescue_fired = true;
                                if npc.companion.is_some() {
                                    escape.phase = EscapePhase::ReturningForCompanion;
                                } else {
                                    tracing::warn!(?entity, "Rescue detour requested without a companion");
                                }
                            } else {
                                escape.rescue_timer = Some(remaining);
                            }
                        }
                    } else if off_screen && !escape.victory_reported {
                        escape.victory_reported = true;
                        events.write(GameEvent::EscapeFinished { npc: entity });
                    }
                }
                EscapePhase::ReturningForCompanion => {
                    velocity.0.x = -escape.dir * ESCAPE_SPEED * ESCAPE_RETURN_FRACTION;
                    position.0.x += velocity.0.x * dt;
                    facing.left = velocity.0.x < 0.0;

                    if let Some(companion) = npc.companion {
                        match companions.get_mut(companion) {
                            Ok((mut cat_position, mut cat_velocity, cat_collider, mut cat_animation)) => {
                                let contact = collider.half.x + cat_collider.half.x;
                                let gap = (position.0.x - cat_position.0.x).abs();
                                // Within pickup range of edge contact
                                if gap <= contact + PICKUP_DISTANCE {
                                    cat_position.0.x = position.0.x - escape.dir * contact;
                                    cat_velocity.0.x = escape.dir * ESCAPE_SPEED;
                                    cat_animation.ensure_state(anim::CARRIED);
                                    velocity.0.x = escape.dir * ESCAPE_SPEED;
                                    facing.left = escape.dir < 0.0;
                                    escape.phase = EscapePhase::FinalEscape;
                                }
                            }
                            Err(_) => {
                                errors.write(EntityError::CompanionMissing.into());
                                escape.phase = EscapePhase::FinalEscape;
                            }
                        }
                    } else {
                        escape.phase = EscapePhase::FinalEscape;
                    }
                }
                EscapePhase::FinalEscape => {
                    velocity.0.x = escape.dir * ESCAPE_SPEED;
                    position.0.x += velocity.0.x * dt;
                    facing.left = escape.dir < 0.0;

                    // A carried companion gets this villager's velocity each
                    // tick so it moves in lockstep.
                    let mut companion_outside = true;
                    if let Some(companion) = npc.companion {
                        if let Ok((mut cat_position, mut cat_velocity, cat_collider, _)) =
                            companions.get_mut(companion)
                        {
                            cat_velocity.0 = velocity.0;
                            cat_position.0.x += cat_velocity.0.x * dt;
                            companion_outside = fully_outside(cat_position.0.x, cat_collider.half.x, escape.dir);
                        }
                    }

                    if !escape.victory_reported
                        && fully_outside(position.0.x, collider.half.x, escape.dir)
                        && companion_outside
                    {
                        escape.victory_reported = true;
                        events.write(GameEvent::EscapeFinished { npc: entity });
                    }
                }
            }
            npc.escape = Some(escape);
            continue;
        }

        // Ambient behavior is suspended while movement is locked.
        if session.movement_locked() {
            velocity.0.x = 0.0;
            continue;
        }

        npc.ambient = match npc.ambient {
            Ambient::Waiting { remaining } => {
                velocity.0.x = 0.0;
                if matches!(animation.state(), anim::WALK) {
                    animation.set_state(anim::IDLE, SetStateOpts::default());
                }
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    let dir = if rng.0.random::<bool>() { 1.0 } else { -1.0 };
                    let speed = NPC_WALK_SPEED * rng.0.random_range(NPC_SPEED_MUL_MIN..NPC_SPEED_MUL_MAX);
                    facing.left = dir < 0.0;
                    Ambient::Walking {
                        remaining: rng.0.random_range(NPC_WALK_TIME_MIN..NPC_WALK_TIME_MAX),
                        dir,
                        speed,
                    }
                } else {
                    Ambient::Waiting { remaining }
                }
            }
            Ambient::Walking { remaining, dir, speed } => {
                velocity.0.x = dir * speed;
                position.0.x = (position.0.x + velocity.0.x * dt)
                    .clamp(collider.half.x, ARENA_SIZE.x - collider.half.x);
                if matches!(animation.state(), anim::IDLE) {
                    animation.set_state(anim::WALK, SetStateOpts::default());
                }
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    velocity.0.x = 0.0;
                    Ambient::Waiting {
                        remaining: rng.0.random_range(NPC_WAIT_MIN..NPC_WAIT_MAX),
                    }
                } else {
                    Ambient::Walking { remaining, dir, speed }
                }
            }
        };
    }
}
