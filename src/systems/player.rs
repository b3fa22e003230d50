//! Player (ghost) movement model.
//!
//! Vertical motion is direct acceleration-limited control. Horizontal motion
//! comes from timed "float" impulses whose force tier grows with how long the
//! triggering key is held. Wind is integrated independently on top.

use bevy_ecs::{
    component::Component,
    event::EventReader,
    query::With,
    system::{Query, Res},
};
use glam::Vec2;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{
    animation::AnimationRuntime,
    constants::{
        ARENA_SIZE, FLOAT_DURATION, FLOAT_FLOOR, FLOAT_FULL_SPEED_FRACTION, FLOAT_LIFT, MOVE_ANIM_THRESHOLD,
        VERTICAL_ACCEL, VERTICAL_SPEED,
    },
    direction::Direction,
    events::{GameCommand, GameEvent},
    level::LevelConfig,
    sprites::anim,
    systems::{
        components::{Collider, DeltaTime, Facing, Player, Position, Velocity},
        input::InputState,
        interaction::InteractionSession,
        wind::Wind,
    },
};

/// Float force tiers, ordered ascending by the hold duration that unlocks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum FloatTier {
    Light,
    Medium,
    Heavy,
}

impl FloatTier {
    /// Hold duration (seconds) at which this tier unlocks.
    pub const fn min_hold(self) -> f32 {
        match self {
            FloatTier::Light => 0.0,
            FloatTier::Medium => 0.25,
            FloatTier::Heavy => 0.6,
        }
    }

    /// Horizontal force of this tier, in pixels per second.
    pub const fn force(self) -> f32 {
        match self {
            FloatTier::Light => 90.0,
            FloatTier::Medium => 150.0,
            FloatTier::Heavy => 220.0,
        }
    }

    /// The tier a hold duration earns: the highest threshold exceeded wins.
    pub fn for_hold(hold: f32) -> FloatTier {
        FloatTier::iter()
            .rev()
            .find(|tier| hold >= tier.min_hold())
            .unwrap_or(FloatTier::Light)
    }
}

/// An in-flight float impulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveFloat {
    pub direction: Direction,
    pub elapsed: f32,
    pub tier: FloatTier,
    pub current_speed: f32,
    pub initial_speed: f32,
}

/// Hold bookkeeping for the key that triggered the current float. Released
/// keys freeze their recorded duration but do not cancel the float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyHold {
    pub direction: Direction,
    pub elapsed: f32,
    pub released: bool,
}

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct FloatState {
    pub active: Option<ActiveFloat>,
    pub hold: Option<KeyHold>,
}

impl FloatState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Horizontal velocity of a float at its current progress: full tier force,
/// then a quadratic ease-out down to the floor multiplier. Never zero until
/// the float ends.
pub fn float_velocity(float: &ActiveFloat) -> f32 {
    let sign = if float.direction == Direction::Left { -1.0 } else { 1.0 };
    let t = (float.elapsed / FLOAT_DURATION).clamp(0.0, 1.0);
    if t < FLOAT_FULL_SPEED_FRACTION {
        return sign * float.current_speed;
    }
    let s = (t - FLOAT_FULL_SPEED_FRACTION) / (1.0 - FLOAT_FULL_SPEED_FRACTION);
    let eased = FLOAT_FLOOR + (1.0 - FLOAT_FLOOR) * (1.0 - s) * (1.0 - s);
    sign * float.current_speed * eased
}

#[allow(clippy::type_complexity)]
pub fn player_system(
    delta_time: Res<DeltaTime>,
    session: Res<InteractionSession>,
    wind: Res<Wind>,
    input: Res<InputState>,
    mut events: EventReader<GameEvent>,
    mut query: Query<
        (
            &mut Position,
            &mut Velocity,
            &mut Facing,
            &mut FloatState,
            &mut AnimationRuntime,
            &Collider,
        ),
        With<Player>,
    >,
) {
    let dt = delta_time.0;
    let Ok((mut position, mut velocity, mut facing, mut float, mut animation, collider)) = query.single_mut() else {
        return;
    };

    // Interaction/animation lock: velocity forced to zero, nothing else updates.
    if session.movement_locked() {
        velocity.0 = Vec2::ZERO;
        events.clear();
        return;
    }

    let level = LevelConfig::get(session.level());

    for event in events.read() {
        match *event {
            GameEvent::Command(GameCommand::Press(direction)) if direction.is_horizontal() => {
                // Facing flips on every horizontal press, floating or not.
                facing.left = direction == Direction::Left;

                if level.float_enabled && float.active.is_none() {
                    let tier = FloatTier::Light;
                    float.active = Some(ActiveFloat {
                        direction,
                        elapsed: 0.0,
                        tier,
                        current_speed: tier.force(),
                        initial_speed: tier.force(),
                    });
                    float.hold = Some(KeyHold {
                        direction,
                        elapsed: 0.0,
                        released: false,
                    });
                }
                // A press while already floating is ignored; the running float continues.
            }
            GameEvent::Command(GameCommand::Release(direction)) if direction.is_horizontal() => {
                if let Some(hold) = float.hold.as_mut() {
                    if hold.direction == direction {
                        hold.released = true;
                    }
                }
            }
            _ => {}
        }
    }

    // Vertical axis: velocity moves toward the target by at most accel * dt.
    let target = if input.is_pressed(Direction::Up) && !input.is_pressed(Direction::Down) {
        -VERTICAL_SPEED
    } else if input.is_pressed(Direction::Down) && !input.is_pressed(Direction::Up) {
        VERTICAL_SPEED
    } else {
        0.0
    };
    let max_step = VERTICAL_ACCEL * dt;
    velocity.0.y += (target - velocity.0.y).clamp(-max_step, max_step);

    // Hold duration keeps growing while the key stays down; crossing a tier
    // threshold retargets the in-flight float immediately.
    if let Some(mut hold) = float.hold {
        if !hold.released && input.is_pressed(hold.direction) {
            hold.elapsed += dt;
            float.hold = Some(hold);
            if let Some(mut active) = float.active {
                let tier = FloatTier::for_hold(hold.elapsed);
                if tier > active.tier {
                    active.tier = tier;
                    active.current_speed = tier.force();
                    active.initial_speed = tier.force();
                    float.active = Some(active);
                }
            }
        }
    }

    // Float progress. Ending zeroes horizontal velocity and the lift, and
    // clears the hold so a still-held key cannot instantly retrigger.
    let mut lift = 0.0;
    if let Some(mut active) = float.active {
        active.elapsed += dt;
        if active.elapsed >= FLOAT_DURATION {
            float.active = None;
            float.hold = None;
            velocity.0.x = 0.0;
        } else {
            velocity.0.x = float_velocity(&active);
            lift = FLOAT_LIFT;
            float.active = Some(active);
        }
    } else {
        velocity.0.x = 0.0;
    }

    // Wind and player velocity integrate independently, then clamp to the arena.
    position.0 += (velocity.0 + Vec2::new(0.0, lift)) * dt + wind.velocity * dt;
    position.0.x = position.0.x.clamp(collider.half.x, ARENA_SIZE.x - collider.half.x);
    position.0.y = position.0.y.clamp(collider.half.y, ARENA_SIZE.y - collider.half.y);

    // Movement-derived animation, only while in a movement state.
    if matches!(animation.state(), anim::IDLE | anim::FLY) {
        if velocity.0.length() > MOVE_ANIM_THRESHOLD {
            animation.ensure_state(anim::FLY);
        } else {
            animation.ensure_state(anim::IDLE);
        }
    }
}
