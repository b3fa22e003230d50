use std::collections::VecDeque;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use rand::rngs::SmallRng;

use crate::{
    animation::AnimationRuntime,
    events::GameCommand,
    level::{DecorKind, NpcKind},
    systems::{npc::Npc, player::FloatState},
};

/// A tag component for the entity controlled by the player.
#[derive(Default, Component)]
pub struct Player;

/// A tag component for scareable villagers.
#[derive(Default, Component)]
pub struct NpcTag;

/// A tag component for a rescuable companion (the witch's cat).
#[derive(Default, Component)]
pub struct Companion;

/// A tag component for decorative scenery.
#[derive(Default, Component)]
pub struct Decorative;

/// A tag component denoting the kind of entity, used to pick sprites and
/// compose behavior.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ghost,
    Npc(NpcKind),
    Cat,
    Decor(DecorKind),
}

/// Center position in arena pixels.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Velocity in pixels per second.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// Which way the sprite is drawn. Defaults to facing right.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Facing {
    pub left: bool,
}

/// Axis-aligned collision box, as half-extents around the position.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half: Vec2,
}

#[derive(Resource)]
pub struct DeltaTime(pub f32);

#[derive(Resource, Default)]
pub struct GlobalState {
    pub exit: bool,
}

/// Commands queued by the input port, drained once per tick.
#[derive(Resource, Default)]
pub struct CommandQueue(pub VecDeque<GameCommand>);

/// The game's random source. A resource so tests can insert a seeded generator.
#[derive(Resource)]
pub struct GameRng(pub SmallRng);

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: Player,
    pub kind: EntityKind,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub collider: Collider,
    pub float: FloatState,
    pub animation: AnimationRuntime,
}

#[derive(Bundle)]
pub struct NpcBundle {
    pub tag: NpcTag,
    pub kind: EntityKind,
    pub npc: Npc,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub collider: Collider,
    pub animation: AnimationRuntime,
}

#[derive(Bundle)]
pub struct CompanionBundle {
    pub companion: Companion,
    pub kind: EntityKind,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub collider: Collider,
    pub animation: AnimationRuntime,
}

#[derive(Bundle)]
pub struct DecorBundle {
    pub decorative: Decorative,
    pub kind: EntityKind,
    pub position: Position,
    pub animation: AnimationRuntime,
}
