use bevy_ecs::prelude::*;

use crate::direction::Direction;
use crate::systems::interaction::ComboOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Press(Direction),
    Release(Direction),
    TogglePause,
    ResetGame,
    Exit,
}

/// How the ghost touched a villager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    /// Landed from above: starts an interaction.
    Stomp,
    /// Any other contact: straight to the failure sequence.
    Clip,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    Collision {
        player: Entity,
        npc: Entity,
        kind: CollisionKind,
    },
    /// A fleeing villager (and any carried companion) fully left the arena.
    EscapeFinished { npc: Entity },
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Notifications from the interaction orchestrator.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
    ComboCompleted(ComboOutcome),
    TimedOut,
}

/// A play-limited animation state ran out of plays this tick.
#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct AnimationFinished {
    pub entity: Entity,
    pub state: String,
}
