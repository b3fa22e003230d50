//! Player × villager overlap detection and contact classification.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res},
};
use glam::Vec2;

use crate::{
    events::{CollisionKind, GameEvent},
    systems::{
        components::{Collider, NpcTag, Player, Position},
        interaction::InteractionSession,
    },
};

/// Axis-aligned overlap test between the player's box and another box,
/// classifying the contact. A stomp is a contact whose axis is vertical —
/// horizontal overlap at least as deep as vertical — with the player's
/// center above. Everything else is a clip.
pub fn classify_contact(
    player_pos: Vec2,
    player_collider: &Collider,
    other_pos: Vec2,
    other_collider: &Collider,
) -> Option<CollisionKind> {
    let delta = player_pos - other_pos;
    let overlap_x = player_collider.half.x + other_collider.half.x - delta.x.abs();
    let overlap_y = player_collider.half.y + other_collider.half.y - delta.y.abs();
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }
    if overlap_x >= overlap_y && delta.y < 0.0 {
        Some(CollisionKind::Stomp)
    } else {
        Some(CollisionKind::Clip)
    }
}

/// Detects player × villager contact while in free roam and emits a
/// classified collision event for the sequencing system to act on.
pub fn collision_system(
    session: Res<InteractionSession>,
    player_query: Query<(Entity, &Position, &Collider), With<Player>>,
    npc_query: Query<(Entity, &Position, &Collider), (With<NpcTag>, Without<Player>)>,
    mut events: EventWriter<GameEvent>,
) {
    // Contacts only matter in free roam; interactions and scripted windows
    // suppress them entirely.
    if session.movement_locked() {
        return;
    }

    for (player_entity, player_pos, player_collider) in player_query.iter() {
        for (npc_entity, npc_pos, npc_collider) in npc_query.iter() {
            if let Some(kind) = classify_contact(player_pos.0, player_collider, npc_pos.0, npc_collider) {
                events.write(GameEvent::Collision {
                    player: player_entity,
                    npc: npc_entity,
                    kind,
                });
            }
        }
    }
}
