//! Sprite/animation provider port.
//!
//! The presentation layer fills a [`SpriteLibrary`] with real frame handles
//! before constructing the game; the core only ever clones animation sets out
//! of it at spawn time. [`SpriteLibrary::placeholder`] builds the full layout
//! with generated handles for headless runs and tests.

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;

use crate::animation::{AnimationSet, AnimationSpec, FrameId};
use crate::constants::FRAME_INTERVAL;
use crate::error::{ConfigError, GameResult};
use crate::level::{DecorKind, NpcKind};
use crate::systems::components::EntityKind;

/// Animation state names shared between the library layout and the systems
/// that drive transitions.
pub mod anim {
    pub const IDLE: &str = "idle";
    pub const FLY: &str = "fly";
    pub const SCARE: &str = "scare";
    pub const LAUGH: &str = "laugh";
    pub const SWIRL: &str = "swirl";
    pub const KO: &str = "ko";
    pub const WALK: &str = "walk";
    pub const ALARMED: &str = "alarmed";
    pub const SCARED: &str = "scared";
    pub const FLEE: &str = "flee";
    pub const CARRIED: &str = "carried";
}

/// Registry of animation sets keyed by entity kind.
#[derive(Resource, Clone, Default)]
pub struct SpriteLibrary {
    sets: HashMap<EntityKind, AnimationSet>,
}

impl SpriteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: EntityKind, set: AnimationSet) {
        self.sets.insert(kind, set);
    }

    /// Clones out the animation set for an entity kind. A missing set, or a
    /// set without its own default state, is a construction-time
    /// configuration error, not a mid-game condition.
    pub fn animation_set(&self, kind: EntityKind) -> GameResult<AnimationSet> {
        let set = self
            .sets
            .get(&kind)
            .ok_or_else(|| ConfigError::MissingAnimationSet(format!("{kind:?}")))?;
        if set.spec(set.default_state()).is_none() {
            return Err(ConfigError::MissingDefaultState {
                kind: format!("{kind:?}"),
                state: set.default_state().to_string(),
            }
            .into());
        }
        Ok(set.clone())
    }

    /// Builds the complete stock layout with sequentially generated frame
    /// handles. Real frame handles come from the presentation layer; this is
    /// enough for headless runs and tests.
    pub fn placeholder() -> Self {
        let mut next_frame = 0u32;
        let mut frames = |count: usize| -> Vec<FrameId> {
            (0..count)
                .map(|_| {
                    let id = FrameId(next_frame);
                    next_frame += 1;
                    id
                })
                .collect()
        };
        // The stock sets share one interval; only frame counts differ.
        let spec = |name: &str, frames: Vec<FrameId>, looping: bool| {
            AnimationSpec::new(name, frames, FRAME_INTERVAL, looping).expect("stock interval is positive")
        };

        let mut library = Self::new();

        library.insert(
            EntityKind::Ghost,
            AnimationSet::new(anim::IDLE)
                .with_spec(spec(anim::IDLE, frames(2), true))
                .with_spec(spec(anim::FLY, frames(4), true))
                .with_spec(spec(anim::SCARE, frames(2), true))
                .with_spec(spec(anim::LAUGH, frames(4), true))
                .with_spec(spec(anim::SWIRL, frames(4), true))
                .with_spec(spec(anim::KO, frames(1), false))
                .with_terminal(anim::KO),
        );

        for kind in [NpcKind::Idle, NpcKind::Business, NpcKind::Witch] {
            library.insert(
                EntityKind::Npc(kind),
                AnimationSet::new(anim::IDLE)
                    .with_spec(spec(anim::IDLE, frames(2), true))
                    .with_spec(spec(anim::WALK, frames(4), true))
                    .with_spec(spec(anim::ALARMED, frames(2), true))
                    .with_spec(spec(anim::SCARED, frames(4), true))
                    .with_spec(spec(anim::FLEE, frames(4), true)),
            );
        }

        library.insert(
            EntityKind::Cat,
            AnimationSet::new(anim::IDLE)
                .with_spec(spec(anim::IDLE, frames(2), true))
                .with_spec(spec(anim::CARRIED, frames(2), true)),
        );

        library.insert(
            EntityKind::Decor(DecorKind::Grave),
            AnimationSet::new(anim::IDLE).with_spec(spec(anim::IDLE, frames(1), false)),
        );
        library.insert(
            EntityKind::Decor(DecorKind::Bat),
            AnimationSet::new(anim::IDLE).with_spec(spec(anim::IDLE, frames(4), true)),
        );
        library.insert(
            EntityKind::Decor(DecorKind::Fog),
            AnimationSet::new(anim::IDLE).with_spec(spec(anim::IDLE, frames(2), true)),
        );

        library
    }
}
