//! Drives every entity's animation runtime and forwards completions.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    system::{Query, Res},
};

use crate::{
    animation::AnimationRuntime,
    events::AnimationFinished,
    systems::components::DeltaTime,
};

pub fn animation_system(
    delta_time: Res<DeltaTime>,
    mut query: Query<(Entity, &mut AnimationRuntime)>,
    mut events: EventWriter<AnimationFinished>,
) {
    for (entity, mut runtime) in query.iter_mut() {
        if let Some(state) = runtime.update(delta_time.0) {
            events.write(AnimationFinished { entity, state });
        }
    }
}
