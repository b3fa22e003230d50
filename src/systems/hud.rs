//! Presentation model: everything a renderer needs from the orchestrator,
//! and nothing else. The core never touches presentation handles.

use bevy_ecs::{
    resource::Resource,
    system::{Res, ResMut},
};

use crate::{
    direction::Direction,
    systems::interaction::{BannerKind, InteractionSession},
};

/// The current challenge as shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboView {
    pub first: Direction,
    pub second: Direction,
}

impl ComboView {
    /// Display glyphs for the two tiles.
    pub fn symbols(&self) -> (&'static str, &'static str) {
        (self.first.symbol(), self.second.symbol())
    }
}

/// Render-facing snapshot of the session, refreshed once per tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct HudModel {
    pub level: u32,
    pub combos_done: u32,
    /// Normalized remaining time for the live challenge, 0.0 when none.
    pub progress: f32,
    pub combo: Option<ComboView>,
    pub interaction_visible: bool,
    pub banner: Option<BannerKind>,
}

pub fn hud_system(session: Res<InteractionSession>, mut hud: ResMut<HudModel>) {
    hud.level = session.level();
    hud.combos_done = session.combos_done();
    hud.interaction_visible = session.interaction_active();
    hud.banner = session.banner().map(|banner| banner.kind);
    match session.challenge() {
        Some(challenge) => {
            hud.progress = challenge.remaining_fraction();
            hud.combo = Some(ComboView {
                first: challenge.first,
                second: challenge.second,
            });
        }
        None => {
            hud.progress = 0.0;
            hud.combo = None;
        }
    }
}
