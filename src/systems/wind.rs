//! Ambient wind force generator.

use bevy_ecs::{
    resource::Resource,
    system::{Res, ResMut},
};
use glam::Vec2;
use rand::Rng;

use crate::{
    constants::{
        WIND_CALM_DECAY, WIND_CHANGE_INTERVAL, WIND_DECAY, WIND_INERTIA, WIND_STRENGTH_MAX, WIND_STRENGTH_MIN,
        WIND_VERTICAL_SCALE,
    },
    level::LevelConfig,
    systems::{
        components::{DeltaTime, GameRng},
        interaction::InteractionSession,
    },
};

/// Current wind velocity and the countdown to the next gust change.
#[derive(Resource, Debug, Clone, Default)]
pub struct Wind {
    pub velocity: Vec2,
    pub change_timer: f32,
}

impl Wind {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// One simulation step.
    ///
    /// While enabled, a fresh gust is drawn every change interval (random
    /// strength, random angle, vertical component scaled down) and blended
    /// into the current velocity by the inertia factor. Decay applies every
    /// tick either way; calm air settles faster than gusting air.
    pub fn step(&mut self, dt: f32, enabled: bool, rng: &mut impl Rng) {
        if enabled {
            self.change_timer -= dt;
            if self.change_timer <= 0.0 {
                self.change_timer = WIND_CHANGE_INTERVAL;
                let strength = rng.random_range(WIND_STRENGTH_MIN..WIND_STRENGTH_MAX);
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let gust = Vec2::new(
                    angle.cos() * strength,
                    angle.sin() * strength * WIND_VERTICAL_SCALE,
                );
                self.velocity = self.velocity.lerp(gust, WIND_INERTIA);
            }
        }

        let rate = if enabled { WIND_DECAY } else { WIND_CALM_DECAY };
        self.velocity *= (-rate * dt).exp();
    }
}

pub fn wind_system(
    delta_time: Res<DeltaTime>,
    session: Res<InteractionSession>,
    mut wind: ResMut<Wind>,
    mut rng: ResMut<GameRng>,
) {
    let enabled = LevelConfig::get(session.level()).wind;
    wind.step(delta_time.0, enabled, &mut rng.0);
}
