//! Interaction/level orchestrator: combo generation, challenge timers, and
//! level progression.

use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::{Res, ResMut},
};
use rand::Rng;
use smallvec::SmallVec;

use crate::{
    constants::COMBO_FLASH_TIME,
    direction::Direction,
    events::InteractionEvent,
    level::{max_level, LevelConfig},
    systems::{
        components::{DeltaTime, GameRng},
        input::InputState,
    },
};

/// What a completed combo means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboOutcome {
    /// Quota not yet met; the next challenge follows immediately.
    Continue,
    /// Quota met with more levels remaining.
    LevelComplete,
    /// Quota met on the final level.
    GameComplete,
}

/// A live two-key challenge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboChallenge {
    pub first: Direction,
    pub second: Direction,
    pub remaining: f32,
    pub duration: f32,
    pub accepted: bool,
}

impl ComboChallenge {
    pub fn pair(&self) -> (Direction, Direction) {
        (self.first, self.second)
    }

    /// Remaining time as a fraction of the budget, for the progress bar.
    pub fn remaining_fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    ComboHit,
    LevelClear,
    GameClear,
    Busted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub remaining: f32,
}

/// The one live interaction session.
#[derive(Resource, Debug, Clone)]
pub struct InteractionSession {
    active: bool,
    scripted: bool,
    level: u32,
    combos_done: u32,
    challenge: Option<ComboChallenge>,
    last_pair: Option<(Direction, Direction)>,
    banner: Option<Banner>,
}

impl Default for InteractionSession {
    fn default() -> Self {
        Self {
            active: false,
            scripted: false,
            level: 1,
            combos_done: 0,
            challenge: None,
            last_pair: None,
            banner: None,
        }
    }
}

impl InteractionSession {
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn combos_done(&self) -> u32 {
        self.combos_done
    }

    pub fn interaction_active(&self) -> bool {
        self.active
    }

    /// Whether a non-interruptible scripted window is in progress.
    pub fn scripted(&self) -> bool {
        self.scripted
    }

    /// Player and ambient villager movement is suspended while an interaction
    /// or scripted window runs.
    pub fn movement_locked(&self) -> bool {
        self.active || self.scripted
    }

    pub fn challenge(&self) -> Option<&ComboChallenge> {
        self.challenge.as_ref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// The identity of the most recent challenge, excluded from the next draw.
    pub fn last_pair(&self) -> Option<(Direction, Direction)> {
        self.last_pair
    }

    /// Draws an ordered pair of distinct directions, excluding exactly the
    /// previous pair. If the exclusion empties the pool, the unfiltered set
    /// is used instead.
    pub fn select_pair(
        rng: &mut impl Rng,
        alphabet: &[Direction],
        exclude: Option<(Direction, Direction)>,
    ) -> Option<(Direction, Direction)> {
        let mut pairs: SmallVec<[(Direction, Direction); 12]> = SmallVec::new();
        for &first in alphabet {
            for &second in alphabet {
                if first != second {
                    pairs.push((first, second));
                }
            }
        }

        let filtered: SmallVec<[(Direction, Direction); 12]> =
            pairs.iter().copied().filter(|pair| Some(*pair) != exclude).collect();
        let pool = if filtered.is_empty() { &pairs } else { &filtered };
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.random_range(0..pool.len())])
    }

    /// Starts an interaction: clears prior challenge bookkeeping and draws
    /// the first challenge. No-op (returning false) if one is already active
    /// or a scripted window is running.
    pub fn start_interaction(&mut self, duration: f32, rng: &mut impl Rng) -> bool {
        if self.active || self.scripted {
            return false;
        }
        self.active = true;
        self.combos_done = 0;
        self.last_pair = None;
        self.next_combo(duration, rng);
        true
    }

    /// Draws the next challenge and resets its timer to the level's budget.
    pub fn next_combo(&mut self, duration: f32, rng: &mut impl Rng) {
        match Self::select_pair(rng, &Direction::DIRECTIONS, self.last_pair) {
            Some((first, second)) => {
                self.last_pair = Some((first, second));
                self.challenge = Some(ComboChallenge {
                    first,
                    second,
                    remaining: duration,
                    duration,
                    accepted: false,
                });
            }
            None => tracing::warn!("Combo alphabet produced no pairs"),
        }
    }

    /// Registers a completed challenge. Meeting the quota ends the
    /// interaction and opens the scripted success window.
    pub fn process_combo_success(&mut self, quota: u32, max_level: u32) -> ComboOutcome {
        self.combos_done += 1;
        if self.combos_done < quota {
            return ComboOutcome::Continue;
        }
        self.scripted = true;
        self.end_interaction("quota met");
        if self.level < max_level {
            ComboOutcome::LevelComplete
        } else {
            ComboOutcome::GameComplete
        }
    }

    /// Clears the active challenge. The reason is diagnostic only.
    pub fn end_interaction(&mut self, reason: &str) {
        tracing::debug!(reason, level = self.level, combos = self.combos_done, "Interaction ended");
        self.active = false;
        self.challenge = None;
    }

    pub fn begin_scripted(&mut self) {
        self.scripted = true;
    }

    pub fn show_banner(&mut self, kind: BannerKind, duration: f32) {
        self.banner = Some(Banner {
            kind,
            remaining: duration,
        });
    }

    /// Moves to the next level, wrapping back to level 1 after the last.
    pub fn advance_level(&mut self, max_level: u32) {
        self.level = if self.level >= max_level { 1 } else { self.level + 1 };
        self.combos_done = 0;
    }

    /// Returns interaction, scripted, and challenge state to idle without
    /// changing the current level.
    pub fn reset(&mut self) {
        let level = self.level;
        *self = Self::default();
        self.level = level;
    }

    /// Full reset: back to level 1. Only an explicit game reset does this.
    pub fn reset_progress(&mut self) {
        *self = Self::default();
    }
}

pub fn interaction_system(
    delta_time: Res<DeltaTime>,
    mut session: ResMut<InteractionSession>,
    mut input: ResMut<InputState>,
    mut rng: ResMut<GameRng>,
    mut events: EventWriter<InteractionEvent>,
) {
    let dt = delta_time.0;

    // Visual-effect timers advance no matter what state the session is in.
    if let Some(mut banner) = session.banner {
        banner.remaining -= dt;
        session.banner = if banner.remaining <= 0.0 { None } else { Some(banner) };
    }

    if !session.active {
        return;
    }
    let Some(mut challenge) = session.challenge else {
        return;
    };
    let config = LevelConfig::get(session.level);

    // Acceptance is checked before the countdown so a success registered in
    // the same tick the budget runs out still wins.
    if !challenge.accepted && input.check_combo(challenge.first, challenge.second) {
        challenge.accepted = true;
        session.challenge = Some(challenge);

        let outcome = session.process_combo_success(config.combos_required, max_level());
        events.write(InteractionEvent::ComboCompleted(outcome));

        if outcome == ComboOutcome::Continue {
            session.show_banner(BannerKind::ComboHit, COMBO_FLASH_TIME);
            session.next_combo(config.combo_duration, &mut rng.0);
            input.start_combo_tracking();
        }
        return;
    }

    challenge.remaining = (challenge.remaining - dt).max(0.0);
    if challenge.remaining <= 0.0 && !challenge.accepted {
        session.end_interaction("timeout");
        session.begin_scripted();
        events.write(InteractionEvent::TimedOut);
    } else {
        session.challenge = Some(challenge);
    }
}
