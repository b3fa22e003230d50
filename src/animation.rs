//! Frame/time-driven animation state machine.
//!
//! Every animated entity owns an [`AnimationRuntime`] built from an
//! [`AnimationSet`] (a registry of named [`AnimationSpec`]s). The runtime is
//! advanced once per tick; a state may carry a play-limit, in which case
//! running out of plays reverts it to the set's default state (unless the
//! state is terminal) and reports the completion to the caller.

use std::collections::HashMap;

use bevy_ecs::prelude::Component;

use crate::error::AnimationError;

/// An opaque renderable frame handle. The presentation layer decides what it
/// points at; the core only sequences them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u32);

/// An immutable named frame sequence.
#[derive(Debug, Clone)]
pub struct AnimationSpec {
    name: String,
    frames: Vec<FrameId>,
    interval: f32,
    looping: bool,
}

impl AnimationSpec {
    pub fn new(name: &str, frames: Vec<FrameId>, interval: f32, looping: bool) -> Result<Self, AnimationError> {
        if interval <= 0.0 {
            return Err(AnimationError::InvalidFrameInterval(interval));
        }
        Ok(Self {
            name: name.to_string(),
            frames,
            interval,
            looping,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn looping(&self) -> bool {
        self.looping
    }
}

/// A registry of animation specs for one entity kind, with a default state
/// and an optional terminal ("sticky") state that completion never leaves.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    specs: HashMap<String, AnimationSpec>,
    default_state: String,
    terminal_state: Option<String>,
}

impl AnimationSet {
    pub fn new(default_state: &str) -> Self {
        Self {
            specs: HashMap::new(),
            default_state: default_state.to_string(),
            terminal_state: None,
        }
    }

    pub fn with_spec(mut self, spec: AnimationSpec) -> Self {
        self.specs.insert(spec.name().to_string(), spec);
        self
    }

    pub fn with_terminal(mut self, name: &str) -> Self {
        self.terminal_state = Some(name.to_string());
        self
    }

    pub fn spec(&self, name: &str) -> Option<&AnimationSpec> {
        self.specs.get(name)
    }

    pub fn default_state(&self) -> &str {
        &self.default_state
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminal_state.as_deref() == Some(name)
    }
}

/// Options for [`AnimationRuntime::set_state`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SetStateOpts {
    /// Force completion after this many frame advances. Takes precedence over
    /// `duration` when both are given.
    pub play_limit: Option<u32>,
    /// Convenience sugar: converted to a play-limit by `round(duration / interval)`.
    pub duration: Option<f32>,
    /// Preload one interval so the state advances on the very next update
    /// instead of waiting a full interval to look started.
    pub start_at_interval_offset: bool,
}

/// Per-entity animation playback state.
#[derive(Component, Debug, Clone)]
pub struct AnimationRuntime {
    set: AnimationSet,
    state: String,
    frame_index: usize,
    time_bank: f32,
    play_limit: Option<u32>,
    plays_done: u32,
}

impl AnimationRuntime {
    pub fn new(set: AnimationSet) -> Self {
        let state = set.default_state().to_string();
        Self {
            set,
            state,
            frame_index: 0,
            time_bank: 0.0,
            play_limit: None,
            plays_done: 0,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn time_bank(&self) -> f32 {
        self.time_bank
    }

    pub fn set(&self) -> &AnimationSet {
        &self.set
    }

    /// Switches to a named state, resetting playback. An unknown name is a
    /// recoverable misconfiguration: logged, nothing changes.
    pub fn set_state(&mut self, name: &str, opts: SetStateOpts) {
        let Some(spec) = self.set.spec(name) else {
            tracing::warn!(state = name, "Unknown animation state requested");
            return;
        };
        let interval = spec.interval();

        self.state = name.to_string();
        self.frame_index = 0;
        self.time_bank = if opts.start_at_interval_offset { interval } else { 0.0 };
        self.plays_done = 0;
        // Any pending play-limit from the previous state is replaced wholesale.
        self.play_limit = opts
            .play_limit
            .or_else(|| opts.duration.map(|d| (d / interval).round() as u32))
            .map(|limit| limit.max(1));
    }

    /// Switches to `name` only if the runtime is not already in it. Used by
    /// movement-derived transitions that fire every tick.
    pub fn ensure_state(&mut self, name: &str) {
        if self.state != name {
            self.set_state(name, SetStateOpts::default());
        }
    }

    /// Returns to the set's default state with no play-limit.
    pub fn reset(&mut self) {
        let default = self.set.default_state().to_string();
        self.set_state(&default, SetStateOpts::default());
    }

    /// Advances playback by `dt` seconds, draining every due frame advance.
    ///
    /// Returns the name of the state that completed its play-limit this tick,
    /// if any. Completion reverts to the default state unless the completed
    /// state is the set's terminal state.
    pub fn update(&mut self, dt: f32) -> Option<String> {
        let Some(spec) = self.set.spec(&self.state) else {
            return None;
        };
        if spec.frames().is_empty() {
            return None;
        }
        let interval = spec.interval();
        let frame_count = spec.frames().len();
        let looping = spec.looping();

        self.time_bank += dt;
        while self.time_bank >= interval {
            self.time_bank -= interval;

            if self.play_limit.is_none() && !looping && self.frame_index + 1 >= frame_count {
                // Non-looping state without a play-limit holds its last frame.
                self.time_bank = 0.0;
                break;
            }

            self.frame_index = (self.frame_index + 1) % frame_count;

            if let Some(limit) = self.play_limit {
                self.plays_done += 1;
                if self.plays_done >= limit {
                    let completed = self.state.clone();
                    self.play_limit = None;
                    self.plays_done = 0;
                    if !self.set.is_terminal(&completed) {
                        self.reset();
                    }
                    return Some(completed);
                }
            }
        }
        None
    }

    /// The frame to render right now, or none if the current spec is empty.
    pub fn current_frame(&self) -> Option<FrameId> {
        let spec = self.set.spec(&self.state)?;
        let frames = spec.frames();
        if frames.is_empty() {
            return None;
        }
        frames.get(self.frame_index % frames.len()).copied()
    }
}
