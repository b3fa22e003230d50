//! Keyboard/touch state, key bindings, and combo validation.

use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::ResMut,
};

use crate::{
    direction::Direction,
    events::{GameCommand, GameEvent},
    systems::components::{CommandQueue, GlobalState},
};

#[derive(Clone, Copy, Debug)]
struct ButtonState {
    pressed: bool,
    released_since_start: bool,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self {
            pressed: false,
            // Until combo tracking starts, release history is irrelevant.
            released_since_start: true,
        }
    }
}

/// Pressed-state per directional input, plus the release bookkeeping that
/// prevents a key held through combo generation from being credited.
#[derive(Resource, Clone, Debug, Default)]
pub struct InputState {
    buttons: [ButtonState; 4],
    tracking: bool,
}

impl InputState {
    pub fn press(&mut self, direction: Direction) {
        self.buttons[direction.as_usize()].pressed = true;
    }

    pub fn release(&mut self, direction: Direction) {
        let button = &mut self.buttons[direction.as_usize()];
        button.pressed = false;
        button.released_since_start = true;
    }

    pub fn is_pressed(&self, direction: Direction) -> bool {
        self.buttons[direction.as_usize()].pressed
    }

    /// Begins release tracking for a fresh challenge.
    ///
    /// Every key currently held is marked "not yet released" and its pressed
    /// flag cleared, so only a fresh press-after-tracking-start can satisfy
    /// the challenge. Keys that are up are marked released already.
    pub fn start_combo_tracking(&mut self) {
        self.tracking = true;
        for button in &mut self.buttons {
            if button.pressed {
                button.released_since_start = false;
                button.pressed = false;
            } else {
                button.released_since_start = true;
            }
        }
    }

    /// True iff exactly the two challenge keys are down, and (while tracking)
    /// both were freshly pressed after tracking started. Any third pressed key
    /// fails the check: these combos are precise, not mashed.
    pub fn check_combo(&self, first: Direction, second: Direction) -> bool {
        for direction in Direction::DIRECTIONS {
            let button = self.buttons[direction.as_usize()];
            if direction == first || direction == second {
                if !button.pressed {
                    return false;
                }
                if self.tracking && !button.released_since_start {
                    return false;
                }
            } else if button.pressed {
                return false;
            }
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Maps a raw key-down identifier to a bound command.
pub fn parse_key_down(raw: &str) -> Option<GameCommand> {
    if let Some(direction) = Direction::parse_key(raw) {
        return Some(GameCommand::Press(direction));
    }
    match raw {
        "p" | "P" => Some(GameCommand::TogglePause),
        "r" | "R" => Some(GameCommand::ResetGame),
        "q" | "Q" | "Escape" => Some(GameCommand::Exit),
        _ => None,
    }
}

/// Maps a raw key-up identifier to a bound command.
pub fn parse_key_up(raw: &str) -> Option<GameCommand> {
    Direction::parse_key(raw).map(GameCommand::Release)
}

/// Drains externally queued commands into input state and game events.
pub fn command_system(
    mut queue: ResMut<CommandQueue>,
    mut input: ResMut<InputState>,
    mut state: ResMut<GlobalState>,
    mut events: EventWriter<GameEvent>,
) {
    while let Some(command) = queue.0.pop_front() {
        match command {
            GameCommand::Press(direction) => input.press(direction),
            GameCommand::Release(direction) => input.release(direction),
            GameCommand::Exit => state.exit = true,
            GameCommand::ResetGame | GameCommand::TogglePause => {}
        }
        events.write(GameEvent::Command(command));
    }
}
