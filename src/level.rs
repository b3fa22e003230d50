//! Level configuration table.

use bitflags::bitflags;

/// The kinds of villager a level can feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpcKind {
    /// The idle villager, easiest to corner.
    Idle,
    /// The business man, always in a hurry.
    Business,
    /// The witch — flees, then doubles back for her cat.
    Witch,
}

/// Decorative scenery kinds. Purely cosmetic: they animate but never interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorKind {
    Grave,
    Bat,
    Fog,
}

bitflags! {
    /// Which decorative elements a level shows.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DecorFlags: u8 {
        const GRAVES = 1 << 0;
        const BATS = 1 << 1;
        const FOG = 1 << 2;
    }
}

/// Per-level tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub npc: NpcKind,
    /// Time budget for each combo challenge, in seconds.
    pub combo_duration: f32,
    /// Combos the player must land to clear the level.
    pub combos_required: u32,
    pub wind: bool,
    pub float_enabled: bool,
    pub decor: DecorFlags,
}

pub const LEVELS: [LevelConfig; 3] = [
    LevelConfig {
        npc: NpcKind::Idle,
        combo_duration: 10.0,
        combos_required: 3,
        wind: false,
        float_enabled: true,
        decor: DecorFlags::GRAVES,
    },
    LevelConfig {
        npc: NpcKind::Business,
        combo_duration: 8.0,
        combos_required: 4,
        wind: true,
        float_enabled: true,
        decor: DecorFlags::GRAVES.union(DecorFlags::BATS),
    },
    LevelConfig {
        npc: NpcKind::Witch,
        combo_duration: 6.5,
        combos_required: 5,
        wind: true,
        float_enabled: true,
        decor: DecorFlags::GRAVES.union(DecorFlags::BATS).union(DecorFlags::FOG),
    },
];

/// The last level; completing it wraps back to level 1.
pub fn max_level() -> u32 {
    LEVELS.len() as u32
}

impl LevelConfig {
    /// Looks up the config for a 1-based level number.
    ///
    /// A missing entry is a recoverable configuration miss: logged, and the
    /// first level's config is returned so the simulation keeps running.
    pub fn get(level: u32) -> &'static LevelConfig {
        match level.checked_sub(1).and_then(|index| LEVELS.get(index as usize)) {
            Some(config) => config,
            None => {
                tracing::warn!(level, "No config for level, falling back to level 1");
                &LEVELS[0]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_lookup_is_one_based() {
        assert_eq!(LevelConfig::get(1), &LEVELS[0]);
        assert_eq!(LevelConfig::get(3), &LEVELS[2]);
    }

    #[test]
    fn test_level_lookup_is_total() {
        // Out-of-range levels (including 0) fall back to level 1
        assert_eq!(LevelConfig::get(0), &LEVELS[0]);
        assert_eq!(LevelConfig::get(99), &LEVELS[0]);
        assert_eq!(LevelConfig::get(u32::MAX), &LEVELS[0]);
    }

    #[test]
    fn test_levels_are_playable() {
        for config in &LEVELS {
            assert!(config.combo_duration > 0.0);
            assert!(config.combos_required > 0);
        }
    }

    #[test]
    fn test_only_witch_has_companion_level() {
        // The rescue detour is exercised by the final level
        assert_eq!(LEVELS[max_level() as usize - 1].npc, NpcKind::Witch);
    }

    #[test]
    fn test_difficulty_ramps() {
        for pair in LEVELS.windows(2) {
            assert!(pair[1].combo_duration < pair[0].combo_duration);
            assert!(pair[1].combos_required >= pair[0].combos_required);
        }
    }
}
