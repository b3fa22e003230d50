//! The `Game` facade: world construction, the per-tick schedule, the input
//! port, and the presentation port.

use bevy_ecs::{
    entity::Entity,
    event::{EventRegistry, Events},
    prelude::Or,
    query::With,
    schedule::{IntoScheduleConfigs, Schedule},
    world::World,
};
use glam::Vec2;
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    animation::{AnimationRuntime, FrameId},
    constants::{
        BAT_POSITIONS, CAT_HALF_SIZE, CAT_SPAWN_X, FOG_POSITION, GRAVE_XS, GROUND_Y, NPC_HALF_SIZE, NPC_SPAWN_X,
        PLAYER_HALF_SIZE, PLAYER_SPAWN,
    },
    direction::Direction,
    error::{EntityError, GameError, GameResult},
    events::{AnimationFinished, GameCommand, GameEvent, InteractionEvent},
    level::{max_level, DecorFlags, DecorKind, LevelConfig, NpcKind},
    sprites::SpriteLibrary,
    systems::{
        animation::animation_system,
        collision::collision_system,
        components::{
            Collider, CommandQueue, Companion, CompanionBundle, DecorBundle, Decorative, DeltaTime, EntityKind,
            Facing, GameRng, GlobalState, NpcBundle, NpcTag, Player, PlayerBundle, Position, Velocity,
        },
        hud::{hud_system, HudModel},
        input::{command_system, parse_key_down, parse_key_up, InputState},
        interaction::{interaction_system, InteractionSession},
        npc::{npc_system, Npc},
        player::{player_system, FloatState},
        sequence::{sequence_system, PendingReset, Sequence},
        wind::{wind_system, Wind},
    },
};

/// One renderable entity, as exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteView {
    pub kind: EntityKind,
    pub frame: Option<FrameId>,
    pub position: Vec2,
    pub flipped: bool,
}

/// The `Game` struct is the main entry point for the game.
///
/// It owns the ECS world and schedule, accepts raw input through the input
/// port, and exposes render-facing state through the presentation port.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    paused: bool,
}

impl Game {
    pub fn new(library: SpriteLibrary) -> GameResult<Game> {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<GameError>(&mut world);
        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<InteractionEvent>(&mut world);
        EventRegistry::register_event::<AnimationFinished>(&mut world);

        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(GlobalState::default());
        world.insert_resource(CommandQueue::default());
        world.insert_resource(InputState::default());
        world.insert_resource(InteractionSession::default());
        world.insert_resource(Wind::default());
        world.insert_resource(Sequence::default());
        world.insert_resource(PendingReset::default());
        world.insert_resource(HudModel::default());
        world.insert_resource(GameRng(SmallRng::from_os_rng()));

        let ghost_set = library.animation_set(EntityKind::Ghost)?;
        world.spawn(PlayerBundle {
            player: Player,
            kind: EntityKind::Ghost,
            position: Position(PLAYER_SPAWN),
            velocity: Velocity::default(),
            facing: Facing::default(),
            collider: Collider { half: PLAYER_HALF_SIZE },
            float: FloatState::default(),
            animation: AnimationRuntime::new(ghost_set),
        });

        spawn_level(&mut world, LevelConfig::get(1), &library)?;
        world.insert_resource(library);

        schedule.add_systems(
            (
                command_system,
                interaction_system,
                wind_system,
                player_system,
                npc_system,
                collision_system,
                animation_system,
                sequence_system,
                hud_system,
            )
                .chain(),
        );

        Ok(Game {
            world,
            schedule,
            paused: false,
        })
    }

    /// Feeds a raw key-down identifier through the bindings.
    pub fn key_down(&mut self, raw: &str) {
        match parse_key_down(raw) {
            Some(GameCommand::TogglePause) => self.toggle_pause(),
            Some(command) => self.queue_command(command),
            None => {}
        }
    }

    /// Feeds a raw key-up identifier through the bindings.
    pub fn key_up(&mut self, raw: &str) {
        if let Some(command) = parse_key_up(raw) {
            self.queue_command(command);
        }
    }

    /// Touch/pointer press, on the same identifier space as the keyboard.
    pub fn press_button(&mut self, direction: Direction) {
        self.queue_command(GameCommand::Press(direction));
    }

    /// Touch/pointer release, on the same identifier space as the keyboard.
    pub fn release_button(&mut self, direction: Direction) {
        self.queue_command(GameCommand::Release(direction));
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        tracing::debug!(paused = self.paused, "Pause toggled");
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Requests a full reset back to level 1.
    pub fn reset_game(&mut self) {
        self.queue_command(GameCommand::ResetGame);
    }

    fn queue_command(&mut self, command: GameCommand) {
        self.world.resource_mut::<CommandQueue>().0.push_back(command);
    }

    /// Ticks the game state.
    ///
    /// Returns true if the game should exit.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.paused {
            return self.world.resource::<GlobalState>().exit;
        }

        self.world.insert_resource(DeltaTime(dt));
        self.schedule.run(&mut self.world);

        self.apply_pending_reset();
        self.drain_errors();
        self.update_events();

        self.world.resource::<GlobalState>().exit
    }

    fn update_events(&mut self) {
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<InteractionEvent>>().update();
        self.world.resource_mut::<Events<AnimationFinished>>().update();
    }

    fn drain_errors(&mut self) {
        let errors: Vec<GameError> = self.world.resource_mut::<Events<GameError>>().drain().collect();
        for error in errors {
            tracing::error!(%error, "Runtime error");
        }
    }

    fn apply_pending_reset(&mut self) {
        let pending = *self.world.resource::<PendingReset>();
        if pending == PendingReset::None {
            return;
        }
        self.world.insert_resource(PendingReset::None);

        {
            let mut session = self.world.resource_mut::<InteractionSession>();
            match pending {
                PendingReset::NextLevel => {
                    session.reset();
                    session.advance_level(max_level());
                }
                PendingReset::SameLevel => session.reset(),
                PendingReset::FullReset => session.reset_progress(),
                PendingReset::None => unreachable!(),
            }
        }

        if let Err(error) = self.rebuild_scene() {
            tracing::error!(%error, "Failed to rebuild scene");
        }
    }

    /// Tears down the level entities and rebuilds the scene for the session's
    /// current level, returning the player to spawn.
    fn rebuild_scene(&mut self) -> GameResult<()> {
        let level = self.world.resource::<InteractionSession>().level();

        let stale: Vec<Entity> = self
            .world
            .query_filtered::<Entity, Or<(With<NpcTag>, With<Companion>, With<Decorative>)>>()
            .iter(&self.world)
            .collect();
        for entity in stale {
            self.world.despawn(entity);
        }

        let mut players = self.world.query_filtered::<(
            &mut Position,
            &mut Velocity,
            &mut Facing,
            &mut FloatState,
            &mut AnimationRuntime,
        ), With<Player>>();
        let Ok((mut position, mut velocity, mut facing, mut float, mut animation)) =
            players.single_mut(&mut self.world)
        else {
            return Err(EntityError::PlayerMissing.into());
        };
        position.0 = PLAYER_SPAWN;
        velocity.0 = Vec2::ZERO;
        *facing = Facing::default();
        float.reset();
        animation.reset();

        self.world.resource_mut::<Wind>().reset();
        self.world.resource_mut::<InputState>().reset();
        self.world.insert_resource(Sequence::Idle);

        let library = self.world.resource::<SpriteLibrary>().clone();
        spawn_level(&mut self.world, LevelConfig::get(level), &library)
    }

    /// The render-facing session snapshot.
    pub fn hud(&self) -> &HudModel {
        self.world.resource::<HudModel>()
    }

    /// Everything the presentation layer needs to draw the scene.
    pub fn sprite_views(&mut self) -> Vec<SpriteView> {
        let mut views = Vec::new();
        let mut query = self
            .world
            .query::<(&EntityKind, &Position, &AnimationRuntime, Option<&Facing>)>();
        for (kind, position, animation, facing) in query.iter(&self.world) {
            views.push(SpriteView {
                kind: *kind,
                frame: animation.current_frame(),
                position: position.0,
                flipped: facing.is_some_and(|facing| facing.left),
            });
        }
        views
    }
}

/// Spawns the villager, any companion, and the decorations for a level.
pub(crate) fn spawn_level(world: &mut World, config: &LevelConfig, library: &SpriteLibrary) -> GameResult<()> {
    let companion = if config.npc == NpcKind::Witch {
        let cat_set = library.animation_set(EntityKind::Cat)?;
        Some(
            world
                .spawn(CompanionBundle {
                    companion: Companion,
                    kind: EntityKind::Cat,
                    position: Position(Vec2::new(CAT_SPAWN_X, GROUND_Y - CAT_HALF_SIZE.y)),
                    velocity: Velocity::default(),
                    facing: Facing::default(),
                    collider: Collider { half: CAT_HALF_SIZE },
                    animation: AnimationRuntime::new(cat_set),
                })
                .id(),
        )
    } else {
        None
    };

    let npc_set = library.animation_set(EntityKind::Npc(config.npc))?;
    world.spawn(NpcBundle {
        tag: NpcTag,
        kind: EntityKind::Npc(config.npc),
        npc: Npc::new(config.npc, companion),
        position: Position(Vec2::new(NPC_SPAWN_X, GROUND_Y - NPC_HALF_SIZE.y)),
        velocity: Velocity::default(),
        facing: Facing { left: true },
        collider: Collider { half: NPC_HALF_SIZE },
        animation: AnimationRuntime::new(npc_set),
    });

    if config.decor.contains(DecorFlags::GRAVES) {
        let grave_set = library.animation_set(EntityKind::Decor(DecorKind::Grave))?;
        for x in GRAVE_XS {
            world.spawn(DecorBundle {
                decorative: Decorative,
                kind: EntityKind::Decor(DecorKind::Grave),
                position: Position(Vec2::new(x, GROUND_Y - 24.0)),
                animation: AnimationRuntime::new(grave_set.clone()),
            });
        }
    }
    if config.decor.contains(DecorFlags::BATS) {
        let bat_set = library.animation_set(EntityKind::Decor(DecorKind::Bat))?;
        for position in BAT_POSITIONS {
            world.spawn(DecorBundle {
                decorative: Decorative,
                kind: EntityKind::Decor(DecorKind::Bat),
                position: Position(position),
                animation: AnimationRuntime::new(bat_set.clone()),
            });
        }
    }
    if config.decor.contains(DecorFlags::FOG) {
        let fog_set = library.animation_set(EntityKind::Decor(DecorKind::Fog))?;
        world.spawn(DecorBundle {
            decorative: Decorative,
            kind: EntityKind::Decor(DecorKind::Fog),
            position: Position(FOG_POSITION),
            animation: AnimationRuntime::new(fog_set),
        });
    }

    Ok(())
}
