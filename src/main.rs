//! Headless demo driver: runs the simulation at 60 Hz with a scripted
//! autoplayer that chases the villager, lands on it, and answers combos
//! through the same input port a real frontend would use.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::event;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;

use spooked::constants::LOOP_TIME;
use spooked::direction::Direction;
use spooked::game::Game;
use spooked::sprites::SpriteLibrary;
use spooked::systems::components::EntityKind;
use spooked::systems::hud::ComboView;

/// How long the demo runs before exiting on its own.
const DEMO_TICKS: u32 = 60 * 45;

fn main() -> Result<()> {
    // Setup tracing
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Could not set global default");

    let mut game = Game::new(SpriteLibrary::placeholder())?;

    let dt = LOOP_TIME.as_secs_f32();
    let mut held: Vec<Direction> = Vec::new();
    let mut last_combo: Option<ComboView> = None;
    let mut combo_age = 0u32;

    event!(
        tracing::Level::INFO,
        "Starting demo loop ({:.3}ms per tick)",
        dt * 1000.0
    );

    for tick_no in 0..DEMO_TICKS {
        let start = Instant::now();

        let combo = game.hud().combo;
        if let Some(combo) = combo {
            // A fresh challenge: let go of everything so the tracked keys get
            // a clean press, then hold exactly the two challenge keys.
            if last_combo != Some(combo) {
                last_combo = Some(combo);
                combo_age = 0;
                release_all(&mut game, &mut held);
            } else {
                combo_age += 1;
                if combo_age == 2 {
                    hold(&mut game, &mut held, combo.first);
                    hold(&mut game, &mut held, combo.second);
                }
            }
        } else {
            last_combo = None;
            chase(&mut game, &mut held);
        }

        if game.tick(dt) {
            break;
        }

        if tick_no % 60 == 0 {
            let hud = game.hud();
            event!(
                tracing::Level::INFO,
                level = hud.level,
                combos = hud.combos_done,
                progress = hud.progress,
                banner = ?hud.banner,
                "tick {tick_no}"
            );
        }

        if start.elapsed() < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                spin_sleep::sleep(time);
            }
        } else {
            event!(
                tracing::Level::WARN,
                "Demo loop behind schedule by: {:?}",
                start.elapsed() - LOOP_TIME
            );
        }
    }

    event!(tracing::Level::INFO, "Demo finished");
    Ok(())
}

/// Steers the ghost toward a spot just above the villager so the contact
/// classifies as a stomp.
fn chase(game: &mut Game, held: &mut Vec<Direction>) {
    let views = game.sprite_views();
    let ghost = views.iter().find(|view| view.kind == EntityKind::Ghost);
    let npc = views.iter().find(|view| matches!(view.kind, EntityKind::Npc(_)));
    let (Some(ghost), Some(npc)) = (ghost, npc) else {
        release_all(game, held);
        return;
    };

    let dx = npc.position.x - ghost.position.x;
    let dy = (npc.position.y - 40.0) - ghost.position.y;

    release_all(game, held);
    if dx.abs() > 24.0 {
        hold(game, held, if dx > 0.0 { Direction::Right } else { Direction::Left });
    } else if dy.abs() > 4.0 {
        hold(game, held, if dy > 0.0 { Direction::Down } else { Direction::Up });
    } else {
        hold(game, held, Direction::Down);
    }
}

fn hold(game: &mut Game, held: &mut Vec<Direction>, direction: Direction) {
    if !held.contains(&direction) {
        held.push(direction);
        // Raw key identifiers exercise the same normalization a browser would
        let raw = match direction {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        };
        game.key_down(raw);
    }
}

fn release_all(game: &mut Game, held: &mut Vec<Direction>) {
    for direction in held.drain(..) {
        let raw = match direction {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        };
        game.key_up(raw);
    }
}
