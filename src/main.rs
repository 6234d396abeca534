//! Headless scripted duel.
//!
//! Usage: `parry-core [tuning.ron|tuning.json] [seconds]`
//!
//! The scripted player walks toward the enemy, parries late in every window,
//! steps into a boost zone once the enemy's second attack has started and
//! strikes the weakpoint whenever it is hittable. Every duel event is logged.

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use parry_core::logging::{init_tracing, TracingConfig};
use parry_core::{Controls, Duel, DuelEvent, DuelPlugin, Tuning, TuningReloadPlugin};

const FRAME: f32 = 1.0 / 60.0;
/// Parry once this much of the window is left
const PARRY_AT_REMAINING: f32 = 0.7;

fn main() -> Result<()> {
    init_tracing(&TracingConfig::default());

    let mut args = std::env::args().skip(1);
    let tuning_path = args.next().map(PathBuf::from);
    let seconds: f32 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid duration {s:?}"))?,
        None => 20.0,
    };

    let tuning = match &tuning_path {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(DuelPlugin { tuning })
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            FRAME,
        )))
        .add_systems(PreUpdate, scripted_player)
        .add_systems(PostUpdate, log_duel_events);
    if let Some(path) = tuning_path {
        app.add_plugins(TuningReloadPlugin { path });
    }

    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        app.update();
        let duel = app.world().resource::<Duel>();
        if duel.player().is_none() || duel.enemy().is_none() {
            break;
        }
    }

    let duel = app.world().resource::<Duel>();
    info!(
        elapsed = duel.elapsed(),
        player_health = duel.player().map(|p| p.combat.health().current()),
        enemy_health = duel.enemy().map(|e| e.health().current()),
        "duel finished"
    );
    Ok(())
}

fn scripted_player(mut duel: ResMut<Duel>, mut controls: ResMut<Controls>) {
    controls.move_axes = Vec2::Y;

    let zone_open = after_second_attack(duel.elapsed(), duel.tuning());
    let Some(player) = duel.player() else {
        return;
    };
    let parry = player.combat.parry();
    let window = parry.window();
    if window.is_active() && window.remaining() <= PARRY_AT_REMAINING {
        controls.parry = true;
    }
    let enter_zone = zone_open && !parry.in_boost_zone();

    if enter_zone {
        duel.enter_boost_zone();
    }
    if duel.enemy().is_some_and(|e| e.weakpoint().is_hittable()) {
        duel.strike_weakpoint();
    }
}

/// The enemy's second attack starts two full cooldowns in
fn after_second_attack(elapsed: f32, tuning: &Tuning) -> bool {
    elapsed > tuning.enemy.attack_cooldown * 2.0
}

fn log_duel_events(mut reader: EventReader<DuelEvent>) {
    for event in reader.read() {
        match event {
            // Tint toggles are renderer chatter
            DuelEvent::Tint { .. } => {}
            other => info!(?other, "duel event"),
        }
    }
}
