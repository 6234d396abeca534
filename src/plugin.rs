//! Bevy integration: advance the duel from `Time` and publish its events.

use bevy::prelude::*;
use std::path::PathBuf;
use tracing::error;

use crate::config::Tuning;
use crate::duel::environment::SceneProbe;
use crate::duel::events::DuelEvent;
use crate::duel::Duel;
use crate::hotreload::TuningWatcher;
use crate::input::Controls;
use crate::movement::MovementFrame;

/// Inserts `Duel`, `Controls`, `SceneProbe` and `PlayerMotion` and ticks the
/// duel once per `Update`.
///
/// The host writes `Controls` and `SceneProbe` before `Update`, reads
/// `PlayerMotion` and `DuelEvent`s after it.
#[derive(Default)]
pub struct DuelPlugin {
    pub tuning: Tuning,
}

impl Plugin for DuelPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Duel::new(self.tuning.clone()))
            .init_resource::<Controls>()
            .init_resource::<SceneProbe>()
            .init_resource::<PlayerMotion>()
            .add_event::<DuelEvent>()
            .add_systems(
                Update,
                (tick_duel, publish_duel_events, reset_control_edges).chain(),
            );
    }
}

/// Latest player movement; `None` once the player has been removed
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerMotion(pub Option<MovementFrame>);

fn tick_duel(
    time: Res<Time>,
    controls: Res<Controls>,
    probe: Res<SceneProbe>,
    mut duel: ResMut<Duel>,
    mut motion: ResMut<PlayerMotion>,
) {
    motion.0 = duel.tick(time.delta_secs(), &controls, &*probe);
}

fn publish_duel_events(mut duel: ResMut<Duel>, mut writer: EventWriter<DuelEvent>) {
    for event in duel.drain_events() {
        writer.send(event);
    }
}

fn reset_control_edges(mut controls: ResMut<Controls>) {
    controls.clear_edges();
}

/// Watches a tuning file and applies every valid change to the running duel.
/// Requires `DuelPlugin`.
pub struct TuningReloadPlugin {
    pub path: PathBuf,
}

impl Plugin for TuningReloadPlugin {
    fn build(&self, app: &mut App) {
        match TuningWatcher::watch(&self.path) {
            Ok(watcher) => {
                let initial = watcher.current().clone();
                app.insert_resource(TuningReload(watcher))
                    .add_systems(Startup, move |mut duel: ResMut<Duel>| {
                        duel.apply_tuning(initial.clone());
                    });
            }
            Err(e) => {
                error!("Tuning hot-reload disabled for {:?}: {}", self.path, e);
            }
        }
        app.add_event::<TuningReloaded>()
            .add_systems(PreUpdate, apply_tuning_reloads);
    }
}

#[derive(Resource, Debug)]
pub struct TuningReload(pub TuningWatcher);

/// Fired after every reload attempt
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TuningReloaded {
    pub success: bool,
    pub error: Option<String>,
}

fn apply_tuning_reloads(
    reload: Option<ResMut<TuningReload>>,
    mut duel: ResMut<Duel>,
    mut events: EventWriter<TuningReloaded>,
) {
    let Some(mut reload) = reload else {
        return;
    };
    let Some(result) = reload.0.poll() else {
        return;
    };
    match result {
        Ok(tuning) => {
            duel.apply_tuning(tuning);
            events.send(TuningReloaded {
                success: true,
                error: None,
            });
        }
        Err(e) => {
            events.send(TuningReloaded {
                success: false,
                error: Some(e.to_string()),
            });
        }
    }
}
