pub mod rng;
pub mod tick;

use crate::common::TrainStatus;
use crate::config::TrackerConfig;
use crate::event::{FleetUpdated, UpdateCause};
use crate::fleet::Fleet;
use crate::simulation::rng::SimRng;
use crate::simulation::tick::advance_fleet;
use bevy::prelude::*;

/// Gate for the periodic tick. Editing works regardless of it.
#[derive(Resource, Deref, DerefMut, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveMode(pub bool);

/// Drives the fleet on `FixedUpdate`; the fixed timestep is the tick period.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, tick_fleet.run_if(live_mode_enabled))
            .add_systems(Last, stop_on_exit);
    }
}

pub fn live_mode_enabled(live: Res<LiveMode>) -> bool {
    **live
}

fn tick_fleet(
    config: Res<TrackerConfig>,
    mut fleet: ResMut<Fleet>,
    mut rng: ResMut<SimRng>,
    mut updates: MessageWriter<FleetUpdated>,
) {
    let changes = advance_fleet(&mut fleet, &mut rng.0, &config.simulation);
    for change in &changes {
        match change.to {
            TrainStatus::Delayed => info!("Train {} delayed by {} min", change.id, change.delay_minutes),
            _ => info!("Train {} is {} again", change.id, change.to),
        }
    }
    updates.write(FleetUpdated {
        revision: fleet.revision(),
        cause: UpdateCause::Tick,
    });
}

/// The tick schedule lives as long as the app; switch it off before teardown.
fn stop_on_exit(mut exits: MessageReader<AppExit>, mut live: ResMut<LiveMode>) {
    if exits.read().next().is_some() && **live {
        **live = false;
        info!("Live updates stopped");
    }
}
