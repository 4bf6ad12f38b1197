//! Simulated live board of a small train fleet.
//!
//! The fleet lives in the [`Fleet`] resource. Edits arrive as observer events
//! (see [`event`]), and while [`LiveMode`] is on, every fixed-timestep tick moves
//! trains along their routes and randomly delays or recovers them.

pub mod clock;
pub mod common;
pub mod config;
pub mod display_board;
pub mod event;
pub mod fleet;
pub mod form;
pub mod simulation;
pub mod train;

pub use crate::config::TrackerConfig;
pub use crate::fleet::{Fleet, RouteFilter};
pub use crate::simulation::LiveMode;

use crate::display_board::DisplayBoardPlugin;
use crate::event::FleetPlugin;
use crate::simulation::SimulationPlugin;
use crate::simulation::rng::SimRng;
use bevy::prelude::*;

pub struct TrackerPlugin {
    config: TrackerConfig,
}

impl TrackerPlugin {
    pub fn new(config: TrackerConfig) -> Self {
        TrackerPlugin { config }
    }
}

impl Plugin for TrackerPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(err) => {
                error!("Invalid tracker config, falling back to defaults: {}", err);
                TrackerConfig::default()
            }
        };
        app.insert_resource(config.clone())
            .insert_resource(Time::<Fixed>::from_seconds(config.simulation.tick_seconds))
            .insert_resource(SimRng::from_config(config.seed))
            .insert_resource(LiveMode(config.live))
            .insert_resource(RouteFilter::from(config.route_filter.as_str()))
            .add_plugins((FleetPlugin, SimulationPlugin, DisplayBoardPlugin));
    }
}
