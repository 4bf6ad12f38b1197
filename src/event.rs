use crate::common::{TrainId, TrainStatus};
use crate::fleet::{Fleet, RouteFilter};
use crate::simulation::LiveMode;
use crate::train::TrainDraft;
use bevy::prelude::*;

#[derive(Event, Clone, Debug)]
pub struct AddTrain(pub TrainDraft);

#[derive(Event, Clone, Debug)]
pub struct UpdateTrain {
    pub id: TrainId,
    pub draft: TrainDraft,
}

#[derive(Event, Clone, Debug)]
pub struct RemoveTrain {
    pub id: TrainId,
}

#[derive(Event, Clone, Debug)]
pub struct SetTrainStatus {
    pub id: TrainId,
    pub status: TrainStatus,
}

#[derive(Event, Clone, Debug)]
pub struct SetRouteFilter(pub RouteFilter);

#[derive(Event, Clone, Copy, Debug)]
pub struct SetLiveMode(pub bool);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateCause {
    Seed,
    Tick,
    Edit,
    Filter,
}

/// Sent whenever what the board shows may have changed.
#[derive(Message, Clone, Copy, Debug)]
pub struct FleetUpdated {
    pub revision: u64,
    pub cause: UpdateCause,
}

pub struct FleetPlugin;

impl Plugin for FleetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Fleet>()
            .init_resource::<RouteFilter>()
            .add_message::<FleetUpdated>()
            .add_observer(on_add_train)
            .add_observer(on_update_train)
            .add_observer(on_remove_train)
            .add_observer(on_set_status)
            .add_observer(on_set_route_filter)
            .add_observer(on_set_live_mode)
            .add_systems(Startup, seed_fleet);
    }
}

fn seed_fleet(mut fleet: ResMut<Fleet>, mut updates: MessageWriter<FleetUpdated>) {
    fleet.seed();
    info!("Seeded fleet with {} trains", fleet.len());
    updates.write(FleetUpdated {
        revision: fleet.revision(),
        cause: UpdateCause::Seed,
    });
}

fn edited(fleet: &Fleet, updates: &mut MessageWriter<FleetUpdated>) {
    updates.write(FleetUpdated {
        revision: fleet.revision(),
        cause: UpdateCause::Edit,
    });
}

fn on_add_train(event: On<AddTrain>, mut fleet: ResMut<Fleet>, mut updates: MessageWriter<FleetUpdated>) {
    match fleet.add(event.0.clone()) {
        Ok(train) => debug!("Added train {} '{}' on {}", train.id, train.name, train.route),
        Err(err) => {
            debug!("Ignoring new train: {}", err);
            return;
        }
    }
    edited(&fleet, &mut updates);
}

fn on_update_train(event: On<UpdateTrain>, mut fleet: ResMut<Fleet>, mut updates: MessageWriter<FleetUpdated>) {
    match fleet.update(&event.id, event.draft.clone()) {
        Ok(train) => debug!("Updated train {} '{}'", train.id, train.name),
        Err(err) => {
            debug!("Ignoring edit of train {}: {}", event.id, err);
            return;
        }
    }
    edited(&fleet, &mut updates);
}

fn on_remove_train(event: On<RemoveTrain>, mut fleet: ResMut<Fleet>, mut updates: MessageWriter<FleetUpdated>) {
    match fleet.remove(&event.id) {
        Ok(train) => debug!("Removed train {} '{}'", train.id, train.name),
        Err(err) => {
            debug!("Ignoring removal: {}", err);
            return;
        }
    }
    edited(&fleet, &mut updates);
}

fn on_set_status(event: On<SetTrainStatus>, mut fleet: ResMut<Fleet>, mut updates: MessageWriter<FleetUpdated>) {
    match fleet.set_status(&event.id, event.status) {
        Ok(train) => debug!("Train {} is now {}", train.id, train.status),
        Err(err) => {
            debug!("Ignoring status override: {}", err);
            return;
        }
    }
    edited(&fleet, &mut updates);
}

fn on_set_route_filter(
    event: On<SetRouteFilter>,
    fleet: Res<Fleet>,
    mut filter: ResMut<RouteFilter>,
    mut updates: MessageWriter<FleetUpdated>,
) {
    if *filter != event.0 {
        *filter = event.0.clone();
        debug!("Route filter set to {}", *filter);
        updates.write(FleetUpdated {
            revision: fleet.revision(),
            cause: UpdateCause::Filter,
        });
    }
}

fn on_set_live_mode(event: On<SetLiveMode>, mut live: ResMut<LiveMode>) {
    if **live != event.0 {
        **live = event.0;
        info!("Live mode {}", if event.0 { "on" } else { "off" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackerPlugin;
    use crate::config::TrackerConfig;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(TrackerPlugin::new(TrackerConfig {
                seed: Some(42),
                ..Default::default()
            }));
        app.update();
        app
    }

    fn fleet(app: &App) -> &Fleet {
        app.world().resource::<Fleet>()
    }

    fn draft(name: &str) -> TrainDraft {
        TrainDraft::new(name, "Harbour Loop", "Pier 4").with_stops(4)
    }

    #[test]
    fn startup_seeds_fleet() {
        let app = test_app();
        assert_eq!(fleet(&app).len(), 4);
        assert_eq!(fleet(&app).get("T001").unwrap().progress, 25.0);
    }

    #[test]
    fn add_event_appends_train() {
        let mut app = test_app();
        app.world_mut().trigger(AddTrain(draft("Harbour Shuttle")));
        assert_eq!(fleet(&app).len(), 5);
        assert_eq!(fleet(&app).iter().last().unwrap().name, "Harbour Shuttle");
    }

    #[test]
    fn invalid_add_is_dropped() {
        let mut app = test_app();
        let revision = fleet(&app).revision();
        app.world_mut().trigger(AddTrain(draft("")));
        assert_eq!(fleet(&app).len(), 4);
        assert_eq!(fleet(&app).revision(), revision);
    }

    #[test]
    fn update_and_remove_events() {
        let mut app = test_app();
        app.world_mut().trigger(UpdateTrain {
            id: "T003".into(),
            draft: draft("Renamed Express"),
        });
        assert_eq!(fleet(&app).get("T003").unwrap().name, "Renamed Express");

        app.world_mut().trigger(RemoveTrain { id: "T003".into() });
        app.world_mut().trigger(UpdateTrain {
            id: "T003".into(),
            draft: draft("Ghost Train"),
        });
        assert!(fleet(&app).get("T003").is_none());
        assert!(fleet(&app).iter().all(|t| t.name != "Ghost Train"));
        assert_eq!(fleet(&app).len(), 3);
    }

    #[test]
    fn status_override_event() {
        let mut app = test_app();
        app.world_mut().trigger(SetTrainStatus {
            id: "T002".into(),
            status: TrainStatus::OnTime,
        });
        let train = fleet(&app).get("T002").unwrap();
        assert_eq!(train.status, TrainStatus::OnTime);
        assert_eq!(train.delay_minutes, 0);
    }

    #[test]
    fn route_filter_event_does_not_touch_fleet() {
        let mut app = test_app();
        let revision = fleet(&app).revision();
        app.world_mut().trigger(SetRouteFilter(RouteFilter::from("East-West")));
        let filter = app.world().resource::<RouteFilter>();
        assert_eq!(*filter, RouteFilter::Route("East-West".into()));
        assert_eq!(fleet(&app).filter_by_route(filter).count(), 1);
        assert_eq!(fleet(&app).revision(), revision);
    }

    #[test]
    fn live_mode_event() {
        let mut app = test_app();
        assert!(**app.world().resource::<LiveMode>());
        app.world_mut().trigger(SetLiveMode(false));
        assert!(!**app.world().resource::<LiveMode>());
    }
}
