use crate::event::FleetUpdated;
use crate::fleet::{Fleet, FleetSummary, RouteFilter};
use crate::train::TrainRecord;
use bevy::prelude::*;
use itertools::Itertools;

const LAST_UPDATE_FORMAT: &str = "%-I:%M:%S %p";

pub fn train_line(train: &TrainRecord) -> String {
    let delay = if train.delay_minutes > 0 {
        format!(" +{} min delay", train.delay_minutes)
    } else {
        String::new()
    };
    format!(
        "{} [{}] {}{} | {} -> {} | {}/{} stops ({:.0}%) | ETA {}",
        train.name,
        train.route,
        train.status.label(),
        delay,
        train.current_station,
        train.next_station,
        train.current_stop,
        train.total_stops,
        train.progress,
        train.estimated_arrival,
    )
}

pub fn summary_line(summary: FleetSummary) -> String {
    format!(
        "On Time: {} | Delayed: {} | Boarding: {}",
        summary.on_time, summary.delayed, summary.boarding
    )
}

/// Route selector, with the active filter in brackets.
pub fn routes_line(fleet: &Fleet, selected: &RouteFilter) -> String {
    fleet
        .routes()
        .iter()
        .map(|route| {
            let label = match route {
                RouteFilter::All => "All Routes".to_owned(),
                RouteFilter::Route(name) => name.clone(),
            };
            if route == selected { format!("[{label}]") } else { label }
        })
        .join("  ")
}

pub fn board_lines(fleet: &Fleet, filter: &RouteFilter) -> Vec<String> {
    let mut lines = Vec::with_capacity(fleet.len() + 3);
    lines.push(format!(
        "Live Train Tracker, last updated {}",
        fleet.last_update().format(LAST_UPDATE_FORMAT)
    ));
    lines.push(routes_line(fleet, filter));
    lines.extend(fleet.filter_by_route(filter).map(train_line));
    lines.push(summary_line(fleet.summary()));
    lines
}

pub struct DisplayBoardPlugin;

impl Plugin for DisplayBoardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, print_board);
    }
}

fn print_board(mut updates: MessageReader<FleetUpdated>, fleet: Res<Fleet>, filter: Res<RouteFilter>) {
    let Some(update) = updates.read().last() else {
        return;
    };
    debug!("Redrawing board at revision {} ({:?})", update.revision, update.cause);
    for line in board_lines(&fleet, &filter) {
        info!("{}", line);
    }
}
