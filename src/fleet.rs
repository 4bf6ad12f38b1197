use crate::clock::ClockTime;
use crate::common::{TrainColor, TrainId, TrainStatus};
use crate::train::{MAX_PROGRESS, TrainDraft, TrainRecord};
use bevy::prelude::*;
use chrono::{DateTime, Local};
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

pub const ALL_ROUTES: &str = "all";

#[derive(Error, Debug, PartialEq)]
pub enum FleetError {
    #[error("required field '{0}' is empty")]
    MissingField(&'static str),
    #[error("a train needs at least one stop")]
    NoStops,
    #[error("progress must be a finite percentage, got {0}")]
    InvalidProgress(f64),
    #[error("no train with id '{0}'")]
    UnknownTrain(TrainId),
}

/// Route selection applied to the board.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub enum RouteFilter {
    #[default]
    All,
    Route(String),
}

impl RouteFilter {
    pub fn matches(&self, record: &TrainRecord) -> bool {
        match self {
            RouteFilter::All => true,
            RouteFilter::Route(route) => record.route == *route,
        }
    }
}

impl From<&str> for RouteFilter {
    fn from(value: &str) -> Self {
        if value == ALL_ROUTES {
            RouteFilter::All
        } else {
            RouteFilter::Route(value.to_owned())
        }
    }
}

impl fmt::Display for RouteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteFilter::All => f.write_str(ALL_ROUTES),
            RouteFilter::Route(route) => f.write_str(route),
        }
    }
}

/// Counts shown in the quick stats panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FleetSummary {
    pub on_time: usize,
    pub delayed: usize,
    pub boarding: usize,
}

/// Ordered store of every train on the board.
#[derive(Resource, Debug)]
pub struct Fleet {
    trains: Vec<TrainRecord>,
    revision: u64,
    last_update: DateTime<Local>,
}

impl Default for Fleet {
    fn default() -> Self {
        Fleet {
            trains: Vec::new(),
            revision: 0,
            last_update: Local::now(),
        }
    }
}

impl Fleet {
    pub fn seeded() -> Self {
        let mut fleet = Fleet::default();
        fleet.seed();
        fleet
    }

    /// Replaces the whole store with the four demo trains.
    pub fn seed(&mut self) {
        self.trains = seed_trains();
        self.touch();
    }

    pub fn add(&mut self, draft: TrainDraft) -> Result<&TrainRecord, FleetError> {
        let draft = validate(draft)?;
        let id = self.fresh_id();
        let index = self.trains.len();
        self.trains.push(TrainRecord::from_draft(id, draft));
        self.touch();
        Ok(&self.trains[index])
    }

    pub fn update(&mut self, id: &str, draft: TrainDraft) -> Result<&TrainRecord, FleetError> {
        let index = self.position(id)?;
        let draft = validate(draft)?;
        let record = &mut self.trains[index];
        *record = TrainRecord::from_draft(record.id.clone(), draft);
        self.touch();
        Ok(&self.trains[index])
    }

    pub fn remove(&mut self, id: &str) -> Result<TrainRecord, FleetError> {
        let index = self.position(id)?;
        let removed = self.trains.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Overrides the status of one train. Leaving `Delayed` clears the delay.
    pub fn set_status(&mut self, id: &str, status: TrainStatus) -> Result<&TrainRecord, FleetError> {
        let index = self.position(id)?;
        let record = &mut self.trains[index];
        if record.is_delayed() && status != TrainStatus::Delayed {
            record.delay_minutes = 0;
        }
        record.status = status;
        self.touch();
        Ok(&self.trains[index])
    }

    pub fn filter_by_route<'a>(&'a self, filter: &'a RouteFilter) -> impl Iterator<Item = &'a TrainRecord> + 'a {
        self.trains.iter().filter(move |train| filter.matches(train))
    }

    /// `all` followed by every distinct route, in order of first appearance.
    pub fn routes(&self) -> Vec<RouteFilter> {
        std::iter::once(RouteFilter::All)
            .chain(
                self.trains
                    .iter()
                    .map(|train| train.route.as_str())
                    .unique()
                    .map(RouteFilter::from),
            )
            .collect()
    }

    pub fn summary(&self) -> FleetSummary {
        let counts = self.trains.iter().counts_by(|train| train.status);
        let count = |status: TrainStatus| counts.get(&status).copied().unwrap_or_default();
        FleetSummary {
            on_time: count(TrainStatus::OnTime),
            delayed: count(TrainStatus::Delayed),
            boarding: count(TrainStatus::Boarding),
        }
    }

    pub fn get(&self, id: &str) -> Option<&TrainRecord> {
        self.trains.iter().find(|train| train.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainRecord> {
        self.trains.iter()
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Bumped on every change, lets a view skip redraws of an unchanged fleet.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_update(&self) -> DateTime<Local> {
        self.last_update
    }

    pub(crate) fn trains_mut(&mut self) -> &mut [TrainRecord] {
        &mut self.trains
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
        self.last_update = Local::now();
    }

    fn position(&self, id: &str) -> Result<usize, FleetError> {
        self.trains
            .iter()
            .position(|train| train.id == id)
            .ok_or_else(|| FleetError::UnknownTrain(id.to_owned()))
    }

    fn fresh_id(&self) -> TrainId {
        let mut stamp = Local::now().timestamp_millis();
        loop {
            let id = format!("T{stamp}");
            if self.get(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a TrainRecord;
    type IntoIter = std::slice::Iter<'a, TrainRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate(mut draft: TrainDraft) -> Result<TrainDraft, FleetError> {
    for (field, value) in [
        ("name", &mut draft.name),
        ("route", &mut draft.route),
        ("current station", &mut draft.current_station),
    ] {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FleetError::MissingField(field));
        }
        *value = trimmed.to_owned();
    }
    if draft.total_stops == 0 {
        return Err(FleetError::NoStops);
    }
    if !draft.progress.is_finite() {
        return Err(FleetError::InvalidProgress(draft.progress));
    }
    draft.progress = draft.progress.clamp(0.0, MAX_PROGRESS);
    Ok(draft)
}

#[allow(clippy::too_many_arguments)]
fn seed_train(
    id: &str,
    name: &str,
    route: &str,
    stations: (&str, &str),
    status: TrainStatus,
    delay_minutes: u32,
    progress: f64,
    arrival: ClockTime,
    stops: (u32, u32),
    color: TrainColor,
) -> TrainRecord {
    TrainRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        route: route.to_owned(),
        current_station: stations.0.to_owned(),
        next_station: stations.1.to_owned(),
        status,
        delay_minutes,
        progress,
        scheduled_arrival: arrival,
        estimated_arrival: arrival,
        current_stop: stops.0,
        total_stops: stops.1,
        color,
    }
}

fn seed_trains() -> Vec<TrainRecord> {
    vec![
        seed_train(
            "T001",
            "Express Metro",
            "Central-North",
            ("Central Station", "Business District"),
            TrainStatus::OnTime,
            0,
            25.0,
            ClockTime::hm(10, 45),
            (2, 8),
            TrainColor::Blue,
        ),
        seed_train(
            "T002",
            "City Line",
            "East-West",
            ("Tech Park", "University"),
            TrainStatus::Delayed,
            5,
            60.0,
            ClockTime::hm(10, 52),
            (7, 12),
            TrainColor::Red,
        ),
        seed_train(
            "T003",
            "Suburban Express",
            "South-Central",
            ("Mall Junction", "Sports Complex"),
            TrainStatus::OnTime,
            0,
            80.0,
            ClockTime::hm(10, 38),
            (5, 6),
            TrainColor::Green,
        ),
        seed_train(
            "T004",
            "Airport Link",
            "Airport-Downtown",
            ("Terminal 2", "Terminal 1"),
            TrainStatus::Boarding,
            0,
            15.0,
            ClockTime::hm(11, 5),
            (1, 10),
            TrainColor::Purple,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TrainDraft {
        TrainDraft::new("Coastal Runner", "Harbour Loop", "Pier 4")
            .with_next_station("Lighthouse")
            .with_stops(6)
            .with_arrival(ClockTime::hm(14, 20))
    }

    #[test]
    fn seed_produces_literal_records() {
        let fleet = Fleet::seeded();
        assert_eq!(fleet.len(), 4);
        let ids: Vec<_> = fleet.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["T001", "T002", "T003", "T004"]);

        let first = fleet.get("T001").unwrap();
        assert_eq!(first.name, "Express Metro");
        assert_eq!(first.status, TrainStatus::OnTime);
        assert_eq!(first.progress, 25.0);
        assert_eq!((first.current_stop, first.total_stops), (2, 8));
        assert_eq!(first.estimated_arrival.to_string(), "10:45 AM");

        let city_line = fleet.get("T002").unwrap();
        assert_eq!(city_line.status, TrainStatus::Delayed);
        assert_eq!(city_line.delay_minutes, 5);
        assert_eq!(city_line.estimated_arrival.to_string(), "10:52 AM");

        let airport = fleet.get("T004").unwrap();
        assert_eq!(airport.status, TrainStatus::Boarding);
        assert_eq!(airport.current_stop, 1);
        assert_eq!(airport.color, TrainColor::Purple);
    }

    #[test]
    fn seed_replaces_existing_records() {
        let mut fleet = Fleet::default();
        fleet.add(draft()).unwrap();
        fleet.seed();
        assert_eq!(fleet.len(), 4);
        assert!(fleet.iter().all(|t| t.id.starts_with("T00")));
    }

    #[test]
    fn add_appends_with_fresh_id() {
        let mut fleet = Fleet::seeded();
        let first = fleet.add(draft()).unwrap().id.clone();
        let second = fleet.add(draft()).unwrap().id.clone();
        assert_ne!(first, second);
        assert_eq!(fleet.len(), 6);
        assert_eq!(fleet.iter().last().unwrap().id, second);
        assert_eq!(fleet.get(&first).unwrap().current_stop, 1);
    }

    #[test]
    fn add_rejects_missing_required_fields() {
        let mut fleet = Fleet::seeded();
        let revision = fleet.revision();
        let cases = [
            (TrainDraft { name: String::new(), ..draft() }, "name"),
            (TrainDraft { route: "   ".into(), ..draft() }, "route"),
            (TrainDraft { current_station: String::new(), ..draft() }, "current station"),
        ];
        for (draft, field) in cases {
            assert_eq!(fleet.add(draft), Err(FleetError::MissingField(field)));
        }
        assert_eq!(fleet.len(), 4);
        assert_eq!(fleet.revision(), revision);
    }

    #[test]
    fn add_rejects_invalid_numbers() {
        let mut fleet = Fleet::default();
        assert_eq!(fleet.add(draft().with_stops(0)), Err(FleetError::NoStops));
        assert!(matches!(
            fleet.add(draft().with_progress(f64::NAN)),
            Err(FleetError::InvalidProgress(_))
        ));
        assert!(fleet.is_empty());

        let record = fleet.add(draft().with_progress(140.0)).unwrap();
        assert_eq!(record.progress, 100.0);
        assert_eq!(record.current_stop, 6);
    }

    #[test]
    fn update_replaces_record_and_keeps_id() {
        let mut fleet = Fleet::seeded();
        let edited = draft().with_status(TrainStatus::Delayed, 4).with_progress(50.0);
        let record = fleet.update("T003", edited).unwrap();
        assert_eq!(record.id, "T003");
        assert_eq!(record.name, "Coastal Runner");
        assert_eq!(record.current_stop, 3);
        assert_eq!(record.estimated_arrival.to_string(), "2:24 PM");
        assert_eq!(fleet.iter().position(|t| t.id == "T003"), Some(2));
    }

    #[test]
    fn update_of_unknown_or_invalid_is_noop() {
        let mut fleet = Fleet::seeded();
        assert_eq!(
            fleet.update("T999", draft()),
            Err(FleetError::UnknownTrain("T999".into()))
        );
        assert!(fleet.update("T001", TrainDraft { name: String::new(), ..draft() }).is_err());
        assert_eq!(fleet.get("T001").unwrap().name, "Express Metro");
    }

    #[test]
    fn removed_train_cannot_be_resurrected() {
        let mut fleet = Fleet::seeded();
        let removed = fleet.remove("T002").unwrap();
        assert_eq!(removed.name, "City Line");
        assert!(fleet.update("T002", draft()).is_err());
        assert!(fleet.get("T002").is_none());
        assert_eq!(fleet.len(), 3);
        assert!(fleet.remove("T002").is_err());
    }

    #[test]
    fn set_status_clears_delay_when_leaving_delayed() {
        let mut fleet = Fleet::seeded();
        let record = fleet.set_status("T002", TrainStatus::Boarding).unwrap();
        assert_eq!(record.status, TrainStatus::Boarding);
        assert_eq!(record.delay_minutes, 0);

        let record = fleet.set_status("T001", TrainStatus::Cancelled).unwrap();
        assert_eq!(record.status, TrainStatus::Cancelled);
        assert_eq!(record.name, "Express Metro");

        assert!(fleet.set_status("nope", TrainStatus::OnTime).is_err());
    }

    #[test]
    fn filter_by_route_preserves_order() {
        let mut fleet = Fleet::seeded();
        fleet.add(TrainDraft::new("Late Express", "East-West", "Harbour")).unwrap();

        let all: Vec<_> = fleet.filter_by_route(&RouteFilter::All).map(|t| t.name.as_str()).collect();
        assert_eq!(
            all,
            ["Express Metro", "City Line", "Suburban Express", "Airport Link", "Late Express"]
        );

        let filter = RouteFilter::from("East-West");
        let east_west: Vec<_> = fleet.filter_by_route(&filter).map(|t| t.name.as_str()).collect();
        assert_eq!(east_west, ["City Line", "Late Express"]);

        let none = RouteFilter::from("Nowhere");
        assert_eq!(fleet.filter_by_route(&none).count(), 0);
        assert_eq!(fleet.len(), 5);
    }

    #[test]
    fn routes_lists_distinct_routes() {
        let mut fleet = Fleet::seeded();
        fleet.add(TrainDraft::new("Shuttle", "East-West", "Harbour")).unwrap();
        let routes: Vec<_> = fleet.routes().iter().map(ToString::to_string).collect();
        assert_eq!(
            routes,
            ["all", "Central-North", "East-West", "South-Central", "Airport-Downtown"]
        );
    }

    #[test]
    fn summary_counts_statuses() {
        let mut fleet = Fleet::seeded();
        assert_eq!(
            fleet.summary(),
            FleetSummary {
                on_time: 2,
                delayed: 1,
                boarding: 1
            }
        );
        fleet.set_status("T003", TrainStatus::Maintenance).unwrap();
        assert_eq!(fleet.summary().on_time, 1);
    }

    #[test]
    fn every_change_bumps_revision() {
        let mut fleet = Fleet::default();
        let start = fleet.revision();
        fleet.seed();
        fleet.set_status("T001", TrainStatus::Delayed).unwrap();
        fleet.remove("T004").unwrap();
        assert_eq!(fleet.revision(), start + 3);
        assert!(fleet.last_update() <= Local::now());
    }

    #[test]
    fn route_filter_text_form() {
        assert_eq!(RouteFilter::from("all"), RouteFilter::All);
        assert_eq!(RouteFilter::from("East-West").to_string(), "East-West");
    }
}
