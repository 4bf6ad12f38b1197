use crate::clock::ClockTime;
use crate::common::{TrainColor, TrainId, TrainStatus};

pub const MAX_PROGRESS: f64 = 100.0;

/// One simulated train as shown on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainRecord {
    pub id: TrainId,
    pub name: String,
    pub route: String,
    pub current_station: String,
    pub next_station: String,
    pub status: TrainStatus,
    pub delay_minutes: u32,
    /// Route completion in percent, `0..=100`.
    pub progress: f64,
    /// Arrival time as originally scheduled, delays are applied on top of it.
    pub scheduled_arrival: ClockTime,
    pub estimated_arrival: ClockTime,
    pub total_stops: u32,
    pub current_stop: u32,
    pub color: TrainColor,
}

impl TrainRecord {
    pub(crate) fn from_draft(id: TrainId, draft: TrainDraft) -> Self {
        let current_stop = stop_for_progress(draft.progress, draft.total_stops);
        let estimated_arrival = if draft.status == TrainStatus::Delayed {
            draft.estimated_arrival.add_minutes(i64::from(draft.delay_minutes))
        } else {
            draft.estimated_arrival
        };
        TrainRecord {
            id,
            name: draft.name,
            route: draft.route,
            current_station: draft.current_station,
            next_station: draft.next_station,
            status: draft.status,
            delay_minutes: draft.delay_minutes,
            progress: draft.progress,
            scheduled_arrival: draft.estimated_arrival,
            estimated_arrival,
            total_stops: draft.total_stops,
            current_stop,
            color: draft.color,
        }
    }

    pub fn is_delayed(&self) -> bool {
        self.status == TrainStatus::Delayed
    }
}

/// User-supplied fields for a new or edited train.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainDraft {
    pub name: String,
    pub route: String,
    pub current_station: String,
    pub next_station: String,
    pub status: TrainStatus,
    pub delay_minutes: u32,
    pub progress: f64,
    pub estimated_arrival: ClockTime,
    pub total_stops: u32,
    pub color: TrainColor,
}

impl TrainDraft {
    pub fn new(name: impl Into<String>, route: impl Into<String>, current_station: impl Into<String>) -> Self {
        TrainDraft {
            name: name.into(),
            route: route.into(),
            current_station: current_station.into(),
            total_stops: 1,
            ..Default::default()
        }
    }

    pub fn with_next_station(mut self, next_station: impl Into<String>) -> Self {
        self.next_station = next_station.into();
        self
    }

    pub fn with_stops(mut self, total_stops: u32) -> Self {
        self.total_stops = total_stops;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_status(mut self, status: TrainStatus, delay_minutes: u32) -> Self {
        self.status = status;
        self.delay_minutes = delay_minutes;
        self
    }

    pub fn with_arrival(mut self, estimated_arrival: ClockTime) -> Self {
        self.estimated_arrival = estimated_arrival;
        self
    }

    pub fn with_color(mut self, color: TrainColor) -> Self {
        self.color = color;
        self
    }
}

impl From<&TrainRecord> for TrainDraft {
    fn from(record: &TrainRecord) -> Self {
        TrainDraft {
            name: record.name.clone(),
            route: record.route.clone(),
            current_station: record.current_station.clone(),
            next_station: record.next_station.clone(),
            status: record.status,
            delay_minutes: record.delay_minutes,
            progress: record.progress,
            estimated_arrival: record.scheduled_arrival,
            total_stops: record.total_stops,
            color: record.color,
        }
    }
}

/// Stop index reached at the given progress, always within `1..=total_stops`.
pub fn stop_for_progress(progress: f64, total_stops: u32) -> u32 {
    let total_stops = total_stops.max(1);
    let stop = (progress / MAX_PROGRESS * f64::from(total_stops)).ceil();
    (stop as u32).clamp(1, total_stops)
}
