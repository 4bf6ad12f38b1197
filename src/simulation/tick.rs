use crate::common::{TrainId, TrainStatus};
use crate::config::SimulationConfig;
use crate::fleet::Fleet;
use crate::train::{MAX_PROGRESS, TrainRecord, stop_for_progress};
use rand::Rng;

/// Status flip made by the random walk during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub id: TrainId,
    pub from: TrainStatus,
    pub to: TrainStatus,
    pub delay_minutes: u32,
}

/// Moves a single in-service train one tick forward.
pub fn advance_train<R: Rng>(
    train: &mut TrainRecord,
    rng: &mut R,
    config: &SimulationConfig,
) -> Option<StatusChange> {
    if !train.status.is_in_service() {
        return None;
    }

    let step = rng.random::<f64>() * config.max_progress_step.max(0.0);
    train.progress = (train.progress + step).min(MAX_PROGRESS);

    let previous = train.status;
    if rng.random_bool(chance(config.event_chance)) {
        match train.status {
            TrainStatus::OnTime if rng.random_bool(chance(config.delay_chance)) => {
                train.status = TrainStatus::Delayed;
                train.delay_minutes = rng.random_range(1..=config.max_delay_minutes.max(1));
            }
            TrainStatus::Delayed if rng.random_bool(chance(config.recovery_chance)) => {
                train.status = TrainStatus::OnTime;
                train.delay_minutes = 0;
            }
            _ => {}
        }
    }

    train.current_stop = stop_for_progress(train.progress, train.total_stops);
    if train.is_delayed() {
        train.estimated_arrival = train
            .scheduled_arrival
            .add_minutes(i64::from(train.delay_minutes));
    }

    (previous != train.status).then(|| StatusChange {
        id: train.id.clone(),
        from: previous,
        to: train.status,
        delay_minutes: train.delay_minutes,
    })
}

/// Clamps a configured probability into `[0, 1]`, NaN counts as never.
fn chance(p: f64) -> f64 {
    p.max(0.0).min(1.0)
}

/// Runs one tick over the whole fleet and returns the status flips it caused.
pub fn advance_fleet<R: Rng>(fleet: &mut Fleet, rng: &mut R, config: &SimulationConfig) -> Vec<StatusChange> {
    let changes = fleet
        .trains_mut()
        .iter_mut()
        .filter_map(|train| advance_train(train, rng, config))
        .collect();
    fleet.touch();
    changes
}
