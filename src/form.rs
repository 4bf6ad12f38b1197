use crate::clock::{ClockTime, ClockTimeError};
use crate::common::{TokenError, TrainColor, TrainStatus};
use crate::train::TrainDraft;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("'{value}' is not a valid number for {field}")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    Time(#[from] ClockTimeError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Raw text of the add/edit train form.
#[derive(Clone, Debug, Default)]
pub struct TrainForm {
    pub name: String,
    pub route: String,
    pub current_station: String,
    pub next_station: String,
    pub status: String,
    pub delay: String,
    pub progress: String,
    pub estimated_arrival: String,
    pub total_stops: String,
    pub color: String,
}

impl TrainForm {
    /// Parses the numeric and token fields. Text fields are passed through untouched,
    /// they are checked when the draft reaches the fleet.
    pub fn into_draft(self) -> Result<TrainDraft, FormError> {
        let status = or_default(&self.status, TrainStatus::OnTime)?;
        let color = or_default(&self.color, TrainColor::Blue)?;
        let estimated_arrival: ClockTime = self.estimated_arrival.parse()?;
        let total_stops = parse_number::<u32>("total stops", &self.total_stops)?;
        let delay_minutes = parse_number_or_zero::<u32>("delay", &self.delay)?;
        let progress = parse_number_or_zero::<f64>("progress", &self.progress)?;
        if !progress.is_finite() {
            return Err(FormError::InvalidNumber {
                field: "progress",
                value: self.progress,
            });
        }

        Ok(TrainDraft {
            name: self.name,
            route: self.route,
            current_station: self.current_station,
            next_station: self.next_station,
            status,
            delay_minutes,
            progress,
            estimated_arrival,
            total_stops,
            color,
        })
    }
}

fn or_default<T>(value: &str, default: T) -> Result<T, TokenError>
where
    T: FromStr<Err = TokenError>,
{
    if value.trim().is_empty() { Ok(default) } else { value.parse() }
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, FormError> {
    value.trim().parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

fn parse_number_or_zero<T: FromStr + Default>(field: &'static str, value: &str) -> Result<T, FormError> {
    if value.trim().is_empty() {
        Ok(T::default())
    } else {
        parse_number(field, value)
    }
}
