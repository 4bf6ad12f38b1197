use bevy::prelude::*;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type TrainId = String;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("unknown train status '{0}'")]
    Status(String),
    #[error("'{0}' is not a palette color")]
    Color(String),
}

#[derive(PartialEq, Eq, Copy, Clone, Default, Debug, Hash)]
pub enum TrainStatus {
    #[default]
    OnTime,
    Delayed,
    Boarding,
    Cancelled,
    Maintenance,
}

impl TrainStatus {
    pub const ALL: [TrainStatus; 5] = [
        TrainStatus::OnTime,
        TrainStatus::Delayed,
        TrainStatus::Boarding,
        TrainStatus::Cancelled,
        TrainStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainStatus::OnTime => "on-time",
            TrainStatus::Delayed => "delayed",
            TrainStatus::Boarding => "boarding",
            TrainStatus::Cancelled => "cancelled",
            TrainStatus::Maintenance => "maintenance",
        }
    }

    /// Label with the first letter capitalised, e.g. `On-time`.
    pub fn label(&self) -> &'static str {
        match self {
            TrainStatus::OnTime => "On-time",
            TrainStatus::Delayed => "Delayed",
            TrainStatus::Boarding => "Boarding",
            TrainStatus::Cancelled => "Cancelled",
            TrainStatus::Maintenance => "Maintenance",
        }
    }

    /// Trains out of service are frozen by the simulation.
    pub fn is_in_service(&self) -> bool {
        !matches!(self, TrainStatus::Cancelled | TrainStatus::Maintenance)
    }
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainStatus {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TrainStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TokenError::Status(s.to_owned()))
    }
}

/// Fixed palette a train card color is picked from.
#[derive(PartialEq, Eq, Copy, Clone, Default, Debug, Hash)]
pub enum TrainColor {
    #[default]
    Blue,
    Red,
    Green,
    Purple,
    Amber,
    Pink,
}

impl TrainColor {
    pub const PALETTE: [TrainColor; 6] = [
        TrainColor::Blue,
        TrainColor::Red,
        TrainColor::Green,
        TrainColor::Purple,
        TrainColor::Amber,
        TrainColor::Pink,
    ];

    fn rgb(&self) -> (u8, u8, u8) {
        match self {
            TrainColor::Blue => (0x3B, 0x82, 0xF6),
            TrainColor::Red => (0xEF, 0x44, 0x44),
            TrainColor::Green => (0x10, 0xB9, 0x81),
            TrainColor::Purple => (0x8B, 0x5C, 0xF6),
            TrainColor::Amber => (0xF5, 0x9E, 0x0B),
            TrainColor::Pink => (0xEC, 0x48, 0x99),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrainColor::Blue => "blue",
            TrainColor::Red => "red",
            TrainColor::Green => "green",
            TrainColor::Purple => "purple",
            TrainColor::Amber => "amber",
            TrainColor::Pink => "pink",
        }
    }

    pub fn srgba(&self) -> Srgba {
        let (r, g, b) = self.rgb();
        Srgba::rgb_u8(r, g, b)
    }

    pub fn hex(&self) -> String {
        self.srgba().to_hex()
    }
}

impl FromStr for TrainColor {
    type Err = TokenError;

    /// Accepts a palette name or a hex string such as `#3B82F6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(color) = TrainColor::PALETTE.into_iter().find(|c| c.name().eq_ignore_ascii_case(s)) {
            return Ok(color);
        }
        let parsed = Srgba::hex(s).map_err(|_| TokenError::Color(s.to_owned()))?;
        TrainColor::PALETTE
            .into_iter()
            .find(|c| c.srgba() == parsed)
            .ok_or_else(|| TokenError::Color(s.to_owned()))
    }
}

impl From<TrainColor> for Color {
    fn from(c: TrainColor) -> Self {
        c.srgba().into()
    }
}
