// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SkyVector flight-plan links.
//!
//! A route is a list of decimal coordinates. Each one becomes a
//! degrees-minutes-seconds token such as `403829N0734641W`, and the tokens
//! are joined into the `fpl` parameter of a SkyVector URL:
//!
//! ```
//! use airport_data::flight_plan::{encode, Coordinate};
//!
//! let link = encode(&[Coordinate::new(40.6413, -73.7781)]);
//! assert_eq!(link, "https://skyvector.com/?fpl=403829N0734641W");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Prefix of every generated link
pub const SKYVECTOR_FPL_URL: &str = "https://skyvector.com/?fpl=";

/// Separator between waypoint tokens (an already-encoded space)
pub const WAYPOINT_SEPARATOR: &str = "%20";

/// Errors for flight-plan payloads that cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid input provided. Missing coordinates.")]
    MissingCoordinates,

    #[error("Invalid input provided. Coordinates must be an array.")]
    NotAnArray,

    #[error("Invalid input provided. Coordinate {index} must have numeric lat and long.")]
    InvalidCoordinate { index: usize },
}

/// A waypoint in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub long: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    fn from_json(value: &Value) -> Option<Self> {
        let lat = value.get("lat")?.as_f64()?;
        let long = value.get("long")?.as_f64()?;
        Some(Self::new(lat, long))
    }
}

/// Unsigned degrees/minutes/seconds split of a decimal angle.
///
/// Seconds are rounded half-to-even and are never carried, so a value can
/// come out with `seconds == 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Dms {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "inputs are absolute angles; out-of-range values saturate"
    )]
    #[must_use]
    pub fn from_decimal(value: f64) -> Self {
        let value = value.abs();
        let degrees = value.floor();
        let minutes_decimal = (value - degrees) * 60.0;
        let minutes = minutes_decimal.floor();
        let seconds = ((minutes_decimal - minutes) * 60.0).round_ties_even();

        Self {
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
        }
    }
}

/// Waypoint token, e.g. `403829N0734641W`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointToken(pub Coordinate);

impl fmt::Display for WaypointToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Coordinate { lat, long } = self.0;
        let lat_dms = Dms::from_decimal(lat);
        let long_dms = Dms::from_decimal(long);
        let lat_dir = if lat >= 0.0 { 'N' } else { 'S' };
        let long_dir = if long >= 0.0 { 'E' } else { 'W' };

        write!(
            f,
            "{:02}{:02}{:02}{lat_dir}{:03}{:02}{:02}{long_dir}",
            lat_dms.degrees,
            lat_dms.minutes,
            lat_dms.seconds,
            long_dms.degrees,
            long_dms.minutes,
            long_dms.seconds,
        )
    }
}

/// Build the SkyVector link for a route. An empty route gives an empty plan.
#[must_use]
pub fn encode(coordinates: &[Coordinate]) -> String {
    let tokens: Vec<String> = coordinates
        .iter()
        .map(|c| WaypointToken(*c).to_string())
        .collect();

    format!("{SKYVECTOR_FPL_URL}{}", tokens.join(WAYPOINT_SEPARATOR))
}

/// Validated body of a flight-plan request.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlanRequest {
    pub coordinates: Vec<Coordinate>,
}

impl FlightPlanRequest {
    /// Validate an untyped JSON payload of the form
    /// `{"coordinates": [{"lat": .., "long": ..}, ...]}`.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let coordinates = payload
            .get("coordinates")
            .ok_or(ValidationError::MissingCoordinates)?
            .as_array()
            .ok_or(ValidationError::NotAnArray)?
            .iter()
            .enumerate()
            .map(|(index, value)| {
                Coordinate::from_json(value).ok_or(ValidationError::InvalidCoordinate { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { coordinates })
    }

    #[must_use]
    pub fn link(&self) -> String {
        encode(&self.coordinates)
    }
}
