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

//! Record store for airport reference data.
//!
//! Airports are read once from an OurAirports-style CSV file and kept in
//! memory for the lifetime of the process. The store has no mutating
//! operations; share it behind an `Arc` and read it from as many tasks as
//! needed.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while loading the dataset.
///
/// Any malformed row fails the whole load; there is no best-effort mode.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open airport data: {0}")]
    Io(#[from] io::Error),

    #[error("malformed airport data at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

impl From<csv::Error> for LoadError {
    fn from(source: csv::Error) -> Self {
        let line = source.position().map_or(0, csv::Position::line);
        Self::Csv { line, source }
    }
}

/// A single airport row from OurAirports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirportRecord {
    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "ident")]
    pub ident: String,

    /// Category label such as `small_airport`; `None` when the field is empty
    #[serde(rename = "type", default)]
    pub airport_type: Option<String>,

    #[serde(rename = "latitude_deg")]
    pub latitude: f64,

    #[serde(rename = "longitude_deg")]
    pub longitude: f64,

    /// Reference link (Wikipedia), possibly empty
    #[serde(rename = "wikipedia_link", default)]
    pub reference_url: String,
}

impl AirportRecord {
    /// Borrow the subset of fields returned to API clients
    #[must_use]
    pub fn projection(&self) -> RecordProjection<'_> {
        RecordProjection {
            name: &self.name,
            ident: &self.ident,
            airport_type: self.airport_type.as_deref().unwrap_or_default(),
            lat: self.latitude,
            long: self.longitude,
            url: &self.reference_url,
        }
    }
}

/// JSON shape of an airport in API responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordProjection<'a> {
    pub name: &'a str,
    pub ident: &'a str,
    #[serde(rename = "type")]
    pub airport_type: &'a str,
    pub lat: f64,
    pub long: f64,
    pub url: &'a str,
}

/// Immutable in-memory collection of airports, in dataset order.
#[derive(Debug, Default)]
pub struct AirportStore {
    records: Vec<AirportRecord>,
}

impl AirportStore {
    /// Load airports from a CSV file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let store = Self::from_reader(BufReader::new(file))?;

        info!("Loaded {} airports from {}", store.len(), path.display());
        Ok(store)
    }

    /// Load airports from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let records = csv_reader
            .deserialize()
            .collect::<Result<Vec<AirportRecord>, _>>()?;

        Ok(Self { records })
    }

    /// Build a store from records that are already in memory
    #[must_use]
    pub fn from_records(records: Vec<AirportRecord>) -> Self {
        Self { records }
    }

    /// All airports in dataset order
    #[must_use]
    pub fn records(&self) -> &[AirportRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for AirportRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.projection().serialize(serializer)
    }
}
