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

//! Read-only queries over the [`AirportStore`].
//!
//! Every query is a linear scan of the dataset. The set is a few tens of
//! thousands of rows, so no spatial index is kept.

use crate::store::{AirportRecord, AirportStore};

/// Number of airports returned by a proximity query when no count is given
pub const DEFAULT_NEAREST_COUNT: usize = 5;

/// Parameters for a proximity search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
    pub type_filter: Option<String>,
}

impl NearestQuery {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            count: DEFAULT_NEAREST_COUNT,
            type_filter: None,
        }
    }

    /// Builder method to limit the number of results
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Builder method to restrict results to a category substring
    #[must_use]
    pub fn with_type_filter(mut self, type_filter: impl Into<String>) -> Self {
        self.type_filter = Some(type_filter.into());
        self
    }

    /// Check whether an airport passes the type filter.
    ///
    /// Airports with no category always pass, whatever the filter says.
    #[must_use]
    pub fn matches_type(&self, airport: &AirportRecord) -> bool {
        let Some(filter) = self.type_filter.as_deref().filter(|f| !f.is_empty()) else {
            return true;
        };

        match airport.airport_type.as_deref() {
            None => true,
            Some(airport_type) => airport_type.contains(filter),
        }
    }

    /// Planar distance in degrees; latitude and longitude are treated as x/y
    #[must_use]
    pub fn distance_to(&self, airport: &AirportRecord) -> f64 {
        let d_lat = airport.latitude - self.latitude;
        let d_lon = airport.longitude - self.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }
}

impl AirportStore {
    /// Get the airports closest to a point, nearest first.
    ///
    /// Equal distances keep dataset order.
    #[must_use]
    pub fn nearest(&self, query: &NearestQuery) -> Vec<&AirportRecord> {
        let mut candidates: Vec<(f64, &AirportRecord)> = self
            .records()
            .iter()
            .filter(|a| query.matches_type(a))
            .map(|a| (query.distance_to(a), a))
            .collect();

        // sort_by is stable
        candidates.sort_by(|(d1, _), (d2, _)| d1.total_cmp(d2));
        candidates.truncate(query.count);

        candidates.into_iter().map(|(_, a)| a).collect()
    }

    /// Get airports whose name contains the given text, ignoring case
    #[must_use]
    pub fn search_by_name(&self, text: &str) -> Vec<&AirportRecord> {
        let needle = text.to_lowercase();
        self.records()
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Get airports whose identifier contains the given text, ignoring case
    #[must_use]
    pub fn search_by_ident(&self, text: &str) -> Vec<&AirportRecord> {
        let needle = text.to_lowercase();
        self.records()
            .iter()
            .filter(|a| a.ident.to_lowercase().contains(&needle))
            .collect()
    }
}
