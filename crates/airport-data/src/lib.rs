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

//! Airport reference data library.
//!
//! This library holds the OurAirports dataset in memory and answers the
//! lookups behind the airport finder service. It has no HTTP dependency and
//! every operation is a plain function call:
//!
//! - **Store layer**: CSV loading into an immutable [`AirportStore`]
//! - **Query layer**: nearest airports by planar distance, name and
//!   identifier substring search
//! - **Flight-plan layer**: SkyVector links from decimal coordinates
//!
//! # Quick Start
//!
//! ```
//! use airport_data::{AirportStore, NearestQuery};
//!
//! let csv = "ident,type,name,latitude_deg,longitude_deg,wikipedia_link\n\
//!            KJFK,large_airport,John F Kennedy International Airport,40.639447,-73.779317,\n\
//!            KLGA,large_airport,La Guardia Airport,40.777199,-73.872597,\n";
//! let store = AirportStore::from_reader(csv.as_bytes()).unwrap();
//!
//! let nearest = store.nearest(&NearestQuery::new(40.64, -73.78).with_count(1));
//! assert_eq!(nearest[0].ident, "KJFK");
//!
//! assert_eq!(store.search_by_name("guardia").len(), 1);
//! ```

pub mod download;
pub mod flight_plan;
pub mod query;
pub mod store;

pub use download::{download_if_missing, DownloadError, OURAIRPORTS_AIRPORTS_URL};
pub use flight_plan::{encode, Coordinate, FlightPlanRequest, ValidationError};
pub use query::{NearestQuery, DEFAULT_NEAREST_COUNT};
pub use store::{AirportRecord, AirportStore, LoadError, RecordProjection};
