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

//! Application configuration management.
//!
//! Configuration is stored as TOML through `confy`, either at an explicit
//! path or in the per-user config directory. Every field has a serde default
//! so a partial or missing file still yields a usable config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use airport_data::OURAIRPORTS_AIRPORTS_URL;
use serde::{Deserialize, Serialize};

/// Name used for the per-user config location
pub const APP_NAME: &str = "airport-finder";

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5003";

/// Only browser origin allowed by CORS unless configured otherwise
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://chat.openai.com";

/// HTTP server settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address in host:port format
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Origin allowed to call the API from a browser
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Upper bound for handling a single request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            allowed_origin: default_allowed_origin(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Airport dataset settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataConfig {
    /// OurAirports-style airports.csv
    #[serde(default = "default_airports_path")]
    pub airports_path: PathBuf,

    /// Fetch the dataset from `download_url` when the file does not exist
    #[serde(default)]
    pub download_if_missing: bool,

    #[serde(default = "default_download_url")]
    pub download_url: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            airports_path: default_airports_path(),
            download_if_missing: false,
            download_url: default_download_url(),
        }
    }
}

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub data: DataConfig,

    /// Directory holding logo.png, openapi.yaml and .well-known/ai-plugin.json
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1 // Current schema version
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_allowed_origin() -> String {
    DEFAULT_ALLOWED_ORIGIN.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_airports_path() -> PathBuf {
    PathBuf::from("data/airports.csv")
}

fn default_download_url() -> String {
    OURAIRPORTS_AIRPORTS_URL.to_string()
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            server: ServerConfig::default(),
            data: DataConfig::default(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the per-user config directory
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Load configuration from an explicit file, creating it with defaults if absent
    pub fn load_path(path: &Path) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, "config")
    }
}
