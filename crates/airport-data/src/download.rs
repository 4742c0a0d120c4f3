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

//! One-shot download of the OurAirports dataset.

use std::io;
use std::path::Path;

use log::info;
use thiserror::Error;

/// Public mirror of the OurAirports airports file
pub const OURAIRPORTS_AIRPORTS_URL: &str =
    "https://davidmegginson.github.io/ourairports-data/airports.csv";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to write airport data: {0}")]
    Io(#[from] io::Error),

    #[error("failed to download airport data: {0}")]
    Http(#[from] reqwest::Error),
}

/// Download the dataset to `path` unless a file is already there.
///
/// Returns `true` when a download happened.
pub async fn download_if_missing(path: &Path, url: &str) -> Result<bool, DownloadError> {
    if path.exists() {
        info!("{} already exists, skipping download", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!("Downloading {} from {}...", path.display(), url);

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    std::fs::write(path, &bytes)?;
    info!("Downloaded {} ({} bytes)", path.display(), bytes.len());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_file_is_not_downloaded() {
        let path = std::env::temp_dir().join(format!("airport-data-existing-{}.csv", std::process::id()));
        std::fs::write(&path, "name,ident\n").unwrap();

        // Nothing listens on the discard port, so a download attempt would error
        let downloaded = download_if_missing(&path, "http://127.0.0.1:9/airports.csv")
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name,ident\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let path = std::env::temp_dir().join(format!("airport-data-missing-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let result = download_if_missing(&path, "http://127.0.0.1:9/airports.csv").await;

        assert!(matches!(result, Err(DownloadError::Http(_))));
        assert!(!path.exists());
    }
}
