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

use std::io;

use airport_data::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::Serialize;

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid CORS origin {0}")]
    InvalidOrigin(String),

    #[error("IO error: {message}: {cause}")]
    Io { message: String, cause: io::Error },
}

/// Errors returned to API clients as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON input provided.")]
    InvalidJson,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid path parameters: {0}")]
    InvalidPath(String),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to read {name}")]
    Asset { name: String, cause: io::Error },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson
            | Self::Validation(_)
            | Self::InvalidPath(_)
            | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Asset { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Asset { name, cause } = &self {
            error!("Failed to read asset {name}: {cause}");
        } else {
            warn!("Rejected request ({status}): {self}");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
