/*
 * Copyright 2025 vectorbench contributors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use thiserror::Error;

/// Error taxonomy for the benchmark harness.
///
/// No variant is process-fatal: the runner converts every error raised
/// inside an `(adapter, scenario)` pair into an error record in the report.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Adapter unreachable at connect time. Non-fatal to the overall run.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// An adapter operation (create/upsert/query/delete/...) failed during
    /// a scenario. Ends that scenario; no partial metrics are salvaged.
    #[error("operation failed: {0}")]
    Operation(String),

    /// A scenario required a configuration key that was not provided.
    #[error("missing required config key: {0}")]
    Configuration(&'static str),

    /// Caller violated an adapter contract (e.g. upsert length mismatch).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
