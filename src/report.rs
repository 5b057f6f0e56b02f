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

//! Report persistence: writes the assembled [`BenchmarkReport`] to a
//! timestamped JSON artifact. The orchestration core itself never touches
//! the filesystem; this module is the boundary to reporting tooling.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::{BenchmarkReport, Result};

/// Write `report` as pretty-printed JSON under `artifacts_dir`, creating
/// the directory if needed. Returns the artifact path.
pub fn write_report(report: &BenchmarkReport, artifacts_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(artifacts_dir)?;
    let filename = format!("report_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = artifacts_dir.join(filename);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    info!(path = %path.display(), "report written");
    Ok(path)
}
