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

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{BenchError, Result};

/// Top-level harness configuration, loadable from TOML with CLI overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub qdrant: QdrantConfig,
    pub artifacts_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            qdrant: QdrantConfig::default(),
            artifacts_dir: PathBuf::from("./artifacts"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    pub url: String,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
        }
    }
}

/// Per-run scenario configuration.
///
/// Every recognized key is enumerated here with its default. Keys without a
/// sensible default (`dim`, `seed`, `num_embeddings`, `scales`) are `Option`
/// and surface as [`BenchError::Configuration`] when a scenario that needs
/// them finds them missing — fatal only to that scenario, not the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub dim: Option<usize>,
    pub seed: Option<u64>,
    pub num_embeddings: Option<usize>,
    pub scales: Option<Vec<usize>>,
    pub noise_ratios: Vec<f64>,
    pub keyword_ratio: f64,
    pub update_ratio: f64,
    pub delete_ratio: f64,
    pub num_queries: usize,
    pub num_sub_queries: Vec<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dim: None,
            seed: None,
            num_embeddings: None,
            scales: None,
            noise_ratios: vec![0.0, 0.1, 0.2, 0.5],
            keyword_ratio: 0.5,
            update_ratio: 0.1,
            delete_ratio: 0.1,
            num_queries: 100,
            num_sub_queries: vec![4, 8, 16],
        }
    }
}

impl RunConfig {
    pub fn dim(&self) -> Result<usize> {
        self.dim.ok_or(BenchError::Configuration("dim"))
    }

    pub fn seed(&self) -> Result<u64> {
        self.seed.ok_or(BenchError::Configuration("seed"))
    }

    pub fn num_embeddings(&self) -> Result<usize> {
        self.num_embeddings
            .ok_or(BenchError::Configuration("num_embeddings"))
    }

    pub fn scales(&self) -> Result<&[usize]> {
        self.scales
            .as_deref()
            .ok_or(BenchError::Configuration("scales"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.noise_ratios, vec![0.0, 0.1, 0.2, 0.5]);
        assert_eq!(cfg.keyword_ratio, 0.5);
        assert_eq!(cfg.update_ratio, 0.1);
        assert_eq!(cfg.delete_ratio, 0.1);
        assert_eq!(cfg.num_queries, 100);
        assert_eq!(cfg.num_sub_queries, vec![4, 8, 16]);
    }

    #[test]
    fn missing_required_key_is_a_configuration_error() {
        let cfg = RunConfig::default();
        assert!(matches!(
            cfg.scales(),
            Err(BenchError::Configuration("scales"))
        ));
        assert!(matches!(cfg.dim(), Err(BenchError::Configuration("dim"))));
    }

    #[test]
    fn toml_round_trip_keeps_partial_keys() {
        let cfg: Config = toml::from_str(
            r#"
            [run]
            dim = 64
            seed = 7
            scales = [100, 200]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.run.dim.unwrap(), 64);
        assert_eq!(cfg.run.seed.unwrap(), 7);
        assert_eq!(cfg.run.scales.as_deref().unwrap(), &[100, 200]);
        // Unspecified keys fall back to defaults.
        assert_eq!(cfg.run.num_queries, 100);
        assert_eq!(cfg.qdrant.url, "http://localhost:6333");
    }
}
