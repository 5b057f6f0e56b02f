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

//! Benchmark orchestration: the cross product of adapters and scenarios,
//! executed sequentially with per-pair failure isolation.
//!
//! The runner holds no internal synchronization and must not be invoked
//! concurrently; adapter calls are the only await points and carry no
//! timeouts, so a hung backend stalls the run.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::adapters::VectorDb;
use crate::core::{BenchmarkReport, RunConfig, ScenarioOutcome};
use crate::scenarios::Scenario;

pub struct Runner {
    adapters: Vec<Arc<dyn VectorDb>>,
    scenarios: Vec<Arc<dyn Scenario>>,
}

impl Runner {
    pub fn new(adapters: Vec<Arc<dyn VectorDb>>, scenarios: Vec<Arc<dyn Scenario>>) -> Self {
        Self {
            adapters,
            scenarios,
        }
    }

    /// Run every scenario against every adapter.
    ///
    /// `connect` is called once per adapter; an unreachable adapter is
    /// logged and its scenarios are still attempted, letting operation-level
    /// errors surface per entry. A failure in one `(adapter, scenario)` pair
    /// never prevents execution or reporting of any other pair.
    pub async fn run(&self, config: &RunConfig) -> BenchmarkReport {
        let mut report = BenchmarkReport::default();

        for adapter in &self.adapters {
            info!(adapter = adapter.name(), "running scenarios");
            match adapter.connect().await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        adapter = adapter.name(),
                        "adapter unreachable, attempting scenarios anyway"
                    );
                }
                Err(e) => {
                    warn!(adapter = adapter.name(), error = %e, "connect failed");
                }
            }

            let entry = report
                .results
                .entry(adapter.name().to_string())
                .or_default();

            for scenario in &self.scenarios {
                info!(
                    adapter = adapter.name(),
                    scenario = scenario.name(),
                    "running scenario"
                );
                let outcome = match scenario.run(adapter.as_ref(), config).await {
                    Ok(metrics) => ScenarioOutcome::Metrics(metrics),
                    Err(e) => {
                        error!(
                            adapter = adapter.name(),
                            scenario = scenario.name(),
                            error = %e,
                            "scenario failed"
                        );
                        ScenarioOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                entry.insert(scenario.name().to_string(), outcome);
            }
        }

        report
    }
}
