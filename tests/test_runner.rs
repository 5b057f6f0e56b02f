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

//! Runner orchestration and failure-isolation behavior.

use async_trait::async_trait;
use std::sync::Arc;

use vectorbench::adapters::{FlatAdapter, VectorDb};
use vectorbench::core::{BenchError, Result, RunConfig, ScenarioReport};
use vectorbench::scenarios::{build_scenario, Scenario};
use vectorbench::Runner;

fn base_config() -> RunConfig {
    RunConfig {
        dim: Some(8),
        seed: Some(7),
        num_embeddings: Some(120),
        scales: Some(vec![50]),
        num_queries: 5,
        num_sub_queries: vec![2],
        ..RunConfig::default()
    }
}

struct AlwaysFails;

#[async_trait]
impl Scenario for AlwaysFails {
    fn name(&self) -> &'static str {
        "always_fails"
    }

    async fn run(&self, _db: &dyn VectorDb, _config: &RunConfig) -> Result<ScenarioReport> {
        Err(BenchError::Operation("engineered failure".to_string()))
    }
}

#[tokio::test]
async fn one_failing_scenario_never_poisons_the_rest() {
    let adapters: Vec<Arc<dyn VectorDb>> = vec![Arc::new(FlatAdapter::new())];
    let scenarios: Vec<Arc<dyn Scenario>> = vec![
        build_scenario("hybrid_query").unwrap(),
        Arc::new(AlwaysFails),
        build_scenario("noise_injection").unwrap(),
    ];

    let report = Runner::new(adapters, scenarios).run(&base_config()).await;

    let failing = report.outcome("flat", "always_fails").unwrap();
    assert!(failing.is_error());
    let json = serde_json::to_value(failing).unwrap();
    let message = json["error"].as_str().unwrap();
    assert!(!message.is_empty());

    for name in ["hybrid_query", "noise_injection"] {
        let outcome = report.outcome("flat", name).unwrap();
        assert!(outcome.metrics().is_some(), "{} should have metrics", name);
    }
}

#[tokio::test]
async fn missing_config_key_fails_only_that_scenario() {
    let adapters: Vec<Arc<dyn VectorDb>> = vec![Arc::new(FlatAdapter::new())];
    let scenarios: Vec<Arc<dyn Scenario>> = vec![
        build_scenario("scale_curve").unwrap(),
        build_scenario("hybrid_query").unwrap(),
    ];
    let config = RunConfig {
        scales: None,
        ..base_config()
    };

    let report = Runner::new(adapters, scenarios).run(&config).await;

    let scale = report.outcome("flat", "scale_curve").unwrap();
    assert!(scale.is_error());
    let json = serde_json::to_value(scale).unwrap();
    assert!(json["error"].as_str().unwrap().contains("scales"));

    let hybrid = report.outcome("flat", "hybrid_query").unwrap();
    assert!(hybrid.metrics().is_some());
}

#[tokio::test]
async fn every_pair_is_reported() {
    let adapters: Vec<Arc<dyn VectorDb>> = vec![
        Arc::new(FlatAdapter::new()),
        Arc::new(FlatAdapter::new_named("flat2")),
    ];
    let scenarios: Vec<Arc<dyn Scenario>> = vec![
        build_scenario("hybrid_query").unwrap(),
        build_scenario("update_delete_storm").unwrap(),
    ];

    let report = Runner::new(adapters, scenarios).run(&base_config()).await;

    assert_eq!(report.results.len(), 2);
    for adapter in ["flat", "flat2"] {
        for scenario in ["hybrid_query", "update_delete_storm"] {
            assert!(report.outcome(adapter, scenario).is_some());
        }
    }
}
