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
use std::collections::{BTreeMap, HashMap};

pub type VectorId = String;
pub type Vector = Vec<f32>;

/// String-keyed record metadata, representable in plain JSON values.
pub type Metadata = HashMap<String, serde_json::Value>;

/// A single-predicate metadata filter attached to a query.
///
/// Filter support is an adapter capability, not a core guarantee: adapters
/// that cannot express the predicate accept it and ignore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub key: String,
    pub value: serde_json::Value,
}

impl MetadataFilter {
    pub fn equals(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Backend-specific collection creation knobs. Empty today; adapters take it
/// by reference so new options stay source-compatible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionOptions {
    pub extra: HashMap<String, serde_json::Value>,
}

/// One ranked search hit. Distance follows the backend's own convention
/// (nearest first in the surrounding result list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryHit {
    pub id: VectorId,
    pub distance: f32,
    pub metadata: Metadata,
}

/// Ranked hits for a single query vector, nearest first, length <= k.
pub type QueryResult = Vec<QueryHit>;

/// Metrics produced by one scenario: a JSON object of numbers, strings and
/// nested objects, so it crosses the reporting boundary without loss.
pub type ScenarioReport = serde_json::Value;

/// Outcome of one `(adapter, scenario)` pair.
///
/// Serialized untagged: a failure is `{"error": "..."}`, anything else is a
/// metrics object. The top-level `"error"` string key is therefore reserved
/// for failure records; a scenario report using it would read back as
/// [`ScenarioOutcome::Failed`]. No scenario emits that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioOutcome {
    Failed { error: String },
    Metrics(ScenarioReport),
}

impl ScenarioOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ScenarioOutcome::Failed { .. })
    }

    pub fn metrics(&self) -> Option<&ScenarioReport> {
        match self {
            ScenarioOutcome::Metrics(report) => Some(report),
            ScenarioOutcome::Failed { .. } => None,
        }
    }
}

/// Final report: adapter name -> scenario name -> metrics or error record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub results: BTreeMap<String, BTreeMap<String, ScenarioOutcome>>,
}

impl BenchmarkReport {
    pub fn outcome(&self, adapter: &str, scenario: &str) -> Option<&ScenarioOutcome> {
        self.results.get(adapter).and_then(|m| m.get(scenario))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_serializes_error_record() {
        let outcome = ScenarioOutcome::Failed {
            error: "boom".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "boom"})
        );
    }

    #[test]
    fn outcome_serializes_metrics_transparently() {
        let outcome = ScenarioOutcome::Metrics(json!({"recall@10": 0.9}));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"recall@10": 0.9})
        );
    }

    #[test]
    fn error_key_is_reserved_for_failure_records() {
        // Reading back a report, an object with a top-level "error" string
        // is a failure record; metrics objects deserialize as metrics.
        let failed: ScenarioOutcome = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert!(failed.is_error());

        let metrics: ScenarioOutcome =
            serde_json::from_value(json!({"recall@10": 0.9, "note": "ok"})).unwrap();
        assert!(metrics.metrics().is_some());
    }
}
