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

//! Workload scenarios.
//!
//! A scenario is a pure function of `(adapter, config)` to a metrics
//! mapping. For a fixed `(seed, config)` and an adapter with deterministic
//! query semantics, repeated runs produce identical non-timing metrics.
//! Each scenario creates its own collections (names are scenario-specific)
//! and drops them on every exit path, including errors.

pub mod hybrid_query;
pub mod multivector_longctx;
pub mod noise_injection;
pub mod scale_curve;
pub mod update_delete_storm;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use crate::adapters::VectorDb;
use crate::core::{CollectionOptions, Metadata, QueryResult, Result, RunConfig, ScenarioReport, VectorId};

pub use hybrid_query::HybridQuery;
pub use multivector_longctx::MultiVectorLongContext;
pub use noise_injection::NoiseInjection;
pub use scale_curve::ScaleCurve;
pub use update_delete_storm::UpdateDeleteStorm;

/// Number of label classes every synthetic dataset uses.
pub const NUM_CLASSES: usize = 10;
/// Query vectors / queries / trials per scenario measurement loop.
pub const QUERIES_PER_SCENARIO: usize = 100;
/// Result count for recall-oriented queries.
pub const TOP_K: usize = 10;

#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, db: &dyn VectorDb, config: &RunConfig) -> Result<ScenarioReport>;
}

pub const AVAILABLE_SCENARIOS: &[&str] = &[
    "scale_curve",
    "noise_injection",
    "hybrid_query",
    "update_delete_storm",
    "multivector_longctx",
];

/// Instantiate a scenario by registry name, `None` for unknown names.
pub fn build_scenario(name: &str) -> Option<Arc<dyn Scenario>> {
    match name {
        "scale_curve" => Some(Arc::new(ScaleCurve)),
        "noise_injection" => Some(Arc::new(NoiseInjection)),
        "hybrid_query" => Some(Arc::new(HybridQuery)),
        "update_delete_storm" => Some(Arc::new(UpdateDeleteStorm)),
        "multivector_longctx" => Some(Arc::new(MultiVectorLongContext)),
        _ => None,
    }
}

/// All scenarios in registry order.
pub fn all_scenarios() -> Vec<Arc<dyn Scenario>> {
    AVAILABLE_SCENARIOS
        .iter()
        .map(|name| build_scenario(name).expect("registry name"))
        .collect()
}

/// Create `name`, run `body`, and drop `name` on every exit path.
///
/// The body's error wins over a cleanup error; a cleanup failure after a
/// successful body still fails the scenario, since leaking a collection
/// would violate isolation for later runs.
pub(crate) async fn with_collection<T, F, Fut>(
    db: &dyn VectorDb,
    name: &str,
    dim: usize,
    body: F,
) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    // A previous aborted process may have left the collection behind.
    let _ = db.drop_collection(name).await;
    db.create_collection(name, dim, &CollectionOptions::default())
        .await?;

    let outcome = body().await;
    let cleanup = db.drop_collection(name).await;
    let value = outcome?;
    cleanup?;
    Ok(value)
}

/// Row ids `"0".."n-1"` used by every synthetic dataset.
pub(crate) fn row_ids(n: usize) -> Vec<VectorId> {
    (0..n).map(|i| i.to_string()).collect()
}

/// One `{"label": <label>}` metadata map per row.
pub(crate) fn label_metadata(labels: &[u32]) -> Vec<Metadata> {
    labels
        .iter()
        .map(|label| {
            let mut meta = Metadata::new();
            meta.insert("label".to_string(), serde_json::json!(*label as i64));
            meta
        })
        .collect()
}

/// Labels carried in hit metadata, in rank order. Hits without a label are
/// skipped rather than failing the reduction.
pub(crate) fn labels_from_hits(hits: &QueryResult) -> Vec<i64> {
    hits.iter()
        .filter_map(|hit| hit.metadata.get("label").and_then(|v| v.as_i64()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FlatAdapter;
    use crate::core::BenchError;

    #[tokio::test]
    async fn with_collection_drops_on_success() {
        let db = FlatAdapter::new();
        with_collection(&db, "scoped", 2, || async {
            db.upsert(
                "scoped",
                &row_ids(1),
                &[vec![0.0, 0.0]],
                &label_metadata(&[0]),
            )
            .await
        })
        .await
        .unwrap();
        assert_eq!(db.count("scoped").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn with_collection_drops_on_error() {
        let db = FlatAdapter::new();
        let result: Result<()> = with_collection(&db, "scoped_err", 2, || async {
            db.upsert(
                "scoped_err",
                &row_ids(1),
                &[vec![0.0, 0.0]],
                &label_metadata(&[0]),
            )
            .await?;
            Err(BenchError::Operation("synthetic failure".to_string()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(db.count("scoped_err").await.unwrap(), 0);
    }

    #[test]
    fn registry_knows_every_scenario() {
        for name in AVAILABLE_SCENARIOS {
            let scenario = build_scenario(name).unwrap();
            assert_eq!(scenario.name(), *name);
        }
        assert!(build_scenario("nope").is_none());
    }
}
