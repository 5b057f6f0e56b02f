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

//! Scale curve: indexing time, memory and query latency as the dataset
//! grows through a sequence of scales.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::adapters::VectorDb;
use crate::core::{Result, RunConfig, ScenarioReport};
use crate::data::synthetic_embeddings;
use crate::metrics::{compute_percentiles, DEFAULT_PERCENTILES};
use crate::utils::timing::Timer;

use super::{with_collection, Scenario, NUM_CLASSES, QUERIES_PER_SCENARIO, TOP_K};

pub struct ScaleCurve;

#[async_trait]
impl Scenario for ScaleCurve {
    fn name(&self) -> &'static str {
        "scale_curve"
    }

    async fn run(&self, db: &dyn VectorDb, config: &RunConfig) -> Result<ScenarioReport> {
        let dim = config.dim()?;
        let seed = config.seed()?;
        let scales = config.scales()?.to_vec();

        let mut results = serde_json::Map::new();
        for scale in scales {
            let collection = format!("{}_{}", self.name(), scale);
            info!(scale, collection = %collection, "measuring scale point");

            let entry = with_collection(db, &collection, dim, || async {
                let data = synthetic_embeddings(scale, dim, NUM_CLASSES, seed);
                let ids = super::row_ids(scale);
                let metadata: Vec<_> = (0..scale)
                    .map(|i| {
                        let mut meta = crate::core::Metadata::new();
                        meta.insert("i".to_string(), json!(i));
                        meta
                    })
                    .collect();

                let index_timer = Timer::start();
                db.upsert(&collection, &ids, &data.embeddings, &metadata)
                    .await?;
                let index_time_s = index_timer.elapsed_secs();

                let memory_bytes = db.memory_bytes(&collection).await?;

                let queries =
                    synthetic_embeddings(QUERIES_PER_SCENARIO, dim, NUM_CLASSES, seed + 1);
                let mut latencies = Vec::with_capacity(queries.len());
                for vector in &queries.embeddings {
                    let query_timer = Timer::start();
                    db.query(&collection, std::slice::from_ref(vector), TOP_K, None)
                        .await?;
                    latencies.push(query_timer.elapsed_secs());
                }

                Ok(json!({
                    "index_time_s": index_time_s,
                    "memory_bytes": memory_bytes,
                    "query_latency_s": compute_percentiles(&latencies, &DEFAULT_PERCENTILES),
                }))
            })
            .await?;

            results.insert(scale.to_string(), entry);
        }

        Ok(results.into())
    }
}
