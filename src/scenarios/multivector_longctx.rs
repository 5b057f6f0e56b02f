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

//! Multi-vector long-context retrieval: each trial decomposes one logical
//! query into `m` sub-queries clustered near a ground-truth class, unions
//! the returned ids, and scores a hit when any unioned id's original label
//! matches the class. Latency per trial is the sum of its sub-query
//! timings.

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::adapters::VectorDb;
use crate::core::{Result, RunConfig, ScenarioReport, Vector, VectorId};
use crate::data::{class_centers, synthetic_embeddings};
use crate::metrics::{compute_percentiles, DEFAULT_PERCENTILES};
use crate::utils::timing::Timer;

use super::{
    label_metadata, row_ids, with_collection, Scenario, NUM_CLASSES, QUERIES_PER_SCENARIO,
};

/// Sub-queries retrieve a short top list each; the union across sub-queries
/// is what gets scored.
const SUB_QUERY_K: usize = 5;

pub struct MultiVectorLongContext;

#[async_trait]
impl Scenario for MultiVectorLongContext {
    fn name(&self) -> &'static str {
        "multivector_longctx"
    }

    async fn run(&self, db: &dyn VectorDb, config: &RunConfig) -> Result<ScenarioReport> {
        let dim = config.dim()?;
        let seed = config.seed()?;
        let num_embeddings = config.num_embeddings()?;
        let sub_query_counts = config.num_sub_queries.clone();

        let collection = format!("{}_base", self.name());

        with_collection(db, &collection, dim, || async {
            let data = synthetic_embeddings(num_embeddings, dim, NUM_CLASSES, seed);
            let ids = row_ids(num_embeddings);
            db.upsert(
                &collection,
                &ids,
                &data.embeddings,
                &label_metadata(&data.labels),
            )
            .await?;

            let label_by_id: HashMap<&VectorId, u32> =
                ids.iter().zip(data.labels.iter().copied()).collect();
            // Sub-queries scatter around the same seeded centers the base
            // dataset was built from.
            let centers = class_centers(NUM_CLASSES, dim, seed);
            // Parameters are constants; construction cannot fail.
            let normal = Normal::new(0.0f32, 1.0).unwrap();

            let mut results = serde_json::Map::new();
            for m in sub_query_counts {
                info!(sub_queries = m, "measuring multi-vector point");
                let mut rng = ChaCha8Rng::seed_from_u64(seed + 1 + m as u64);
                let mut latencies = Vec::with_capacity(QUERIES_PER_SCENARIO);
                let mut hits = Vec::with_capacity(QUERIES_PER_SCENARIO);

                for _ in 0..QUERIES_PER_SCENARIO {
                    let class = rng.gen_range(0..NUM_CLASSES) as u32;
                    let center = &centers[class as usize];

                    let mut trial_secs = 0.0;
                    let mut unioned: HashSet<VectorId> = HashSet::new();
                    for _ in 0..m {
                        let sub_query: Vector = center
                            .iter()
                            .map(|c| c + rng.sample(normal) * 2.0)
                            .collect();
                        let timer = Timer::start();
                        let sub_results = db
                            .query(
                                &collection,
                                std::slice::from_ref(&sub_query),
                                SUB_QUERY_K,
                                None,
                            )
                            .await?;
                        trial_secs += timer.elapsed_secs();
                        unioned.extend(sub_results[0].iter().map(|hit| hit.id.clone()));
                    }
                    latencies.push(trial_secs);

                    let hit = unioned
                        .iter()
                        .any(|id| label_by_id.get(id) == Some(&class));
                    hits.push(if hit { 1.0 } else { 0.0 });
                }

                let recall = hits.iter().sum::<f64>() / hits.len().max(1) as f64;
                results.insert(
                    m.to_string(),
                    json!({
                        "query_latency_s": compute_percentiles(&latencies, &DEFAULT_PERCENTILES),
                        "recall": recall,
                    }),
                );
            }

            Ok(results.into())
        })
        .await
    }
}
