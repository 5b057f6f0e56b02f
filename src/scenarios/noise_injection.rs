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

//! Noise injection: recall degradation as a growing fraction of the indexed
//! rows is replaced with pure noise.
//!
//! Queries always use the original (non-noised) vectors, so against an
//! exact-search backend recall degrades monotonically with the noise ratio
//! for a fixed seed.

use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use tracing::info;

use crate::adapters::VectorDb;
use crate::core::{Result, RunConfig, ScenarioReport};
use crate::data::{inject_noise, synthetic_embeddings};
use crate::metrics::recall_at_k;

use super::{
    label_metadata, labels_from_hits, row_ids, with_collection, Scenario, NUM_CLASSES,
    QUERIES_PER_SCENARIO, TOP_K,
};

pub struct NoiseInjection;

#[async_trait]
impl Scenario for NoiseInjection {
    fn name(&self) -> &'static str {
        "noise_injection"
    }

    async fn run(&self, db: &dyn VectorDb, config: &RunConfig) -> Result<ScenarioReport> {
        let dim = config.dim()?;
        let seed = config.seed()?;
        let num_embeddings = config.num_embeddings()?;
        let noise_ratios = config.noise_ratios.clone();

        let base = synthetic_embeddings(num_embeddings, dim, NUM_CLASSES, seed);
        let ids = row_ids(num_embeddings);
        let metadata = label_metadata(&base.labels);

        // Same query set for every ratio: original vectors sampled without
        // replacement.
        let num_queries = QUERIES_PER_SCENARIO.min(num_embeddings);
        let mut sample_rng = ChaCha8Rng::seed_from_u64(seed + 1);
        let query_indices = rand::seq::index::sample(&mut sample_rng, num_embeddings, num_queries);

        let mut results = serde_json::Map::new();
        for ratio in noise_ratios {
            // Keys always carry a decimal point ("0.0", not "0"), matching
            // the report layout downstream tooling expects.
            let ratio_key = format!("{:?}", ratio);
            let collection = format!("{}_{}", self.name(), ratio_key.replace('.', "_"));
            info!(ratio, collection = %collection, "measuring noise point");

            let entry = with_collection(db, &collection, dim, || async {
                let mut noisy = base.embeddings.clone();
                inject_noise(&mut noisy, ratio, seed);
                db.upsert(&collection, &ids, &noisy, &metadata).await?;

                let mut query_labels = Vec::with_capacity(num_queries);
                let mut predictions = Vec::with_capacity(num_queries);
                for idx in query_indices.iter() {
                    query_labels.push(base.labels[idx] as i64);
                    let hits = db
                        .query(
                            &collection,
                            std::slice::from_ref(&base.embeddings[idx]),
                            TOP_K,
                            None,
                        )
                        .await?;
                    predictions.push(labels_from_hits(&hits[0]));
                }

                let recall = recall_at_k(&query_labels, &predictions, TOP_K);
                Ok(json!({ "recall@10": recall }))
            })
            .await?;

            results.insert(ratio_key, entry);
        }

        Ok(results.into())
    }
}
