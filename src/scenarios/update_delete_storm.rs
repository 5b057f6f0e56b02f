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

//! Update/delete storm: sequentially interleaved overwrites, deletes and
//! queries against one collection, measuring query latency and stale hits.
//!
//! A query counts as stale when any returned id was already deleted at the
//! time the query was issued, so `stale_hit_rate` stays within [0, 1]. A
//! nonzero rate against a backend whose delete is a no-op (the flat
//! reference adapter) is expected, not anomalous.

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde_json::json;
use std::collections::HashSet;
use tracing::info;

use crate::adapters::VectorDb;
use crate::core::{Metadata, Result, RunConfig, ScenarioReport, Vector, VectorId};
use crate::data::synthetic_embeddings;
use crate::metrics::{compute_percentiles, DEFAULT_PERCENTILES};
use crate::utils::timing::Timer;

use super::{label_metadata, row_ids, with_collection, Scenario, NUM_CLASSES, TOP_K};

pub struct UpdateDeleteStorm;

#[async_trait]
impl Scenario for UpdateDeleteStorm {
    fn name(&self) -> &'static str {
        "update_delete_storm"
    }

    async fn run(&self, db: &dyn VectorDb, config: &RunConfig) -> Result<ScenarioReport> {
        let dim = config.dim()?;
        let seed = config.seed()?;
        let num_embeddings = config.num_embeddings()?;
        let update_ratio = config.update_ratio;
        let delete_ratio = config.delete_ratio;
        let num_queries = config.num_queries;

        let collection = self.name().to_string();
        info!(
            num_embeddings,
            update_ratio, delete_ratio, num_queries, "running storm"
        );

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

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            // Parameters are constants; construction cannot fail.
            let normal = Normal::new(0.0f32, 1.0).unwrap();

            let num_updates = (num_embeddings as f64 * update_ratio) as usize;
            let num_deletes = (num_embeddings as f64 * delete_ratio) as usize;

            let mut deleted: HashSet<VectorId> = HashSet::new();
            let mut latencies = Vec::with_capacity(num_queries);
            let mut stale_queries = 0usize;

            for _ in 0..num_queries {
                if num_updates > 0 {
                    let indices =
                        rand::seq::index::sample(&mut rng, num_embeddings, num_updates);
                    let update_ids: Vec<VectorId> =
                        indices.iter().map(|i| ids[i].clone()).collect();
                    let update_vectors: Vec<Vector> = (0..num_updates)
                        .map(|_| (0..dim).map(|_| rng.sample(normal)).collect())
                        .collect();
                    let update_metadata: Vec<Metadata> = indices
                        .iter()
                        .map(|i| {
                            let mut meta = Metadata::new();
                            meta.insert(
                                "label".to_string(),
                                json!(data.labels[i] as i64),
                            );
                            meta.insert("updated".to_string(), json!(true));
                            meta
                        })
                        .collect();
                    db.upsert(&collection, &update_ids, &update_vectors, &update_metadata)
                        .await?;
                }

                if num_deletes > 0 {
                    // Deterministic order: filter the original id sequence
                    // rather than iterating the hash set.
                    let deletable: Vec<&VectorId> =
                        ids.iter().filter(|id| !deleted.contains(*id)).collect();
                    if !deletable.is_empty() {
                        let take = num_deletes.min(deletable.len());
                        let picks =
                            rand::seq::index::sample(&mut rng, deletable.len(), take);
                        let delete_ids: Vec<VectorId> =
                            picks.iter().map(|i| deletable[i].clone()).collect();
                        db.delete(&collection, &delete_ids).await?;
                        deleted.extend(delete_ids);
                    }
                }

                let query_seed = rng.gen_range(0..100_000u64);
                let query = synthetic_embeddings(1, dim, 1, query_seed);

                let timer = Timer::start();
                let results = db
                    .query(
                        &collection,
                        std::slice::from_ref(&query.embeddings[0]),
                        TOP_K,
                        None,
                    )
                    .await?;
                latencies.push(timer.elapsed_secs());

                if results[0].iter().any(|hit| deleted.contains(&hit.id)) {
                    stale_queries += 1;
                }
            }

            let stale_hit_rate = if num_queries > 0 {
                stale_queries as f64 / num_queries as f64
            } else {
                0.0
            };

            Ok(json!({
                "query_latency_s": compute_percentiles(&latencies, &DEFAULT_PERCENTILES),
                "stale_hit_rate": stale_hit_rate,
            }))
        })
        .await
    }
}
