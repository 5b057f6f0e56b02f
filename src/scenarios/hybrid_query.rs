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

//! Hybrid queries: vector similarity plus an optional metadata filter.
//!
//! Each filtered query filters on the query item's own label, so a filtered
//! query has at least one true match by construction.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::adapters::VectorDb;
use crate::core::{Result, RunConfig, ScenarioReport};
use crate::data::hybrid::hybrid_queries;
use crate::data::synthetic_embeddings;
use crate::metrics::{mrr_at_k, ndcg_at_k, recall_at_k};

use super::{
    label_metadata, labels_from_hits, row_ids, with_collection, Scenario, NUM_CLASSES,
    QUERIES_PER_SCENARIO, TOP_K,
};

pub struct HybridQuery;

#[async_trait]
impl Scenario for HybridQuery {
    fn name(&self) -> &'static str {
        "hybrid_query"
    }

    async fn run(&self, db: &dyn VectorDb, config: &RunConfig) -> Result<ScenarioReport> {
        let dim = config.dim()?;
        let seed = config.seed()?;
        let num_embeddings = config.num_embeddings()?;
        let keyword_ratio = config.keyword_ratio;

        let collection = self.name().to_string();
        info!(num_embeddings, keyword_ratio, "running hybrid queries");

        with_collection(db, &collection, dim, || async {
            let data = synthetic_embeddings(num_embeddings, dim, NUM_CLASSES, seed);
            let ids = row_ids(num_embeddings);
            let metadata = label_metadata(&data.labels);
            db.upsert(&collection, &ids, &data.embeddings, &metadata)
                .await?;

            let queries = hybrid_queries(&data, QUERIES_PER_SCENARIO, keyword_ratio, seed + 1);

            let mut ground_truth = Vec::with_capacity(queries.len());
            let mut predictions = Vec::with_capacity(queries.len());
            for query in &queries {
                let hits = db
                    .query(
                        &collection,
                        std::slice::from_ref(&query.vector),
                        TOP_K,
                        query.filter.as_ref(),
                    )
                    .await?;
                ground_truth.push(query.ground_truth_label as i64);
                predictions.push(labels_from_hits(&hits[0]));
            }

            Ok(json!({
                "recall@10": recall_at_k(&ground_truth, &predictions, TOP_K),
                "mrr@10": mrr_at_k(&ground_truth, &predictions, TOP_K),
                "ndcg@10": ndcg_at_k(&ground_truth, &predictions, TOP_K),
            }))
        })
        .await
    }
}
