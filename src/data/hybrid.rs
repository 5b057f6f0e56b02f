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

//! Hybrid (vector + metadata filter) query generation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::{MetadataFilter, Vector};

use super::SyntheticDataset;

/// A query vector drawn from the dataset, its ground-truth label, and an
/// optional label filter.
#[derive(Debug, Clone)]
pub struct HybridQuery {
    pub vector: Vector,
    pub ground_truth_label: u32,
    pub filter: Option<MetadataFilter>,
}

/// Build `num_queries` hybrid queries. Each query vector is an existing
/// dataset row; with probability `keyword_ratio` the query carries a filter
/// on that row's own label, which guarantees the filtered query has at least
/// one true match by construction.
///
/// An empty dataset has no rows to draw from and yields no queries.
pub fn hybrid_queries(
    dataset: &SyntheticDataset,
    num_queries: usize,
    keyword_ratio: f64,
    seed: u64,
) -> Vec<HybridQuery> {
    if dataset.is_empty() {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n = dataset.len();

    (0..num_queries)
        .map(|_| {
            let idx = rng.gen_range(0..n);
            let label = dataset.labels[idx];
            let filter = if rng.gen::<f64>() < keyword_ratio {
                Some(MetadataFilter::equals("label", label as i64))
            } else {
                None
            };
            HybridQuery {
                vector: dataset.embeddings[idx].clone(),
                ground_truth_label: label,
                filter,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic_embeddings;

    #[test]
    fn filters_match_the_query_items_own_label() {
        let dataset = synthetic_embeddings(100, 8, 10, 11);
        let queries = hybrid_queries(&dataset, 100, 1.0, 12);
        assert_eq!(queries.len(), 100);
        for q in &queries {
            let filter = q.filter.as_ref().expect("ratio 1.0 always filters");
            assert_eq!(filter.key, "label");
            assert_eq!(filter.value.as_i64().unwrap(), q.ground_truth_label as i64);
        }
    }

    #[test]
    fn zero_ratio_never_filters() {
        let dataset = synthetic_embeddings(100, 8, 10, 11);
        let queries = hybrid_queries(&dataset, 50, 0.0, 12);
        assert!(queries.iter().all(|q| q.filter.is_none()));
    }

    #[test]
    fn empty_dataset_yields_no_queries() {
        let dataset = synthetic_embeddings(0, 8, 10, 11);
        assert!(hybrid_queries(&dataset, 50, 0.5, 12).is_empty());
    }

    #[test]
    fn generation_is_deterministic() {
        let dataset = synthetic_embeddings(100, 8, 10, 11);
        let a = hybrid_queries(&dataset, 30, 0.5, 9);
        let b = hybrid_queries(&dataset, 30, 0.5, 9);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.vector, y.vector);
            assert_eq!(x.ground_truth_label, y.ground_truth_label);
            assert_eq!(x.filter.is_some(), y.filter.is_some());
        }
    }
}
