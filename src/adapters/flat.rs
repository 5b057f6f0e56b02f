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

//! In-process flat-index reference adapter.
//!
//! Exact nearest-neighbor search (squared L2) over an in-memory matrix.
//! Two limitations are deliberate and load-bearing for scenario behavior:
//! filters are accepted and ignored, and `delete` is a no-op — the
//! update/delete storm scenario relies on the latter to expose stale hits.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::{
    BenchError, CollectionOptions, Metadata, MetadataFilter, QueryHit, QueryResult, Result, Vector,
    VectorId,
};

use super::VectorDb;

#[derive(Debug, Default)]
struct FlatCollection {
    dim: usize,
    ids: Vec<VectorId>,
    vectors: Vec<Vector>,
    metadata: Vec<Metadata>,
    by_id: HashMap<VectorId, usize>,
}

impl FlatCollection {
    fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Default::default()
        }
    }

    fn upsert_row(&mut self, id: &str, vector: Vector, meta: Metadata) {
        match self.by_id.get(id) {
            Some(&row) => {
                self.vectors[row] = vector;
                self.metadata[row] = meta;
            }
            None => {
                let row = self.ids.len();
                self.ids.push(id.to_string());
                self.vectors.push(vector);
                self.metadata.push(meta);
                self.by_id.insert(id.to_string(), row);
            }
        }
    }

    fn search(&self, query: &[f32], k: usize) -> QueryResult {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(row, v)| (row, squared_l2(query, v)))
            .collect();
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored
            .into_iter()
            .take(k)
            .map(|(row, distance)| QueryHit {
                id: self.ids[row].clone(),
                distance,
                metadata: self.metadata[row].clone(),
            })
            .collect()
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Exact in-memory flat index satisfying [`VectorDb`].
pub struct FlatAdapter {
    name: String,
    collections: RwLock<HashMap<String, FlatCollection>>,
}

impl FlatAdapter {
    pub fn new() -> Self {
        Self::new_named("flat")
    }

    /// A distinctly named instance, for runs comparing several in-process
    /// configurations side by side.
    pub fn new_named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for FlatAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorDb for FlatAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<bool> {
        // Always reachable: the index lives in this process.
        Ok(true)
    }

    async fn create_collection(
        &self,
        name: &str,
        dim: usize,
        _opts: &CollectionOptions,
    ) -> Result<()> {
        self.collections
            .write()
            .insert(name.to_string(), FlatCollection::new(dim));
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> Result<()> {
        self.collections.write().remove(name);
        Ok(())
    }

    async fn upsert(
        &self,
        name: &str,
        ids: &[VectorId],
        vectors: &[Vector],
        metadata: &[Metadata],
    ) -> Result<()> {
        if ids.len() != vectors.len() || ids.len() != metadata.len() {
            return Err(BenchError::InvalidArgument(format!(
                "upsert length mismatch: {} ids, {} vectors, {} metadata",
                ids.len(),
                vectors.len(),
                metadata.len()
            )));
        }

        let mut collections = self.collections.write();
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| BenchError::Operation(format!("collection not found: {}", name)))?;

        // Validate every row before touching the matrix so a bad batch
        // cannot leave a partial upsert behind.
        if let Some(bad) = vectors.iter().find(|v| v.len() != collection.dim) {
            return Err(BenchError::InvalidArgument(format!(
                "vector dimensionality {} does not match collection dimension {}",
                bad.len(),
                collection.dim
            )));
        }

        for ((id, vector), meta) in ids.iter().zip(vectors).zip(metadata) {
            collection.upsert_row(id, vector.clone(), meta.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        name: &str,
        vectors: &[Vector],
        k: usize,
        _filter: Option<&MetadataFilter>,
    ) -> Result<Vec<QueryResult>> {
        // Filters are accepted and ignored: flat scan has no predicate support.
        let collections = self.collections.read();
        let collection = collections
            .get(name)
            .ok_or_else(|| BenchError::Operation(format!("collection not found: {}", name)))?;

        let mut results = Vec::with_capacity(vectors.len());
        for query in vectors {
            if query.len() != collection.dim {
                return Err(BenchError::InvalidArgument(format!(
                    "query dimensionality {} does not match collection dimension {}",
                    query.len(),
                    collection.dim
                )));
            }
            results.push(collection.search(query, k));
        }
        Ok(results)
    }

    async fn delete(&self, _name: &str, _ids: &[VectorId]) -> Result<()> {
        // Documented no-op: a flat scan index has no tombstone support, the
        // same limitation FAISS IndexFlatL2 exposes. The storm scenario's
        // stale-hit metric exists to surface exactly this.
        Ok(())
    }

    async fn memory_bytes(&self, name: &str) -> Result<Option<u64>> {
        let collections = self.collections.read();
        let bytes = collections
            .get(name)
            .map(|c| (c.vectors.len() * c.dim * std::mem::size_of::<f32>()) as u64)
            .unwrap_or(0);
        Ok(Some(bytes))
    }

    async fn count(&self, name: &str) -> Result<usize> {
        let collections = self.collections.read();
        Ok(collections.get(name).map(|c| c.ids.len()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(label: i64) -> Metadata {
        let mut m = Metadata::new();
        m.insert("label".to_string(), json!(label));
        m
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let db = FlatAdapter::new();
        db.create_collection("c", 2, &CollectionOptions::default())
            .await
            .unwrap();
        db.upsert("c", &["a".into()], &[vec![0.0, 0.0]], &[meta(1)])
            .await
            .unwrap();
        db.upsert("c", &["a".into()], &[vec![1.0, 1.0]], &[meta(2)])
            .await
            .unwrap();

        assert_eq!(db.count("c").await.unwrap(), 1);
        let hits = db.query("c", &[vec![1.0, 1.0]], 1, None).await.unwrap();
        assert_eq!(hits[0][0].id, "a");
        assert_eq!(hits[0][0].metadata["label"], json!(2));
    }

    #[tokio::test]
    async fn query_returns_nearest_first() {
        let db = FlatAdapter::new();
        db.create_collection("c", 2, &CollectionOptions::default())
            .await
            .unwrap();
        db.upsert(
            "c",
            &["far".into(), "near".into()],
            &[vec![10.0, 10.0], vec![0.1, 0.1]],
            &[meta(0), meta(1)],
        )
        .await
        .unwrap();

        let results = db.query("c", &[vec![0.0, 0.0]], 2, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0][0].id, "near");
        assert!(results[0][0].distance <= results[0][1].distance);
    }

    #[tokio::test]
    async fn batched_query_preserves_input_order() {
        let db = FlatAdapter::new();
        db.create_collection("c", 1, &CollectionOptions::default())
            .await
            .unwrap();
        db.upsert(
            "c",
            &["lo".into(), "hi".into()],
            &[vec![0.0], vec![100.0]],
            &[meta(0), meta(1)],
        )
        .await
        .unwrap();

        let results = db
            .query("c", &[vec![0.0], vec![100.0]], 1, None)
            .await
            .unwrap();
        assert_eq!(results[0][0].id, "lo");
        assert_eq!(results[1][0].id, "hi");
    }

    #[tokio::test]
    async fn delete_is_a_noop() {
        let db = FlatAdapter::new();
        db.create_collection("c", 1, &CollectionOptions::default())
            .await
            .unwrap();
        db.upsert("c", &["a".into()], &[vec![0.0]], &[meta(0)])
            .await
            .unwrap();
        db.delete("c", &["a".into()]).await.unwrap();
        assert_eq!(db.count("c").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn filter_is_accepted_and_ignored() {
        let db = FlatAdapter::new();
        db.create_collection("c", 1, &CollectionOptions::default())
            .await
            .unwrap();
        db.upsert("c", &["a".into()], &[vec![0.0]], &[meta(3)])
            .await
            .unwrap();
        let filter = MetadataFilter::equals("label", 999);
        let results = db.query("c", &[vec![0.0]], 1, Some(&filter)).await.unwrap();
        assert_eq!(results[0].len(), 1);
    }

    #[tokio::test]
    async fn upsert_length_mismatch_is_invalid_argument() {
        let db = FlatAdapter::new();
        db.create_collection("c", 1, &CollectionOptions::default())
            .await
            .unwrap();
        let err = db
            .upsert("c", &["a".into(), "b".into()], &[vec![0.0]], &[meta(0)])
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let db = FlatAdapter::new();
        db.create_collection("c", 3, &CollectionOptions::default())
            .await
            .unwrap();
        let err = db
            .upsert("c", &["a".into()], &[vec![0.0, 1.0]], &[meta(0)])
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn memory_bytes_tracks_matrix_size() {
        let db = FlatAdapter::new();
        db.create_collection("c", 4, &CollectionOptions::default())
            .await
            .unwrap();
        db.upsert(
            "c",
            &["a".into(), "b".into()],
            &[vec![0.0; 4], vec![1.0; 4]],
            &[meta(0), meta(1)],
        )
        .await
        .unwrap();
        assert_eq!(db.memory_bytes("c").await.unwrap(), Some(2 * 4 * 4));
    }

    #[tokio::test]
    async fn count_of_missing_collection_is_zero() {
        let db = FlatAdapter::new();
        assert_eq!(db.count("nope").await.unwrap(), 0);
    }
}
