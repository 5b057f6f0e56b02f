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

//! Networked reference adapter for the Qdrant REST API.
//!
//! Collections are created with cosine distance; single-predicate filters
//! are translated into Qdrant's native `must[].range.gte` condition. Unlike
//! the flat adapter, `delete` performs a real removal.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::{
    BenchError, CollectionOptions, Metadata, MetadataFilter, QueryHit, QueryResult, Result, Vector,
    VectorId,
};

use super::VectorDb;

pub struct QdrantAdapter {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: Value,
    score: f32,
    #[serde(default)]
    payload: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    result: CountResult,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: usize,
}

/// Qdrant point ids are unsigned integers or UUIDs; numeric record ids are
/// sent as integers so the service accepts them.
fn point_id(id: &str) -> Value {
    id.parse::<u64>().map(Value::from).unwrap_or_else(|_| json!(id))
}

fn id_to_string(id: &Value) -> VectorId {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl QdrantAdapter {
    pub fn new(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn collection_url(&self, name: &str) -> String {
        format!("{}/collections/{}", self.base_url, name)
    }

    async fn expect_success(resp: reqwest::Response, op: &str) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(BenchError::Operation(format!("{}: {}: {}", op, status, body)))
    }

    fn translate_filter(filter: &MetadataFilter) -> Value {
        // The original encoding for single-predicate filters: a range
        // condition with gte on the filter value.
        json!({
            "must": [{
                "key": filter.key,
                "range": { "gte": filter.value }
            }]
        })
    }
}

#[async_trait]
impl VectorDb for QdrantAdapter {
    fn name(&self) -> &str {
        "qdrant"
    }

    async fn connect(&self) -> Result<bool> {
        let url = format!("{}/collections", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn create_collection(
        &self,
        name: &str,
        dim: usize,
        _opts: &CollectionOptions,
    ) -> Result<()> {
        let body = json!({
            "vectors": { "size": dim, "distance": "Cosine" }
        });
        let resp = self
            .client
            .put(self.collection_url(name))
            .json(&body)
            .send()
            .await?;
        Self::expect_success(resp, "create_collection").await?;
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.collection_url(name))
            .send()
            .await?;
        // Dropping an absent collection is a no-op, matching the contract.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::expect_success(resp, "drop_collection").await?;
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

        let points: Vec<Value> = ids
            .iter()
            .zip(vectors)
            .zip(metadata)
            .map(|((id, vector), meta)| {
                json!({
                    "id": point_id(id),
                    "vector": vector,
                    "payload": meta,
                })
            })
            .collect();

        let url = format!("{}/points?wait=true", self.collection_url(name));
        let resp = self
            .client
            .put(&url)
            .json(&json!({ "points": points }))
            .send()
            .await?;
        Self::expect_success(resp, "upsert").await?;
        Ok(())
    }

    async fn query(
        &self,
        name: &str,
        vectors: &[Vector],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<QueryResult>> {
        let url = format!("{}/points/search", self.collection_url(name));
        let query_filter = filter.map(Self::translate_filter);

        let mut results = Vec::with_capacity(vectors.len());
        for vector in vectors {
            let mut body = json!({
                "vector": vector,
                "limit": k,
                "with_payload": true,
            });
            if let Some(ref f) = query_filter {
                body["filter"] = f.clone();
            }

            let resp = self.client.post(&url).json(&body).send().await?;
            let resp = Self::expect_success(resp, "query").await?;
            let parsed: SearchResponse = resp.json().await?;
            results.push(
                parsed
                    .result
                    .into_iter()
                    .map(|hit| QueryHit {
                        id: id_to_string(&hit.id),
                        distance: hit.score,
                        metadata: hit.payload.unwrap_or_default(),
                    })
                    .collect(),
            );
        }
        Ok(results)
    }

    async fn delete(&self, name: &str, ids: &[VectorId]) -> Result<()> {
        let url = format!("{}/points/delete?wait=true", self.collection_url(name));
        let points: Vec<Value> = ids.iter().map(|id| point_id(id)).collect();
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "points": points }))
            .send()
            .await?;
        Self::expect_success(resp, "delete").await?;
        Ok(())
    }

    async fn memory_bytes(&self, _name: &str) -> Result<Option<u64>> {
        // Qdrant does not expose per-collection memory usage over the API.
        Ok(None)
    }

    async fn count(&self, name: &str) -> Result<usize> {
        let url = format!("{}/points/count", self.collection_url(name));
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "exact": true }))
            .send()
            .await?;
        let resp = Self::expect_success(resp, "count").await?;
        let parsed: CountResponse = resp.json().await?;
        Ok(parsed.result.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_become_integers() {
        assert_eq!(point_id("42"), json!(42));
        assert_eq!(point_id("doc-1"), json!("doc-1"));
    }

    #[test]
    fn hit_ids_round_trip_to_strings() {
        assert_eq!(id_to_string(&json!(42)), "42");
        assert_eq!(id_to_string(&json!("abc")), "abc");
    }

    #[test]
    fn filter_translates_to_range_gte() {
        let filter = MetadataFilter::equals("label", 3);
        let translated = QdrantAdapter::translate_filter(&filter);
        assert_eq!(
            translated,
            json!({"must": [{"key": "label", "range": {"gte": 3}}]})
        );
    }

    #[tokio::test]
    async fn connect_to_unreachable_service_is_false_not_error() {
        // Port 1 is never a Qdrant instance.
        let db = QdrantAdapter::new("http://127.0.0.1:1");
        assert!(!db.connect().await.unwrap());
    }
}
