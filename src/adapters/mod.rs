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

//! Backend adapter contract and reference implementations.
//!
//! Every backend integration implements [`VectorDb`]; workload logic never
//! touches a concrete backend beyond this capability set.

pub mod flat;
pub mod qdrant;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{
    CollectionOptions, Config, Metadata, MetadataFilter, QueryResult, Result, Vector, VectorId,
};

pub use flat::FlatAdapter;
pub use qdrant::QdrantAdapter;

/// Capability contract for a vector-search backend.
///
/// Contracts every implementation honors:
/// - `upsert`: `ids`, `vectors` and `metadata` must agree in length; a
///   mismatch is a caller error ([`crate::core::BenchError::InvalidArgument`]).
///   Re-upserting an existing id overwrites its vector and metadata.
/// - `query`: batched — one ranked result list per input vector, in input
///   order, nearest first by the backend's own distance convention. The
///   filter may be ignored by backends that cannot express it, but must
///   never fail the call.
/// - `delete`: removing a nonexistent id is a no-op.
/// - `memory_bytes`: `None` when the backend cannot report memory usage;
///   callers treat that as a valid outcome.
/// - `connect`: returns reachability; ordinary unreachability is
///   `Ok(false)`, not an error.
#[async_trait]
pub trait VectorDb: Send + Sync {
    fn name(&self) -> &str;

    async fn connect(&self) -> Result<bool>;

    async fn create_collection(
        &self,
        name: &str,
        dim: usize,
        opts: &CollectionOptions,
    ) -> Result<()>;

    /// Dropping a collection that does not exist is a no-op.
    async fn drop_collection(&self, name: &str) -> Result<()>;

    async fn upsert(
        &self,
        name: &str,
        ids: &[VectorId],
        vectors: &[Vector],
        metadata: &[Metadata],
    ) -> Result<()>;

    async fn query(
        &self,
        name: &str,
        vectors: &[Vector],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<QueryResult>>;

    async fn delete(&self, name: &str, ids: &[VectorId]) -> Result<()>;

    async fn memory_bytes(&self, name: &str) -> Result<Option<u64>>;

    async fn count(&self, name: &str) -> Result<usize>;
}

pub const AVAILABLE_ADAPTERS: &[&str] = &["flat", "qdrant"];

/// Instantiate an adapter by registry name, `None` for unknown names.
pub fn build_adapter(name: &str, config: &Config) -> Option<Arc<dyn VectorDb>> {
    match name {
        "flat" => Some(Arc::new(FlatAdapter::new())),
        "qdrant" => Some(Arc::new(QdrantAdapter::new(&config.qdrant.url))),
        _ => None,
    }
}
