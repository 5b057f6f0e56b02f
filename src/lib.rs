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

//! # vectorbench — deterministic stress tests for vector-search backends
//!
//! vectorbench runs repeatable synthetic workloads (scale growth, noisy
//! data, hybrid filtered queries, mutation storms, multi-vector retrieval)
//! against any backend implementing the [`adapters::VectorDb`] contract,
//! and reduces the outcomes to standard IR and latency metrics.
//!
//! ## Structure
//!
//! - [`adapters`] — the backend capability contract plus two reference
//!   implementations (in-process flat index, Qdrant REST)
//! - [`scenarios`] — the five workload algorithms
//! - [`runner`] — orchestration with per-(adapter, scenario) failure
//!   isolation
//! - [`metrics`] — percentile / recall / MRR / nDCG reductions
//! - [`data`] — seeded synthetic dataset generation
//! - [`report`] — JSON artifact writer
//!
//! ## Usage constraint
//!
//! Execution is fully sequential by design; the [`runner::Runner`] holds no
//! internal synchronization and must not be invoked concurrently.

pub mod adapters;
pub mod core;
pub mod data;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod scenarios;
pub mod utils;

pub use crate::core::{BenchError, BenchmarkReport, Config, Result, RunConfig, ScenarioOutcome};
pub use crate::runner::Runner;
