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

//! Pure reduction functions for latency and retrieval quality.
//!
//! Degenerate inputs (empty samples, empty prediction sets) reduce to 0.0
//! rather than erroring: an empty result set is a valid benchmark outcome.
//!
//! Retrieval metrics use the single-relevant-item form: every query has
//! exactly one true label, so the ideal DCG is 1 and recall per query is a
//! 0/1 hit.

use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const DEFAULT_PERCENTILES: [u8; 3] = [50, 95, 99];

/// Percentiles by linear interpolation at fractional rank `p/100 * (n-1)`,
/// keyed `p{n}`. Empty input yields 0.0 for every requested percentile.
pub fn compute_percentiles(data: &[f64], percentiles: &[u8]) -> BTreeMap<String, f64> {
    if data.is_empty() {
        return percentiles
            .iter()
            .map(|p| (format!("p{}", p), 0.0))
            .collect();
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();

    percentiles
        .iter()
        .map(|&p| {
            let rank = f64::from(p) / 100.0 * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = rank - lo as f64;
            let value = sorted[lo] + (sorted[hi] - sorted[lo]) * frac;
            (format!("p{}", p), value)
        })
        .collect()
}

/// Fraction of queries whose true label appears in the top-k predictions.
pub fn recall_at_k<T: PartialEq>(y_true: &[T], y_pred: &[Vec<T>], k: usize) -> f64 {
    if y_true.is_empty() || y_pred.is_empty() {
        return 0.0;
    }
    debug_assert_eq!(y_true.len(), y_pred.len());

    let hits = y_true
        .iter()
        .zip(y_pred)
        .filter(|(truth, preds)| preds.iter().take(k).any(|p| p == *truth))
        .count();
    hits as f64 / y_true.len() as f64
}

/// Mean reciprocal rank of the first correct hit within the top-k, 0 when
/// absent.
pub fn mrr_at_k<T: PartialEq>(y_true: &[T], y_pred: &[Vec<T>], k: usize) -> f64 {
    if y_true.is_empty() || y_pred.is_empty() {
        return 0.0;
    }
    debug_assert_eq!(y_true.len(), y_pred.len());

    let total: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(truth, preds)| {
            match preds.iter().take(k).position(|p| p == truth) {
                Some(rank) => 1.0 / (rank + 1) as f64,
                None => 0.0,
            }
        })
        .sum();
    total / y_true.len() as f64
}

/// nDCG@k, single-relevant-item form: `1 / log2(rank + 1)` for the true
/// item's 1-based rank within the top-k, 0 when absent, ideal DCG of 1.
pub fn ndcg_at_k<T: PartialEq>(y_true: &[T], y_pred: &[Vec<T>], k: usize) -> f64 {
    if y_true.is_empty() || y_pred.is_empty() {
        return 0.0;
    }
    debug_assert_eq!(y_true.len(), y_pred.len());

    let total: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(truth, preds)| {
            match preds.iter().take(k).position(|p| p == truth) {
                Some(rank) => 1.0 / ((rank + 2) as f64).log2(),
                None => 0.0,
            }
        })
        .sum();
    total / y_true.len() as f64
}
