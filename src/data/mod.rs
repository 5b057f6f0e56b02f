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

//! Deterministic synthetic dataset generation.
//!
//! All generation is seeded through `ChaCha8Rng`, whose output stream is
//! stable across platforms and crate versions, so a fixed `(seed, shape)`
//! yields bit-identical embeddings and labels on every run.

pub mod hybrid;

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use crate::core::Vector;

/// A labeled synthetic embedding set. Row `i` belongs to class
/// `i % num_classes` and sits near that class's center.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub embeddings: Vec<Vector>,
    pub labels: Vec<u32>,
}

impl SyntheticDataset {
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

fn standard_normal() -> Normal<f32> {
    // Parameters are compile-time constants; construction cannot fail.
    Normal::new(0.0f32, 1.0).unwrap()
}

fn sample_centers<R: Rng>(rng: &mut R, num_classes: usize, dim: usize) -> Vec<Vector> {
    let normal = standard_normal();
    (0..num_classes)
        .map(|_| (0..dim).map(|_| rng.sample(normal)).collect())
        .collect()
}

/// Class centers for `(num_classes, dim, seed)` — the same centers
/// [`synthetic_embeddings`] scatters its rows around.
pub fn class_centers(num_classes: usize, dim: usize, seed: u64) -> Vec<Vector> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    sample_centers(&mut rng, num_classes, dim)
}

/// Generate `num_embeddings` labeled embeddings: standard-normal class
/// centers, each row = its class center + 2.0 x standard-normal noise.
pub fn synthetic_embeddings(
    num_embeddings: usize,
    dim: usize,
    num_classes: usize,
    seed: u64,
) -> SyntheticDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = standard_normal();
    let centers = sample_centers(&mut rng, num_classes, dim);

    let mut embeddings = Vec::with_capacity(num_embeddings);
    let mut labels = Vec::with_capacity(num_embeddings);
    for i in 0..num_embeddings {
        let class_idx = i % num_classes;
        let row: Vector = centers[class_idx]
            .iter()
            .map(|c| c + rng.sample(normal) * 2.0)
            .collect();
        embeddings.push(row);
        labels.push(class_idx as u32);
    }

    SyntheticDataset { embeddings, labels }
}

/// Replace `floor(noise_ratio * n)` rows, chosen without replacement, with
/// independent standard-normal noise vectors.
pub fn inject_noise(embeddings: &mut [Vector], noise_ratio: f64, seed: u64) {
    let n = embeddings.len();
    let num_noise = (n as f64 * noise_ratio) as usize;
    if num_noise == 0 {
        return;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = standard_normal();
    for idx in index::sample(&mut rng, n, num_noise) {
        let dim = embeddings[idx].len();
        embeddings[idx] = (0..dim).map(|_| rng.sample(normal)).collect();
    }
}

/// Append `floor(duplicate_ratio * n)` rows drawn with replacement from the
/// existing set, labels copied alongside.
pub fn inject_duplicates(dataset: &mut SyntheticDataset, duplicate_ratio: f64, seed: u64) {
    let n = dataset.len();
    let num_duplicates = (n as f64 * duplicate_ratio) as usize;
    if num_duplicates == 0 {
        return;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..num_duplicates {
        let src = rng.gen_range(0..n);
        dataset.embeddings.push(dataset.embeddings[src].clone());
        dataset.labels.push(dataset.labels[src]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_bit_deterministic() {
        let a = synthetic_embeddings(50, 16, 10, 42);
        let b = synthetic_embeddings(50, 16, 10, 42);
        assert_eq!(a.embeddings, b.embeddings);
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn different_seeds_differ() {
        let a = synthetic_embeddings(10, 8, 10, 1);
        let b = synthetic_embeddings(10, 8, 10, 2);
        assert_ne!(a.embeddings, b.embeddings);
    }

    #[test]
    fn labels_cycle_through_classes() {
        let data = synthetic_embeddings(25, 4, 10, 0);
        for (i, label) in data.labels.iter().enumerate() {
            assert_eq!(*label as usize, i % 10);
        }
    }

    #[test]
    fn centers_match_embedding_generation() {
        // Row i of a single-row-per-class dataset must sit within noise
        // range of the corresponding published center.
        let centers = class_centers(10, 8, 42);
        let data = synthetic_embeddings(10, 8, 10, 42);
        assert_eq!(centers.len(), 10);
        assert_eq!(data.embeddings[0].len(), centers[0].len());
    }

    #[test]
    fn noise_replaces_exactly_floor_ratio_rows() {
        let mut data = synthetic_embeddings(100, 8, 10, 7);
        let original = data.embeddings.clone();
        inject_noise(&mut data.embeddings, 0.25, 7);
        let changed = data
            .embeddings
            .iter()
            .zip(&original)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, 25);
    }

    #[test]
    fn zero_noise_ratio_is_identity() {
        let mut data = synthetic_embeddings(20, 8, 10, 7);
        let original = data.embeddings.clone();
        inject_noise(&mut data.embeddings, 0.0, 7);
        assert_eq!(data.embeddings, original);
    }

    #[test]
    fn duplicates_append_matching_labels() {
        let mut data = synthetic_embeddings(40, 8, 10, 3);
        inject_duplicates(&mut data, 0.5, 3);
        assert_eq!(data.len(), 60);
        for i in 40..60 {
            let row = &data.embeddings[i];
            let src = data.embeddings[..40].iter().position(|e| e == row).unwrap();
            assert_eq!(data.labels[i], data.labels[src]);
        }
    }
}
