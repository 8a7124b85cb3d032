//! Adaptive, generation-based Bloom filter registry
//!
//! Writes go to the newest generation only. When its estimated FPR crosses
//! the target, a larger empty generation is appended and becomes the writable
//! one; older generations stay in the list for reads.
//!
//! INVARIANTS:
//! - Only the last entry of `generations` ever receives `add`
//! - `contains` consults every generation, historical ones included
//! - No false negatives across any number of growth events

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::bloom_filter::BloomFilter;
use super::parameters::optimal_k;
use crate::error::RegistryError;

/// Record of one growth event, returned by [`AdaptiveRegistry::add`]
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthEvent {
    /// Size of the generation that was just frozen
    pub previous_size_bits: usize,
    /// Items the frozen generation holds
    pub previous_inserted: usize,
    /// Estimated FPR that triggered growth
    pub previous_fpr: f64,
    /// Size of the newly appended generation
    pub new_size_bits: usize,
    /// Hash count of the newly appended generation
    pub new_hash_count: usize,
    /// Number of writable-file generations after the event
    pub generation_count: usize,
}

/// Point-in-time registry statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegistryStats {
    pub generations: usize,
    pub historical_generations: usize,
    pub total_bits: usize,
    pub total_inserted: usize,
    pub active_size_bits: usize,
    pub active_hash_count: usize,
    pub active_fpr: f64,
    /// Fraction of the active generation's bits that are set
    pub active_fill_ratio: f64,
}

/// Ordered list of Bloom filter generations with FPR-driven growth
#[derive(Clone, Debug)]
pub struct AdaptiveRegistry {
    target_fpr: f64,
    growth_factor: f64,
    /// Index 0 is the oldest, the last entry is active
    generations: Vec<BloomFilter>,
    /// Generations loaded from frozen files; never written back
    historical: Vec<BloomFilter>,
    backing_path: PathBuf,
}

impl AdaptiveRegistry {
    /// Create a registry with one empty generation sized for `expected_items`
    pub fn new(
        expected_items: usize,
        target_fpr: f64,
        growth_factor: f64,
        backing_path: impl Into<PathBuf>,
    ) -> Result<Self, RegistryError> {
        let initial = BloomFilter::with_capacity(expected_items, target_fpr)?;
        Self::from_generations(vec![initial], target_fpr, growth_factor, backing_path)
    }

    /// Rebuild a registry from previously persisted generations
    pub fn from_generations(
        generations: Vec<BloomFilter>,
        target_fpr: f64,
        growth_factor: f64,
        backing_path: impl Into<PathBuf>,
    ) -> Result<Self, RegistryError> {
        if generations.is_empty() {
            return Err(RegistryError::InvalidParameters(
                "a registry needs at least one generation".to_string(),
            ));
        }
        if target_fpr <= 0.0 || target_fpr >= 1.0 || target_fpr.is_nan() {
            return Err(RegistryError::InvalidParameters(format!(
                "target FPR {} must be in (0, 1)",
                target_fpr
            )));
        }
        if growth_factor <= 1.0 || !growth_factor.is_finite() {
            return Err(RegistryError::InvalidParameters(format!(
                "growth factor {} must be > 1",
                growth_factor
            )));
        }

        Ok(Self {
            target_fpr,
            growth_factor,
            generations,
            historical: Vec::new(),
            backing_path: backing_path.into(),
        })
    }

    /// Attach read-only generations from older files
    pub fn attach_historical(&mut self, generations: impl IntoIterator<Item = BloomFilter>) {
        self.historical.extend(generations);
    }

    /// Add an item to the active generation
    ///
    /// Returns the growth event if this add pushed the active generation's
    /// estimated FPR past the target.
    pub fn add(&mut self, item: &[u8]) -> Result<Option<GrowthEvent>, RegistryError> {
        let (target_fpr, growth_factor) = (self.target_fpr, self.growth_factor);
        let active = self.active_mut();
        active.add(item);

        let fpr = active.estimate_false_positive_rate();
        if fpr <= target_fpr {
            return Ok(None);
        }

        let previous_size_bits = active.size_bits();
        let previous_inserted = active.inserted_count();

        let new_m = (previous_size_bits as f64 * growth_factor).ceil() as usize;
        let new_expected = previous_inserted as f64 * growth_factor;
        let new_k = optimal_k(new_m, new_expected);
        let next = BloomFilter::new(new_m, new_k)?;

        self.generations.push(next);

        Ok(Some(GrowthEvent {
            previous_size_bits,
            previous_inserted,
            previous_fpr: fpr,
            new_size_bits: new_m,
            new_hash_count: new_k,
            generation_count: self.generations.len(),
        }))
    }

    /// Test membership across every generation
    pub fn contains(&self, item: &[u8]) -> bool {
        // Newest first: recent registrations are the likeliest hits
        self.generations
            .iter()
            .rev()
            .chain(self.historical.iter())
            .any(|generation| generation.contains(item))
    }

    /// Copy of the writable generations, without historical ones
    ///
    /// An add applied to the copy is adopted with [`commit`](Self::commit)
    /// once it has been persisted; until then readers see the old state.
    pub fn stage(&self) -> Self {
        Self {
            target_fpr: self.target_fpr,
            growth_factor: self.growth_factor,
            generations: self.generations.clone(),
            historical: Vec::new(),
            backing_path: self.backing_path.clone(),
        }
    }

    /// Adopt the writable generations of a staged copy
    pub fn commit(&mut self, staged: AdaptiveRegistry) {
        self.generations = staged.generations;
    }

    /// The writable generation
    pub fn active(&self) -> &BloomFilter {
        // `generations` is never empty: enforced in `from_generations`, only pushed to
        &self.generations[self.generations.len() - 1]
    }

    fn active_mut(&mut self) -> &mut BloomFilter {
        let last = self.generations.len() - 1;
        &mut self.generations[last]
    }

    /// Generations owned by the active file, oldest first
    pub fn generations(&self) -> &[BloomFilter] {
        &self.generations
    }

    pub fn historical(&self) -> &[BloomFilter] {
        &self.historical
    }

    pub fn target_fpr(&self) -> f64 {
        self.target_fpr
    }

    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    pub fn backing_path(&self) -> &Path {
        &self.backing_path
    }

    pub fn stats(&self) -> RegistryStats {
        let all = self.generations.iter().chain(self.historical.iter());
        let (total_bits, total_inserted) = all.fold((0, 0), |(bits, inserted), g| {
            (bits + g.size_bits(), inserted + g.inserted_count())
        });
        let active = self.active();

        RegistryStats {
            generations: self.generations.len(),
            historical_generations: self.historical.len(),
            total_bits,
            total_inserted,
            active_size_bits: active.size_bits(),
            active_hash_count: active.hash_count(),
            active_fpr: active.estimate_false_positive_rate(),
            active_fill_ratio: active.fill_ratio(),
        }
    }
}
