//! Frequency profiles and the similarity metric
//!
//! Profiles are sparse: only observed trigrams are stored. Comparison uses
//! the Euclidean distance between the square roots of the two frequency
//! vectors. Frequencies sum to 1, so the root vectors have unit length and
//! a trigram seen on one side only adds exactly its frequency to the
//! squared distance. The square root damps the handful of trigrams every
//! language shares (`"en "`, `" th"`) so that the rarer, telling ones count.
//! The distance lies in `[0, sqrt(2)]`, which is the ceiling used to turn
//! it into a similarity in `[0, 1]`.

use crate::trigram::{Trigram, TrigramCounts};
use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use trilang_core::{Error, Result};

/// Allowed drift of a serialized profile's total from 1.0
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Distance between profiles with no trigram in common
pub const MAX_DISTANCE: f64 = std::f64::consts::SQRT_2;

/// Relative trigram frequencies summing to 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyProfile {
    frequencies: BTreeMap<Trigram, f64>,
}

impl FrequencyProfile {
    /// Normalize raw counts; empty counts give an empty profile
    pub fn from_counts(counts: &TrigramCounts) -> Self {
        let total = counts.total();
        if total == 0 {
            return Self {
                frequencies: BTreeMap::new(),
            };
        }

        let total = total as f64;
        let frequencies = counts
            .iter()
            .map(|(trigram, count)| (*trigram, *count as f64 / total))
            .collect();
        Self { frequencies }
    }

    /// Validate frequencies loaded from reference data
    ///
    /// # Errors
    ///
    /// Returns an error if the map is empty, a frequency is not a finite
    /// positive number, or the total is not 1.0 within [`SUM_TOLERANCE`].
    pub fn from_frequencies(frequencies: BTreeMap<Trigram, f64>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::profile("profile has no trigrams"));
        }

        for (trigram, frequency) in &frequencies {
            if !frequency.is_finite() || *frequency <= 0.0 {
                return Err(Error::profile(format!(
                    "trigram '{}' has invalid frequency {}",
                    trigram, frequency
                )));
            }
        }

        let sum: f64 = frequencies.values().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(Error::profile(format!(
                "frequencies sum to {} instead of 1.0",
                sum
            )));
        }

        // Absorb decimal rounding from the serialized form
        let frequencies = frequencies
            .into_iter()
            .map(|(trigram, frequency)| (trigram, frequency / sum))
            .collect();
        Ok(Self { frequencies })
    }

    /// Frequency of a trigram, 0.0 when unseen
    pub fn get(&self, trigram: &Trigram) -> f64 {
        self.frequencies.get(trigram).copied().unwrap_or(0.0)
    }

    /// Number of trigrams with non-zero frequency
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterate `(trigram, frequency)` in trigram order
    pub fn iter(&self) -> btree_map::Iter<'_, Trigram, f64> {
        self.frequencies.iter()
    }

    pub(crate) fn frequencies(&self) -> &BTreeMap<Trigram, f64> {
        &self.frequencies
    }
}

/// Euclidean distance between the square-root frequency vectors
///
/// Walks the union of both sorted key sets once. A trigram present on only
/// one side contributes its frequency to the squared sum. Profiles sharing
/// no trigram are exactly [`MAX_DISTANCE`] apart, as is an empty profile
/// from everything, so unrelated languages tie at a similarity of 0.0
/// instead of at rounding noise.
pub fn distance(a: &FrequencyProfile, b: &FrequencyProfile) -> f64 {
    if a.is_empty() || b.is_empty() {
        return MAX_DISTANCE;
    }

    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();
    let mut sum = 0.0;
    let mut shared = false;

    loop {
        let term = match (left.peek(), right.peek()) {
            (Some((lt, lf)), Some((rt, rf))) => match lt.cmp(rt) {
                Ordering::Less => {
                    let d = **lf;
                    left.next();
                    d
                }
                Ordering::Greater => {
                    let d = **rf;
                    right.next();
                    d
                }
                Ordering::Equal => {
                    let d = lf.sqrt() - rf.sqrt();
                    shared = true;
                    left.next();
                    right.next();
                    d * d
                }
            },
            (Some((_, lf)), None) => {
                let d = **lf;
                left.next();
                d
            }
            (None, Some((_, rf))) => {
                let d = **rf;
                right.next();
                d
            }
            (None, None) => break,
        };
        sum += term;
    }

    if !shared {
        return MAX_DISTANCE;
    }
    sum.sqrt().min(MAX_DISTANCE)
}

/// Similarity in `[0, 1]`, higher is closer
pub fn similarity(a: &FrequencyProfile, b: &FrequencyProfile) -> f64 {
    (1.0 - distance(a, b) / MAX_DISTANCE).clamp(0.0, 1.0)
}
