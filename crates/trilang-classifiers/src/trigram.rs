//! Trigram extraction
//!
//! Text is lowercased, split into words (maximal runs of alphabetic code
//! points), and every word is padded with one [`BOUNDARY`] on each side
//! before a 3-character window slides across it. A word of `n` letters
//! therefore yields exactly `n` trigrams, including the edge trigrams that
//! mix the boundary with the first or last letters.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Separator used to pad each word
pub const BOUNDARY: char = ' ';

/// Three consecutive code points of normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Trigram([char; 3]);

impl Trigram {
    /// Create a trigram from three characters
    pub fn new(chars: [char; 3]) -> Self {
        Self(chars)
    }

    /// Parse a string of exactly three code points
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let trigram = [chars.next()?, chars.next()?, chars.next()?];
        if chars.next().is_some() {
            return None;
        }
        Some(Self(trigram))
    }

    /// The three characters
    pub fn chars(&self) -> [char; 3] {
        self.0
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl Serialize for Trigram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Trigram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TrigramVisitor;

        impl Visitor<'_> for TrigramVisitor {
            type Value = Trigram;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string of exactly three characters")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Trigram, E> {
                Trigram::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(TrigramVisitor)
    }
}

/// Multiset of trigrams, kept sorted so iteration order is stable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrigramCounts {
    counts: BTreeMap<Trigram, u64>,
    total: u64,
}

impl TrigramCounts {
    /// Create an empty multiset
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence
    pub fn add(&mut self, trigram: Trigram) {
        *self.counts.entry(trigram).or_insert(0) += 1;
        self.total += 1;
    }

    /// Count of a single trigram
    pub fn get(&self, trigram: &Trigram) -> u64 {
        self.counts.get(trigram).copied().unwrap_or(0)
    }

    /// Total number of occurrences
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct trigrams
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate `(trigram, count)` in trigram order
    pub fn iter(&self) -> btree_map::Iter<'_, Trigram, u64> {
        self.counts.iter()
    }

    /// Add every occurrence from another multiset
    pub fn merge(&mut self, other: &Self) {
        for (trigram, count) in &other.counts {
            *self.counts.entry(*trigram).or_insert(0) += count;
        }
        self.total += other.total;
    }
}

impl<'a> IntoIterator for &'a TrigramCounts {
    type Item = (&'a Trigram, &'a u64);
    type IntoIter = btree_map::Iter<'a, Trigram, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the lowercased words of a text
pub struct Words<I> {
    chars: I,
}

impl<I: Iterator<Item = char>> Iterator for Words<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut word = String::new();
        for c in self.chars.by_ref() {
            if c.is_alphabetic() {
                word.push(c);
            } else if !word.is_empty() {
                return Some(word);
            }
        }
        (!word.is_empty()).then_some(word)
    }
}

/// Split text into lowercased words
///
/// Lowercasing happens before segmentation, so already-lowercased input
/// segments exactly like its mixed-case original.
pub fn words(text: &str) -> Words<impl Iterator<Item = char> + '_> {
    Words {
        chars: text.chars().flat_map(char::to_lowercase),
    }
}

/// Count every trigram of a text
pub fn extract(text: &str) -> TrigramCounts {
    let mut counts = TrigramCounts::new();
    for word in words(text) {
        add_word(&mut counts, &word);
    }
    counts
}

fn add_word(counts: &mut TrigramCounts, word: &str) {
    let padded: Vec<char> = std::iter::once(BOUNDARY)
        .chain(word.chars())
        .chain(std::iter::once(BOUNDARY))
        .collect();

    for window in padded.windows(3) {
        counts.add(Trigram([window[0], window[1], window[2]]));
    }
}
