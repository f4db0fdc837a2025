//! Randomness used by the factories and transition rules.
//!
//! Everything random in the simulation goes through [`RandomSource`] so a run
//! can be reproduced from a seed, or scripted outright in tests.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::VecDeque;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Brian", "Chloe", "Dmitri", "Elena", "Farah", "Gustavo", "Hana", "Ivan", "Jada",
    "Kenji", "Lucia", "Marcus", "Nadia", "Oscar", "Priya", "Quentin", "Rosa", "Samir", "Tessa",
];

const LAST_NAMES: &[&str] = &[
    "Anders", "Bello", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Hughes", "Ito",
    "Jensen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor", "Petrov", "Quinn", "Rossi",
    "Schmidt", "Tanaka",
];

/// Source of uniform randomness plus the derived helpers the simulation needs.
///
/// Implementors only provide [`next_u64`](RandomSource::next_u64); every other
/// method is derived from it, so a scripted sequence of raw values fully
/// determines the outcome.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform integer in `lo..=hi`. Collapses to `lo` when `hi <= lo`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        match (hi - lo).checked_add(1) {
            Some(span) => lo + self.next_u64() % span,
            None => self.next_u64(),
        }
    }

    /// True with probability `percent / 100`.
    fn chance(&mut self, percent: u8) -> bool {
        self.range(0, 99) < u64::from(percent)
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.range(0, len as u64 - 1) as usize)
    }

    /// `amount` distinct indices from `0..len`, in selection order.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        let mut pool: Vec<usize> = (0..len).collect();
        for i in 0..amount {
            let j = self.range(i as u64, len as u64 - 1) as usize;
            pool.swap(i, j);
        }
        pool.truncate(amount);
        pool
    }

    fn fill_bytes(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn word(&mut self) -> &'static str {
        WORDS[self.range(0, WORDS.len() as u64 - 1) as usize]
    }

    fn sentence(&mut self) -> String {
        let count = self.range(4, 10);
        let mut text = String::new();
        for i in 0..count {
            let word = self.word();
            if i == 0 {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    text.extend(first.to_uppercase());
                    text.push_str(chars.as_str());
                }
            } else {
                text.push(' ');
                text.push_str(word);
            }
        }
        text.push('.');
        text
    }

    fn paragraph(&mut self) -> String {
        let count = self.range(3, 6);
        (0..count)
            .map(|_| self.sentence())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn full_name(&mut self) -> String {
        let first = FIRST_NAMES[self.range(0, FIRST_NAMES.len() as u64 - 1) as usize];
        let last = LAST_NAMES[self.range(0, LAST_NAMES.len() as u64 - 1) as usize];
        format!("{first} {last}")
    }
}

/// Pick one element of `items` uniformly.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    rng.pick_index(items.len()).map(|i| &items[i])
}

// ---------------------------------------------------------------------------
// SeededRandom
// ---------------------------------------------------------------------------

/// Production source backed by `StdRng`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Seeded when `seed` is given, otherwise seeded from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}

// ---------------------------------------------------------------------------
// ScriptedRandom
// ---------------------------------------------------------------------------

/// Replays a fixed sequence of raw values, then repeats `fallback` forever.
///
/// Because [`RandomSource::range`] maps a raw value `v` to `lo + v % span`,
/// scripting `v` yields `lo + v` for any `v` smaller than the span.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    values: VecDeque<u64>,
    fallback: u64,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: u64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_u64(&mut self) -> u64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_inclusive() {
        let mut rng = SeededRandom::new(Some(7));
        for _ in 0..1_000 {
            let v = rng.range(1, 3);
            assert!((1..=3).contains(&v));
        }
        assert_eq!(rng.range(5, 5), 5);
        assert_eq!(rng.range(9, 2), 9);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(Some(42));
        let mut b = SeededRandom::new(Some(42));
        let xs: Vec<u64> = (0..16).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.next_u64()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn scripted_values_map_onto_range() {
        let mut rng = ScriptedRandom::new([2, 0]);
        assert_eq!(rng.range(1, 3), 3);
        assert_eq!(rng.range(1, 3), 1);
        assert_eq!(rng.remaining(), 0);
        assert_eq!(rng.range(1, 3), 1);
    }

    #[test]
    fn chance_respects_extremes() {
        let mut rng = SeededRandom::new(Some(3));
        assert!((0..200).all(|_| !rng.chance(0)));
        assert!((0..200).all(|_| rng.chance(100)));
    }

    #[test]
    fn sample_indices_are_distinct() {
        let mut rng = SeededRandom::new(Some(11));
        for _ in 0..100 {
            let mut picked = rng.sample_indices(6, 4);
            assert_eq!(picked.len(), 4);
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), 4);
            assert!(picked.iter().all(|i| *i < 6));
        }
        assert_eq!(rng.sample_indices(2, 5).len(), 2);
        assert!(rng.sample_indices(0, 1).is_empty());
    }

    #[test]
    fn sentence_is_capitalized_and_terminated() {
        let mut rng = SeededRandom::new(Some(1));
        let s = rng.sentence();
        assert!(s.ends_with('.'));
        assert!(s.chars().next().unwrap().is_uppercase());
        assert!(!rng.paragraph().is_empty());
    }

    #[test]
    fn pick_from_empty_is_none() {
        let mut rng = ScriptedRandom::default();
        let empty: [u8; 0] = [];
        assert!(pick(&mut rng, &empty).is_none());
        assert_eq!(pick(&mut rng, &["a", "b"]), Some(&"a"));
    }
}
