// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Sparse lexical translation table `t(e|f)`.

use std::collections::HashMap;
use std::io::Write;

use crate::corpus::{Vocabulary, NULL_TOKEN};

/// Two-level map source word -> target word -> probability.
///
/// Lookups of pairs that are not stored return 0.0; nothing is ever
/// inserted on read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslationTable {
    probs: HashMap<String, HashMap<String, f64>>,
}

impl TranslationTable {
    /// Every (source, target) pair of the vocabulary, `NULL` included, gets
    /// `1 / |target vocabulary|`.
    pub fn uniform(vocabulary: &Vocabulary) -> Self {
        let mut probs = HashMap::with_capacity(vocabulary.source_len());
        if vocabulary.target_len() == 0 {
            return TranslationTable { probs };
        }

        let p = 1. / (vocabulary.target_len() as f64);
        for source in vocabulary.source_words() {
            let row = vocabulary
                .target_words()
                .map(|target| (target.to_owned(), p))
                .collect();
            probs.insert(source.to_owned(), row);
        }

        TranslationTable { probs }
    }

    /// M-step: `t(e|f) = count(f, e) / count(e)`.
    ///
    /// Pairs whose target column has no mass are left out of the table.
    pub fn from_counts(counts: &ExpectedCounts) -> Self {
        let mut probs: HashMap<String, HashMap<String, f64>> =
            HashMap::with_capacity(counts.pairs.len());

        for (source, row) in &counts.pairs {
            let mut new_row = HashMap::with_capacity(row.len());
            for (target, &count) in row {
                let denom = counts.target_total(target);
                if count > 0. && denom > 0. {
                    new_row.insert(target.clone(), count / denom);
                }
            }
            if !new_row.is_empty() {
                probs.insert(source.clone(), new_row);
            }
        }

        TranslationTable { probs }
    }

    /// Table holding exactly the given entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: Into<String>,
    {
        let mut probs: HashMap<String, HashMap<String, f64>> = HashMap::new();
        for (source, target, p) in entries {
            probs
                .entry(source.into())
                .or_insert_with(HashMap::new)
                .insert(target.into(), p);
        }
        TranslationTable { probs }
    }

    pub fn prob(&self, source: &str, target: &str) -> f64 {
        self.probs
            .get(source)
            .and_then(|row| row.get(target))
            .cloned()
            .unwrap_or(0.)
    }

    pub fn null_prob(&self, source: &str) -> f64 {
        self.prob(source, NULL_TOKEN)
    }

    /// Number of stored (source, target) entries.
    pub fn len(&self) -> usize {
        self.probs.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum over source words of `t(e|f)`, per target word `e`.
    pub fn column_sums(&self) -> HashMap<String, f64> {
        let mut sums: HashMap<String, f64> = HashMap::new();
        for row in self.probs.values() {
            for (target, p) in row {
                *sums.entry(target.clone()).or_insert(0.) += p;
            }
        }
        sums
    }

    /// Entries sorted by source word, then target word.
    pub fn sorted_entries(&self) -> Vec<(&str, &str, f64)> {
        let mut entries: Vec<(&str, &str, f64)> = self
            .probs
            .iter()
            .flat_map(|(source, row)| {
                row.iter()
                    .map(move |(target, &p)| (source.as_str(), target.as_str(), p))
            })
            .collect();
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        entries
    }

    /// Writes `source<TAB>target<TAB>probability` for every entry above
    /// `min_prob`.
    pub fn write_dictionary<W: Write>(&self, mut writer: W, min_prob: f64) -> std::io::Result<()> {
        for (source, target, p) in self.sorted_entries() {
            if p > min_prob {
                writeln!(writer, "{}\t{}\t{:.4}", source, target, p)?;
            }
        }
        writer.flush()
    }
}

/// Expected counts accumulated during one E-step.
#[derive(Clone, Debug, Default)]
pub struct ExpectedCounts {
    pairs: HashMap<String, HashMap<String, f64>>,
    targets: HashMap<String, f64>,
}

impl ExpectedCounts {
    pub fn new() -> Self {
        ExpectedCounts::default()
    }

    /// Adds `expected` to both the (source, target) and the target
    /// accumulator.
    pub fn add(&mut self, source: &str, target: &str, expected: f64) {
        if !self.pairs.contains_key(source) {
            self.pairs.insert(source.to_owned(), HashMap::new());
        }
        if let Some(row) = self.pairs.get_mut(source) {
            add_to(row, target, expected);
        }
        add_to(&mut self.targets, target, expected);
    }

    pub fn pair_count(&self, source: &str, target: &str) -> f64 {
        self.pairs
            .get(source)
            .and_then(|row| row.get(target))
            .cloned()
            .unwrap_or(0.)
    }

    pub fn target_total(&self, target: &str) -> f64 {
        self.targets.get(target).cloned().unwrap_or(0.)
    }
}

fn add_to(map: &mut HashMap<String, f64>, key: &str, value: f64) {
    match map.get_mut(key) {
        Some(total) => *total += value,
        None => {
            map.insert(key.to_owned(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Bitext;

    fn tiny_vocabulary() -> Vocabulary {
        Bitext::from_pairs(vec![(vec!["le", "chat"], vec!["the", "cat"])]).vocabulary()
    }

    #[test]
    fn uniform_covers_every_pair_including_null() {
        let table = TranslationTable::uniform(&tiny_vocabulary());
        assert_eq!(table.len(), 6);
        for source in &["le", "chat"] {
            for target in &["the", "cat", NULL_TOKEN] {
                assert!((table.prob(source, target) - 1. / 3.).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn missing_entries_read_as_zero() {
        let table = TranslationTable::uniform(&tiny_vocabulary());
        assert_eq!(table.prob("chien", "the"), 0.);
        assert_eq!(table.prob("le", "dog"), 0.);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn m_step_normalises_per_target() {
        let mut counts = ExpectedCounts::new();
        counts.add("le", "the", 0.75);
        counts.add("chat", "the", 0.25);
        counts.add("chat", "cat", 1.);

        let table = TranslationTable::from_counts(&counts);
        assert_eq!(table.prob("le", "the"), 0.75);
        assert_eq!(table.prob("chat", "the"), 0.25);
        assert_eq!(table.prob("chat", "cat"), 1.);
        assert_eq!(table.prob("le", "cat"), 0.);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn zero_mass_pairs_are_dropped() {
        let mut counts = ExpectedCounts::new();
        counts.add("le", "the", 0.);
        counts.add("chat", "cat", 0.5);

        let table = TranslationTable::from_counts(&counts);
        assert_eq!(table.len(), 1);
        assert!(!table.column_sums().contains_key("the"));
        assert!(table.prob("le", "the") == 0.);
    }

    #[test]
    fn dictionary_is_sorted_and_filtered() {
        let mut counts = ExpectedCounts::new();
        counts.add("le", "the", 0.9);
        counts.add("chat", "the", 0.1);
        counts.add("chat", "cat", 1.);
        let table = TranslationTable::from_counts(&counts);

        let mut out = Vec::new();
        table.write_dictionary(&mut out, 0.5).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chat\tcat\t1.0000\nle\tthe\t0.9000\n"
        );
    }
}
