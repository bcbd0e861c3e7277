// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Expectation-Maximisation over the lexical table, with the positional
//! heuristics folded into the E-step.

use tracing::{debug, info};

use crate::bias::BiasConfig;
use crate::corpus::{Bitext, SentencePair, NULL_TOKEN};
use crate::table::{ExpectedCounts, TranslationTable};

/// Where a [`Trainer`] is in its fixed-length run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainerState {
    Uninitialized,
    /// Uniform table, no iteration run yet.
    Initialized,
    /// `k` iterations completed, more to go.
    Iterating(usize),
    Converged,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationStats {
    pub iteration: usize,
    /// Sum of `ln(total)` over all source tokens with non-zero mass.
    pub log_likelihood: f64,
    /// Entries in the table produced by this iteration.
    pub entries: usize,
}

/// Runs a fixed number of EM iterations. There is no convergence test;
/// reaching the configured count is the terminal state.
pub struct Trainer<'a> {
    bitext: &'a Bitext,
    bias: BiasConfig,
    iterations: usize,
    table: TranslationTable,
    state: TrainerState,
    history: Vec<IterationStats>,
}

impl<'a> Trainer<'a> {
    pub fn new(bitext: &'a Bitext, bias: BiasConfig, iterations: usize) -> Self {
        Trainer {
            bitext,
            bias,
            iterations,
            table: TranslationTable::default(),
            state: TrainerState::Uninitialized,
            history: Vec::with_capacity(iterations),
        }
    }

    /// Builds the uniform table. Calling it again restarts the run.
    pub fn initialize(&mut self) {
        let vocabulary = self.bitext.vocabulary();
        self.table = TranslationTable::uniform(&vocabulary);
        self.history.clear();
        self.state = if self.iterations == 0 {
            TrainerState::Converged
        } else {
            TrainerState::Initialized
        };

        info!(
            sentences = self.bitext.len(),
            source_vocabulary = vocabulary.source_len(),
            target_vocabulary = vocabulary.target_len(),
            iterations = self.iterations,
            "initialized translation table"
        );
    }

    /// Runs one iteration. Returns `None` once the run has converged.
    pub fn step(&mut self) -> Option<IterationStats> {
        let done = match self.state {
            TrainerState::Uninitialized => {
                self.initialize();
                return self.step();
            }
            TrainerState::Initialized => 0,
            TrainerState::Iterating(k) => k,
            TrainerState::Converged => return None,
        };

        let (counts, log_likelihood) = expected_counts(self.bitext, &self.table, &self.bias);
        self.table = TranslationTable::from_counts(&counts);

        let iteration = done + 1;
        let stats = IterationStats {
            iteration,
            log_likelihood,
            entries: self.table.len(),
        };
        debug!(iteration, log_likelihood, entries = stats.entries, "EM iteration");

        self.history.push(stats);
        self.state = if iteration >= self.iterations {
            TrainerState::Converged
        } else {
            TrainerState::Iterating(iteration)
        };
        Some(stats)
    }

    /// Runs every remaining iteration and hands back the final table.
    pub fn train(mut self) -> TranslationTable {
        while self.step().is_some() {}
        self.table
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn history(&self) -> &[IterationStats] {
        &self.history
    }
}

/// E-step over the whole bitext against a fixed table.
///
/// Returns the accumulated counts and the log-likelihood of the corpus
/// under `table`.
pub fn expected_counts(
    bitext: &Bitext,
    table: &TranslationTable,
    bias: &BiasConfig,
) -> (ExpectedCounts, f64) {
    let mut counts = ExpectedCounts::new();
    let mut log_likelihood = 0.;

    for pair in bitext.pairs() {
        log_likelihood += accumulate_pair(pair, table, bias, &mut counts);
    }

    (counts, log_likelihood)
}

fn accumulate_pair(
    pair: &SentencePair,
    table: &TranslationTable,
    bias: &BiasConfig,
    counts: &mut ExpectedCounts,
) -> f64 {
    let f_len = pair.source.len();
    let e_len = pair.target.len();
    let weights_bias = bias.matrix(f_len, e_len);

    // weights[0] is NULL, weights[j + 1] is target word j
    let mut weights: Vec<f64> = Vec::with_capacity(e_len + 1);
    let mut log_likelihood = 0.;

    for (i, f_word) in pair.source.iter().enumerate() {
        weights.clear();
        weights.push(table.null_prob(f_word));
        for (j, e_word) in pair.target.iter().enumerate() {
            weights.push(table.prob(f_word, e_word) * weights_bias[[i, j]]);
        }

        let total: f64 = weights.iter().sum();
        if !(total > 0.) {
            continue;
        }
        log_likelihood += total.ln();

        counts.add(f_word, NULL_TOKEN, weights[0] / total);
        for (j, e_word) in pair.target.iter().enumerate() {
            counts.add(f_word, e_word, weights[j + 1] / total);
        }
    }

    log_likelihood
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::Variant;

    fn le_chat() -> Bitext {
        Bitext::from_pairs(vec![(vec!["le", "chat"], vec!["the", "cat"])])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn walks_through_states() {
        let bitext = le_chat();
        let mut trainer = Trainer::new(&bitext, BiasConfig::lexical(), 2);
        assert_eq!(trainer.state(), TrainerState::Uninitialized);

        trainer.initialize();
        assert_eq!(trainer.state(), TrainerState::Initialized);

        assert_eq!(trainer.step().map(|s| s.iteration), Some(1));
        assert_eq!(trainer.state(), TrainerState::Iterating(1));

        assert_eq!(trainer.step().map(|s| s.iteration), Some(2));
        assert_eq!(trainer.state(), TrainerState::Converged);

        assert_eq!(trainer.step(), None);
        assert_eq!(trainer.history().len(), 2);
    }

    #[test]
    fn step_initializes_lazily() {
        let bitext = le_chat();
        let mut trainer = Trainer::new(&bitext, BiasConfig::lexical(), 1);
        assert!(trainer.step().is_some());
        assert_eq!(trainer.state(), TrainerState::Converged);
    }

    #[test]
    fn zero_iterations_keeps_uniform_table() {
        let bitext = le_chat();
        let table = Trainer::new(&bitext, BiasConfig::default(), 0).train();
        assert_close(table.prob("le", "cat"), 1. / 3.);
        assert_close(table.null_prob("chat"), 1. / 3.);
    }

    #[test]
    fn one_lexical_iteration_by_hand() {
        // Uniform 1/3 over {NULL, the, cat}; each source word spreads one
        // unit of mass evenly, so every target column holds 2/3 split in
        // halves.
        let bitext = le_chat();
        let table = Trainer::new(&bitext, BiasConfig::lexical(), 1).train();

        for source in &["le", "chat"] {
            for target in &["NULL", "the", "cat"] {
                assert_close(table.prob(source, target), 0.5);
            }
        }
    }

    #[test]
    fn diagonal_bias_pulls_mass_onto_the_diagonal() {
        let bitext = le_chat();
        let bias = BiasConfig::for_variant(Variant::DiagOnly, 0.3).unwrap();
        let table = Trainer::new(&bitext, bias, 1).train();

        assert!(table.prob("le", "the") > 0.99);
        assert!(table.prob("chat", "cat") > 0.99);
        assert!(table.prob("le", "cat") < 0.01);
        assert_close(table.null_prob("le"), 0.5);
    }

    #[test]
    fn columns_sum_to_one_after_m_step() {
        let bitext = Bitext::from_pairs(vec![
            (vec!["la", "maison", "bleue"], vec!["the", "blue", "house"]),
            (vec!["la", "fleur"], vec!["the", "flower"]),
            (vec!["maison"], vec!["house", "home"]),
        ]);
        let table = Trainer::new(&bitext, BiasConfig::default(), 3).train();

        let sums = table.column_sums();
        assert_eq!(sums.len(), 6);
        for (target, sum) in sums {
            assert!((sum - 1.).abs() < 1e-9, "column {} sums to {}", target, sum);
        }
    }

    #[test]
    fn log_likelihood_does_not_decrease_without_bias() {
        let bitext = Bitext::from_pairs(vec![
            (vec!["la", "maison"], vec!["the", "house"]),
            (vec!["la", "fleur"], vec!["the", "flower"]),
            (vec!["une", "maison"], vec!["a", "house"]),
        ]);
        let mut trainer = Trainer::new(&bitext, BiasConfig::lexical(), 5);
        while trainer.step().is_some() {}

        // The uniform start is not normalised per target, so compare from
        // the first re-estimated table onwards.
        let history = trainer.history();
        for pair in history[1..].windows(2) {
            assert!(pair[1].log_likelihood >= pair[0].log_likelihood - 1e-12);
        }
    }

    #[test]
    fn zero_mass_source_words_contribute_nothing() {
        let bitext = le_chat();
        let table = TranslationTable::default();
        let (counts, log_likelihood) = expected_counts(&bitext, &table, &BiasConfig::default());

        assert_eq!(log_likelihood, 0.);
        assert_eq!(counts.target_total("the"), 0.);
        assert!(TranslationTable::from_counts(&counts).is_empty());
    }

    #[test]
    fn empty_sentences_are_harmless() {
        let bitext = Bitext::from_pairs(vec![
            (vec![], vec!["the"]),
            (vec!["le"], vec![]),
            (vec!["le"], vec!["the"]),
        ]);
        let table = Trainer::new(&bitext, BiasConfig::default(), 4).train();

        for (_, _, p) in table.sorted_entries() {
            assert!(p.is_finite());
        }
        assert!(table.prob("le", "the") > 0.);
    }
}
