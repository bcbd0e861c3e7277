// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Unsupervised word alignment: a lexical translation table learned by EM,
//! re-weighted by static positional and length heuristics.

pub mod bias;
pub mod config;
pub mod corpus;
pub mod decode;
pub mod em;
pub mod error;
pub mod score;
pub mod sweep;
pub mod table;

pub use crate::bias::{BiasConfig, Variant};
pub use crate::config::{AlignConfig, CorpusConfig};
pub use crate::corpus::{Bitext, SentencePair, Vocabulary, NULL_TOKEN};
pub use crate::decode::{AlignmentLine, Decoder};
pub use crate::em::{Trainer, TrainerState};
pub use crate::error::{Error, Result};
pub use crate::score::{AlignmentMetrics, AlignmentScorer, GoldStandardScorer};
pub use crate::sweep::{run_ablation, run_sweep, AblationSettings, CancelFlag, SweepSettings};
pub use crate::table::TranslationTable;

/// Trains on `bitext` and decodes the same bitext with the trained table.
pub fn align(bitext: &Bitext, config: &AlignConfig) -> Vec<AlignmentLine> {
    let table = train(bitext, config);
    Decoder::new(&table, config).decode(bitext)
}

pub fn train(bitext: &Bitext, config: &AlignConfig) -> TranslationTable {
    Trainer::new(bitext, config.bias, config.iterations).train()
}
