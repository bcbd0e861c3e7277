// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Default settings for loading, training and decoding.

use std::path::PathBuf;

use crate::bias::BiasConfig;

/// Corpus path prefix; files are `<prefix>.<suffix>`.
pub const DEFAULT_DATA_PREFIX: &str = "data/hansards";
/// Suffix of the source-language (French) file.
pub const DEFAULT_SOURCE_SUFFIX: &str = "f";
/// Suffix of the target-language (English) file.
pub const DEFAULT_TARGET_SUFFIX: &str = "e";
/// Suffix of the gold-standard alignment file.
pub const DEFAULT_GOLD_SUFFIX: &str = "a";
pub const DEFAULT_MAX_SENTENCES: usize = 1000;
pub const DEFAULT_ITERATIONS: usize = 8;
/// Bandwidth of the diagonal bias.
pub const DEFAULT_SIGMA: f64 = 0.3;
/// Minimum score a link must strictly exceed to be emitted.
pub const DEFAULT_THRESHOLD: f64 = 0.01;

pub const DEFAULT_VARIANTS: &str = "full,minus_len,minus_pos,diag_only,ibm1";
pub const DEFAULT_OUTDIR: &str = ".";
pub const DEFAULT_PREFIX: &str = "ablation_";

pub const DEFAULT_SWEEP_SIGMAS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];
pub const DEFAULT_SWEEP_THRESHOLDS: [f64; 10] = [
    0.001, 0.002, 0.003, 0.004, 0.005, 0.006, 0.007, 0.008, 0.009, 0.010,
];
pub const DEFAULT_SWEEP_REPORT: &str = "hybrid_hyperparameters_output.txt";

/// Where the bitext lives and how much of it to use.
#[derive(Clone, Debug, PartialEq)]
pub struct CorpusConfig {
    pub prefix: String,
    pub source_suffix: String,
    pub target_suffix: String,
    pub max_sentences: usize,
}

impl CorpusConfig {
    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.prefix, self.source_suffix))
    }

    pub fn target_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.prefix, self.target_suffix))
    }

    pub fn gold_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.prefix, DEFAULT_GOLD_SUFFIX))
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            prefix: DEFAULT_DATA_PREFIX.to_owned(),
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_owned(),
            target_suffix: DEFAULT_TARGET_SUFFIX.to_owned(),
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }
}

/// Everything one train + decode run consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignConfig {
    pub iterations: usize,
    pub threshold: f64,
    pub bias: BiasConfig,
}

impl AlignConfig {
    pub fn new(iterations: usize, threshold: f64, bias: BiasConfig) -> Self {
        AlignConfig {
            iterations,
            threshold,
            bias,
        }
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        AlignConfig {
            iterations: DEFAULT_ITERATIONS,
            threshold: DEFAULT_THRESHOLD,
            bias: BiasConfig::default(),
        }
    }
}
