// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Evaluating alignment text against a reference.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::decode::{parse_alignments, parse_link};
use crate::error::{Error, Result};

/// Anything that can turn alignment text into metrics.
pub trait AlignmentScorer {
    fn score(&self, alignment_text: &str) -> Result<AlignmentMetrics>;
}

impl<F> AlignmentScorer for F
where
    F: Fn(&str) -> Result<AlignmentMetrics>,
{
    fn score(&self, alignment_text: &str) -> Result<AlignmentMetrics> {
        self(alignment_text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentMetrics {
    pub precision: f64,
    pub recall: f64,
    pub aer: f64,
}

impl fmt::Display for AlignmentMetrics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Precision = {:.6}", self.precision)?;
        writeln!(f, "Recall = {:.6}", self.recall)?;
        write!(f, "AER = {:.6}", self.aer)
    }
}

#[derive(Clone, Debug, Default)]
struct GoldSentence {
    sure: HashSet<(usize, usize)>,
    /// Superset of `sure`.
    possible: HashSet<(usize, usize)>,
}

/// Precision, recall and AER against hand alignments.
///
/// Gold lines hold `i-j` for sure links and `i?j` for possible ones. Only
/// as many sentences as the scored text contains are compared.
#[derive(Clone, Debug)]
pub struct GoldStandardScorer {
    sentences: Vec<GoldSentence>,
}

impl GoldStandardScorer {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        GoldStandardScorer::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let mut sentences = Vec::new();

        for (n, line) in text.lines().enumerate() {
            let mut sentence = GoldSentence::default();
            for token in line.split_whitespace() {
                if let Some(link) = parse_link(token, '-') {
                    sentence.sure.insert(link);
                    sentence.possible.insert(link);
                } else if let Some(link) = parse_link(token, '?') {
                    sentence.possible.insert(link);
                } else {
                    return Err(Error::MalformedAlignment {
                        line: n + 1,
                        token: token.to_owned(),
                    });
                }
            }
            sentences.push(sentence);
        }

        Ok(GoldStandardScorer { sentences })
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

impl AlignmentScorer for GoldStandardScorer {
    fn score(&self, alignment_text: &str) -> Result<AlignmentMetrics> {
        let predicted = parse_alignments(alignment_text)?;

        let (mut size_a, mut size_s) = (0usize, 0usize);
        let (mut a_and_s, mut a_and_p) = (0usize, 0usize);

        for (gold, line) in self.sentences.iter().zip(predicted.iter()) {
            let links: HashSet<(usize, usize)> = line.links().iter().cloned().collect();
            size_a += links.len();
            size_s += gold.sure.len();
            a_and_s += links.intersection(&gold.sure).count();
            a_and_p += links.intersection(&gold.possible).count();
        }

        Ok(AlignmentMetrics {
            precision: ratio(a_and_p, size_a),
            recall: ratio(a_and_s, size_s),
            aer: if size_a + size_s == 0 {
                0.
            } else {
                1. - ratio(a_and_s + a_and_p, size_a + size_s)
            },
        })
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.
    } else {
        numerator as f64 / denominator as f64
    }
}
