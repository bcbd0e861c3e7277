// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Loading the parallel corpus.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use counter::Counter;
use nlp_tokenize::{Tokenizer, WhitespaceTokenizer};
use tracing::info;

use crate::config::CorpusConfig;
use crate::error::{Error, Result};

/// Synthetic target word standing for "aligned to nothing".
pub const NULL_TOKEN: &str = "NULL";

/// One line of each language.
#[derive(Clone, Debug, PartialEq)]
pub struct SentencePair {
    pub source: Vec<String>,
    pub target: Vec<String>,
}

impl SentencePair {
    pub fn new(source: Vec<String>, target: Vec<String>) -> Self {
        SentencePair { source, target }
    }
}

/// Line-aligned sentence pairs, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bitext {
    pairs: Vec<SentencePair>,
}

impl Bitext {
    /// Reads `<prefix>.<source suffix>` and `<prefix>.<target suffix>`.
    pub fn load(config: &CorpusConfig) -> Result<Self> {
        let source_path = config.source_path();
        let target_path = config.target_path();

        let source = open(&source_path)?;
        let target = open(&target_path)?;

        let bitext = Bitext::from_readers(source, target, config.max_sentences)
            .map_err(|(side, err)| match side {
                Side::Source => Error::io(&source_path, err),
                Side::Target => Error::io(&target_path, err),
            })?;

        info!(
            sentences = bitext.len(),
            source = %source_path.display(),
            target = %target_path.display(),
            "loaded parallel corpus"
        );
        Ok(bitext)
    }

    /// Zips two line streams; the shorter one bounds the corpus.
    fn from_readers<S: BufRead, T: BufRead>(
        source: S,
        target: T,
        max_sentences: usize,
    ) -> std::result::Result<Self, (Side, std::io::Error)> {
        let tokenizer = WhitespaceTokenizer::new();
        let mut pairs = Vec::new();

        for (source_line, target_line) in source.lines().zip(target.lines()).take(max_sentences) {
            let source_line = source_line.map_err(|err| (Side::Source, err))?;
            let target_line = target_line.map_err(|err| (Side::Target, err))?;
            pairs.push(SentencePair::new(
                tokenize(&tokenizer, &source_line),
                tokenize(&tokenizer, &target_line),
            ));
        }

        Ok(Bitext { pairs })
    }

    pub fn from_pairs<S: AsRef<str>>(pairs: Vec<(Vec<S>, Vec<S>)>) -> Self {
        let owned = |words: Vec<S>| -> Vec<String> {
            words.iter().map(|w| w.as_ref().to_owned()).collect()
        };
        Bitext {
            pairs: pairs
                .into_iter()
                .map(|(source, target)| SentencePair::new(owned(source), owned(target)))
                .collect(),
        }
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self)
    }
}

#[derive(Debug)]
enum Side {
    Source,
    Target,
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| Error::io(path, err))
}

// Tokenize sentences
fn tokenize(tokenizer: &WhitespaceTokenizer, sentence: &str) -> Vec<String> {
    tokenizer
        .tokenize(sentence)
        .into_iter()
        .map(|bound| String::from(&sentence[bound.0..bound.1]))
        .collect()
}

/// Distinct words per side. The target side also holds [`NULL_TOKEN`].
#[derive(Clone, Debug)]
pub struct Vocabulary {
    source_words: Vec<String>,
    target_words: Vec<String>,
}

impl Vocabulary {
    fn new(bitext: &Bitext) -> Self {
        let source_counts = bitext
            .pairs
            .iter()
            .flat_map(|pair| pair.source.iter().cloned())
            .collect::<Counter<_>>();
        let target_counts = bitext
            .pairs
            .iter()
            .flat_map(|pair| pair.target.iter().cloned())
            .collect::<Counter<_>>();

        let mut source_words: Vec<String> = source_counts.keys().cloned().collect();
        source_words.sort_unstable();

        let mut target_words: Vec<String> = target_counts.keys().cloned().collect();
        if !target_counts.contains_key(NULL_TOKEN) {
            target_words.push(NULL_TOKEN.to_owned());
        }
        target_words.sort_unstable();

        Vocabulary {
            source_words,
            target_words,
        }
    }

    /// Source words in sorted order.
    pub fn source_words(&self) -> impl Iterator<Item = &str> {
        self.source_words.iter().map(String::as_str)
    }

    /// Target words, `NULL` included, in sorted order.
    pub fn target_words(&self) -> impl Iterator<Item = &str> {
        self.target_words.iter().map(String::as_str)
    }

    pub fn source_len(&self) -> usize {
        self.source_words.len()
    }

    /// Includes `NULL`.
    pub fn target_len(&self) -> usize {
        self.target_words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(source: &str, target: &str, max: usize) -> Bitext {
        Bitext::from_readers(Cursor::new(source), Cursor::new(target), max)
            .unwrap()
    }

    #[test]
    fn tokenizes_on_whitespace_without_normalising() {
        let bitext = read("Le chat noir\n", "The black cat\n", 10);
        assert_eq!(bitext.len(), 1);
        assert_eq!(bitext.pairs()[0].source, vec!["Le", "chat", "noir"]);
        assert_eq!(bitext.pairs()[0].target, vec!["The", "black", "cat"]);
    }

    #[test]
    fn truncates_to_max_sentences() {
        let bitext = read("a\nb\nc\n", "x\ny\nz\n", 2);
        assert_eq!(bitext.len(), 2);
        assert_eq!(bitext.pairs()[1].source, vec!["b"]);
    }

    #[test]
    fn shorter_file_bounds_the_corpus() {
        let bitext = read("a\nb\nc\n", "x\n", 10);
        assert_eq!(bitext.len(), 1);
    }

    #[test]
    fn empty_lines_become_empty_sentences() {
        let bitext = read("\na b\n", "x\n\n", 10);
        assert_eq!(bitext.len(), 2);
        assert!(bitext.pairs()[0].source.is_empty());
        assert!(bitext.pairs()[1].target.is_empty());
    }

    #[test]
    fn vocabulary_adds_null_to_targets() {
        let bitext = Bitext::from_pairs(vec![
            (vec!["le", "chat"], vec!["the", "cat"]),
            (vec!["le", "chien"], vec!["the", "dog"]),
        ]);
        let vocabulary = bitext.vocabulary();

        assert_eq!(vocabulary.source_len(), 3);
        assert_eq!(vocabulary.target_len(), 4);
        assert_eq!(
            vocabulary.target_words().collect::<Vec<_>>(),
            vec!["NULL", "cat", "dog", "the"]
        );
        assert_eq!(
            vocabulary.source_words().collect::<Vec<_>>(),
            vec!["chat", "chien", "le"]
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let config = CorpusConfig {
            prefix: "/nonexistent/corpus".to_owned(),
            ..CorpusConfig::default()
        };
        match Bitext::load(&config) {
            Err(Error::Io { path, .. }) => assert_eq!(path, config.source_path()),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }
}
