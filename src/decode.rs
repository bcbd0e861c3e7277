// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Picking the best target position for each source word.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::bias::BiasConfig;
use crate::config::AlignConfig;
use crate::corpus::{Bitext, SentencePair};
use crate::error::{Error, Result};
use crate::table::TranslationTable;

/// Aligned `(source index, target index)` pairs of one sentence, in
/// ascending source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignmentLine {
    links: Vec<(usize, usize)>,
}

impl AlignmentLine {
    pub fn new(links: Vec<(usize, usize)>) -> Self {
        AlignmentLine { links }
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn parse_numbered(line: &str, line_no: usize) -> Result<Self> {
        let links = line
            .split_whitespace()
            .map(|token| {
                parse_link(token, '-').ok_or_else(|| Error::MalformedAlignment {
                    line: line_no,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AlignmentLine { links })
    }
}

impl fmt::Display for AlignmentLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (n, (i, j)) in self.links.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}-{}", i, j)?;
        }
        Ok(())
    }
}

impl FromStr for AlignmentLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AlignmentLine::parse_numbered(s, 1)
    }
}

/// Parses `<i><separator><j>`.
pub(crate) fn parse_link(token: &str, separator: char) -> Option<(usize, usize)> {
    let mut parts = token.splitn(2, separator);
    let i = parts.next()?.parse().ok()?;
    let j = parts.next()?.parse().ok()?;
    Some((i, j))
}

/// Parses one alignment line per sentence.
pub fn parse_alignments(text: &str) -> Result<Vec<AlignmentLine>> {
    text.lines()
        .enumerate()
        .map(|(n, line)| AlignmentLine::parse_numbered(line, n + 1))
        .collect()
}

/// Arg-max decoding against a trained table.
///
/// Must be given the same [`BiasConfig`] the table was trained with.
pub struct Decoder<'a> {
    table: &'a TranslationTable,
    bias: BiasConfig,
    threshold: f64,
}

impl<'a> Decoder<'a> {
    pub fn new(table: &'a TranslationTable, config: &AlignConfig) -> Self {
        Decoder {
            table,
            bias: config.bias,
            threshold: config.threshold,
        }
    }

    /// Each source word starts out on NULL with score `t(NULL|f)`; a real
    /// target word has to beat it strictly. The winner is kept only if its
    /// score is strictly above the threshold.
    ///
    /// A source word whose NULL score is never beaten is reported against
    /// target 0, the same index a real win at position 0 would get.
    pub fn decode_pair(&self, pair: &SentencePair) -> AlignmentLine {
        let f_len = pair.source.len();
        let e_len = pair.target.len();
        let bias = self.bias.matrix(f_len, e_len);

        let mut links = Vec::with_capacity(f_len);
        for (i, f_word) in pair.source.iter().enumerate() {
            let mut best_index = 0;
            let mut best_score = self.table.null_prob(f_word);

            for (j, e_word) in pair.target.iter().enumerate() {
                let score = self.table.prob(f_word, e_word) * bias[[i, j]];
                if score > best_score {
                    best_score = score;
                    best_index = j;
                }
            }

            if best_score > self.threshold {
                links.push((i, best_index));
            }
        }

        AlignmentLine { links }
    }

    pub fn decode(&self, bitext: &Bitext) -> Vec<AlignmentLine> {
        bitext
            .pairs()
            .iter()
            .map(|pair| self.decode_pair(pair))
            .collect()
    }
}

/// One line per sentence pair, newline-terminated.
pub fn write_alignments<W: Write>(mut writer: W, lines: &[AlignmentLine]) -> std::io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}

pub fn render_alignments(lines: &[AlignmentLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str, f64)]) -> TranslationTable {
        TranslationTable::from_entries(entries.iter().cloned())
    }

    fn lexical(threshold: f64) -> AlignConfig {
        AlignConfig::new(0, threshold, BiasConfig::lexical())
    }

    fn pair(source: &[&str], target: &[&str]) -> SentencePair {
        SentencePair::new(
            source.iter().map(|w| w.to_string()).collect(),
            target.iter().map(|w| w.to_string()).collect(),
        )
    }

    #[test]
    fn formats_links() {
        let line = AlignmentLine::new(vec![(0, 0), (1, 2), (3, 1)]);
        assert_eq!(line.to_string(), "0-0 1-2 3-1");
        assert_eq!(AlignmentLine::default().to_string(), "");
    }

    #[test]
    fn parses_links() {
        let line: AlignmentLine = "0-0 1-2  3-1".parse().unwrap();
        assert_eq!(line.links(), &[(0, 0), (1, 2), (3, 1)]);
        assert!("".parse::<AlignmentLine>().unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_links() {
        match parse_alignments("0-0\n1-x\n") {
            Err(Error::MalformedAlignment { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "1-x");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!("0?1".parse::<AlignmentLine>().is_err());
    }

    #[test]
    fn picks_highest_scoring_target() {
        let table = table(&[("chat", "NULL", 0.1), ("chat", "the", 0.2), ("chat", "cat", 0.7)]);
        let config = lexical(0.01);
        let line = Decoder::new(&table, &config).decode_pair(&pair(&["chat"], &["the", "cat"]));
        assert_eq!(line.links(), &[(0, 1)]);
    }

    #[test]
    fn score_equal_to_threshold_is_dropped() {
        let table = table(&[("chat", "cat", 0.5)]);
        let sentence = pair(&["chat"], &["cat"]);

        let at = lexical(0.5);
        assert!(Decoder::new(&table, &at).decode_pair(&sentence).is_empty());

        let below = lexical(0.49);
        assert_eq!(
            Decoder::new(&table, &below).decode_pair(&sentence).links(),
            &[(0, 0)]
        );
    }

    #[test]
    fn unbeaten_null_is_reported_as_target_zero() {
        let table = table(&[("le", "NULL", 0.9), ("le", "the", 0.05), ("le", "cat", 0.05)]);
        let config = lexical(0.01);
        let line = Decoder::new(&table, &config).decode_pair(&pair(&["le"], &["cat", "the"]));
        assert_eq!(line.links(), &[(0, 0)]);
    }

    #[test]
    fn ties_with_null_do_not_move_off_null() {
        let table = table(&[("le", "NULL", 0.3), ("le", "cat", 0.3)]);
        let config = lexical(0.01);
        let line = Decoder::new(&table, &config).decode_pair(&pair(&["le"], &["the", "cat"]));
        assert_eq!(line.links(), &[(0, 0)]);
    }

    #[test]
    fn unknown_words_are_unaligned() {
        let table = table(&[("le", "the", 1.)]);
        let config = lexical(0.01);
        let line = Decoder::new(&table, &config).decode_pair(&pair(&["chien"], &["dog"]));
        assert!(line.is_empty());
    }

    #[test]
    fn bias_reweights_decoding() {
        // Lexically "cat" wins; the diagonal pulls source 0 to target 0.
        let table = table(&[("le", "the", 0.4), ("le", "cat", 0.6)]);
        let sentence = pair(&["le", "x"], &["the", "cat"]);

        let lexical = lexical(0.01);
        assert_eq!(
            Decoder::new(&table, &lexical).decode_pair(&sentence).links(),
            &[(0, 1)]
        );

        let diagonal = AlignConfig::new(
            0,
            0.01,
            BiasConfig::new(true, false, false, 0.3).unwrap(),
        );
        assert_eq!(
            Decoder::new(&table, &diagonal).decode_pair(&sentence).links(),
            &[(0, 0)]
        );
    }

    #[test]
    fn writes_one_line_per_sentence() {
        let lines = vec![
            AlignmentLine::new(vec![(0, 0), (1, 1)]),
            AlignmentLine::default(),
            AlignmentLine::new(vec![(2, 0)]),
        ];
        let mut out = Vec::new();
        write_alignments(&mut out, &lines).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0-0 1-1\n\n2-0\n");
        assert_eq!(render_alignments(&lines), "0-0 1-1\n\n2-0\n");
        assert_eq!(parse_alignments(&render_alignments(&lines)).unwrap(), lines);
    }
}
