// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Positional and length heuristics that re-weight the lexical model.
//!
//! All three terms are static multipliers. They are never estimated by EM;
//! they only scale `t(e|f)` before normalisation (training) and before the
//! arg-max (decoding). Both phases go through [`BiasConfig::matrix`], so the
//! weights seen at training time and at decoding time are the same numbers.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::config::DEFAULT_SIGMA;
use crate::error::{Error, Result};

/// Lower bound (inclusive) of the acceptable source/target length ratio.
pub const MIN_LENGTH_RATIO: f64 = 0.5;
/// Upper bound (inclusive) of the acceptable source/target length ratio.
pub const MAX_LENGTH_RATIO: f64 = 2.0;
/// Multiplier applied to every link of a badly length-matched pair.
pub const LENGTH_PENALTY: f64 = 0.5;
/// Decay rate of the exponential position bias.
pub const POSITION_DECAY: f64 = 2.0;

/// Relative distance between source position `i` and target position `j`,
/// or `None` when either sentence is too short to normalise.
fn relative_distance(i: usize, j: usize, f_len: usize, e_len: usize) -> Option<f64> {
    if f_len <= 1 || e_len <= 1 {
        return None;
    }

    let norm_i = i as f64 / (f_len as f64 - 1.);
    let norm_j = j as f64 / (e_len as f64 - 1.);
    Some((norm_i - norm_j).abs())
}

/// Gaussian preference for links near the diagonal.
pub fn diag_bias(i: usize, j: usize, f_len: usize, e_len: usize, sigma: f64) -> f64 {
    match relative_distance(i, j, f_len, e_len) {
        Some(distance) => (-(distance * distance) / (2. * sigma * sigma)).exp(),
        None => 1.,
    }
}

/// Exponential preference for links at similar relative positions.
pub fn pos_bias(i: usize, j: usize, f_len: usize, e_len: usize) -> f64 {
    match relative_distance(i, j, f_len, e_len) {
        Some(distance) => (-POSITION_DECAY * distance).exp(),
        None => 1.,
    }
}

/// Flat penalty for sentence pairs whose lengths differ by more than 2x.
pub fn len_bias(f_len: usize, e_len: usize) -> f64 {
    let ratio = f_len as f64 / e_len.max(1) as f64;
    if ratio >= MIN_LENGTH_RATIO && ratio <= MAX_LENGTH_RATIO {
        1.
    } else {
        LENGTH_PENALTY
    }
}

/// Which bias terms are active, plus the diagonal bandwidth.
///
/// Fixed for the lifetime of one training + decoding run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiasConfig {
    diagonal: bool,
    position: bool,
    length: bool,
    sigma: f64,
}

impl BiasConfig {
    /// `sigma` is only checked when the diagonal term is on.
    pub fn new(diagonal: bool, position: bool, length: bool, sigma: f64) -> Result<Self> {
        if diagonal && !(sigma.is_finite() && sigma > 0.) {
            return Err(Error::InvalidSigma(sigma));
        }

        Ok(BiasConfig {
            diagonal,
            position,
            length,
            sigma,
        })
    }

    pub fn for_variant(variant: Variant, sigma: f64) -> Result<Self> {
        let (diagonal, position, length) = variant.terms();
        BiasConfig::new(diagonal, position, length, sigma)
    }

    /// Pure lexical model: every term disabled.
    pub fn lexical() -> Self {
        BiasConfig {
            diagonal: false,
            position: false,
            length: false,
            sigma: DEFAULT_SIGMA,
        }
    }

    /// Product of the enabled terms; disabled terms contribute 1.0.
    pub fn combined(&self, i: usize, j: usize, f_len: usize, e_len: usize) -> f64 {
        let mut bias = 1.;
        if self.diagonal {
            bias *= diag_bias(i, j, f_len, e_len, self.sigma);
        }
        if self.position {
            bias *= pos_bias(i, j, f_len, e_len);
        }
        if self.length {
            bias *= len_bias(f_len, e_len);
        }
        bias
    }

    /// Bias weights for every (source, real target) position of a sentence
    /// pair, shape `(f_len, e_len)`. Row `i`, column `j` is
    /// `combined(i, j, f_len, e_len)`.
    pub fn matrix(&self, f_len: usize, e_len: usize) -> Array2<f64> {
        Array2::from_shape_fn((f_len, e_len), |(i, j)| self.combined(i, j, f_len, e_len))
    }
}

impl Default for BiasConfig {
    fn default() -> Self {
        BiasConfig {
            diagonal: true,
            position: true,
            length: true,
            sigma: DEFAULT_SIGMA,
        }
    }
}

/// Named bias configurations used for ablation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Full,
    MinusLen,
    MinusPos,
    DiagOnly,
    Ibm1,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Full,
        Variant::MinusLen,
        Variant::MinusPos,
        Variant::DiagOnly,
        Variant::Ibm1,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Full => "full",
            Variant::MinusLen => "minus_len",
            Variant::MinusPos => "minus_pos",
            Variant::DiagOnly => "diag_only",
            Variant::Ibm1 => "ibm1",
        }
    }

    /// (diagonal, position, length)
    pub fn terms(self) -> (bool, bool, bool) {
        match self {
            Variant::Full => (true, true, true),
            Variant::MinusLen => (true, true, false),
            Variant::MinusPos => (true, false, true),
            Variant::DiagOnly => (true, false, false),
            Variant::Ibm1 => (false, false, false),
        }
    }

    /// Splits a comma-separated list into known variants and rejected names.
    /// Blank entries are ignored.
    pub fn parse_list(list: &str) -> (Vec<Variant>, Vec<String>) {
        let mut variants = Vec::new();
        let mut rejected = Vec::new();

        for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            match name.parse() {
                Ok(variant) => variants.push(variant),
                Err(_) => rejected.push(name.to_owned()),
            }
        }

        (variants, rejected)
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .iter()
            .cloned()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| Error::UnknownVariant(s.to_owned()))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
