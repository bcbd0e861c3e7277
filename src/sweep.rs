// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

//! Repeated train + decode runs: variant ablations and sigma/threshold
//! grids. Every run starts from a fresh uniform table, and a failing run
//! never stops the ones after it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::align;
use crate::bias::{BiasConfig, Variant};
use crate::config::{
    AlignConfig, DEFAULT_ITERATIONS, DEFAULT_OUTDIR, DEFAULT_PREFIX, DEFAULT_SIGMA,
    DEFAULT_SWEEP_SIGMAS, DEFAULT_SWEEP_THRESHOLDS, DEFAULT_THRESHOLD, DEFAULT_VARIANTS,
};
use crate::corpus::Bitext;
use crate::decode::{render_alignments, write_alignments};
use crate::error::{Error, Result};
use crate::score::{AlignmentMetrics, AlignmentScorer};

/// Shared stop request, checked between configurations only.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AblationSettings {
    /// Comma-separated variant names.
    pub variants: String,
    pub iterations: usize,
    pub sigma: f64,
    pub threshold: f64,
    pub outdir: PathBuf,
    pub prefix: String,
}

impl AblationSettings {
    pub fn output_path(&self, variant: Variant) -> PathBuf {
        self.outdir.join(format!("{}{}.a", self.prefix, variant.name()))
    }
}

impl Default for AblationSettings {
    fn default() -> Self {
        AblationSettings {
            variants: DEFAULT_VARIANTS.to_owned(),
            iterations: DEFAULT_ITERATIONS,
            sigma: DEFAULT_SIGMA,
            threshold: DEFAULT_THRESHOLD,
            outdir: PathBuf::from(DEFAULT_OUTDIR),
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}

/// Result of one ablation entry: the file written, or why it was not.
#[derive(Debug)]
pub struct VariantOutcome {
    pub name: String,
    pub result: Result<PathBuf>,
}

/// Runs every requested variant and writes `<outdir>/<prefix><variant>.a`.
///
/// Unknown names are reported and skipped. Fails only when no known
/// variant remains or the output directory cannot be created.
pub fn run_ablation(
    bitext: &Bitext,
    settings: &AblationSettings,
    cancel: &CancelFlag,
) -> Result<Vec<VariantOutcome>> {
    let (variants, rejected) = Variant::parse_list(&settings.variants);

    let mut outcomes = Vec::with_capacity(variants.len() + rejected.len());
    for name in rejected {
        let err = Error::UnknownVariant(name.clone());
        warn!("skipping: {}", err);
        outcomes.push(VariantOutcome {
            name,
            result: Err(err),
        });
    }

    if variants.is_empty() {
        return Err(Error::NoValidVariants);
    }

    fs::create_dir_all(&settings.outdir).map_err(|err| Error::io(&settings.outdir, err))?;
    info!(
        variants = %variants.iter().map(|v| v.name()).collect::<Vec<_>>().join(", "),
        "running ablation"
    );

    for variant in variants {
        let result = if cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            run_variant(bitext, settings, variant)
        };

        match &result {
            Ok(path) => info!(variant = variant.name(), "wrote {}", path.display()),
            Err(err) => warn!(variant = variant.name(), "variant failed: {}", err),
        }
        outcomes.push(VariantOutcome {
            name: variant.name().to_owned(),
            result,
        });
    }

    Ok(outcomes)
}

fn run_variant(bitext: &Bitext, settings: &AblationSettings, variant: Variant) -> Result<PathBuf> {
    let bias = BiasConfig::for_variant(variant, settings.sigma)?;
    let config = AlignConfig::new(settings.iterations, settings.threshold, bias);
    info!(
        variant = variant.name(),
        sentences = bitext.len(),
        iterations = config.iterations,
        sigma = settings.sigma,
        threshold = config.threshold,
        "run"
    );

    let lines = align(bitext, &config);

    let path = settings.output_path(variant);
    let file = File::create(&path).map_err(|err| Error::io(&path, err))?;
    write_alignments(BufWriter::new(file), &lines).map_err(|err| Error::io(&path, err))?;
    Ok(path)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepSettings {
    pub variant: Variant,
    pub iterations: usize,
    pub sigmas: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl Default for SweepSettings {
    fn default() -> Self {
        SweepSettings {
            variant: Variant::Full,
            iterations: DEFAULT_ITERATIONS,
            sigmas: DEFAULT_SWEEP_SIGMAS.to_vec(),
            thresholds: DEFAULT_SWEEP_THRESHOLDS.to_vec(),
        }
    }
}

/// One grid point of a sweep.
#[derive(Debug)]
pub struct SweepPoint {
    pub sigma: f64,
    pub threshold: f64,
    pub result: Result<AlignmentMetrics>,
}

/// Scores every (sigma, threshold) pair, sigma-major, and appends a
/// labelled block per successful point to `report`.
pub fn run_sweep<S, W>(
    bitext: &Bitext,
    settings: &SweepSettings,
    scorer: &S,
    report: &mut W,
    cancel: &CancelFlag,
) -> Vec<SweepPoint>
where
    S: AlignmentScorer + ?Sized,
    W: Write,
{
    let mut points = Vec::with_capacity(settings.sigmas.len() * settings.thresholds.len());

    for &sigma in &settings.sigmas {
        for &threshold in &settings.thresholds {
            let result = if cancel.is_cancelled() {
                Err(Error::Cancelled)
            } else {
                info!(sigma, threshold, "processing sweep point");
                run_point(bitext, settings, sigma, threshold, scorer, report)
            };

            if let Err(err) = &result {
                warn!(sigma, threshold, "sweep point failed: {}", err);
            }
            points.push(SweepPoint {
                sigma,
                threshold,
                result,
            });
        }
    }

    points
}

fn run_point<S, W>(
    bitext: &Bitext,
    settings: &SweepSettings,
    sigma: f64,
    threshold: f64,
    scorer: &S,
    report: &mut W,
) -> Result<AlignmentMetrics>
where
    S: AlignmentScorer + ?Sized,
    W: Write,
{
    let bias = BiasConfig::for_variant(settings.variant, sigma)?;
    let config = AlignConfig::new(settings.iterations, threshold, bias);
    let text = render_alignments(&align(bitext, &config));

    let metrics = scorer.score(&text)?;

    write!(
        report,
        "# sigma={}, threshold={}\n{}\n\n",
        sigma, threshold, metrics
    )
    .and_then(|_| report.flush())
    .map_err(Error::Report)?;

    Ok(metrics)
}
