// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

extern crate clap;

extern crate stdinout;
use stdinout::OrExit;

extern crate tracing_subscriber;
use tracing_subscriber::EnvFilter;

extern crate word_alignment;
use word_alignment::config::{
    DEFAULT_ITERATIONS, DEFAULT_MAX_SENTENCES, DEFAULT_SIGMA, DEFAULT_SWEEP_REPORT,
    DEFAULT_THRESHOLD,
};
use word_alignment::decode::write_alignments;
use word_alignment::{
    AblationSettings, AlignConfig, BiasConfig, Bitext, CancelFlag, CorpusConfig, Decoder,
    GoldStandardScorer, SweepSettings, Variant,
};

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::str::FromStr;

use clap::ArgMatches;

mod args;
use args::parse_args;

/// Minimum probability for a dictionary entry.
const DEFAULT_DICTIONARY_PROBABILITY: f64 = 0.5;

fn main() {
    init_tracing();
    let arguments = parse_args();

    match arguments.subcommand() {
        ("align", Some(matches)) => align(matches),
        ("ablation", Some(matches)) => ablation(matches),
        ("sweep", Some(matches)) => sweep(matches),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn align(matches: &ArgMatches) {
    let bitext = load_bitext(matches);

    let variant = parse_value(matches, "VARIANT", Variant::Full);
    let sigma = parse_value(matches, "SIGMA", DEFAULT_SIGMA);
    let bias = BiasConfig::for_variant(variant, sigma).or_exit("Invalid bias configuration", 1);
    let config = AlignConfig::new(
        parse_value(matches, "ITERATIONS", DEFAULT_ITERATIONS),
        parse_value(matches, "THRESHOLD", DEFAULT_THRESHOLD),
        bias,
    );

    let table = word_alignment::train(&bitext, &config);
    let lines = Decoder::new(&table, &config).decode(&bitext);

    match matches.value_of("OUTPUT") {
        Some(path) => {
            let output = File::create(path).or_exit("Cannot open output file", 1);
            write_alignments(BufWriter::new(output), &lines)
                .or_exit("Could not write to output file", 1);
        }
        None => {
            let stdout = io::stdout();
            write_alignments(BufWriter::new(stdout.lock()), &lines)
                .or_exit("Could not write alignments", 1);
        }
    }

    if let Some(path) = matches.value_of("DICTIONARY") {
        let p = parse_value(matches, "PROBABILITY", DEFAULT_DICTIONARY_PROBABILITY);
        let output = File::create(path).or_exit("Cannot open dictionary file", 1);
        table
            .write_dictionary(BufWriter::new(output), p)
            .or_exit("Could not write to dictionary file", 1);
    }
}

fn ablation(matches: &ArgMatches) {
    let bitext = load_bitext(matches);
    let defaults = AblationSettings::default();

    let settings = AblationSettings {
        variants: matches
            .value_of("VARIANTS")
            .map(str::to_owned)
            .unwrap_or(defaults.variants),
        iterations: parse_value(matches, "ITERATIONS", defaults.iterations),
        sigma: parse_value(matches, "SIGMA", defaults.sigma),
        threshold: parse_value(matches, "THRESHOLD", defaults.threshold),
        outdir: matches
            .value_of("OUTDIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.outdir),
        prefix: matches
            .value_of("PREFIX")
            .map(str::to_owned)
            .unwrap_or(defaults.prefix),
    };

    let outcomes = word_alignment::run_ablation(&bitext, &settings, &CancelFlag::new())
        .or_exit("Ablation failed", 1);

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == outcomes.len() {
        eprintln!("Every variant failed");
        std::process::exit(1);
    }
}

fn sweep(matches: &ArgMatches) {
    let corpus = corpus_config(matches);
    let bitext = Bitext::load(&corpus).or_exit("Cannot load parallel corpus", 1);
    let defaults = SweepSettings::default();

    let settings = SweepSettings {
        variant: parse_value(matches, "VARIANT", defaults.variant),
        iterations: parse_value(matches, "ITERATIONS", defaults.iterations),
        sigmas: matches
            .value_of("SIGMAS")
            .map(|list| parse_list(list).or_exit("Invalid sigma list", 1))
            .unwrap_or(defaults.sigmas),
        thresholds: matches
            .value_of("THRESHOLDS")
            .map(|list| parse_list(list).or_exit("Invalid threshold list", 1))
            .unwrap_or(defaults.thresholds),
    };

    let gold = matches
        .value_of("GOLD")
        .map(PathBuf::from)
        .unwrap_or_else(|| corpus.gold_path());
    let scorer = GoldStandardScorer::load(&gold).or_exit("Cannot load gold alignments", 1);

    let report = matches.value_of("REPORT").unwrap_or(DEFAULT_SWEEP_REPORT);
    let mut report = BufWriter::new(File::create(report).or_exit("Cannot open report file", 1));

    let points = word_alignment::run_sweep(
        &bitext,
        &settings,
        &scorer,
        &mut report,
        &CancelFlag::new(),
    );

    if points.iter().all(|point| point.result.is_err()) {
        eprintln!("Every sweep point failed");
        std::process::exit(1);
    }
}

fn corpus_config(matches: &ArgMatches) -> CorpusConfig {
    let defaults = CorpusConfig::default();
    CorpusConfig {
        prefix: matches
            .value_of("DATA")
            .map(str::to_owned)
            .unwrap_or(defaults.prefix),
        source_suffix: matches
            .value_of("FRENCH")
            .map(str::to_owned)
            .unwrap_or(defaults.source_suffix),
        target_suffix: matches
            .value_of("ENGLISH")
            .map(str::to_owned)
            .unwrap_or(defaults.target_suffix),
        max_sentences: parse_value(matches, "NUM_SENTENCES", DEFAULT_MAX_SENTENCES),
    }
}

fn load_bitext(matches: &ArgMatches) -> Bitext {
    Bitext::load(&corpus_config(matches)).or_exit("Cannot load parallel corpus", 1)
}

fn parse_value<T>(matches: &ArgMatches, name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Debug + std::fmt::Display,
{
    match matches.value_of(name) {
        Some(value) => value
            .parse()
            .or_exit(&format!("Invalid value for {}", name), 1),
        None => default,
    }
}

fn parse_list(list: &str) -> Result<Vec<f64>, std::num::ParseFloatError> {
    list.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(f64::from_str)
        .collect()
}
