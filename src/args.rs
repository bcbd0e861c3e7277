// Course:      Efficient Linear Algebra and Machine Learning
// Assignment:  Final Assignment, Word Alignment ("Translation Pairs")
// Author:      Michael Watkins
//
// Honor Code:  I pledge that this program represents my own work.

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

static VARIANT_NAMES: &[&str] = &["full", "minus_len", "minus_pos", "diag_only", "ibm1"];

pub fn parse_args() -> ArgMatches<'static> {
    App::new("word-alignment")
        .settings(DEFAULT_CLAP_SETTINGS)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("align")
                .about("Train on the corpus and print its word alignments")
                .settings(DEFAULT_CLAP_SETTINGS)
                .args(&corpus_args())
                .arg(sigma_arg())
                .arg(threshold_arg())
                .arg(
                    Arg::with_name("VARIANT")
                        .short("v")
                        .long("variant")
                        .value_name("NAME")
                        .help("Bias terms to enable (default: full)")
                        .possible_values(VARIANT_NAMES)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("OUTPUT")
                        .short("o")
                        .long("output")
                        .value_name("FILE")
                        .help("Write alignments here instead of stdout")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("DICTIONARY")
                        .long("dictionary")
                        .value_name("FILE")
                        .help("Also write the translation table to FILE")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("PROBABILITY")
                        .short("p")
                        .long("probability")
                        .value_name("P")
                        .help("Minimum probability for a dictionary entry (default: 0.5)")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("ablation")
                .about("Run several bias variants, one alignment file each")
                .settings(DEFAULT_CLAP_SETTINGS)
                .args(&corpus_args())
                .arg(sigma_arg())
                .arg(threshold_arg())
                .arg(
                    Arg::with_name("VARIANTS")
                        .long("variants")
                        .value_name("LIST")
                        .help("Comma-separated: full,minus_len,minus_pos,diag_only,ibm1 (default: all)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("OUTDIR")
                        .long("outdir")
                        .value_name("DIR")
                        .help("Directory to save .a files (default: .)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("PREFIX")
                        .long("prefix")
                        .value_name("PREFIX")
                        .help("Filename prefix (default: ablation_)")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("sweep")
                .about("Score a grid of sigma and threshold values against gold alignments")
                .settings(DEFAULT_CLAP_SETTINGS)
                .args(&corpus_args())
                .arg(
                    Arg::with_name("SIGMAS")
                        .long("sigmas")
                        .value_name("LIST")
                        .help("Comma-separated sigma values (default: 0.4,0.3,0.2,0.1)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("THRESHOLDS")
                        .long("thresholds")
                        .value_name("LIST")
                        .help("Comma-separated thresholds (default: 0.001 to 0.010 in steps of 0.001)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("VARIANT")
                        .short("v")
                        .long("variant")
                        .value_name("NAME")
                        .help("Bias terms to enable (default: full)")
                        .possible_values(VARIANT_NAMES)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("GOLD")
                        .short("a")
                        .long("gold")
                        .value_name("FILE")
                        .help("Gold alignments (default: <data>.a)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("REPORT")
                        .long("report")
                        .value_name("FILE")
                        .help("Report file (default: hybrid_hyperparameters_output.txt)")
                        .takes_value(true),
                ),
        )
        .get_matches()
}

fn corpus_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("DATA")
            .short("d")
            .long("data")
            .value_name("PREFIX")
            .help("Data filename prefix (default: data/hansards)")
            .takes_value(true),
        Arg::with_name("ENGLISH")
            .short("e")
            .long("english")
            .value_name("SUFFIX")
            .help("Suffix of English (target) filename (default: e)")
            .takes_value(true),
        Arg::with_name("FRENCH")
            .short("f")
            .long("french")
            .value_name("SUFFIX")
            .help("Suffix of French (source) filename (default: f)")
            .takes_value(true),
        Arg::with_name("NUM_SENTENCES")
            .short("n")
            .long("num_sentences")
            .value_name("N")
            .help("Number of sentences to use for training and alignment (default: 1000)")
            .takes_value(true),
        Arg::with_name("ITERATIONS")
            .short("i")
            .long("iterations")
            .value_name("I")
            .help("Number of EM iterations (default: 8)")
            .takes_value(true),
    ]
}

fn sigma_arg() -> Arg<'static, 'static> {
    Arg::with_name("SIGMA")
        .short("s")
        .long("sigma")
        .value_name("S")
        .help("Diagonal bias bandwidth (default: 0.3)")
        .takes_value(true)
}

fn threshold_arg() -> Arg<'static, 'static> {
    Arg::with_name("THRESHOLD")
        .short("t")
        .long("threshold")
        .value_name("T")
        .help("Alignment threshold (default: 0.01)")
        .takes_value(true)
}
