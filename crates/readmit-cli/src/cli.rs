use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

use readmit_classifiers::config::ModelType;
use readmit_classifiers::report::RenderFormat;

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to JSON configuration file")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn data_arg() -> Arg {
    Arg::new("data")
        .short('d')
        .long("data")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .help(
            "Path to the dataset (*.csv or *.tsv). Overrides the dataset path \
             specified in the configuration file.",
        )
        .value_hint(ValueHint::FilePath)
}

fn target_arg() -> Arg {
    Arg::new("target")
        .long("target")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .help("Label column to evaluate against, e.g. y_readmission30d.")
        .value_hint(ValueHint::Other)
}

fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .value_parser(clap::value_parser!(u64))
        .help("Random seed for shuffling and splitting.")
}

fn parse_model(s: &str) -> Result<ModelType, String> {
    s.parse()
}

fn parse_render_format(s: &str) -> Result<RenderFormat, String> {
    s.parse()
}

/// The `readmit` command line.
pub fn build_cli() -> Command {
    Command::new("readmit")
        .version(clap::crate_version!())
        .author("Readmit Developers")
        .about("Benchmark classifiers on pacemaker readmission data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("benchmark")
                .about("Cross-validate a suite of classifiers and report their accuracy")
                .arg(config_arg())
                .arg(data_arg())
                .arg(
                    Arg::new("folds")
                        .short('k')
                        .long("folds")
                        .value_parser(clap::value_parser!(usize))
                        .help("Number of cross-validation folds."),
                )
                .arg(target_arg().conflicts_with("combine"))
                .arg(
                    Arg::new("combine")
                        .long("combine")
                        .help("Derive the target by combining every label column.")
                        .value_parser(["sum", "any"]),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help(
                            "Classifier to benchmark; repeat to select several. Replaces the \
                             predictors from the configuration file. One of: knn, linear-svm, \
                             rbf-svm, poly-svm, decision-tree, random-forest, mlp",
                        )
                        .action(ArgAction::Append)
                        .value_parser(parse_model),
                )
                .arg(
                    Arg::new("shuffle")
                        .long("shuffle")
                        .help("Shuffle samples before assigning folds.")
                        .action(ArgAction::SetTrue),
                )
                .arg(seed_arg())
                .arg(
                    Arg::new("no_scale")
                        .long("no-scale")
                        .help("Disable feature standardisation.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write the results table (*.tsv).")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report_file")
                        .long("report")
                        .help("Path to write an HTML report with accuracy plots.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("holdout")
                .about("Train one classifier on a random split and score the held-out part")
                .arg(config_arg())
                .arg(data_arg())
                .arg(
                    Arg::new("test_fraction")
                        .short('t')
                        .long("test-fraction")
                        .value_parser(clap::value_parser!(f64))
                        .help("Fraction of samples held out for testing, in (0, 1)."),
                )
                .arg(target_arg())
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Classifier to train (default: decision-tree).")
                        .value_parser(parse_model),
                )
                .arg(seed_arg())
                .arg(
                    Arg::new("scale")
                        .long("scale")
                        .help("Standardise features before splitting.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("render")
                        .long("render")
                        .help("Render the fitted decision tree to this path (extension is added).")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("render_format")
                        .long("render-format")
                        .help("Tree rendering format: dot, pdf, png, svg or tikz.")
                        .value_parser(parse_render_format),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
}
