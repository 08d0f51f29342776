use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "oxonto")]
/// OxOnto command line toolkit to convert, validate and reason over OWL ontologies
pub struct Args {
    /// Format of the log lines written to stderr
    ///
    /// The verbosity is set with the RUST_LOG environment variable.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new ontology containing only its header
    New {
        /// Base IRI of the ontology
        ///
        /// A '#' is appended if it does not end with '#' or '/'.
        #[arg(short, long, value_hint = ValueHint::Url)]
        base: String,
        /// Label of the ontology
        #[arg(long)]
        label: Option<String>,
        /// Description of the ontology
        #[arg(long)]
        comment: Option<String>,
        /// Creator of the ontology
        #[arg(long)]
        creator: Option<String>,
        #[command(flatten)]
        output: Output,
    },
    /// Convert an ontology from a format to another
    ///
    /// The output is deterministic: blank nodes are relabelled and triples sorted.
    Convert {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
    },
    /// Validate an ontology and print the findings
    ///
    /// Exits with an error if at least one finding has the "error" severity.
    Validate {
        #[command(flatten)]
        input: Input,
        /// Print the findings as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Materialize the triples entailed by an ontology
    Reason {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
        /// The entailment regime: "rdfs", "owl-rl" or "owl-rl-ext"
        #[arg(short, long, default_value = "owl-rl")]
        profile: String,
        /// Maximal number of inference rounds
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Skip the inconsistency detection rules
        #[arg(long)]
        no_consistency_check: bool,
    },
    /// Print the number of entities and triples of an ontology
    Stats {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(clap::Args)]
pub struct Input {
    /// File to read the ontology from
    ///
    /// If no file is given, stdin is used.
    /// Files ending with ".gz" are decompressed.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub from_file: Option<PathBuf>,
    /// The format of the input
    ///
    /// It can be an extension like "ttl" or a media type like "text/turtle".
    /// By default the format is guessed from the input file extension.
    #[arg(long, required_unless_present = "from_file")]
    pub from_format: Option<String>,
    /// Base IRI of the input
    #[arg(long, value_hint = ValueHint::Url)]
    pub from_base: Option<String>,
}

#[derive(clap::Args)]
pub struct Output {
    /// File to write the ontology to
    ///
    /// If no file is given, stdout is used.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub to_file: Option<PathBuf>,
    /// The format of the output
    ///
    /// It can be an extension like "ttl" or a media type like "text/turtle".
    /// By default the format is guessed from the output file extension.
    #[arg(long, required_unless_present = "to_file")]
    pub to_format: Option<String>,
}
