#![allow(clippy::print_stderr, clippy::print_stdout)]

mod cli;

use crate::cli::{Args, Command, Input, LogFormat, Output};
use anyhow::{Context, bail, ensure};
use clap::Parser;
use flate2::read::MultiGzDecoder;
use oxonto::io::OntologyFormat;
use oxonto::oxrdf::NamedOrBlankNode;
use oxonto::reasoner::{DefaultReasoner, ReasonerConfig, ReasoningProfile};
use oxonto::validate::{Finding, Severity};
use oxonto::{Ontology, OntologyMetadata};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufWriter, Write, stdin, stdout};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);
    match args.command {
        Command::New {
            base,
            label,
            comment,
            creator,
            output,
        } => {
            let mut ontology =
                Ontology::new(&base).with_context(|| format!("Invalid base IRI {base}"))?;
            ontology.set_metadata(&OntologyMetadata {
                label,
                comment,
                creator,
                version_iri: None,
            })?;
            write_ontology(&ontology, &output)
        }
        Command::Convert { input, output } => write_ontology(&read_ontology(&input)?, &output),
        Command::Validate { input, json } => {
            let findings = read_ontology(&input)?.validate();
            let mut stdout = stdout().lock();
            if json {
                let records = findings.iter().map(FindingRecord::from).collect::<Vec<_>>();
                serde_json::to_writer_pretty(&mut stdout, &records)?;
                writeln!(stdout)?;
            } else {
                for finding in &findings {
                    writeln!(stdout, "{finding}")?;
                }
            }
            stdout.flush()?;
            let errors = findings
                .iter()
                .filter(|f| f.severity == Severity::Error)
                .count();
            ensure!(errors == 0, "The ontology has {errors} error finding(s)");
            Ok(())
        }
        Command::Reason {
            input,
            output,
            profile,
            max_iterations,
            no_consistency_check,
        } => {
            let profile = ReasoningProfile::from_name(&profile).with_context(|| {
                format!(
                    "The reasoning profile '{profile}' is unknown, expected 'rdfs', 'owl-rl' or 'owl-rl-ext'"
                )
            })?;
            let mut config = ReasonerConfig::default();
            if let Some(max_iterations) = max_iterations {
                config = config.with_max_iterations(max_iterations);
            }
            if no_consistency_check {
                config = config.without_consistency_check();
            }
            let mut ontology = read_ontology(&input)?;
            let added = ontology
                .apply_reasoning_with(&DefaultReasoner::with_config(config), profile)
                .context("Reasoning failed")?;
            info!(%profile, added, "materialized entailments");
            write_ontology(&ontology, &output)
        }
        Command::Stats { input } => {
            let statistics = read_ontology(&input)?.statistics();
            let mut stdout = stdout().lock();
            writeln!(stdout, "{statistics}")?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

fn read_ontology(input: &Input) -> anyhow::Result<Ontology> {
    let mut ontology = Ontology::default();
    let base = input.from_base.as_deref();
    let triples = if let Some(file) = &input.from_file {
        let compressed = file.extension() == Some(OsStr::new("gz"));
        let format = if let Some(format) = &input.from_format {
            format_from_name(format)?
        } else if compressed {
            format_from_path(&file.with_extension(""))?
        } else {
            format_from_path(file)?
        };
        let fp = File::open(file)
            .with_context(|| format!("Error while opening file {}", file.display()))?;
        if compressed {
            ontology.import_from_reader(MultiGzDecoder::new(fp), format, base)
        } else {
            ontology.import_from_reader(fp, format, base)
        }
        .with_context(|| format!("Error while loading file {}", file.display()))?
    } else {
        let Some(format) = &input.from_format else {
            bail!("The --from-format option must be set when reading from stdin")
        };
        ontology.import_from_reader(stdin().lock(), format_from_name(format)?, base)?
    };
    info!(triples, "loaded ontology");
    Ok(ontology)
}

fn write_ontology(ontology: &Ontology, output: &Output) -> anyhow::Result<()> {
    let format = if let Some(format) = &output.to_format {
        format_from_name(format)?
    } else if let Some(file) = &output.to_file {
        format_from_path(file)?
    } else {
        bail!("The --to-format option must be set when writing to stdout")
    };
    if let Some(file) = &output.to_file {
        close_file_writer(ontology.export_to_writer(BufWriter::new(File::create(file)?), format)?)?;
    } else {
        ontology
            .export_to_writer(stdout().lock(), format)?
            .flush()?;
    }
    Ok(())
}

fn format_from_path(path: &Path) -> anyhow::Result<OntologyFormat> {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    };
    OntologyFormat::from_extension(ext).with_context(|| {
        format!("Not able to guess the file format from file name extension '{ext}'")
    })
}

fn format_from_name(name: &str) -> anyhow::Result<OntologyFormat> {
    OntologyFormat::from_name(name).with_context(|| format!("The file format '{name}' is unknown"))
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

/// JSON shape of a validation finding.
#[derive(Serialize)]
struct FindingRecord<'a> {
    severity: &'static str,
    kind: &'static str,
    subject: String,
    message: &'a str,
}

impl<'a> From<&'a Finding> for FindingRecord<'a> {
    fn from(finding: &'a Finding) -> Self {
        Self {
            severity: finding.severity.name(),
            kind: finding.kind.name(),
            subject: match &finding.subject {
                NamedOrBlankNode::NamedNode(node) => node.as_str().to_owned(),
                NamedOrBlankNode::BlankNode(node) => node.to_string(),
            },
            message: &finding.message,
        }
    }
}
