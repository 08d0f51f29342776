#![allow(clippy::panic_in_result_fn)]

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::prelude::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use predicates::prelude::*;
use std::io::Write;

const PERSON_STUDENT: &str = "@prefix : <http://example.org/ontology#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
:Person a owl:Class .
:Student a owl:Class ; rdfs:subClassOf :Person .
";

const PERSON_STUDENT_NT: &str = "<http://example.org/ontology#Person> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://example.org/ontology#Student> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
<http://example.org/ontology#Student> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/ontology#Person> .
";

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("oxonto")?)
}

#[test]
fn cli_help() -> Result<()> {
    cli_command()?
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with("OxOnto"));
    Ok(())
}

#[test]
fn cli_new_to_stdout() -> Result<()> {
    cli_command()?
        .arg("new")
        .arg("--base")
        .arg("http://example.com/family")
        .arg("--label")
        .arg("Family")
        .arg("--to-format")
        .arg("nt")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<http://example.com/family> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Ontology> .",
        ))
        .stdout(predicate::str::contains("\"Family\""));
    Ok(())
}

#[test]
fn cli_new_with_invalid_base() -> Result<()> {
    cli_command()?
        .arg("new")
        .arg("--base")
        .arg("not an iri")
        .arg("--to-format")
        .arg("ttl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base IRI"));
    Ok(())
}

#[test]
fn cli_convert_file() -> Result<()> {
    let input_file = NamedTempFile::new("input.ttl")?;
    input_file.write_str(PERSON_STUDENT)?;
    let output_file = NamedTempFile::new("output.nt")?;
    cli_command()?
        .arg("convert")
        .arg("--from-file")
        .arg(input_file.path())
        .arg("--to-file")
        .arg(output_file.path())
        .assert()
        .success();
    output_file.assert(PERSON_STUDENT_NT);
    Ok(())
}

#[test]
fn cli_convert_gzip_file() -> Result<()> {
    let input_file = NamedTempFile::new("input.nt.gz")?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(PERSON_STUDENT_NT.as_bytes())?;
    input_file.write_binary(&encoder.finish()?)?;
    cli_command()?
        .arg("convert")
        .arg("-f")
        .arg(input_file.path())
        .arg("--to-format")
        .arg("nt")
        .assert()
        .success()
        .stdout(PERSON_STUDENT_NT);
    Ok(())
}

#[test]
fn cli_convert_from_stdin_to_stdout() -> Result<()> {
    cli_command()?
        .arg("convert")
        .arg("--from-format")
        .arg("text/turtle")
        .arg("--to-format")
        .arg("ntriples")
        .write_stdin(PERSON_STUDENT)
        .assert()
        .success()
        .stdout(PERSON_STUDENT_NT);
    Ok(())
}

#[test]
fn cli_convert_syntax_error() -> Result<()> {
    cli_command()?
        .arg("convert")
        .arg("--from-format")
        .arg("ttl")
        .arg("--to-format")
        .arg("nt")
        .write_stdin("<http://example.com/s> <http://example.com/p> .")
        .assert()
        .failure()
        .stdout("");
    Ok(())
}

#[test]
fn cli_convert_to_json_ld_only() -> Result<()> {
    cli_command()?
        .arg("convert")
        .arg("--from-format")
        .arg("jsonld")
        .arg("--to-format")
        .arg("nt")
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON-LD"));
    Ok(())
}

#[test]
fn cli_validate_warnings() -> Result<()> {
    cli_command()?
        .arg("validate")
        .arg("--from-format")
        .arg("ttl")
        .arg("--json")
        .write_stdin(
            "@prefix : <http://example.org/ontology#> .
             @prefix owl: <http://www.w3.org/2002/07/owl#> .
             :alice a owl:NamedIndividual .",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"UntypedIndividual\""))
        .stdout(predicate::str::contains(
            "\"subject\": \"http://example.org/ontology#alice\"",
        ));
    Ok(())
}

#[test]
fn cli_validate_errors() -> Result<()> {
    cli_command()?
        .arg("validate")
        .arg("--from-format")
        .arg("ttl")
        .write_stdin(
            "@prefix : <http://example.org/ontology#> .
             @prefix owl: <http://www.w3.org/2002/07/owl#> .
             @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
             :A a owl:Class ; rdfs:label \"A\" ; owl:disjointWith :B .
             :B a owl:Class ; rdfs:label \"B\" .
             :x a owl:NamedIndividual, :A, :B .",
        )
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] DisjointnessViolation"))
        .stderr(predicate::str::contains("error finding"));
    Ok(())
}

#[test]
fn cli_reason_rdfs() -> Result<()> {
    cli_command()?
        .arg("reason")
        .arg("--from-format")
        .arg("ttl")
        .arg("--profile")
        .arg("rdfs")
        .arg("--to-format")
        .arg("nt")
        .write_stdin(format!("{PERSON_STUDENT}:alice a :Student .\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<http://example.org/ontology#alice> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/ontology#Person> .",
        ));
    Ok(())
}

#[test]
fn cli_reason_owl_rl_ext() -> Result<()> {
    cli_command()?
        .arg("reason")
        .arg("--from-format")
        .arg("ttl")
        .arg("--profile")
        .arg("owl-rl-ext")
        .arg("--to-format")
        .arg("nt")
        .write_stdin(format!(
            "{PERSON_STUDENT}:Person rdfs:subClassOf :Agent .\n:alice a :Student .\n"
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<http://example.org/ontology#alice> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/ontology#Agent> .",
        ));
    Ok(())
}

#[test]
fn cli_reason_unknown_profile() -> Result<()> {
    cli_command()?
        .arg("reason")
        .arg("--from-format")
        .arg("ttl")
        .arg("--profile")
        .arg("owl-full")
        .arg("--to-format")
        .arg("nt")
        .write_stdin(PERSON_STUDENT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("owl-full"));
    Ok(())
}

#[test]
fn cli_stats() -> Result<()> {
    let input_file = NamedTempFile::new("input.ttl")?;
    input_file.write_str(PERSON_STUDENT)?;
    cli_command()?
        .arg("stats")
        .arg("--from-file")
        .arg(input_file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("classes: 2"))
        .stdout(predicate::str::contains("triples: 3"));
    Ok(())
}

#[test]
fn cli_json_logs() -> Result<()> {
    cli_command()?
        .env("RUST_LOG", "info")
        .arg("--log-format")
        .arg("json")
        .arg("stats")
        .arg("--from-format")
        .arg("ttl")
        .write_stdin(PERSON_STUDENT)
        .assert()
        .success()
        .stderr(predicate::str::contains("\"level\":\"INFO\""));
    Ok(())
}
