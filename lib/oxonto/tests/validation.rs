#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use oxonto::io::OntologyFormat;
use oxonto::validate::{FindingKind, Severity};
use oxonto::{ClassDefinition, Datatype, Ontology, RelationKind};
use std::error::Error;

fn labelled(ontology: &mut Ontology, name: &str) -> Result<(), Box<dyn Error>> {
    ontology.define_class(&ClassDefinition::new(name).with_label(name))?;
    Ok(())
}

#[test]
fn test_empty_ontology_is_clean() {
    assert!(Ontology::default().validate().is_empty());
}

#[test]
fn test_single_untyped_individual() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_individual("alice", &[], &[])?;
    let findings = ontology.validate();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::UntypedIndividual);
    assert_eq!(findings[0].severity, Severity::Warning);
    Ok(())
}

#[test]
fn test_findings_are_sorted_by_kind() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_individual("x", &[], &[])?;
    ontology.add_object_property("eats", None, None, &[])?;
    ontology.add_class("Zebra", None)?;
    ontology.add_data_property("weight", Some("Zebra"), Datatype::Double)?;
    let findings = ontology.validate();
    assert_eq!(
        findings.iter().map(|f| f.kind).collect::<Vec<_>>(),
        [
            FindingKind::MissingLabel,
            FindingKind::MissingDomain,
            FindingKind::MissingRange,
            FindingKind::UntypedIndividual,
        ]
    );
    assert_eq!(
        findings.iter().map(|f| f.severity).collect::<Vec<_>>(),
        [
            Severity::Warning,
            Severity::Info,
            Severity::Info,
            Severity::Warning,
        ]
    );
    assert_eq!(
        findings[1].subject.to_string(),
        "<http://example.org/ontology#eats>"
    );
    Ok(())
}

#[test]
fn test_inherited_disjointness() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    labelled(&mut ontology, "Animal")?;
    labelled(&mut ontology, "Plant")?;
    ontology.define_class(
        &ClassDefinition::new("Tree")
            .with_parent("Plant")
            .with_label("Tree"),
    )?;
    ontology.add_relation("Animal", RelationKind::DisjointWith, "Plant")?;
    ontology.add_individual("ent", &["Animal", "Tree"], &[])?;
    ontology.add_individual("oak", &["Tree"], &[])?;
    let findings = ontology.validate();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::DisjointnessViolation);
    assert_eq!(findings[0].severity, Severity::Error);
    assert!(findings[0].message.contains("ent"));
    Ok(())
}

#[test]
fn test_cyclic_graph_terminates() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.import_from_str(
        "@prefix : <http://example.org/ontology#> .
         @prefix owl: <http://www.w3.org/2002/07/owl#> .
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
         :A a owl:Class ; rdfs:label \"A\" ; rdfs:subClassOf :B .
         :B a owl:Class ; rdfs:label \"B\" ; rdfs:subClassOf :A ; owl:disjointWith :C .
         :C a owl:Class ; rdfs:label \"C\" .
         :p a owl:ObjectProperty ; rdfs:domain :A ; rdfs:range :A ; rdfs:subPropertyOf :p .
         :A rdfs:subClassOf [ a owl:Restriction ; owl:onProperty :p ; owl:someValuesFrom :A ] .
         :x a owl:NamedIndividual , :A , :C .",
        OntologyFormat::Turtle,
        None,
    )?;
    let before = ontology.clone();
    let findings = ontology.validate();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::DisjointnessViolation);
    assert_eq!(ontology.graph(), before.graph());
    Ok(())
}

#[test]
fn test_orphan_restriction_targets() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.import_from_str(
        "@prefix : <http://example.org/ontology#> .
         @prefix owl: <http://www.w3.org/2002/07/owl#> .
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
         @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
         :Country a owl:Class ; rdfs:label \"Country\" .
         :livesIn a owl:ObjectProperty ; rdfs:domain :Country ; rdfs:range :Country .
         :age a owl:DatatypeProperty ; rdfs:domain :Country ; rdfs:range xsd:integer .
         :Country rdfs:subClassOf
             [ a owl:Restriction ; owl:onProperty :livesIn ; owl:hasValue :atlantis ] ,
             [ a owl:Restriction ; owl:onProperty :age ; owl:allValuesFrom xsd:integer ] ,
             [ a owl:Restriction ; owl:onProperty :livesIn ; owl:allValuesFrom owl:Thing ] .",
        OntologyFormat::Turtle,
        None,
    )?;
    let findings = ontology.validate();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::OrphanRestrictionTarget);
    assert!(findings[0].message.contains("atlantis"));
    Ok(())
}
