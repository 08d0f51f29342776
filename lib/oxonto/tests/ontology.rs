#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use oxonto::oxrdf::vocab::{rdfs, xsd};
use oxonto::oxrdf::{Literal, NamedNode, NamedOrBlankNodeRef, TermRef};
use oxonto::{
    Characteristic, ClassExpressionKind, ClassUpdate, Datatype, DeletionPolicy, EntityKind,
    Filler, Ontology, OntologyError, OntologyMetadata, PropertyValue, RelationKind, Restriction,
};
use std::error::Error;

fn iri(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/ontology#{name}"))
}

fn mentions(ontology: &Ontology, name: &str) -> bool {
    let iri = iri(name);
    ontology.graph().iter().any(|t| {
        t.subject == NamedOrBlankNodeRef::NamedNode(iri.as_ref())
            || t.predicate == iri.as_ref()
            || t.object == TermRef::NamedNode(iri.as_ref())
    })
}

fn pets() -> Result<Ontology, OntologyError> {
    let mut ontology = Ontology::default();
    ontology.add_class("Person", None)?;
    ontology.add_class("Animal", None)?;
    ontology.add_object_property("hasPet", Some("Person"), Some("Animal"), &[])?;
    Ok(ontology)
}

#[test]
fn test_new_ontology_has_header() -> Result<(), Box<dyn Error>> {
    let ontology = Ontology::new("http://example.com/family")?;
    assert_eq!(ontology.namespace().base(), "http://example.com/family#");
    assert_eq!(ontology.ontology_iri().as_str(), "http://example.com/family");
    assert_eq!(ontology.len(), 1);
    Ok(())
}

#[test]
fn test_duplicate_identifier() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    let before = ontology.clone();
    assert!(matches!(
        ontology.add_class("Person", None),
        Err(OntologyError::DuplicateIdentifier {
            existing: EntityKind::Class,
            ..
        })
    ));
    assert!(matches!(
        ontology.add_data_property("hasPet", None, Datatype::String),
        Err(OntologyError::DuplicateIdentifier {
            existing: EntityKind::ObjectProperty,
            ..
        })
    ));
    assert_eq!(ontology.graph(), before.graph());
    Ok(())
}

#[test]
fn test_unknown_reference() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    let before = ontology.clone();
    assert!(matches!(
        ontology.add_class("Student", Some("Pupil")),
        Err(OntologyError::UnknownReference { .. })
    ));
    assert!(matches!(
        ontology.add_object_property("hasOwner", Some("Animal"), Some("Owner"), &[]),
        Err(OntologyError::UnknownReference { .. })
    ));
    assert!(matches!(
        ontology.add_individual(
            "alice",
            &["Person"],
            &[("hasPet", PropertyValue::individual("rex"))]
        ),
        Err(OntologyError::UnknownReference { .. })
    ));
    assert_eq!(ontology.graph(), before.graph());
    Ok(())
}

#[test]
fn test_subclass_cycle_is_refused() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("A", None)?;
    ontology.add_class("B", Some("A"))?;
    ontology.add_class("C", Some("B"))?;
    let before = ontology.clone();
    assert!(matches!(
        ontology.add_relation("A", RelationKind::SubClassOf, "C"),
        Err(OntologyError::CycleDetected { .. })
    ));
    assert!(matches!(
        ontology.add_relation("A", RelationKind::SubClassOf, "A"),
        Err(OntologyError::CycleDetected { .. })
    ));
    assert!(matches!(
        ontology.edit_class(
            "B",
            &ClassUpdate {
                add_parents: vec!["C".into()],
                ..ClassUpdate::default()
            }
        ),
        Err(OntologyError::CycleDetected { .. })
    ));
    assert_eq!(ontology.graph(), before.graph());
    assert!(ontology.add_relation("C", RelationKind::SubClassOf, "A")?);
    Ok(())
}

#[test]
fn test_cascade_deletion_clears_domain() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    assert_eq!(ontology.deletion_policy(), DeletionPolicy::Cascade);
    assert_eq!(ontology.delete_class("Person")?, 2);
    assert!(!mentions(&ontology, "Person"));
    let properties = ontology.object_properties();
    assert_eq!(properties.len(), 1);
    assert!(properties[0].domains.is_empty());
    assert_eq!(properties[0].ranges, vec![iri("Animal")]);
    Ok(())
}

#[test]
fn test_reject_deletion_keeps_graph() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?.with_deletion_policy(DeletionPolicy::Reject);
    let before = ontology.clone();
    assert!(matches!(
        ontology.delete_class("Animal"),
        Err(OntologyError::EntityInUse { references: 1, .. })
    ));
    assert_eq!(ontology.graph(), before.graph());

    ontology.add_class("Plant", None)?;
    assert_eq!(ontology.delete_class("Plant")?, 1);
    assert_eq!(ontology.graph(), before.graph());
    Ok(())
}

#[test]
fn test_cascade_deletion_removes_restrictions() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Pizza", None)?;
    ontology.add_class("Topping", None)?;
    ontology.add_object_property("hasTopping", None, None, &[])?;
    ontology.add_restriction(
        "Pizza",
        "hasTopping",
        &Restriction::SomeValuesFrom(Filler::class("Topping")),
    )?;
    assert_eq!(ontology.restrictions(Some("Pizza"))?.len(), 1);

    ontology.delete_class("Topping")?;
    assert!(ontology.restrictions(None)?.is_empty());
    assert!(ontology.graph().iter().all(|t| t.subject.is_named_node()));
    assert!(!mentions(&ontology, "Topping"));
    Ok(())
}

#[test]
fn test_restriction_fillers_are_checked() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Person", None)?;
    ontology.add_object_property("knows", None, None, &[])?;
    ontology.add_data_property("age", None, Datatype::Integer)?;
    let before = ontology.clone();
    assert!(matches!(
        ontology.add_restriction(
            "Person",
            "knows",
            &Restriction::AllValuesFrom(Filler::Datatype(Datatype::String))
        ),
        Err(OntologyError::InvalidRestriction(_))
    ));
    assert!(matches!(
        ontology.add_restriction(
            "Person",
            "age",
            &Restriction::SomeValuesFrom(Filler::class("Person"))
        ),
        Err(OntologyError::InvalidRestriction(_))
    ));
    assert_eq!(ontology.graph(), before.graph());

    ontology.add_restriction(
        "Person",
        "age",
        &Restriction::ExactCardinality {
            cardinality: 1,
            qualifier: None,
        },
    )?;
    let restrictions = ontology.restrictions(Some("Person"))?;
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].cardinality, Some(1));
    assert_eq!(restrictions[0].property, iri("age"));
    Ok(())
}

#[test]
fn test_edit_class_labels() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Person", None)?;
    ontology.edit_class(
        "Person",
        &ClassUpdate {
            label: Some("Human being".into()),
            ..ClassUpdate::default()
        },
    )?;
    assert_eq!(ontology.classes()[0].label.as_deref(), Some("Human being"));
    ontology.edit_class(
        "Person",
        &ClassUpdate {
            label: Some(String::new()),
            ..ClassUpdate::default()
        },
    )?;
    assert_eq!(ontology.classes()[0].label, None);
    Ok(())
}

#[test]
fn test_rename_rewrites_references() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    ontology.add_class("Student", Some("Person"))?;
    assert!(matches!(
        ontology.rename("Person", "Animal"),
        Err(OntologyError::DuplicateIdentifier { .. })
    ));
    assert_eq!(ontology.rename("Person", "Human")?, iri("Human"));
    assert!(!mentions(&ontology, "Person"));
    let students = ontology.classes();
    let student = students
        .iter()
        .find(|c| c.iri == iri("Student"))
        .ok_or("Student is missing")?;
    assert_eq!(student.parents, vec![iri("Human")]);
    assert_eq!(ontology.object_properties()[0].domains, vec![iri("Human")]);
    Ok(())
}

#[test]
fn test_individual_values() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    ontology.add_data_property("age", Some("Person"), Datatype::Integer)?;
    ontology.add_individual("rex", &["Animal"], &[])?;
    ontology.add_individual(
        "alice",
        &["Person"],
        &[
            ("hasPet", PropertyValue::individual("rex")),
            (
                "age",
                PropertyValue::literal(Literal::new_typed_literal("42", xsd::INTEGER)),
            ),
        ],
    )?;
    let individuals = ontology.individuals();
    let alice = individuals
        .iter()
        .find(|i| i.iri == iri("alice"))
        .ok_or("alice is missing")?;
    assert_eq!(alice.classes, vec![iri("Person")]);
    assert_eq!(alice.values.len(), 2);

    assert_eq!(ontology.delete_individual("rex")?, 3);
    assert!(!mentions(&ontology, "rex"));
    Ok(())
}

#[test]
fn test_property_characteristics() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_object_property(
        "ancestorOf",
        None,
        None,
        &[Characteristic::Transitive, Characteristic::Irreflexive],
    )?;
    let properties = ontology.object_properties();
    assert_eq!(properties[0].characteristics.len(), 2);
    assert!(
        properties[0]
            .characteristics
            .contains(&Characteristic::Transitive)
    );
    Ok(())
}

#[test]
fn test_relations() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    ontology.add_class("Plant", None)?;
    assert!(ontology.add_relation("Animal", RelationKind::DisjointWith, "Plant")?);
    assert!(!ontology.add_relation("Animal", RelationKind::DisjointWith, "Plant")?);
    assert!(matches!(
        ontology.add_relation("Animal", RelationKind::DisjointWith, "Animal"),
        Err(OntologyError::InvalidRelation { .. })
    ));
    assert!(ontology.add_relation("hasPet", RelationKind::SubClassOf, "Plant").is_err());
    assert_eq!(ontology.relations(Some(RelationKind::DisjointWith)).len(), 1);
    assert!(ontology.remove_relation("Animal", RelationKind::DisjointWith, "Plant")?);
    assert!(ontology.relations(Some(RelationKind::DisjointWith)).is_empty());
    Ok(())
}

#[test]
fn test_annotations() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    assert!(ontology.add_annotation("Person", "label", "Person", Some("en"))?);
    assert!(ontology.add_annotation("Person", "label", "Personne", Some("fr"))?);
    assert!(
        ontology
            .add_annotation("Person", "label", "Person", Some("not a tag!"))
            .is_err()
    );
    let annotations = ontology.annotations("Person")?;
    assert_eq!(annotations.len(), 2);
    assert!(annotations.iter().all(|a| a.predicate == rdfs::LABEL));

    ontology.set_annotation("Person", "rdfs:label", "Human", None)?;
    assert_eq!(ontology.annotations("Person")?.len(), 1);
    assert_eq!(ontology.remove_annotation("Person", "label", None)?, 1);
    assert!(ontology.annotations("Person")?.is_empty());
    assert!(matches!(
        ontology.add_annotation("Nobody", "comment", "?", None),
        Err(OntologyError::UnknownReference { .. })
    ));
    Ok(())
}

#[test]
fn test_metadata() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    let metadata = OntologyMetadata {
        label: Some("Pets".into()),
        comment: Some("Who owns whom".into()),
        creator: Some("Jane".into()),
        version_iri: Some("http://example.org/ontology/1.0".into()),
    };
    ontology.set_metadata(&metadata)?;
    assert_eq!(ontology.metadata(), metadata);
    ontology.set_metadata(&OntologyMetadata {
        comment: Some(String::new()),
        ..OntologyMetadata::default()
    })?;
    assert_eq!(ontology.metadata().comment, None);
    assert_eq!(ontology.metadata().label.as_deref(), Some("Pets"));

    assert!(ontology.add_import("http://example.org/base")?);
    assert_eq!(ontology.imports().len(), 1);
    assert!(ontology.remove_import("http://example.org/base")?);
    Ok(())
}

#[test]
fn test_axioms() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?;
    ontology.add_class("Plant", None)?;
    ontology.add_class("LivingBeing", None)?;
    ontology.add_individual("rex", &["Animal"], &[])?;
    ontology.add_individual("felix", &["Animal"], &[])?;

    ontology.add_class_expression(
        "LivingBeing",
        ClassExpressionKind::UnionOf,
        &["Person", "Animal", "Plant"],
    )?;
    let expressions = ontology.class_expressions(Some("LivingBeing"))?;
    assert_eq!(expressions.len(), 1);
    assert_eq!(expressions[0].members.len(), 3);

    ontology.add_all_different(&["rex", "felix"])?;
    assert_eq!(ontology.all_different()[0].members.len(), 2);
    assert!(matches!(
        ontology.add_all_different(&["rex"]),
        Err(OntologyError::InvalidAxiom(_))
    ));
    assert!(matches!(
        ontology.add_class_expression("Plant", ClassExpressionKind::UnionOf, &["Tree"]),
        Err(OntologyError::UnknownReference { .. })
    ));
    Ok(())
}

#[test]
fn test_clear() -> Result<(), Box<dyn Error>> {
    let mut ontology = pets()?.with_deletion_policy(DeletionPolicy::Reject);
    ontology.clear();
    assert_eq!(ontology.len(), 1);
    assert_eq!(ontology.deletion_policy(), DeletionPolicy::Reject);
    assert!(ontology.entity("Person")?.is_none());
    Ok(())
}
