#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use oxonto::oxrdf::vocab::{rdf, rdfs, xsd};
use oxonto::oxrdf::{Graph, Literal, NamedNode, Triple, TripleRef};
use oxonto::reasoner::{DefaultReasoner, Reasoner, ReasonerConfig, ReasoningProfile, Rule};
use oxonto::vocab::owl;
use oxonto::{
    Characteristic, Datatype, Filler, Ontology, OntologyError, PropertyValue, ReasoningError,
    RelationKind, Restriction,
};
use std::error::Error;

fn iri(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/ontology#{name}"))
}

fn has_type(ontology: &Ontology, individual: &str, class: &str) -> bool {
    ontology
        .graph()
        .contains(TripleRef::new(&iri(individual), rdf::TYPE, &iri(class)))
}

fn has_value(ontology: &Ontology, subject: &str, property: &str, object: &str) -> bool {
    ontology
        .graph()
        .contains(TripleRef::new(&iri(subject), &iri(property), &iri(object)))
}

fn family() -> Result<Ontology, OntologyError> {
    let mut ontology = Ontology::default();
    ontology.add_class("Person", None)?;
    ontology.add_class("Parent", Some("Person"))?;
    ontology.add_object_property("hasChild", Some("Parent"), Some("Person"), &[])?;
    ontology.add_object_property("hasParent", None, None, &[])?;
    ontology.add_object_property("ancestorOf", None, None, &[Characteristic::Transitive])?;
    ontology.add_object_property("marriedTo", None, None, &[Characteristic::Symmetric])?;
    ontology.add_relation("hasParent", RelationKind::InverseOf, "hasChild")?;
    ontology.add_relation("hasChild", RelationKind::SubPropertyOf, "ancestorOf")?;
    ontology.add_individual("carol", &[], &[])?;
    ontology.add_individual("dave", &[], &[])?;
    ontology.add_individual("bob", &[], &[("hasChild", PropertyValue::individual("carol"))])?;
    ontology.add_individual(
        "alice",
        &[],
        &[
            ("hasChild", PropertyValue::individual("bob")),
            ("marriedTo", PropertyValue::individual("dave")),
        ],
    )?;
    Ok(ontology)
}

#[test]
fn test_rdfs_materialization() -> Result<(), Box<dyn Error>> {
    let mut ontology = family()?;
    let added = ontology.apply_reasoning(ReasoningProfile::Rdfs)?;
    assert!(added > 0);
    // rdfs2 and rdfs9
    assert!(has_type(&ontology, "alice", "Parent"));
    assert!(has_type(&ontology, "alice", "Person"));
    // rdfs3
    assert!(has_type(&ontology, "carol", "Person"));
    // rdfs7
    assert!(has_value(&ontology, "alice", "ancestorOf", "bob"));
    // OWL RL only
    assert!(!has_value(&ontology, "alice", "ancestorOf", "carol"));
    assert!(!has_value(&ontology, "carol", "hasParent", "bob"));
    assert_eq!(ontology.apply_reasoning(ReasoningProfile::Rdfs)?, 0);
    Ok(())
}

#[test]
fn test_owl_rl_materialization() -> Result<(), Box<dyn Error>> {
    let mut ontology = family()?;
    assert!(ontology.apply_reasoning(ReasoningProfile::OwlRl)? > 0);
    // rdfs7 then prp-trp
    assert!(has_value(&ontology, "alice", "ancestorOf", "carol"));
    // prp-inv2
    assert!(has_value(&ontology, "carol", "hasParent", "bob"));
    // prp-symp
    assert!(has_value(&ontology, "dave", "marriedTo", "alice"));
    assert_eq!(ontology.apply_reasoning(ReasoningProfile::OwlRl)?, 0);
    Ok(())
}

#[test]
fn test_owl_rl_ext_materialization() -> Result<(), Box<dyn Error>> {
    let mut ontology = family()?;
    assert!(ontology.apply_reasoning(ReasoningProfile::OwlRlExt)? > 0);
    assert!(has_type(&ontology, "alice", "Parent"));
    assert!(has_value(&ontology, "alice", "ancestorOf", "carol"));
    assert_eq!(ontology.apply_reasoning(ReasoningProfile::OwlRlExt)?, 0);
    assert_eq!(ontology.apply_reasoning(ReasoningProfile::OwlRl)?, 0);
    assert_eq!(ontology.apply_reasoning(ReasoningProfile::Rdfs)?, 0);
    Ok(())
}

#[test]
fn test_every_class_is_a_thing() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Person", None)?;
    ontology.apply_reasoning(ReasoningProfile::OwlRl)?;
    // scm-cls
    assert!(ontology.graph().contains(TripleRef::new(
        &iri("Person"),
        rdfs::SUB_CLASS_OF,
        owl::THING
    )));
    Ok(())
}

#[test]
fn test_max_cardinality_merges_values() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Person", None)?;
    ontology.add_object_property("hasMother", None, None, &[])?;
    ontology.add_restriction(
        "Person",
        "hasMother",
        &Restriction::MaxCardinality {
            cardinality: 1,
            qualifier: None,
        },
    )?;
    ontology.add_individual("m1", &[], &[])?;
    ontology.add_individual("m2", &[], &[])?;
    ontology.add_individual(
        "alice",
        &["Person"],
        &[
            ("hasMother", PropertyValue::individual("m1")),
            ("hasMother", PropertyValue::individual("m2")),
        ],
    )?;
    ontology.apply_reasoning(ReasoningProfile::OwlRl)?;
    // cls-maxc2
    assert!(
        ontology
            .graph()
            .contains(TripleRef::new(&iri("m1"), owl::SAME_AS, &iri("m2")))
    );
    Ok(())
}

#[test]
fn test_has_key_identifies_individuals() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Person", None)?;
    ontology.add_data_property("ssn", Some("Person"), Datatype::String)?;
    ontology.add_has_key("Person", &["ssn"])?;
    let ssn = PropertyValue::literal(Literal::new_typed_literal("123-45", xsd::STRING));
    ontology.add_individual("a", &["Person"], &[("ssn", ssn.clone())])?;
    ontology.add_individual("b", &["Person"], &[("ssn", ssn)])?;
    ontology.apply_reasoning(ReasoningProfile::OwlRl)?;
    // prp-key
    assert!(
        ontology
            .graph()
            .contains(TripleRef::new(&iri("a"), owl::SAME_AS, &iri("b")))
    );
    Ok(())
}

#[test]
fn test_has_value_restrictions() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Country", None)?;
    ontology.add_class("Italian", None)?;
    ontology.add_object_property("livesIn", None, Some("Country"), &[])?;
    ontology.add_individual("italy", &["Country"], &[])?;
    ontology.add_individual("mario", &["Italian"], &[])?;
    ontology.add_individual(
        "luigi",
        &[],
        &[("livesIn", PropertyValue::individual("italy"))],
    )?;
    ontology.add_restriction(
        "Italian",
        "livesIn",
        &Restriction::HasValue(PropertyValue::individual("italy")),
    )?;
    ontology.apply_reasoning(ReasoningProfile::OwlRl)?;
    // cls-hv1
    assert!(has_value(&ontology, "mario", "livesIn", "italy"));
    assert_eq!(ontology.apply_reasoning(ReasoningProfile::OwlRl)?, 0);
    Ok(())
}

#[test]
fn test_some_values_from() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Dog", None)?;
    ontology.add_class("DogOwner", None)?;
    ontology.add_object_property("owns", None, None, &[])?;
    ontology.add_individual("rex", &["Dog"], &[])?;
    ontology.add_individual("alice", &[], &[("owns", PropertyValue::individual("rex"))])?;
    let restriction = ontology.add_restriction(
        "DogOwner",
        "owns",
        &Restriction::SomeValuesFrom(Filler::class("Dog")),
    )?;
    // DogOwner is exactly the owners of a dog
    let mut graph = ontology.graph().iter().collect::<Graph>();
    graph.insert(TripleRef::new(&iri("DogOwner"), owl::EQUIVALENT_CLASS, &restriction));
    let inferred = DefaultReasoner::new().infer(&graph, ReasoningProfile::OwlRl)?;
    // cls-svf1 then cax-eqc2
    assert!(inferred.contains(&Triple::new(iri("alice"), rdf::TYPE, iri("DogOwner"))));
    Ok(())
}

#[test]
fn test_inconsistency_leaves_graph_unchanged() -> Result<(), Box<dyn Error>> {
    let mut ontology = Ontology::default();
    ontology.add_class("Cat", None)?;
    ontology.add_class("Dog", None)?;
    ontology.add_class("Puppy", Some("Dog"))?;
    ontology.add_relation("Cat", RelationKind::DisjointWith, "Dog")?;
    ontology.add_individual("garfield", &["Cat", "Puppy"], &[])?;
    let before = ontology.clone();
    assert!(matches!(
        ontology.apply_reasoning(ReasoningProfile::OwlRl),
        Err(OntologyError::Reasoning(ReasoningError::Inconsistent { .. }))
    ));
    assert_eq!(ontology.graph(), before.graph());

    // Without the consistency rules, the closure is added
    let reasoner =
        DefaultReasoner::with_config(ReasonerConfig::default().without_consistency_check());
    assert!(ontology.apply_reasoning_with(&reasoner, ReasoningProfile::OwlRl)? > 0);
    assert!(has_type(&ontology, "garfield", "Dog"));
    Ok(())
}

#[test]
fn test_iteration_limit_leaves_graph_unchanged() -> Result<(), Box<dyn Error>> {
    let mut ontology = family()?;
    let before = ontology.clone();
    let reasoner =
        DefaultReasoner::with_config(ReasonerConfig::default().with_max_iterations(1));
    assert!(matches!(
        ontology.apply_reasoning_with(&reasoner, ReasoningProfile::Rdfs),
        Err(OntologyError::Reasoning(ReasoningError::IterationLimit(1)))
    ));
    assert_eq!(ontology.graph(), before.graph());
    Ok(())
}

struct FixedReasoner(Result<Vec<Triple>, &'static str>);

impl Reasoner for FixedReasoner {
    fn name(&self) -> &str {
        "fixed"
    }

    fn infer(
        &self,
        _graph: &Graph,
        _profile: ReasoningProfile,
    ) -> Result<Vec<Triple>, ReasoningError> {
        self.0.clone().map_err(ReasoningError::engine)
    }
}

#[test]
fn test_custom_reasoner() -> Result<(), Box<dyn Error>> {
    let mut ontology = family()?;
    let before = ontology.clone();
    let failing = FixedReasoner(Err("the engine crashed"));
    assert!(matches!(
        ontology.apply_reasoning_with(&failing, ReasoningProfile::Rdfs),
        Err(OntologyError::Reasoning(ReasoningError::Engine(_)))
    ));
    assert_eq!(ontology.graph(), before.graph());

    let existing = Triple::new(iri("bob"), iri("hasChild"), iri("carol"));
    let new = Triple::new(iri("carol"), rdf::TYPE, iri("Person"));
    let fixed = FixedReasoner(Ok(vec![existing, new.clone(), new]));
    assert_eq!(
        ontology.apply_reasoning_with(&fixed, ReasoningProfile::Rdfs)?,
        1
    );
    assert_eq!(ontology.len(), before.len() + 1);
    Ok(())
}

#[test]
fn test_profiles() {
    assert_eq!(ReasoningProfile::default(), ReasoningProfile::OwlRl);
    assert_eq!(ReasoningProfile::Rdfs.to_string(), "rdfs");
    assert_eq!(
        ReasoningProfile::from_name("owl-rl-ext"),
        Some(ReasoningProfile::OwlRlExt)
    );
    assert!(ReasoningProfile::Rdfs.consistency_rules().is_empty());
    assert!(!ReasoningProfile::OwlRl.consistency_rules().is_empty());
    assert!(ReasoningProfile::OwlRl.rules().is_empty());
    assert_eq!(
        ReasoningProfile::OwlRlExt.rules(),
        ReasoningProfile::Rdfs.rules()
    );
    assert_eq!(Rule::Rdfs9.name(), "rdfs9");
}
