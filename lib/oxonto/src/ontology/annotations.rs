use super::{ChangeSet, Ontology, sort_iris};
use crate::error::OntologyError;
use crate::model::{Annotation, EntityKind};
use crate::vocab::{dcterms, owl, skos};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Literal, NamedNode, NamedNodeRef, TermRef, Triple};
use rustc_hash::FxHashSet;

/// Short names accepted in place of the usual annotation predicates.
pub const ANNOTATION_SHORTCUTS: [(&str, NamedNodeRef<'static>); 15] = [
    ("label", rdfs::LABEL),
    ("comment", rdfs::COMMENT),
    ("seeAlso", rdfs::SEE_ALSO),
    ("isDefinedBy", rdfs::IS_DEFINED_BY),
    ("prefLabel", skos::PREF_LABEL),
    ("altLabel", skos::ALT_LABEL),
    ("definition", skos::DEFINITION),
    ("example", skos::EXAMPLE),
    ("note", skos::NOTE),
    ("title", dcterms::TITLE),
    ("description", dcterms::DESCRIPTION),
    ("creator", dcterms::CREATOR),
    ("contributor", dcterms::CONTRIBUTOR),
    ("date", dcterms::DATE),
    ("deprecated", owl::DEPRECATED),
];

/// Predicates carrying logical structure rather than documentation.
const STRUCTURAL_PREDICATES: [NamedNodeRef<'static>; 35] = [
    rdf::TYPE,
    rdf::FIRST,
    rdf::REST,
    rdfs::SUB_CLASS_OF,
    rdfs::SUB_PROPERTY_OF,
    rdfs::DOMAIN,
    rdfs::RANGE,
    owl::EQUIVALENT_CLASS,
    owl::EQUIVALENT_PROPERTY,
    owl::DISJOINT_WITH,
    owl::PROPERTY_DISJOINT_WITH,
    owl::INVERSE_OF,
    owl::PROPERTY_CHAIN_AXIOM,
    owl::ON_PROPERTY,
    owl::ON_CLASS,
    owl::ON_DATA_RANGE,
    owl::SOME_VALUES_FROM,
    owl::ALL_VALUES_FROM,
    owl::HAS_VALUE,
    owl::MIN_CARDINALITY,
    owl::MAX_CARDINALITY,
    owl::CARDINALITY,
    owl::MIN_QUALIFIED_CARDINALITY,
    owl::MAX_QUALIFIED_CARDINALITY,
    owl::QUALIFIED_CARDINALITY,
    owl::UNION_OF,
    owl::INTERSECTION_OF,
    owl::COMPLEMENT_OF,
    owl::ONE_OF,
    owl::DISJOINT_UNION_OF,
    owl::HAS_KEY,
    owl::DISTINCT_MEMBERS,
    owl::SAME_AS,
    owl::DIFFERENT_FROM,
    owl::IMPORTS,
];

impl Ontology {
    /// Adds a literal annotation to a declared entity or to the ontology itself.
    ///
    /// `predicate` may be a shortcut such as `label` or `prefLabel` (see [`ANNOTATION_SHORTCUTS`]),
    /// a prefixed name, an IRI or a name local to the base namespace.
    /// Returns `false` if the annotation already existed.
    ///
    /// ```
    /// use oxonto::Ontology;
    ///
    /// let mut ontology = Ontology::default();
    /// ontology.add_class("Person", None)?;
    /// ontology.add_annotation("Person", "prefLabel", "Personne", Some("fr"))?;
    /// let annotations = ontology.annotations("Person")?;
    /// assert_eq!(
    ///     annotations[0].predicate.as_str(),
    ///     "http://www.w3.org/2004/02/skos/core#prefLabel"
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn add_annotation(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        language: Option<&str>,
    ) -> Result<bool, OntologyError> {
        let subject = self.require_resource(subject)?;
        let predicate = self.annotation_predicate(predicate)?;
        let value = annotation_literal(value, language)?;
        let mut changes = ChangeSet::default();
        changes.add(subject, predicate, value);
        Ok(self.commit(changes) > 0)
    }

    /// Replaces every value of the annotation by a single one.
    pub fn set_annotation(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        language: Option<&str>,
    ) -> Result<(), OntologyError> {
        let subject = self.require_resource(subject)?;
        let predicate = self.annotation_predicate(predicate)?;
        let value = annotation_literal(value, language)?;
        let mut changes = ChangeSet::default();
        changes.remove_matching(&self.graph, subject.as_ref(), predicate.as_ref());
        changes.add(subject, predicate, value);
        self.commit(changes);
        Ok(())
    }

    /// Removes the values of an annotation, or only the ones with the given lexical form.
    ///
    /// Returns the number of removed values.
    pub fn remove_annotation(
        &mut self,
        subject: &str,
        predicate: &str,
        value: Option<&str>,
    ) -> Result<usize, OntologyError> {
        let subject = self.resolve(subject)?;
        let predicate = self.annotation_predicate(predicate)?;
        let removed = self
            .graph
            .objects_for_subject_predicate(subject.as_ref(), predicate.as_ref())
            .filter(|o| {
                value.is_none_or(|value| match o {
                    TermRef::Literal(l) => l.value() == value,
                    TermRef::NamedNode(n) => n.as_str() == value,
                    _ => false,
                })
            })
            .map(|o| Triple::new(subject.clone(), predicate.clone(), o.into_owned()))
            .collect::<Vec<_>>();
        let mut changes = ChangeSet::default();
        changes.remove_all(removed);
        Ok(self.commit(changes))
    }

    /// The documentation-like statements about a resource, sorted by predicate.
    ///
    /// Structural predicates, property assertions and blank node values are skipped.
    pub fn annotations(&self, subject: &str) -> Result<Vec<Annotation>, OntologyError> {
        let subject = self.resolve(subject)?;
        let mut annotations = self
            .graph
            .triples_for_subject(subject.as_ref())
            .filter(|t| self.is_annotation(t.predicate, t.object))
            .map(|t| Annotation {
                predicate: t.predicate.into_owned(),
                value: t.object.into_owned(),
            })
            .collect::<Vec<_>>();
        annotations.sort_by_cached_key(|a| (a.predicate.as_str().to_owned(), a.value.to_string()));
        Ok(annotations)
    }

    /// Distinct annotation predicates used anywhere in the ontology, sorted by IRI.
    pub fn annotation_predicates(&self) -> Vec<NamedNode> {
        let mut predicates = self
            .graph
            .iter()
            .filter(|t| self.is_annotation(t.predicate, t.object))
            .map(|t| t.predicate)
            .collect::<FxHashSet<_>>()
            .into_iter()
            .map(NamedNodeRef::into_owned)
            .collect::<Vec<_>>();
        sort_iris(&mut predicates);
        predicates
    }

    fn annotation_predicate(&self, name: &str) -> Result<NamedNode, OntologyError> {
        match ANNOTATION_SHORTCUTS.iter().find(|(short, _)| *short == name) {
            Some((_, predicate)) => Ok(predicate.into_owned()),
            None => self.resolve(name),
        }
    }

    fn is_annotation(&self, predicate: NamedNodeRef<'_>, object: TermRef<'_>) -> bool {
        !matches!(object, TermRef::BlankNode(_))
            && !STRUCTURAL_PREDICATES.contains(&predicate)
            && !self.has_kind(predicate, EntityKind::ObjectProperty)
            && !self.has_kind(predicate, EntityKind::DataProperty)
    }
}

fn annotation_literal(value: &str, language: Option<&str>) -> Result<Literal, OntologyError> {
    match language.filter(|l| !l.is_empty()) {
        Some(language) => Literal::new_language_tagged_literal(value, language).map_err(|error| {
            OntologyError::InvalidLanguageTag {
                tag: language.into(),
                error,
            }
        }),
        None => Ok(Literal::new_simple_literal(value)),
    }
}
