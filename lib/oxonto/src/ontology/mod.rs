//! The [`Ontology`] editing facade.
//!
//! Every mutating method first checks all of its preconditions against the current graph
//! and only then applies a single [`ChangeSet`]. A failed call therefore never leaves
//! a partial write behind.

mod annotations;
mod axioms;
mod classes;
mod delete;
mod header;
mod individuals;
mod properties;
mod relations;
mod restrictions;

pub use annotations::ANNOTATION_SHORTCUTS;
pub use axioms::{ClassExpression, ClassExpressionKind, ListAxiom};
pub use classes::{ClassDefinition, ClassUpdate};
pub use delete::DeletionPolicy;
pub use header::OntologyMetadata;
pub use individuals::{IndividualDefinition, IndividualUpdate};
pub use properties::{
    DataPropertyDefinition, DataPropertyUpdate, ObjectPropertyDefinition, ObjectPropertyUpdate,
};

use crate::error::OntologyError;
use crate::model::{Entity, EntityKind};
use crate::namespace::Namespace;
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{
    Graph, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term,
    TermRef, Triple, TripleRef,
};
use tracing::debug;

/// An OWL ontology held as a single in-memory RDF graph plus the namespace new entities are minted in.
///
/// Names given to the methods are resolved with [`Namespace::resolve`]: `Person`, `:Person`
/// and `http://example.org/ontology#Person` all denote the same class in the default namespace.
///
/// ```
/// use oxonto::{Ontology, RelationKind};
///
/// let mut ontology = Ontology::default();
/// ontology.add_class("Person", None)?;
/// ontology.add_class("Student", Some("Person"))?;
/// assert!(ontology.add_relation("Person", RelationKind::SubClassOf, "Student").is_err());
/// assert_eq!(ontology.classes().len(), 2);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct Ontology {
    graph: Graph,
    namespace: Namespace,
    deletion_policy: DeletionPolicy,
}

impl Ontology {
    /// Creates an empty ontology whose entities are minted under `base_iri`.
    pub fn new(base_iri: &str) -> Result<Self, OntologyError> {
        Ok(Self::with_namespace(Namespace::new(base_iri)?))
    }

    fn with_namespace(namespace: Namespace) -> Self {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(
            namespace.ontology_iri().as_ref(),
            rdf::TYPE,
            owl::ONTOLOGY,
        ));
        Self {
            graph,
            namespace,
            deletion_policy: DeletionPolicy::default(),
        }
    }

    /// Sets how deletions of still referenced entities are handled.
    #[must_use]
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    #[inline]
    pub fn deletion_policy(&self) -> DeletionPolicy {
        self.deletion_policy
    }

    #[inline]
    pub fn set_deletion_policy(&mut self, policy: DeletionPolicy) {
        self.deletion_policy = policy;
    }

    /// The underlying RDF graph.
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[inline]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[inline]
    pub fn ontology_iri(&self) -> &NamedNode {
        self.namespace.ontology_iri()
    }

    /// Number of triples in the graph.
    #[inline]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Resolves a name to an IRI in the current namespace.
    #[inline]
    pub fn resolve(&self, name: &str) -> Result<NamedNode, OntologyError> {
        self.namespace.resolve(name)
    }

    /// Drops all the content and starts a new ontology under the current namespace.
    pub fn clear(&mut self) {
        *self = Self::with_namespace(self.namespace.clone())
            .with_deletion_policy(self.deletion_policy);
    }

    /// Replaces the whole state, used by imports once the new graph is fully parsed.
    pub(crate) fn replace(&mut self, graph: Graph, namespace: Namespace) {
        self.graph = graph;
        self.namespace = namespace;
    }

    /// The kind the IRI is declared as, if any.
    ///
    /// When an IRI carries several declarations the first one in [`EntityKind::ALL`] order wins.
    pub fn kind_of(&self, iri: NamedNodeRef<'_>) -> Option<EntityKind> {
        let mut kinds = self
            .graph
            .objects_for_subject_predicate(iri, rdf::TYPE)
            .filter_map(|t| match t {
                TermRef::NamedNode(t) => EntityKind::from_declaration(t),
                _ => None,
            })
            .collect::<Vec<_>>();
        kinds.sort_unstable();
        kinds.first().copied()
    }

    /// Checks if the IRI is declared with the given kind.
    pub fn has_kind(&self, iri: NamedNodeRef<'_>, kind: EntityKind) -> bool {
        self.graph.contains(TripleRef::new(iri, rdf::TYPE, kind.declaration()))
            || (kind == EntityKind::Class
                && self.graph.contains(TripleRef::new(iri, rdf::TYPE, rdfs::CLASS)))
    }

    /// Looks up an entity by name.
    pub fn entity(&self, name: &str) -> Result<Option<Entity>, OntologyError> {
        let iri = self.resolve(name)?;
        Ok(self.kind_of(iri.as_ref()).map(|kind| match kind {
            EntityKind::Class => Entity::Class(self.class_info(iri)),
            EntityKind::ObjectProperty => Entity::ObjectProperty(self.object_property_info(iri)),
            EntityKind::DataProperty => Entity::DataProperty(self.data_property_info(iri)),
            EntityKind::AnnotationProperty => {
                Entity::AnnotationProperty(self.annotation_property_info(iri))
            }
            EntityKind::Individual => Entity::Individual(self.individual_info(iri)),
        }))
    }

    /// All named entities declared with the given kind, sorted by IRI.
    pub fn entities(&self, kind: EntityKind) -> Vec<NamedNode> {
        let mut entities = self.named_subjects(rdf::TYPE, kind.declaration());
        if kind == EntityKind::Class {
            entities.extend(self.named_subjects(rdf::TYPE, rdfs::CLASS));
            sort_iris(&mut entities);
            entities.dedup();
        }
        entities
    }

    /// Resolves a name that must not be declared yet.
    pub(crate) fn require_undeclared(&self, name: &str) -> Result<NamedNode, OntologyError> {
        let iri = self.resolve(name)?;
        if let Some(existing) = self.kind_of(iri.as_ref()) {
            return Err(OntologyError::DuplicateIdentifier { iri, existing });
        }
        Ok(iri)
    }

    /// Resolves a name that must be declared with the given kind.
    ///
    /// `owl:Thing` and `owl:Nothing` are always accepted as classes.
    pub(crate) fn require(&self, name: &str, kind: EntityKind) -> Result<NamedNode, OntologyError> {
        let iri = self.resolve(name)?;
        if self.has_kind(iri.as_ref(), kind)
            || (kind == EntityKind::Class && (iri == owl::THING || iri == owl::NOTHING))
        {
            Ok(iri)
        } else {
            Err(OntologyError::UnknownReference {
                iri,
                expected: Some(kind),
            })
        }
    }

    /// Resolves a name that must be declared as a property of any kind.
    pub(crate) fn require_property(
        &self,
        name: &str,
    ) -> Result<(NamedNode, EntityKind), OntologyError> {
        let iri = self.resolve(name)?;
        match self.kind_of(iri.as_ref()) {
            Some(kind) if kind.is_property() => Ok((iri, kind)),
            _ => Err(OntologyError::UnknownReference {
                iri,
                expected: Some(EntityKind::ObjectProperty),
            }),
        }
    }

    /// Resolves a name that must be declared with some kind, or be the ontology itself.
    pub(crate) fn require_resource(&self, name: &str) -> Result<NamedNode, OntologyError> {
        let iri = self.resolve(name)?;
        if &iri == self.ontology_iri() || self.kind_of(iri.as_ref()).is_some() {
            Ok(iri)
        } else {
            Err(OntologyError::UnknownReference {
                iri,
                expected: None,
            })
        }
    }

    pub(crate) fn commit(&mut self, changes: ChangeSet) -> usize {
        if changes.is_empty() {
            return 0;
        }
        let mut removed = 0;
        for triple in &changes.removals {
            if self.graph.remove(triple) {
                removed += 1;
            }
        }
        let mut inserted = 0;
        for triple in &changes.insertions {
            if self.graph.insert(triple) {
                inserted += 1;
            }
        }
        debug!(inserted, removed, "applied ontology changes");
        inserted + removed
    }

    /// Named objects of `subject predicate ?o`, sorted by IRI.
    pub(crate) fn named_objects<'a>(
        &self,
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: NamedNodeRef<'a>,
    ) -> Vec<NamedNode> {
        let mut objects = self
            .graph
            .objects_for_subject_predicate(subject, predicate)
            .filter_map(|o| match o {
                TermRef::NamedNode(o) => Some(o.into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>();
        sort_iris(&mut objects);
        objects
    }

    /// Named subjects of `?s predicate object`, sorted by IRI.
    pub(crate) fn named_subjects<'a>(
        &self,
        predicate: NamedNodeRef<'a>,
        object: impl Into<TermRef<'a>>,
    ) -> Vec<NamedNode> {
        let mut subjects = self
            .graph
            .subjects_for_predicate_object(predicate, object)
            .filter_map(|s| match s {
                NamedOrBlankNodeRef::NamedNode(s) => Some(s.into_owned()),
                NamedOrBlankNodeRef::BlankNode(_) => None,
            })
            .collect::<Vec<_>>();
        sort_iris(&mut subjects);
        subjects
    }

    /// The lexically smallest literal value of `subject predicate ?o`.
    pub(crate) fn literal_value(
        &self,
        subject: NamedNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Option<String> {
        self.graph
            .objects_for_subject_predicate(subject, predicate)
            .filter_map(|o| match o {
                TermRef::Literal(l) => Some(l.value()),
                _ => None,
            })
            .min()
            .map(str::to_owned)
    }

    /// Schedules the replacement of every value of `subject predicate` by a plain literal.
    ///
    /// `None` keeps the current values, an empty string only removes them.
    pub(crate) fn replace_literal(
        &self,
        changes: &mut ChangeSet,
        subject: &NamedNode,
        predicate: NamedNodeRef<'_>,
        value: Option<&str>,
    ) {
        let Some(value) = value else {
            return;
        };
        changes.remove_matching(&self.graph, subject.as_ref(), predicate);
        if !value.is_empty() {
            changes.add(
                subject.clone(),
                predicate,
                Literal::new_simple_literal(value),
            );
        }
    }

    /// Schedules the replacement of every value of `subject predicate` by `value`.
    pub(crate) fn replace_reference(
        &self,
        changes: &mut ChangeSet,
        subject: &NamedNode,
        predicate: NamedNodeRef<'_>,
        value: Option<NamedNode>,
    ) {
        changes.remove_matching(&self.graph, subject.as_ref(), predicate);
        if let Some(value) = value {
            changes.add(subject.clone(), predicate, value);
        }
    }

    /// Resolves an optional reference edit: `None` keeps, `""` clears, a name sets.
    pub(crate) fn resolve_edit(
        &self,
        value: Option<&str>,
        kind: EntityKind,
    ) -> Result<Option<Option<NamedNode>>, OntologyError> {
        match value {
            None => Ok(None),
            Some("") => Ok(Some(None)),
            Some(name) => Ok(Some(Some(self.require(name, kind)?))),
        }
    }
}

impl Clone for Ontology {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.iter().collect(),
            namespace: self.namespace.clone(),
            deletion_policy: self.deletion_policy,
        }
    }
}

impl Default for Ontology {
    fn default() -> Self {
        Self::with_namespace(Namespace::default())
    }
}

/// A batch of triple removals and insertions, applied in that order.
#[derive(Debug, Default)]
pub(crate) struct ChangeSet {
    removals: Vec<Triple>,
    insertions: Vec<Triple>,
}

impl ChangeSet {
    pub fn add(
        &mut self,
        subject: impl Into<NamedOrBlankNode>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) {
        self.insertions.push(Triple::new(subject, predicate, object));
    }

    pub fn insert(&mut self, triple: Triple) {
        self.insertions.push(triple);
    }

    pub fn remove(&mut self, triple: Triple) {
        self.removals.push(triple);
    }

    pub fn remove_all(&mut self, triples: impl IntoIterator<Item = Triple>) {
        self.removals.extend(triples);
    }

    /// Schedules the removal of all the `subject predicate ?o` triples of `graph`.
    pub fn remove_matching(
        &mut self,
        graph: &Graph,
        subject: NamedNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) {
        self.removals.extend(
            graph
                .objects_for_subject_predicate(subject, predicate)
                .map(|o| Triple::new(subject.into_owned(), predicate, o.into_owned())),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.insertions.is_empty()
    }
}

pub(crate) fn sort_iris(iris: &mut [NamedNode]) {
    iris.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_neighbours_with_a_borrowed_predicate() {
        let mut ontology = Ontology::default();
        let person = ontology.add_class("Person", None).unwrap();
        let student = ontology.add_class("Student", Some("Person")).unwrap();
        let predicate = NamedNode::new_unchecked(rdfs::SUB_CLASS_OF.as_str());
        assert_eq!(
            ontology.named_objects(student.as_ref(), predicate.as_ref()),
            [person.clone()]
        );
        assert_eq!(
            ontology.named_subjects(predicate.as_ref(), person.as_ref()),
            [student]
        );
    }
}
