use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use crate::namespace::Namespace;
use crate::vocab::{dcterms, owl};
use oxrdf::vocab::rdfs;
use oxrdf::{
    Graph, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef, Triple,
    TripleRef,
};
use tracing::info;

/// Descriptive fields of the `owl:Ontology` header.
///
/// When setting, `None` keeps the current value and an empty string removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OntologyMetadata {
    pub label: Option<String>,
    pub comment: Option<String>,
    /// `dcterms:creator`.
    pub creator: Option<String>,
    /// `owl:versionIRI`.
    pub version_iri: Option<String>,
}

impl Ontology {
    pub fn set_metadata(&mut self, metadata: &OntologyMetadata) -> Result<(), OntologyError> {
        let version_iri = match metadata.version_iri.as_deref() {
            None => None,
            Some("") => Some(None),
            Some(iri) => Some(Some(
                NamedNode::new(iri).map_err(|e| OntologyError::invalid_iri(iri, e))?,
            )),
        };
        let ontology = self.ontology_iri().clone();
        let mut changes = ChangeSet::default();
        self.replace_literal(&mut changes, &ontology, rdfs::LABEL, metadata.label.as_deref());
        self.replace_literal(
            &mut changes,
            &ontology,
            rdfs::COMMENT,
            metadata.comment.as_deref(),
        );
        self.replace_literal(
            &mut changes,
            &ontology,
            dcterms::CREATOR,
            metadata.creator.as_deref(),
        );
        if let Some(version_iri) = version_iri {
            self.replace_reference(&mut changes, &ontology, owl::VERSION_IRI, version_iri);
        }
        self.commit(changes);
        Ok(())
    }

    pub fn metadata(&self) -> OntologyMetadata {
        let ontology = self.ontology_iri().as_ref();
        OntologyMetadata {
            label: self.literal_value(ontology, rdfs::LABEL),
            comment: self.literal_value(ontology, rdfs::COMMENT),
            creator: self.literal_value(ontology, dcterms::CREATOR),
            version_iri: self
                .named_objects(ontology, owl::VERSION_IRI)
                .into_iter()
                .next()
                .map(NamedNode::into_string),
        }
    }

    /// Adds an `owl:imports` of another ontology, returning `false` if it was already imported.
    pub fn add_import(&mut self, iri: &str) -> Result<bool, OntologyError> {
        let import = NamedNode::new(iri).map_err(|e| OntologyError::invalid_iri(iri, e))?;
        let mut changes = ChangeSet::default();
        changes.add(self.ontology_iri().clone(), owl::IMPORTS, import);
        Ok(self.commit(changes) > 0)
    }

    pub fn remove_import(&mut self, iri: &str) -> Result<bool, OntologyError> {
        let import = NamedNode::new(iri).map_err(|e| OntologyError::invalid_iri(iri, e))?;
        let mut changes = ChangeSet::default();
        changes.remove(Triple::new(self.ontology_iri().clone(), owl::IMPORTS, import));
        Ok(self.commit(changes) > 0)
    }

    pub fn imports(&self) -> Vec<NamedNode> {
        self.named_objects(self.ontology_iri().as_ref(), owl::IMPORTS)
    }

    /// Moves the ontology to a new base IRI.
    ///
    /// Every IRI minted under the old base, the ontology IRI included, is rewritten to the
    /// same local name under the new base so that previously returned names keep resolving.
    pub fn set_base_iri(&mut self, base_iri: &str) -> Result<(), OntologyError> {
        let mut namespace = Namespace::new(base_iri)?;
        if namespace.base() == self.namespace.base() {
            return Ok(());
        }
        namespace.inherit_prefixes(&self.namespace);
        let old = &self.namespace;
        let mut graph = Graph::new();
        let mut rewritten = 0;
        for triple in &self.graph {
            match rewrite(triple, |iri| namespace.rebase_iri(old, iri)) {
                Some(triple) => {
                    rewritten += 1;
                    graph.insert(&triple);
                }
                None => {
                    graph.insert(triple);
                }
            }
        }
        info!(
            from = old.base(),
            to = namespace.base(),
            rewritten,
            "changed base IRI"
        );
        self.replace(graph, namespace);
        Ok(())
    }

    /// Gives a new IRI to a declared entity, rewriting it in every triple.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<NamedNode, OntologyError> {
        let old = self.resolve(old)?;
        if self.kind_of(old.as_ref()).is_none() {
            return Err(OntologyError::UnknownReference {
                iri: old,
                expected: None,
            });
        }
        let new = self.require_undeclared(new)?;
        let mentions = self
            .graph
            .triples_for_subject(old.as_ref())
            .chain(self.graph.triples_for_predicate(old.as_ref()))
            .chain(self.graph.triples_for_object(old.as_ref()))
            .map(TripleRef::into_owned)
            .collect::<Vec<_>>();
        let mut changes = ChangeSet::default();
        for triple in mentions {
            let renamed = rewrite(triple.as_ref(), |iri| {
                (iri == old.as_ref()).then(|| new.clone())
            });
            if let Some(renamed) = renamed {
                changes.insert(renamed);
            }
            changes.remove(triple);
        }
        self.commit(changes);
        Ok(new)
    }
}

/// Applies `map` to every IRI of the triple, returning the new triple if something changed.
fn rewrite(
    triple: TripleRef<'_>,
    map: impl Fn(NamedNodeRef<'_>) -> Option<NamedNode>,
) -> Option<Triple> {
    let subject = match triple.subject {
        NamedOrBlankNodeRef::NamedNode(s) => map(s).map(NamedOrBlankNode::from),
        NamedOrBlankNodeRef::BlankNode(_) => None,
    };
    let predicate = map(triple.predicate);
    let object = match triple.object {
        TermRef::NamedNode(o) => map(o).map(Term::from),
        _ => None,
    };
    if subject.is_none() && predicate.is_none() && object.is_none() {
        return None;
    }
    Some(Triple::new(
        subject.unwrap_or_else(|| triple.subject.into_owned()),
        predicate.unwrap_or_else(|| triple.predicate.into_owned()),
        object.unwrap_or_else(|| triple.object.into_owned()),
    ))
}
