use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use oxrdf::{BlankNodeRef, Graph, NamedNode, NamedNodeRef, NamedOrBlankNodeRef, TermRef, Triple};
use rustc_hash::FxHashSet;
use tracing::debug;

/// What happens to the statements referring to an entity that is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeletionPolicy {
    /// Removes every statement mentioning the entity.
    ///
    /// Anonymous structures (restrictions, class expressions, lists) mentioning it are removed
    /// as a whole, together with the statements linking them to named resources.
    #[default]
    Cascade,
    /// Fails with [`OntologyError::EntityInUse`] while other statements refer to the entity.
    Reject,
}

impl Ontology {
    /// Removes an entity with its own description, following the deletion policy for references to it.
    pub(crate) fn delete_entity(&mut self, iri: &NamedNode) -> Result<usize, OntologyError> {
        let (mut triples, references) = own_triples(&self.graph, iri.as_ref());
        let references = references.into_iter().collect::<Vec<_>>();
        if !references.is_empty() {
            if self.deletion_policy == DeletionPolicy::Reject {
                return Err(OntologyError::EntityInUse {
                    iri: iri.clone(),
                    references: references.len(),
                });
            }
            for reference in &references {
                match reference.subject.as_ref() {
                    NamedOrBlankNodeRef::NamedNode(_) => {
                        if let TermRef::BlankNode(object) = reference.object.as_ref() {
                            if !references_elsewhere(&self.graph, object, reference) {
                                blank_closure(&self.graph, object, &mut triples);
                            }
                        }
                        triples.insert(reference.clone());
                    }
                    NamedOrBlankNodeRef::BlankNode(node) => {
                        blank_structure(&self.graph, node, &mut triples);
                    }
                }
            }
        }
        debug!(
            %iri,
            references = references.len(),
            triples = triples.len(),
            "deleting entity"
        );
        let mut changes = ChangeSet::default();
        changes.remove_all(triples);
        Ok(self.commit(changes))
    }
}

/// The triples describing `iri` and the statements of other resources referring to it.
fn own_triples(graph: &Graph, iri: NamedNodeRef<'_>) -> (FxHashSet<Triple>, FxHashSet<Triple>) {
    let mut own = FxHashSet::default();
    for triple in graph.triples_for_subject(iri) {
        if let TermRef::BlankNode(object) = triple.object {
            blank_closure(graph, object, &mut own);
        }
        own.insert(triple.into_owned());
    }
    let references = graph
        .triples_for_object(iri)
        .chain(graph.triples_for_predicate(iri))
        .filter(|t| !matches!(t.subject, NamedOrBlankNodeRef::NamedNode(s) if s == iri))
        .map(|t| t.into_owned())
        .filter(|t| !own.contains(t))
        .collect();
    (own, references)
}

fn references_elsewhere(graph: &Graph, node: BlankNodeRef<'_>, except: &Triple) -> bool {
    graph
        .triples_for_object(node)
        .any(|t| t != except.as_ref())
}

/// Collects the triples of `start` and of every blank node reachable from it.
pub(crate) fn blank_closure<'a>(
    graph: &'a Graph,
    start: BlankNodeRef<'a>,
    out: &mut FxHashSet<Triple>,
) {
    let mut seen = FxHashSet::default();
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        for triple in graph.triples_for_subject(node) {
            if let TermRef::BlankNode(object) = triple.object {
                stack.push(object);
            }
            out.insert(triple.into_owned());
        }
    }
}

/// Collects the whole anonymous structure containing `node`: the closure of its outermost
/// blank ancestor and the statements pointing to that ancestor.
pub(crate) fn blank_structure<'a>(
    graph: &'a Graph,
    node: BlankNodeRef<'a>,
    out: &mut FxHashSet<Triple>,
) {
    let root = blank_root(graph, node);
    blank_closure(graph, root, out);
    out.extend(graph.triples_for_object(root).map(|t| t.into_owned()));
}

fn blank_root<'a>(graph: &'a Graph, node: BlankNodeRef<'a>) -> BlankNodeRef<'a> {
    let mut seen = FxHashSet::default();
    let mut current = node;
    while seen.insert(current) {
        let parent = graph
            .triples_for_object(current)
            .find_map(|t| match t.subject {
                NamedOrBlankNodeRef::BlankNode(parent) if !seen.contains(&parent) => Some(parent),
                _ => None,
            });
        match parent {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::vocab::rdf;
    use oxrdf::{BlankNode, Literal};

    #[test]
    fn closure_follows_nested_blank_nodes() {
        let outer = BlankNode::default();
        let inner = BlankNode::default();
        let named = NamedNode::new_unchecked("http://example.com/a");
        let mut graph = Graph::new();
        graph.insert(&Triple::new(named.clone(), rdf::VALUE, outer.clone()));
        graph.insert(&Triple::new(outer.clone(), rdf::FIRST, inner.clone()));
        graph.insert(&Triple::new(
            inner.clone(),
            rdf::VALUE,
            Literal::new_simple_literal("x"),
        ));

        let mut closure = FxHashSet::default();
        blank_closure(&graph, outer.as_ref(), &mut closure);
        assert_eq!(closure.len(), 2);

        let mut structure = FxHashSet::default();
        blank_structure(&graph, inner.as_ref(), &mut structure);
        assert_eq!(structure.len(), 3);
    }
}
