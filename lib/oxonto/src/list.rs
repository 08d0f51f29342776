//! RDF collections (`rdf:first`/`rdf:rest` chains).

use oxrdf::vocab::rdf;
use oxrdf::{BlankNode, Graph, NamedOrBlankNodeRef, Term, TermRef, Triple};
use rustc_hash::FxHashSet;

/// Lists longer than this are considered malformed.
pub const MAX_LIST_LENGTH: usize = 10_000;

/// Builds the triples of a fresh RDF list holding `members`, returning its head.
pub fn build_list(members: impl IntoIterator<Item = Term>) -> (Term, Vec<Triple>) {
    let members = members.into_iter().collect::<Vec<_>>();
    let mut triples = Vec::with_capacity(members.len() * 2);
    let mut head: Term = rdf::NIL.into_owned().into();
    for member in members.into_iter().rev() {
        let cell = BlankNode::default();
        triples.push(Triple::new(cell.clone(), rdf::FIRST, member));
        triples.push(Triple::new(cell.clone(), rdf::REST, head));
        head = cell.into();
    }
    (head, triples)
}

/// Reads the members of the list starting at `head`.
///
/// Returns `None` if the list is cyclic, longer than [`MAX_LIST_LENGTH`], or if a cell
/// lacks `rdf:first` or `rdf:rest`.
pub fn read_list(graph: &Graph, head: TermRef<'_>) -> Option<Vec<Term>> {
    let mut members = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = head;
    loop {
        let cell: NamedOrBlankNodeRef<'_> = match current {
            TermRef::NamedNode(node) if node == rdf::NIL => return Some(members),
            TermRef::NamedNode(node) => node.into(),
            TermRef::BlankNode(node) => node.into(),
            _ => return None,
        };
        if !seen.insert(cell) || members.len() >= MAX_LIST_LENGTH {
            return None;
        }
        members.push(
            graph
                .object_for_subject_predicate(cell, rdf::FIRST)?
                .into_owned(),
        );
        current = graph.object_for_subject_predicate(cell, rdf::REST)?;
    }
}
