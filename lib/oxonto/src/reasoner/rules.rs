//! RDFS entailment rules and the OWL 2 RL consistency checks, named after the W3C rule tables.

use crate::error::ReasoningError;
use crate::list::read_list;
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNodeRef, NamedOrBlankNodeRef, Term, TermRef, Triple, TripleRef};
use rustc_hash::FxHashSet;

/// An RDFS entailment rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Rdfs2,
    Rdfs3,
    Rdfs5,
    Rdfs7,
    Rdfs9,
    Rdfs11,
}

pub(super) const RDFS_RULES: [Rule; 6] = [
    Rule::Rdfs2,
    Rule::Rdfs3,
    Rule::Rdfs5,
    Rule::Rdfs7,
    Rule::Rdfs9,
    Rule::Rdfs11,
];

impl Rule {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rdfs2 => "rdfs2",
            Self::Rdfs3 => "rdfs3",
            Self::Rdfs5 => "rdfs5",
            Self::Rdfs7 => "rdfs7",
            Self::Rdfs9 => "rdfs9",
            Self::Rdfs11 => "rdfs11",
        }
    }

    /// Adds to `out` the conclusions of the rule that `graph` does not already contain.
    pub(super) fn apply(self, graph: &Graph, out: &mut Inferences<'_>) {
        match self {
            Self::Rdfs2 | Self::Rdfs3 => {
                let schema = if self == Self::Rdfs2 {
                    rdfs::DOMAIN
                } else {
                    rdfs::RANGE
                };
                for t in graph.triples_for_predicate(schema) {
                    let Some(p) = named_subject(t.subject) else {
                        continue;
                    };
                    for x in graph.triples_for_predicate(p) {
                        let instance: TermRef<'_> = if self == Self::Rdfs2 {
                            x.subject.into()
                        } else {
                            x.object
                        };
                        out.add(instance, rdf::TYPE, t.object);
                    }
                }
            }
            Self::Rdfs5 => transitive(graph, rdfs::SUB_PROPERTY_OF, out),
            Self::Rdfs7 => {
                for t in graph.triples_for_predicate(rdfs::SUB_PROPERTY_OF) {
                    if let (Some(p), Some(q)) = (named_subject(t.subject), named(t.object)) {
                        for x in graph.triples_for_predicate(p) {
                            out.add(x.subject.into(), q, x.object);
                        }
                    }
                }
            }
            Self::Rdfs9 => {
                for t in graph.triples_for_predicate(rdfs::SUB_CLASS_OF) {
                    for x in graph.subjects_for_predicate_object(rdf::TYPE, t.subject) {
                        out.add(x.into(), rdf::TYPE, t.object);
                    }
                }
            }
            Self::Rdfs11 => transitive(graph, rdfs::SUB_CLASS_OF, out),
        }
    }
}

/// Predicates whose object is an RDF list in the OWL 2 RDF mapping.
const LIST_PREDICATES: [NamedNodeRef<'static>; 9] = [
    owl::UNION_OF,
    owl::INTERSECTION_OF,
    owl::ONE_OF,
    owl::PROPERTY_CHAIN_AXIOM,
    owl::HAS_KEY,
    owl::DISTINCT_MEMBERS,
    owl::MEMBERS,
    owl::DISJOINT_UNION_OF,
    owl::WITH_RESTRICTIONS,
];

/// Fails if a list used by an OWL construct is cyclic, truncated or too long.
pub(super) fn check_lists(graph: &Graph) -> Result<(), ReasoningError> {
    for predicate in LIST_PREDICATES {
        for t in graph.triples_for_predicate(predicate) {
            list(graph, t.object)?;
        }
    }
    Ok(())
}

/// A rule detecting a contradiction in a closed graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsistencyRule {
    CaxDw,
    ClsCom,
    ClsNothing2,
    EqDiff1,
    EqDiff2,
    PrpIrp,
    PrpAsp,
}

pub(super) const CONSISTENCY_RULES: [ConsistencyRule; 7] = [
    ConsistencyRule::CaxDw,
    ConsistencyRule::ClsCom,
    ConsistencyRule::ClsNothing2,
    ConsistencyRule::EqDiff1,
    ConsistencyRule::EqDiff2,
    ConsistencyRule::PrpIrp,
    ConsistencyRule::PrpAsp,
];

impl ConsistencyRule {
    pub const fn name(self) -> &'static str {
        match self {
            Self::CaxDw => "cax-dw",
            Self::ClsCom => "cls-com",
            Self::ClsNothing2 => "cls-nothing2",
            Self::EqDiff1 => "eq-diff1",
            Self::EqDiff2 => "eq-diff2",
            Self::PrpIrp => "prp-irp",
            Self::PrpAsp => "prp-asp",
        }
    }

    pub(super) fn check(self, graph: &Graph) -> Result<(), ReasoningError> {
        let clash = |message: String| {
            Err(ReasoningError::Inconsistent {
                rule: self.name(),
                message,
            })
        };
        match self {
            Self::CaxDw | Self::ClsCom => {
                let predicate = if self == Self::CaxDw {
                    owl::DISJOINT_WITH
                } else {
                    owl::COMPLEMENT_OF
                };
                for t in graph.triples_for_predicate(predicate) {
                    for x in graph.subjects_for_predicate_object(rdf::TYPE, t.subject) {
                        if is_instance(graph, x.into(), t.object) {
                            return clash(format!(
                                "{x} is an instance of both {} and {}",
                                t.subject, t.object
                            ));
                        }
                    }
                }
            }
            Self::ClsNothing2 => {
                if let Some(x) = graph
                    .subjects_for_predicate_object(rdf::TYPE, owl::NOTHING)
                    .next()
                {
                    return clash(format!("{x} is an instance of owl:Nothing"));
                }
            }
            Self::EqDiff1 => {
                for t in graph.triples_for_predicate(owl::DIFFERENT_FROM) {
                    if TermRef::from(t.subject) == t.object || same(graph, t.subject.into(), t.object)
                    {
                        return clash(format!(
                            "{} is both the same as and different from {}",
                            t.subject, t.object
                        ));
                    }
                }
            }
            Self::EqDiff2 => {
                for t in graph.triples_for_predicate(owl::DISTINCT_MEMBERS) {
                    let members = list(graph, t.object)?;
                    for (i, a) in members.iter().enumerate() {
                        for b in &members[i + 1..] {
                            if a == b || same(graph, a.as_ref(), b.as_ref()) {
                                return clash(format!(
                                    "{a} and {b} are declared different but are the same"
                                ));
                            }
                        }
                    }
                }
            }
            Self::PrpIrp => {
                for p in properties_of_type(graph, owl::IRREFLEXIVE_PROPERTY) {
                    for x in graph.triples_for_predicate(p) {
                        if TermRef::from(x.subject) == x.object {
                            return clash(format!(
                                "{} is related to itself by the irreflexive property {p}",
                                x.subject
                            ));
                        }
                    }
                }
            }
            Self::PrpAsp => {
                for p in properties_of_type(graph, owl::ASYMMETRIC_PROPERTY) {
                    for x in graph.triples_for_predicate(p) {
                        if let Some(y) = resource(x.object) {
                            if graph.contains(TripleRef::new(y, p, x.subject)) {
                                return clash(format!(
                                    "{} and {y} are related both ways by the asymmetric property {p}",
                                    x.subject
                                ));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// The triples derived during one round, excluding the ones already in the graph.
pub(super) struct Inferences<'a> {
    graph: &'a Graph,
    triples: FxHashSet<Triple>,
}

impl<'a> Inferences<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            triples: FxHashSet::default(),
        }
    }

    /// Records a conclusion. Conclusions with a literal subject are dropped.
    pub fn add(&mut self, subject: TermRef<'_>, predicate: NamedNodeRef<'_>, object: TermRef<'_>) {
        let Some(subject) = resource(subject) else {
            return;
        };
        let triple = TripleRef::new(subject, predicate, object);
        if !self.graph.contains(triple) {
            self.triples.insert(triple.into_owned());
        }
    }

    /// The new triples in a stable order.
    pub fn into_triples(self) -> Vec<Triple> {
        let mut triples = self.triples.into_iter().collect::<Vec<_>>();
        triples.sort_by_cached_key(Triple::to_string);
        triples
    }
}

/// `x p y . y p z -> x p z`
fn transitive(graph: &Graph, p: NamedNodeRef<'_>, out: &mut Inferences<'_>) {
    for x in graph.triples_for_predicate(p) {
        let Some(y) = resource(x.object) else {
            continue;
        };
        for z in graph.objects_for_subject_predicate(y, p) {
            out.add(x.subject.into(), p, z);
        }
    }
}

fn list(graph: &Graph, head: TermRef<'_>) -> Result<Vec<Term>, ReasoningError> {
    read_list(graph, head).ok_or_else(|| ReasoningError::MalformedList(head.to_string()))
}

fn properties_of_type<'a>(graph: &'a Graph, kind: NamedNodeRef<'_>) -> Vec<NamedNodeRef<'a>> {
    graph
        .subjects_for_predicate_object(rdf::TYPE, kind)
        .filter_map(named_subject)
        .collect()
}

fn is_instance(graph: &Graph, x: TermRef<'_>, class: TermRef<'_>) -> bool {
    resource(x).is_some_and(|x| graph.contains(TripleRef::new(x, rdf::TYPE, class)))
}

fn same(graph: &Graph, a: TermRef<'_>, b: TermRef<'_>) -> bool {
    let linked = |from: TermRef<'_>, to: TermRef<'_>| {
        resource(from).is_some_and(|from| graph.contains(TripleRef::new(from, owl::SAME_AS, to)))
    };
    linked(a, b) || linked(b, a)
}

fn resource(term: TermRef<'_>) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node.into()),
        TermRef::BlankNode(node) => Some(node.into()),
        _ => None,
    }
}

fn named(term: TermRef<'_>) -> Option<NamedNodeRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node),
        _ => None,
    }
}

fn named_subject(subject: NamedOrBlankNodeRef<'_>) -> Option<NamedNodeRef<'_>> {
    match subject {
        NamedOrBlankNodeRef::NamedNode(node) => Some(node),
        NamedOrBlankNodeRef::BlankNode(_) => None,
    }
}
