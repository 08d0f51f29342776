use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use crate::list::{build_list, read_list};
use crate::model::EntityKind;
use crate::vocab::owl;
use oxrdf::vocab::rdf;
use oxrdf::{
    BlankNode, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef,
};
use std::fmt;

/// Boolean and enumerated class constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassExpressionKind {
    UnionOf,
    IntersectionOf,
    ComplementOf,
    OneOf,
}

impl ClassExpressionKind {
    pub const ALL: [Self; 4] = [
        Self::UnionOf,
        Self::IntersectionOf,
        Self::ComplementOf,
        Self::OneOf,
    ];

    #[inline]
    pub const fn predicate(self) -> NamedNodeRef<'static> {
        match self {
            Self::UnionOf => owl::UNION_OF,
            Self::IntersectionOf => owl::INTERSECTION_OF,
            Self::ComplementOf => owl::COMPLEMENT_OF,
            Self::OneOf => owl::ONE_OF,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnionOf => "unionOf",
            Self::IntersectionOf => "intersectionOf",
            Self::ComplementOf => "complementOf",
            Self::OneOf => "oneOf",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for ClassExpressionKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named class defined by a class constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassExpression {
    pub class: NamedNode,
    pub kind: ClassExpressionKind,
    /// Classes, or individuals for [`ClassExpressionKind::OneOf`].
    pub members: Vec<NamedNode>,
}

/// An axiom holding an RDF list of named members: property chains, keys, disjoint unions
/// and `owl:AllDifferent` groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAxiom {
    pub subject: NamedOrBlankNode,
    pub members: Vec<NamedNode>,
}

impl Ontology {
    /// States that following `chain` in order implies `property`.
    pub fn add_property_chain(&mut self, property: &str, chain: &[&str]) -> Result<(), OntologyError> {
        let property = self.require(property, EntityKind::ObjectProperty)?;
        if chain.len() < 2 {
            return Err(OntologyError::InvalidAxiom(format!(
                "the chain of {property} needs at least two properties"
            )));
        }
        let members = self.require_all(chain, EntityKind::ObjectProperty)?;
        self.add_list_axiom(property.into(), owl::PROPERTY_CHAIN_AXIOM, members);
        Ok(())
    }

    pub fn property_chains(&self) -> Vec<ListAxiom> {
        self.list_axioms(owl::PROPERTY_CHAIN_AXIOM)
    }

    /// Defines `class` with a class constructor.
    ///
    /// `owl:complementOf` takes exactly one class and is stored without a list,
    /// `owl:oneOf` takes individuals.
    pub fn add_class_expression(
        &mut self,
        class: &str,
        kind: ClassExpressionKind,
        members: &[&str],
    ) -> Result<(), OntologyError> {
        let class = self.require(class, EntityKind::Class)?;
        let member_kind = if kind == ClassExpressionKind::OneOf {
            EntityKind::Individual
        } else {
            EntityKind::Class
        };
        let mut members = self.require_all(members, member_kind)?;
        if members.is_empty() {
            return Err(OntologyError::InvalidAxiom(format!(
                "{kind} of {class} needs at least one member"
            )));
        }
        if kind != ClassExpressionKind::ComplementOf {
            self.add_list_axiom(class.into(), kind.predicate(), members);
            return Ok(());
        }
        let (Some(complement), None) = (members.pop(), members.pop()) else {
            return Err(OntologyError::InvalidAxiom(format!(
                "complementOf of {class} takes a single class"
            )));
        };
        if complement == class {
            return Err(OntologyError::InvalidAxiom(format!(
                "{class} can not be its own complement"
            )));
        }
        let mut changes = ChangeSet::default();
        changes.add(class, owl::COMPLEMENT_OF, complement);
        self.commit(changes);
        Ok(())
    }

    /// Class expressions on named classes, optionally only the ones of `class`.
    pub fn class_expressions(
        &self,
        class: Option<&str>,
    ) -> Result<Vec<ClassExpression>, OntologyError> {
        let filter = class.map(|class| self.resolve(class)).transpose()?;
        let mut expressions = Vec::new();
        for kind in ClassExpressionKind::ALL {
            for triple in self.graph.triples_for_predicate(kind.predicate()) {
                let NamedOrBlankNodeRef::NamedNode(class) = triple.subject else {
                    continue;
                };
                if filter.as_ref().is_some_and(|f| f.as_ref() != class) {
                    continue;
                }
                let members = if kind == ClassExpressionKind::ComplementOf {
                    match triple.object {
                        TermRef::NamedNode(member) => vec![member.into_owned()],
                        _ => Vec::new(),
                    }
                } else {
                    named_members(read_list(&self.graph, triple.object).unwrap_or_default())
                };
                if !members.is_empty() {
                    expressions.push(ClassExpression {
                        class: class.into_owned(),
                        kind,
                        members,
                    });
                }
            }
        }
        expressions.sort_by(|a, b| {
            a.class
                .as_str()
                .cmp(b.class.as_str())
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.members.len().cmp(&b.members.len()))
        });
        Ok(expressions)
    }

    /// Declares the individuals pairwise different, returning the `owl:AllDifferent` node.
    pub fn add_all_different(&mut self, individuals: &[&str]) -> Result<BlankNode, OntologyError> {
        if individuals.len() < 2 {
            return Err(OntologyError::InvalidAxiom(
                "owl:AllDifferent needs at least two individuals".into(),
            ));
        }
        let members = self.require_all(individuals, EntityKind::Individual)?;
        let node = BlankNode::default();
        let (head, triples) = build_list(members.into_iter().map(Term::from));
        let mut changes = ChangeSet::default();
        changes.add(node.clone(), rdf::TYPE, owl::ALL_DIFFERENT);
        changes.add(node.clone(), owl::DISTINCT_MEMBERS, head);
        for triple in triples {
            changes.insert(triple);
        }
        self.commit(changes);
        Ok(node)
    }

    pub fn all_different(&self) -> Vec<ListAxiom> {
        let mut axioms = self
            .graph
            .subjects_for_predicate_object(rdf::TYPE, owl::ALL_DIFFERENT)
            .filter_map(|node| {
                let head = self
                    .graph
                    .object_for_subject_predicate(node, owl::DISTINCT_MEMBERS)?;
                Some(ListAxiom {
                    subject: node.into_owned(),
                    members: named_members(read_list(&self.graph, head)?),
                })
            })
            .collect::<Vec<_>>();
        sort_axioms(&mut axioms);
        axioms
    }

    /// States that instances of `class` are identified by their values for `properties`.
    pub fn add_has_key(&mut self, class: &str, properties: &[&str]) -> Result<(), OntologyError> {
        let class = self.require(class, EntityKind::Class)?;
        if properties.is_empty() {
            return Err(OntologyError::InvalidAxiom(format!(
                "the key of {class} needs at least one property"
            )));
        }
        let members = properties
            .iter()
            .map(|p| {
                let (property, kind) = self.require_property(p)?;
                if kind == EntityKind::AnnotationProperty {
                    return Err(OntologyError::InvalidAxiom(format!(
                        "the annotation property {property} can not be part of a key"
                    )));
                }
                Ok(property)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.add_list_axiom(class.into(), owl::HAS_KEY, members);
        Ok(())
    }

    pub fn has_keys(&self) -> Vec<ListAxiom> {
        self.list_axioms(owl::HAS_KEY)
    }

    /// States that `class` is the disjoint union of `classes`.
    pub fn add_disjoint_union(&mut self, class: &str, classes: &[&str]) -> Result<(), OntologyError> {
        let class = self.require(class, EntityKind::Class)?;
        if classes.len() < 2 {
            return Err(OntologyError::InvalidAxiom(format!(
                "the disjoint union of {class} needs at least two classes"
            )));
        }
        let members = self.require_all(classes, EntityKind::Class)?;
        if members.contains(&class) {
            return Err(OntologyError::InvalidAxiom(format!(
                "{class} can not be part of its own disjoint union"
            )));
        }
        self.add_list_axiom(class.into(), owl::DISJOINT_UNION_OF, members);
        Ok(())
    }

    pub fn disjoint_unions(&self) -> Vec<ListAxiom> {
        self.list_axioms(owl::DISJOINT_UNION_OF)
    }

    fn require_all(&self, names: &[&str], kind: EntityKind) -> Result<Vec<NamedNode>, OntologyError> {
        names.iter().map(|name| self.require(name, kind)).collect()
    }

    fn add_list_axiom(
        &mut self,
        subject: NamedOrBlankNode,
        predicate: NamedNodeRef<'_>,
        members: Vec<NamedNode>,
    ) {
        let (head, triples) = build_list(members.into_iter().map(Term::from));
        let mut changes = ChangeSet::default();
        changes.add(subject, predicate, head);
        for triple in triples {
            changes.insert(triple);
        }
        self.commit(changes);
    }

    fn list_axioms(&self, predicate: NamedNodeRef<'_>) -> Vec<ListAxiom> {
        let mut axioms = self
            .graph
            .triples_for_predicate(predicate)
            .filter_map(|t| {
                Some(ListAxiom {
                    subject: t.subject.into_owned(),
                    members: named_members(read_list(&self.graph, t.object)?),
                })
            })
            .collect::<Vec<_>>();
        sort_axioms(&mut axioms);
        axioms
    }
}

fn named_members(members: Vec<Term>) -> Vec<NamedNode> {
    members
        .into_iter()
        .filter_map(|m| match m {
            Term::NamedNode(m) => Some(m),
            _ => None,
        })
        .collect()
}

fn sort_axioms(axioms: &mut [ListAxiom]) {
    axioms.sort_by_cached_key(|a| {
        (
            matches!(a.subject, NamedOrBlankNode::BlankNode(_)),
            a.subject.to_string(),
            a.members
                .iter()
                .map(|m| m.as_str().to_owned())
                .collect::<Vec<_>>(),
        )
    });
}
