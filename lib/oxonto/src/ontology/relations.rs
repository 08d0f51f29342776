use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use crate::model::{EntityKind, Relation, RelationKind};
use oxrdf::{NamedNode, NamedOrBlankNodeRef, TermRef, Triple};

impl Ontology {
    /// Adds `subject kind object`, returning `false` if it was already asserted.
    ///
    /// Both sides must be declared with a kind the relation applies to, and for property
    /// relations with the same kind. `subClassOf` edges closing a cycle are refused with
    /// [`OntologyError::CycleDetected`].
    pub fn add_relation(
        &mut self,
        subject: &str,
        kind: RelationKind,
        object: &str,
    ) -> Result<bool, OntologyError> {
        let (subject, object) = self.relation_sides(subject, kind, object)?;
        if kind == RelationKind::SubClassOf && self.creates_cycle(&subject, &object) {
            return Err(OntologyError::CycleDetected {
                sub: subject,
                sup: object,
            });
        }
        if subject == object
            && matches!(
                kind,
                RelationKind::DisjointWith
                    | RelationKind::PropertyDisjointWith
                    | RelationKind::DifferentFrom
            )
        {
            return Err(OntologyError::InvalidRelation {
                relation: kind.name(),
                subject,
                object,
            });
        }
        let mut changes = ChangeSet::default();
        changes.add(subject, kind.predicate(), object);
        Ok(self.commit(changes) > 0)
    }

    /// Removes `subject kind object`, returning whether it was asserted.
    pub fn remove_relation(
        &mut self,
        subject: &str,
        kind: RelationKind,
        object: &str,
    ) -> Result<bool, OntologyError> {
        let subject = self.resolve(subject)?;
        let object = self.resolve(object)?;
        let mut changes = ChangeSet::default();
        changes.remove(Triple::new(subject, kind.predicate(), object));
        Ok(self.commit(changes) > 0)
    }

    /// Relations between named resources, optionally of a single kind.
    ///
    /// Sorted by kind, then subject, then object.
    pub fn relations(&self, kind: Option<RelationKind>) -> Vec<Relation> {
        let mut relations = RelationKind::ALL
            .into_iter()
            .filter(|k| kind.is_none_or(|kind| kind == *k))
            .flat_map(|kind| {
                self.graph
                    .triples_for_predicate(kind.predicate())
                    .filter_map(move |t| match (t.subject, t.object) {
                        (NamedOrBlankNodeRef::NamedNode(s), TermRef::NamedNode(o)) => {
                            Some(Relation {
                                subject: s.into_owned(),
                                kind,
                                object: o.into_owned(),
                            })
                        }
                        _ => None,
                    })
            })
            .collect::<Vec<_>>();
        relations.sort_unstable_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.subject.as_str().cmp(b.subject.as_str()))
                .then_with(|| a.object.as_str().cmp(b.object.as_str()))
        });
        relations
    }

    fn relation_sides(
        &self,
        subject: &str,
        kind: RelationKind,
        object: &str,
    ) -> Result<(NamedNode, NamedNode), OntologyError> {
        if kind.relates(EntityKind::Class) {
            return Ok((
                self.require(subject, EntityKind::Class)?,
                self.require(object, EntityKind::Class)?,
            ));
        }
        if kind.relates(EntityKind::Individual) {
            return Ok((
                self.require(subject, EntityKind::Individual)?,
                self.require(object, EntityKind::Individual)?,
            ));
        }
        let (subject, subject_kind) = self.require_property(subject)?;
        let (object, object_kind) = self.require_property(object)?;
        if subject_kind != object_kind || !kind.relates(subject_kind) {
            return Err(OntologyError::InvalidRelation {
                relation: kind.name(),
                subject,
                object,
            });
        }
        Ok((subject, object))
    }
}
