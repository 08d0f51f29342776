use super::delete::blank_closure;
use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use crate::model::{EntityKind, Filler, PropertyValue, Restriction, RestrictionInfo, RestrictionKind};
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs, xsd};
use oxrdf::{
    BlankNode, Literal, NamedNode, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef, Triple,
    TripleRef,
};
use rustc_hash::FxHashSet;

impl Ontology {
    /// Adds `class rdfs:subClassOf [ a owl:Restriction ; owl:onProperty property ; ... ]`.
    ///
    /// Returns the blank node of the restriction.
    ///
    /// ```
    /// use oxonto::{Filler, Ontology, Restriction};
    ///
    /// let mut ontology = Ontology::default();
    /// ontology.add_class("Parent", None)?;
    /// ontology.add_class("Person", None)?;
    /// ontology.add_object_property("hasChild", None, None, &[])?;
    /// ontology.add_restriction(
    ///     "Parent",
    ///     "hasChild",
    ///     &Restriction::MinCardinality {
    ///         cardinality: 1,
    ///         qualifier: Some(Filler::class("Person")),
    ///     },
    /// )?;
    /// assert_eq!(ontology.restrictions(Some("Parent"))?.len(), 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn add_restriction(
        &mut self,
        class: &str,
        property: &str,
        restriction: &Restriction,
    ) -> Result<BlankNode, OntologyError> {
        let class = self.require(class, EntityKind::Class)?;
        let node = BlankNode::default();
        let mut changes = ChangeSet::default();
        self.restriction_triples(&mut changes, &class, &node, property, restriction)?;
        self.commit(changes);
        Ok(node)
    }

    /// Replaces the restriction `node` by a new one on `class`.
    ///
    /// The old restriction is unlinked from every class.
    pub fn edit_restriction(
        &mut self,
        node: &NamedOrBlankNode,
        class: &str,
        property: &str,
        restriction: &Restriction,
    ) -> Result<BlankNode, OntologyError> {
        if !self
            .graph
            .contains(TripleRef::new(node.as_ref(), rdf::TYPE, owl::RESTRICTION))
        {
            return Err(OntologyError::InvalidRestriction(format!(
                "{node} is not a restriction"
            )));
        }
        let class = self.require(class, EntityKind::Class)?;
        let new_node = BlankNode::default();
        let mut changes = ChangeSet::default();
        self.restriction_triples(&mut changes, &class, &new_node, property, restriction)?;
        changes.remove_all(self.restriction_description(node.as_ref()));
        changes.remove_all(
            self.graph
                .triples_for_object(node.as_ref())
                .map(|t| t.into_owned()),
        );
        self.commit(changes);
        Ok(new_node)
    }

    /// Unlinks the first restriction of `class` on `property` with the given kind.
    ///
    /// The restriction itself is removed once no class uses it anymore.
    /// Returns whether a restriction matched.
    pub fn delete_restriction(
        &mut self,
        class: &str,
        property: &str,
        kind: RestrictionKind,
    ) -> Result<bool, OntologyError> {
        let class = self.require(class, EntityKind::Class)?;
        let property = self.resolve(property)?;
        let Some(found) = self
            .restriction_infos()
            .into_iter()
            .find(|r| r.property == property && r.kind == kind && r.classes.contains(&class))
        else {
            return Ok(false);
        };
        let mut changes = ChangeSet::default();
        changes.remove(Triple::new(
            class.clone(),
            rdfs::SUB_CLASS_OF,
            found.node.clone(),
        ));
        let other_users = self
            .graph
            .triples_for_object(found.node.as_ref())
            .filter(|t| {
                !(t.predicate == rdfs::SUB_CLASS_OF
                    && matches!(t.subject, NamedOrBlankNodeRef::NamedNode(s) if s == class.as_ref()))
            })
            .count();
        if other_users == 0 {
            changes.remove_all(self.restriction_description(found.node.as_ref()));
        }
        self.commit(changes);
        Ok(true)
    }

    /// Restrictions read back from the graph, optionally only those of a class.
    pub fn restrictions(&self, class: Option<&str>) -> Result<Vec<RestrictionInfo>, OntologyError> {
        let class = class.map(|class| self.resolve(class)).transpose()?;
        Ok(self
            .restriction_infos()
            .into_iter()
            .filter(|r| class.as_ref().is_none_or(|c| r.classes.contains(c)))
            .collect())
    }

    pub(crate) fn restriction_infos(&self) -> Vec<RestrictionInfo> {
        let mut restrictions = self
            .graph
            .subjects_for_predicate_object(rdf::TYPE, owl::RESTRICTION)
            .filter_map(|node| self.restriction_info(node))
            .collect::<Vec<_>>();
        restrictions.sort_by_cached_key(|r| {
            (
                r.classes.first().map(|c| c.as_str().to_owned()),
                r.property.as_str().to_owned(),
                r.kind,
                r.value.as_ref().map(Term::to_string),
                r.cardinality,
                r.node.to_string(),
            )
        });
        restrictions
    }

    fn restriction_info(&self, node: NamedOrBlankNodeRef<'_>) -> Option<RestrictionInfo> {
        let property = match self.graph.object_for_subject_predicate(node, owl::ON_PROPERTY)? {
            TermRef::NamedNode(property) => property.into_owned(),
            _ => return None,
        };
        let (kind, value) = RestrictionKind::ALL.into_iter().find_map(|kind| {
            self.graph
                .object_for_subject_predicate(node, kind.predicate())
                .map(|value| (kind, value))
        })?;
        let (value, cardinality) = if kind.is_cardinality() {
            let cardinality = match value {
                TermRef::Literal(literal) => literal.value().parse().ok(),
                _ => None,
            };
            (None, cardinality)
        } else {
            (Some(value.into_owned()), None)
        };
        let qualifier = [owl::ON_CLASS, owl::ON_DATA_RANGE]
            .into_iter()
            .find_map(|p| match self.graph.object_for_subject_predicate(node, p)? {
                TermRef::NamedNode(q) => Some(q.into_owned()),
                _ => None,
            });
        Some(RestrictionInfo {
            node: node.into_owned(),
            classes: self.named_subjects(rdfs::SUB_CLASS_OF, node),
            property,
            kind,
            value,
            cardinality,
            qualifier,
        })
    }

    /// The triples of a restriction node, including its nested anonymous parts.
    fn restriction_description(&self, node: NamedOrBlankNodeRef<'_>) -> FxHashSet<Triple> {
        let mut triples = FxHashSet::default();
        match node {
            NamedOrBlankNodeRef::BlankNode(node) => blank_closure(&self.graph, node, &mut triples),
            NamedOrBlankNodeRef::NamedNode(node) => {
                for triple in self.graph.triples_for_subject(node) {
                    if let TermRef::BlankNode(object) = triple.object {
                        blank_closure(&self.graph, object, &mut triples);
                    }
                    triples.insert(triple.into_owned());
                }
            }
        }
        triples
    }

    /// Checks a restriction against its property and schedules its triples.
    fn restriction_triples(
        &self,
        changes: &mut ChangeSet,
        class: &NamedNode,
        node: &BlankNode,
        property: &str,
        restriction: &Restriction,
    ) -> Result<(), OntologyError> {
        let (property, kind) = self.require_property(property)?;
        if kind == EntityKind::AnnotationProperty {
            return Err(OntologyError::InvalidRestriction(format!(
                "{property} is an annotation property"
            )));
        }
        changes.add(node.clone(), rdf::TYPE, owl::RESTRICTION);
        changes.add(node.clone(), owl::ON_PROPERTY, property.clone());
        let predicate = restriction.kind().predicate();
        match restriction {
            Restriction::SomeValuesFrom(filler) | Restriction::AllValuesFrom(filler) => {
                let filler = self.filler(&property, kind, filler)?;
                changes.add(node.clone(), predicate, filler);
            }
            Restriction::HasValue(value) => {
                let value = self.required_value(&property, kind, value)?;
                changes.add(node.clone(), predicate, value);
            }
            Restriction::MinCardinality {
                cardinality,
                qualifier,
            }
            | Restriction::MaxCardinality {
                cardinality,
                qualifier,
            }
            | Restriction::ExactCardinality {
                cardinality,
                qualifier,
            } => {
                changes.add(
                    node.clone(),
                    predicate,
                    Literal::new_typed_literal(cardinality.to_string(), xsd::NON_NEGATIVE_INTEGER),
                );
                if let Some(qualifier) = qualifier {
                    let on = match qualifier {
                        Filler::Class(_) => owl::ON_CLASS,
                        Filler::Datatype(_) => owl::ON_DATA_RANGE,
                    };
                    let qualifier = self.filler(&property, kind, qualifier)?;
                    changes.add(node.clone(), on, qualifier);
                }
            }
        }
        changes.add(class.clone(), rdfs::SUB_CLASS_OF, node.clone());
        Ok(())
    }

    fn filler(
        &self,
        property: &NamedNode,
        kind: EntityKind,
        filler: &Filler,
    ) -> Result<NamedNode, OntologyError> {
        match (filler, kind) {
            (Filler::Class(class), EntityKind::ObjectProperty) => {
                self.require(class, EntityKind::Class)
            }
            (Filler::Datatype(datatype), EntityKind::DataProperty) => {
                Ok(datatype.iri().into_owned())
            }
            (Filler::Class(class), _) => Err(OntologyError::InvalidRestriction(format!(
                "the data property {property} can not range over the class {class}"
            ))),
            (Filler::Datatype(datatype), _) => Err(OntologyError::InvalidRestriction(format!(
                "the object property {property} can not range over the datatype {datatype}"
            ))),
        }
    }

    fn required_value(
        &self,
        property: &NamedNode,
        kind: EntityKind,
        value: &PropertyValue,
    ) -> Result<Term, OntologyError> {
        match (value, kind) {
            (PropertyValue::Individual(name), EntityKind::ObjectProperty) => {
                Ok(self.require(name, EntityKind::Individual)?.into())
            }
            (PropertyValue::Literal(literal), EntityKind::DataProperty) => {
                Ok(literal.clone().into())
            }
            (PropertyValue::Individual(name), _) => Err(OntologyError::InvalidRestriction(
                format!("the data property {property} can not have the individual {name} as value"),
            )),
            (PropertyValue::Literal(literal), _) => Err(OntologyError::InvalidRestriction(
                format!("the object property {property} can not have the literal {literal} as value"),
            )),
        }
    }
}
