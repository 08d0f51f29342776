use super::classes::add_documentation;
use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use crate::model::{EntityKind, IndividualInfo, PropertyValue};
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{NamedNode, NamedNodeRef, Term, TermRef, Triple, TripleRef};

/// An individual to declare with [`Ontology::define_individual`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndividualDefinition {
    pub name: String,
    /// Classes the individual is an instance of.
    pub classes: Vec<String>,
    /// Property assertions as (property name, value) pairs.
    pub values: Vec<(String, PropertyValue)>,
    pub label: Option<String>,
    pub comment: Option<String>,
}

impl IndividualDefinition {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_value(mut self, property: impl Into<String>, value: PropertyValue) -> Self {
        self.values.push((property.into(), value));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Changes to an individual.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndividualUpdate {
    pub label: Option<String>,
    pub comment: Option<String>,
    pub add_classes: Vec<String>,
    pub remove_classes: Vec<String>,
}

impl Ontology {
    /// Declares an individual as an instance of the given classes.
    pub fn add_individual(
        &mut self,
        name: &str,
        classes: &[&str],
        values: &[(&str, PropertyValue)],
    ) -> Result<NamedNode, OntologyError> {
        self.define_individual(&IndividualDefinition {
            name: name.into(),
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
            values: values
                .iter()
                .map(|(p, v)| ((*p).to_owned(), v.clone()))
                .collect(),
            ..IndividualDefinition::default()
        })
    }

    pub fn define_individual(
        &mut self,
        definition: &IndividualDefinition,
    ) -> Result<NamedNode, OntologyError> {
        let iri = self.require_undeclared(&definition.name)?;
        let classes = definition
            .classes
            .iter()
            .map(|class| self.require(class, EntityKind::Class))
            .collect::<Result<Vec<_>, _>>()?;
        let mut changes = ChangeSet::default();
        for (property, value) in &definition.values {
            changes.insert(self.assertion(&iri, property, value, Some(&iri))?);
        }

        changes.add(iri.clone(), rdf::TYPE, owl::NAMED_INDIVIDUAL);
        for class in classes {
            changes.add(iri.clone(), rdf::TYPE, class);
        }
        add_documentation(
            &mut changes,
            &iri,
            definition.label.as_deref(),
            definition.comment.as_deref(),
        );
        self.commit(changes);
        Ok(iri)
    }

    pub fn edit_individual(
        &mut self,
        name: &str,
        update: &IndividualUpdate,
    ) -> Result<(), OntologyError> {
        let iri = self.require(name, EntityKind::Individual)?;
        let added = update
            .add_classes
            .iter()
            .map(|class| self.require(class, EntityKind::Class))
            .collect::<Result<Vec<_>, _>>()?;
        let removed = update
            .remove_classes
            .iter()
            .map(|class| self.resolve(class))
            .collect::<Result<Vec<_>, _>>()?;

        let mut changes = ChangeSet::default();
        self.replace_literal(&mut changes, &iri, rdfs::LABEL, update.label.as_deref());
        self.replace_literal(&mut changes, &iri, rdfs::COMMENT, update.comment.as_deref());
        for class in removed.into_iter().filter(|c| *c != owl::NAMED_INDIVIDUAL) {
            changes.remove(Triple::new(iri.clone(), rdf::TYPE, class));
        }
        for class in added {
            changes.add(iri.clone(), rdf::TYPE, class);
        }
        self.commit(changes);
        Ok(())
    }

    /// Deletes an individual according to the [deletion policy](super::DeletionPolicy).
    pub fn delete_individual(&mut self, name: &str) -> Result<usize, OntologyError> {
        let iri = self.require(name, EntityKind::Individual)?;
        self.delete_entity(&iri)
    }

    /// Asserts a property value on an existing individual.
    ///
    /// Object properties take individuals, data properties take literals.
    /// Returns `false` if the assertion was already there.
    pub fn add_property_value(
        &mut self,
        individual: &str,
        property: &str,
        value: &PropertyValue,
    ) -> Result<bool, OntologyError> {
        let iri = self.require(individual, EntityKind::Individual)?;
        let triple = self.assertion(&iri, property, value, None)?;
        let mut changes = ChangeSet::default();
        changes.insert(triple);
        Ok(self.commit(changes) > 0)
    }

    /// Removes a property assertion, returning whether it existed.
    pub fn remove_property_value(
        &mut self,
        individual: &str,
        property: &str,
        value: &PropertyValue,
    ) -> Result<bool, OntologyError> {
        let iri = self.require(individual, EntityKind::Individual)?;
        let property = self.resolve(property)?;
        let object: Term = match value {
            PropertyValue::Individual(name) => self.resolve(name)?.into(),
            PropertyValue::Literal(literal) => literal.clone().into(),
        };
        let mut changes = ChangeSet::default();
        changes.remove(Triple::new(iri, property, object));
        Ok(self.commit(changes) > 0)
    }

    pub fn individuals(&self) -> Vec<IndividualInfo> {
        self.entities(EntityKind::Individual)
            .into_iter()
            .map(|iri| self.individual_info(iri))
            .collect()
    }

    pub(crate) fn individual_info(&self, iri: NamedNode) -> IndividualInfo {
        let mut values = self
            .graph
            .triples_for_subject(iri.as_ref())
            .filter(|t| self.is_assertion_property(t.predicate))
            .map(|t| (t.predicate.into_owned(), t.object.into_owned()))
            .collect::<Vec<_>>();
        values.sort_unstable_by(|(p1, o1), (p2, o2)| {
            p1.as_str()
                .cmp(p2.as_str())
                .then_with(|| o1.to_string().cmp(&o2.to_string()))
        });
        IndividualInfo {
            label: self.literal_value(iri.as_ref(), rdfs::LABEL),
            comment: self.literal_value(iri.as_ref(), rdfs::COMMENT),
            classes: self
                .named_objects(iri.as_ref(), rdf::TYPE)
                .into_iter()
                .filter(|c| *c != owl::NAMED_INDIVIDUAL)
                .collect(),
            values,
            iri,
        }
    }

    fn is_assertion_property(&self, predicate: NamedNodeRef<'_>) -> bool {
        self.has_kind(predicate, EntityKind::ObjectProperty)
            || self.has_kind(predicate, EntityKind::DataProperty)
    }

    /// Builds a checked `subject property value` triple.
    ///
    /// `pending` is an individual that is being declared in the same change set.
    fn assertion(
        &self,
        subject: &NamedNode,
        property: &str,
        value: &PropertyValue,
        pending: Option<&NamedNode>,
    ) -> Result<Triple, OntologyError> {
        let (property, kind) = self.require_property(property)?;
        let object: Term = match (kind, value) {
            (EntityKind::ObjectProperty, PropertyValue::Individual(name)) => {
                let target = self.resolve(name)?;
                if pending != Some(&target)
                    && !self.has_kind(target.as_ref(), EntityKind::Individual)
                {
                    return Err(OntologyError::UnknownReference {
                        iri: target,
                        expected: Some(EntityKind::Individual),
                    });
                }
                target.into()
            }
            (EntityKind::DataProperty, PropertyValue::Literal(literal)) => literal.clone().into(),
            (EntityKind::ObjectProperty, PropertyValue::Literal(literal)) => {
                return Err(OntologyError::InvalidValue {
                    property,
                    message: format!("object property expects an individual, found {literal}"),
                });
            }
            (EntityKind::DataProperty, PropertyValue::Individual(name)) => {
                return Err(OntologyError::InvalidValue {
                    property,
                    message: format!("data property expects a literal, found {name}"),
                });
            }
            (_, _) => {
                return Err(OntologyError::InvalidValue {
                    property,
                    message: "annotation properties are set with add_annotation".into(),
                });
            }
        };
        Ok(Triple::new(subject.clone(), property, object))
    }

    /// Checks if an individual has the given asserted type.
    pub fn is_instance_of(&self, individual: NamedNodeRef<'_>, class: NamedNodeRef<'_>) -> bool {
        self.graph
            .contains(TripleRef::new(individual, rdf::TYPE, class))
    }

    /// Asserted types other than `owl:NamedIndividual`.
    pub(crate) fn asserted_types<'a>(
        &'a self,
        individual: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = NamedNodeRef<'a>> + 'a {
        self.graph
            .objects_for_subject_predicate(individual, rdf::TYPE)
            .filter_map(|t| match t {
                TermRef::NamedNode(t) if t != owl::NAMED_INDIVIDUAL => Some(t),
                _ => None,
            })
    }
}
