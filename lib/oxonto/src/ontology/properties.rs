use super::classes::add_documentation;
use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use crate::model::{
    AnnotationPropertyInfo, Characteristic, DataPropertyInfo, Datatype, EntityKind,
    ObjectPropertyInfo,
};
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{NamedNode, TermRef, Triple, TripleRef};

/// An object property to declare with [`Ontology::define_object_property`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPropertyDefinition {
    pub name: String,
    /// Class of the subjects.
    pub domain: Option<String>,
    /// Class of the objects.
    pub range: Option<String>,
    pub characteristics: Vec<Characteristic>,
    /// An existing object property this one is the inverse of.
    pub inverse_of: Option<String>,
    pub label: Option<String>,
    pub comment: Option<String>,
}

impl ObjectPropertyDefinition {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_characteristic(mut self, characteristic: Characteristic) -> Self {
        self.characteristics.push(characteristic);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_inverse_of(mut self, inverse: impl Into<String>) -> Self {
        self.inverse_of = Some(inverse.into());
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

/// A data property to declare with [`Ontology::define_data_property`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPropertyDefinition {
    pub name: String,
    pub domain: Option<String>,
    pub datatype: Datatype,
    pub functional: bool,
    pub label: Option<String>,
    pub comment: Option<String>,
}

impl DataPropertyDefinition {
    #[inline]
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn functional(mut self) -> Self {
        self.functional = true;
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

/// Changes to an object property.
///
/// For every text field `None` keeps the current value and an empty string removes it.
/// `characteristics` replaces the whole set when given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPropertyUpdate {
    pub label: Option<String>,
    pub comment: Option<String>,
    pub domain: Option<String>,
    pub range: Option<String>,
    pub characteristics: Option<Vec<Characteristic>>,
    pub inverse_of: Option<String>,
}

/// Changes to a data property, with the same conventions as [`ObjectPropertyUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPropertyUpdate {
    pub label: Option<String>,
    pub comment: Option<String>,
    pub domain: Option<String>,
    pub datatype: Option<Datatype>,
    pub functional: Option<bool>,
}

impl Ontology {
    /// Declares an object property.
    ///
    /// The domain and range must be existing classes.
    pub fn add_object_property(
        &mut self,
        name: &str,
        domain: Option<&str>,
        range: Option<&str>,
        characteristics: &[Characteristic],
    ) -> Result<NamedNode, OntologyError> {
        self.define_object_property(&ObjectPropertyDefinition {
            name: name.into(),
            domain: domain.map(Into::into),
            range: range.map(Into::into),
            characteristics: characteristics.to_vec(),
            ..ObjectPropertyDefinition::default()
        })
    }

    pub fn define_object_property(
        &mut self,
        definition: &ObjectPropertyDefinition,
    ) -> Result<NamedNode, OntologyError> {
        let iri = self.require_undeclared(&definition.name)?;
        let domain = self.optional_reference(definition.domain.as_deref(), EntityKind::Class)?;
        let range = self.optional_reference(definition.range.as_deref(), EntityKind::Class)?;
        let inverse = self.optional_reference(
            definition.inverse_of.as_deref(),
            EntityKind::ObjectProperty,
        )?;

        let mut changes = ChangeSet::default();
        changes.add(iri.clone(), rdf::TYPE, owl::OBJECT_PROPERTY);
        if let Some(domain) = domain {
            changes.add(iri.clone(), rdfs::DOMAIN, domain);
        }
        if let Some(range) = range {
            changes.add(iri.clone(), rdfs::RANGE, range);
        }
        for characteristic in &definition.characteristics {
            changes.add(iri.clone(), rdf::TYPE, characteristic.type_iri());
        }
        if let Some(inverse) = inverse {
            changes.add(iri.clone(), owl::INVERSE_OF, inverse);
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

    /// Declares a data property whose values have the given datatype.
    pub fn add_data_property(
        &mut self,
        name: &str,
        domain: Option<&str>,
        datatype: Datatype,
    ) -> Result<NamedNode, OntologyError> {
        self.define_data_property(&DataPropertyDefinition {
            name: name.into(),
            domain: domain.map(Into::into),
            datatype,
            ..DataPropertyDefinition::default()
        })
    }

    pub fn define_data_property(
        &mut self,
        definition: &DataPropertyDefinition,
    ) -> Result<NamedNode, OntologyError> {
        let iri = self.require_undeclared(&definition.name)?;
        let domain = self.optional_reference(definition.domain.as_deref(), EntityKind::Class)?;

        let mut changes = ChangeSet::default();
        changes.add(iri.clone(), rdf::TYPE, owl::DATATYPE_PROPERTY);
        if let Some(domain) = domain {
            changes.add(iri.clone(), rdfs::DOMAIN, domain);
        }
        changes.add(
            iri.clone(),
            rdfs::RANGE,
            definition.datatype.iri().into_owned(),
        );
        if definition.functional {
            changes.add(iri.clone(), rdf::TYPE, owl::FUNCTIONAL_PROPERTY);
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

    /// Declares an annotation property.
    pub fn add_annotation_property(
        &mut self,
        name: &str,
        label: Option<&str>,
    ) -> Result<NamedNode, OntologyError> {
        let iri = self.require_undeclared(name)?;
        let mut changes = ChangeSet::default();
        changes.add(iri.clone(), rdf::TYPE, owl::ANNOTATION_PROPERTY);
        add_documentation(&mut changes, &iri, label, None);
        self.commit(changes);
        Ok(iri)
    }

    pub fn edit_object_property(
        &mut self,
        name: &str,
        update: &ObjectPropertyUpdate,
    ) -> Result<(), OntologyError> {
        let iri = self.require(name, EntityKind::ObjectProperty)?;
        let domain = self.resolve_edit(update.domain.as_deref(), EntityKind::Class)?;
        let range = self.resolve_edit(update.range.as_deref(), EntityKind::Class)?;
        let inverse =
            self.resolve_edit(update.inverse_of.as_deref(), EntityKind::ObjectProperty)?;

        let mut changes = ChangeSet::default();
        self.replace_literal(&mut changes, &iri, rdfs::LABEL, update.label.as_deref());
        self.replace_literal(&mut changes, &iri, rdfs::COMMENT, update.comment.as_deref());
        if let Some(domain) = domain {
            self.replace_reference(&mut changes, &iri, rdfs::DOMAIN, domain);
        }
        if let Some(range) = range {
            self.replace_reference(&mut changes, &iri, rdfs::RANGE, range);
        }
        if let Some(inverse) = inverse {
            self.replace_reference(&mut changes, &iri, owl::INVERSE_OF, inverse);
        }
        if let Some(characteristics) = &update.characteristics {
            self.replace_characteristics(&mut changes, &iri, characteristics);
        }
        self.commit(changes);
        Ok(())
    }

    pub fn edit_data_property(
        &mut self,
        name: &str,
        update: &DataPropertyUpdate,
    ) -> Result<(), OntologyError> {
        let iri = self.require(name, EntityKind::DataProperty)?;
        let domain = self.resolve_edit(update.domain.as_deref(), EntityKind::Class)?;

        let mut changes = ChangeSet::default();
        self.replace_literal(&mut changes, &iri, rdfs::LABEL, update.label.as_deref());
        self.replace_literal(&mut changes, &iri, rdfs::COMMENT, update.comment.as_deref());
        if let Some(domain) = domain {
            self.replace_reference(&mut changes, &iri, rdfs::DOMAIN, domain);
        }
        if let Some(datatype) = &update.datatype {
            self.replace_reference(
                &mut changes,
                &iri,
                rdfs::RANGE,
                Some(datatype.iri().into_owned()),
            );
        }
        if let Some(functional) = update.functional {
            let characteristics: &[Characteristic] = if functional {
                &[Characteristic::Functional]
            } else {
                &[]
            };
            self.replace_characteristics(&mut changes, &iri, characteristics);
        }
        self.commit(changes);
        Ok(())
    }

    /// Deletes a property of any kind according to the [deletion policy](super::DeletionPolicy).
    ///
    /// Assertions using the property are references to it.
    pub fn delete_property(&mut self, name: &str) -> Result<usize, OntologyError> {
        let (iri, _) = self.require_property(name)?;
        self.delete_entity(&iri)
    }

    pub fn object_properties(&self) -> Vec<ObjectPropertyInfo> {
        self.entities(EntityKind::ObjectProperty)
            .into_iter()
            .map(|iri| self.object_property_info(iri))
            .collect()
    }

    pub fn data_properties(&self) -> Vec<DataPropertyInfo> {
        self.entities(EntityKind::DataProperty)
            .into_iter()
            .map(|iri| self.data_property_info(iri))
            .collect()
    }

    pub fn annotation_properties(&self) -> Vec<AnnotationPropertyInfo> {
        self.entities(EntityKind::AnnotationProperty)
            .into_iter()
            .map(|iri| self.annotation_property_info(iri))
            .collect()
    }

    pub(crate) fn object_property_info(&self, iri: NamedNode) -> ObjectPropertyInfo {
        ObjectPropertyInfo {
            label: self.literal_value(iri.as_ref(), rdfs::LABEL),
            comment: self.literal_value(iri.as_ref(), rdfs::COMMENT),
            domains: self.named_objects(iri.as_ref(), rdfs::DOMAIN),
            ranges: self.named_objects(iri.as_ref(), rdfs::RANGE),
            characteristics: self.characteristics(&iri),
            inverses: self.named_objects(iri.as_ref(), owl::INVERSE_OF),
            parents: self.named_objects(iri.as_ref(), rdfs::SUB_PROPERTY_OF),
            iri,
        }
    }

    pub(crate) fn data_property_info(&self, iri: NamedNode) -> DataPropertyInfo {
        DataPropertyInfo {
            label: self.literal_value(iri.as_ref(), rdfs::LABEL),
            comment: self.literal_value(iri.as_ref(), rdfs::COMMENT),
            domains: self.named_objects(iri.as_ref(), rdfs::DOMAIN),
            ranges: self.named_objects(iri.as_ref(), rdfs::RANGE),
            functional: self.graph.contains(TripleRef::new(
                iri.as_ref(),
                rdf::TYPE,
                owl::FUNCTIONAL_PROPERTY,
            )),
            parents: self.named_objects(iri.as_ref(), rdfs::SUB_PROPERTY_OF),
            iri,
        }
    }

    pub(crate) fn annotation_property_info(&self, iri: NamedNode) -> AnnotationPropertyInfo {
        AnnotationPropertyInfo {
            label: self.literal_value(iri.as_ref(), rdfs::LABEL),
            comment: self.literal_value(iri.as_ref(), rdfs::COMMENT),
            iri,
        }
    }

    fn characteristics(&self, iri: &NamedNode) -> Vec<Characteristic> {
        let mut characteristics = self
            .graph
            .objects_for_subject_predicate(iri.as_ref(), rdf::TYPE)
            .filter_map(|t| match t {
                TermRef::NamedNode(t) => Characteristic::from_type_iri(t),
                _ => None,
            })
            .collect::<Vec<_>>();
        characteristics.sort_unstable();
        characteristics.dedup();
        characteristics
    }

    fn replace_characteristics(
        &self,
        changes: &mut ChangeSet,
        iri: &NamedNode,
        characteristics: &[Characteristic],
    ) {
        for current in self.characteristics(iri) {
            changes.remove(Triple::new(iri.clone(), rdf::TYPE, current.type_iri()));
        }
        for characteristic in characteristics {
            changes.add(iri.clone(), rdf::TYPE, characteristic.type_iri());
        }
    }

    fn optional_reference(
        &self,
        name: Option<&str>,
        kind: EntityKind,
    ) -> Result<Option<NamedNode>, OntologyError> {
        name.filter(|name| !name.is_empty())
            .map(|name| self.require(name, kind))
            .transpose()
    }
}
