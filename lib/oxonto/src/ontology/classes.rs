use super::{ChangeSet, Ontology};
use crate::error::OntologyError;
use crate::model::{ClassInfo, EntityKind};
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Literal, NamedNode, NamedNodeRef, TermRef};
use rustc_hash::FxHashSet;

/// A class to declare with [`Ontology::define_class`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDefinition {
    pub name: String,
    pub parents: Vec<String>,
    pub label: Option<String>,
    pub comment: Option<String>,
}

impl ClassDefinition {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
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

/// Changes to an existing class.
///
/// `None` keeps a text field as is, an empty string removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassUpdate {
    pub label: Option<String>,
    pub comment: Option<String>,
    pub add_parents: Vec<String>,
    pub remove_parents: Vec<String>,
}

impl Ontology {
    /// Declares a class, optionally as a subclass of an existing one.
    ///
    /// Fails with [`OntologyError::DuplicateIdentifier`] if the name is already declared
    /// and with [`OntologyError::UnknownReference`] if the parent is not a class.
    pub fn add_class(&mut self, name: &str, parent: Option<&str>) -> Result<NamedNode, OntologyError> {
        let mut definition = ClassDefinition::new(name);
        if let Some(parent) = parent {
            definition = definition.with_parent(parent);
        }
        self.define_class(&definition)
    }

    /// Declares a class with its parents and documentation.
    pub fn define_class(&mut self, definition: &ClassDefinition) -> Result<NamedNode, OntologyError> {
        let iri = self.require_undeclared(&definition.name)?;
        let parents = definition
            .parents
            .iter()
            .map(|parent| self.require(parent, EntityKind::Class))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(parent) = parents.iter().find(|parent| **parent == iri) {
            return Err(OntologyError::CycleDetected {
                sub: iri.clone(),
                sup: parent.clone(),
            });
        }

        let mut changes = ChangeSet::default();
        changes.add(iri.clone(), rdf::TYPE, owl::CLASS);
        for parent in parents {
            changes.add(iri.clone(), rdfs::SUB_CLASS_OF, parent);
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

    /// Updates the documentation and direct superclasses of a class.
    pub fn edit_class(&mut self, name: &str, update: &ClassUpdate) -> Result<(), OntologyError> {
        let iri = self.require(name, EntityKind::Class)?;
        let added = update
            .add_parents
            .iter()
            .map(|parent| self.require(parent, EntityKind::Class))
            .collect::<Result<Vec<_>, _>>()?;
        for parent in &added {
            if self.creates_cycle(&iri, parent) {
                return Err(OntologyError::CycleDetected {
                    sub: iri,
                    sup: parent.clone(),
                });
            }
        }
        let removed = update
            .remove_parents
            .iter()
            .map(|parent| self.resolve(parent))
            .collect::<Result<Vec<_>, _>>()?;

        let mut changes = ChangeSet::default();
        self.replace_literal(&mut changes, &iri, rdfs::LABEL, update.label.as_deref());
        self.replace_literal(&mut changes, &iri, rdfs::COMMENT, update.comment.as_deref());
        for parent in removed {
            changes.remove(oxrdf::Triple::new(iri.clone(), rdfs::SUB_CLASS_OF, parent));
        }
        for parent in added {
            changes.add(iri.clone(), rdfs::SUB_CLASS_OF, parent);
        }
        self.commit(changes);
        Ok(())
    }

    /// Deletes a class according to the [deletion policy](super::DeletionPolicy).
    ///
    /// Returns the number of removed triples.
    pub fn delete_class(&mut self, name: &str) -> Result<usize, OntologyError> {
        let iri = self.require(name, EntityKind::Class)?;
        self.delete_entity(&iri)
    }

    /// All declared classes, sorted by IRI.
    pub fn classes(&self) -> Vec<ClassInfo> {
        self.entities(EntityKind::Class)
            .into_iter()
            .map(|iri| self.class_info(iri))
            .collect()
    }

    /// Declared classes without a declared named superclass.
    pub fn root_classes(&self) -> Vec<NamedNode> {
        self.entities(EntityKind::Class)
            .into_iter()
            .filter(|class| {
                self.named_objects(class.as_ref(), rdfs::SUB_CLASS_OF)
                    .iter()
                    .all(|parent| parent == class || !self.has_kind(parent.as_ref(), EntityKind::Class))
            })
            .collect()
    }

    /// Direct named subclasses of every class having some, sorted by IRI.
    pub fn class_hierarchy(&self) -> Vec<(NamedNode, Vec<NamedNode>)> {
        self.entities(EntityKind::Class)
            .into_iter()
            .filter_map(|class| {
                let children = self.named_subjects(rdfs::SUB_CLASS_OF, class.as_ref());
                (!children.is_empty()).then_some((class, children))
            })
            .collect()
    }

    pub(crate) fn class_info(&self, iri: NamedNode) -> ClassInfo {
        ClassInfo {
            label: self.literal_value(iri.as_ref(), rdfs::LABEL),
            comment: self.literal_value(iri.as_ref(), rdfs::COMMENT),
            parents: self.named_objects(iri.as_ref(), rdfs::SUB_CLASS_OF),
            children: self.named_subjects(rdfs::SUB_CLASS_OF, iri.as_ref()),
            iri,
        }
    }

    /// Checks if `sub rdfs:subClassOf sup` would close a cycle, i.e. `sup` already reaches `sub`.
    pub(crate) fn creates_cycle(&self, sub: &NamedNode, sup: &NamedNode) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited = FxHashSet::default();
        let mut stack: Vec<NamedNodeRef<'_>> = vec![sup.as_ref()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for parent in self
                .graph
                .objects_for_subject_predicate(current, rdfs::SUB_CLASS_OF)
            {
                if let TermRef::NamedNode(parent) = parent {
                    if parent == sub.as_ref() {
                        return true;
                    }
                    stack.push(parent);
                }
            }
        }
        false
    }
}

/// Schedules `rdfs:label` and `rdfs:comment` literals for a new entity.
pub(super) fn add_documentation(
    changes: &mut ChangeSet,
    iri: &NamedNode,
    label: Option<&str>,
    comment: Option<&str>,
) {
    for (predicate, value) in [(rdfs::LABEL, label), (rdfs::COMMENT, comment)] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            changes.add(iri.clone(), predicate, Literal::new_simple_literal(value));
        }
    }
}
