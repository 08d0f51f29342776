//! Read-only quality checks.

use crate::model::EntityKind;
use crate::namespace::XSD_NAMESPACE;
use crate::ontology::Ontology;
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, TermRef};
use rustc_hash::FxHashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a [`Finding`] is about. Findings are reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FindingKind {
    /// A named class without `rdfs:label`.
    MissingLabel,
    /// A property without `rdfs:domain`.
    MissingDomain,
    /// A property without `rdfs:range`.
    MissingRange,
    /// A named individual without any class.
    UntypedIndividual,
    /// A restriction pointing to an undeclared property, class or individual.
    OrphanRestrictionTarget,
    /// An individual belonging to two disjoint classes.
    DisjointnessViolation,
}

impl FindingKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::MissingLabel => "MissingLabel",
            Self::MissingDomain => "MissingDomain",
            Self::MissingRange => "MissingRange",
            Self::UntypedIndividual => "UntypedIndividual",
            Self::OrphanRestrictionTarget => "OrphanRestrictionTarget",
            Self::DisjointnessViolation => "DisjointnessViolation",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::MissingDomain | Self::MissingRange => Severity::Info,
            Self::MissingLabel | Self::UntypedIndividual => Severity::Warning,
            Self::OrphanRestrictionTarget | Self::DisjointnessViolation => Severity::Error,
        }
    }
}

impl fmt::Display for FindingKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An observation made by [`Ontology::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    /// The entity, or the restriction node, the finding is about.
    pub subject: NamedOrBlankNode,
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, subject: impl Into<NamedOrBlankNode>, message: String) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            subject: subject.into(),
            message,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity, self.kind, self.subject, self.message
        )
    }
}

impl Ontology {
    /// Scans the ontology for common modelling mistakes.
    ///
    /// The scan does not modify anything and terminates on any graph, cyclic hierarchies included.
    /// Findings are sorted by kind and then by subject.
    /// Restriction nodes are ordered by the classes they restrict and then by their property,
    /// never by blank node label.
    ///
    /// ```
    /// use oxonto::Ontology;
    /// use oxonto::validate::FindingKind;
    ///
    /// let mut ontology = Ontology::default();
    /// assert!(ontology.validate().is_empty());
    /// ontology.add_individual("alice", &[], &[])?;
    /// let findings = ontology.validate();
    /// assert_eq!(findings.len(), 1);
    /// assert_eq!(findings[0].kind, FindingKind::UntypedIndividual);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn validate(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.check_labels(&mut findings);
        self.check_property_signatures(&mut findings);
        self.check_individual_types(&mut findings);
        self.check_restrictions(&mut findings);
        self.check_disjointness(&mut findings);
        findings.sort_by_cached_key(|f| {
            (f.kind, self.sort_key(f.subject.as_ref()), f.message.clone())
        });
        findings.dedup();
        findings
    }

    fn check_labels(&self, findings: &mut Vec<Finding>) {
        for class in self.entities(EntityKind::Class) {
            if self
                .graph()
                .object_for_subject_predicate(class.as_ref(), rdfs::LABEL)
                .is_none()
            {
                let message = format!("class {class} has no rdfs:label");
                findings.push(Finding::new(FindingKind::MissingLabel, class, message));
            }
        }
    }

    fn check_property_signatures(&self, findings: &mut Vec<Finding>) {
        for kind in [EntityKind::ObjectProperty, EntityKind::DataProperty] {
            for property in self.entities(kind) {
                for (predicate, finding) in [
                    (rdfs::DOMAIN, FindingKind::MissingDomain),
                    (rdfs::RANGE, FindingKind::MissingRange),
                ] {
                    if self
                        .graph()
                        .object_for_subject_predicate(property.as_ref(), predicate)
                        .is_none()
                    {
                        let message = format!("{} {property} has no {predicate}", kind.name());
                        findings.push(Finding::new(finding, property.clone(), message));
                    }
                }
            }
        }
    }

    fn check_individual_types(&self, findings: &mut Vec<Finding>) {
        for individual in self.entities(EntityKind::Individual) {
            if self.asserted_types(individual.as_ref()).next().is_none() {
                let message = format!("individual {individual} is not an instance of any class");
                findings.push(Finding::new(
                    FindingKind::UntypedIndividual,
                    individual,
                    message,
                ));
            }
        }
    }

    fn check_restrictions(&self, findings: &mut Vec<Finding>) {
        let graph = self.graph();
        let mut orphan = |node: NamedOrBlankNodeRef<'_>, message: String| {
            findings.push(Finding::new(
                FindingKind::OrphanRestrictionTarget,
                node.into_owned(),
                message,
            ));
        };
        let nodes = graph
            .subjects_for_predicate_object(rdf::TYPE, owl::RESTRICTION)
            .chain(graph.triples_for_predicate(owl::ON_PROPERTY).map(|t| t.subject))
            .collect::<FxHashSet<_>>();
        for node in nodes {
            let property = match graph.object_for_subject_predicate(node, owl::ON_PROPERTY) {
                Some(TermRef::NamedNode(p)) => Some(p),
                _ => None,
            };
            let property_kind = property.and_then(|p| self.kind_of(p));
            match (property, property_kind) {
                (Some(_), Some(kind)) if kind.is_property() => (),
                (Some(p), _) => orphan(
                    node,
                    format!("restriction on {p} which is not a declared property"),
                ),
                (None, _) => orphan(node, "restriction without a named owl:onProperty".into()),
            }
            let data = property_kind == Some(EntityKind::DataProperty);
            for predicate in [owl::SOME_VALUES_FROM, owl::ALL_VALUES_FROM, owl::ON_CLASS] {
                for filler in graph.objects_for_subject_predicate(node, predicate) {
                    let TermRef::NamedNode(filler) = filler else {
                        continue;
                    };
                    if !data && !is_datatype(filler) && !self.is_class(filler) {
                        orphan(
                            node,
                            format!("{predicate} {filler} which is not a declared class"),
                        );
                    }
                }
            }
            for value in graph.objects_for_subject_predicate(node, owl::HAS_VALUE) {
                if let TermRef::NamedNode(value) = value {
                    if !self.has_kind(value, EntityKind::Individual) {
                        orphan(
                            node,
                            format!("owl:hasValue {value} which is not a declared individual"),
                        );
                    }
                }
            }
        }
    }

    fn check_disjointness(&self, findings: &mut Vec<Finding>) {
        for individual in self.entities(EntityKind::Individual) {
            let classes = self.inherited_classes(individual.as_ref());
            let mut reported = FxHashSet::default();
            for class in &classes {
                for other in self.disjoint_classes(*class) {
                    if !classes.contains(&other) {
                        continue;
                    }
                    let pair = if class.as_str() <= other.as_str() {
                        (*class, other)
                    } else {
                        (other, *class)
                    };
                    if reported.insert(pair) {
                        let message = format!(
                            "{individual} is an instance of the disjoint classes {} and {}",
                            pair.0, pair.1
                        );
                        findings.push(Finding::new(
                            FindingKind::DisjointnessViolation,
                            individual.clone(),
                            message,
                        ));
                    }
                }
            }
        }
    }

    /// Asserted classes of the individual and all their named superclasses.
    fn inherited_classes<'a>(&'a self, individual: NamedNodeRef<'a>) -> FxHashSet<NamedNodeRef<'a>> {
        let mut visited = FxHashSet::default();
        let mut stack = self.asserted_types(individual).collect::<Vec<_>>();
        while let Some(class) = stack.pop() {
            if !visited.insert(class) {
                continue;
            }
            for parent in self
                .graph()
                .objects_for_subject_predicate(class, rdfs::SUB_CLASS_OF)
            {
                if let TermRef::NamedNode(parent) = parent {
                    stack.push(parent);
                }
            }
        }
        visited
    }

    /// Classes declared disjoint with `class`, in either direction.
    fn disjoint_classes<'a>(&'a self, class: NamedNodeRef<'a>) -> Vec<NamedNodeRef<'a>> {
        let graph = self.graph();
        graph
            .objects_for_subject_predicate(class, owl::DISJOINT_WITH)
            .filter_map(|o| match o {
                TermRef::NamedNode(o) => Some(o),
                _ => None,
            })
            .chain(
                graph
                    .subjects_for_predicate_object(owl::DISJOINT_WITH, class)
                    .filter_map(|s| match s {
                        NamedOrBlankNodeRef::NamedNode(s) => Some(s),
                        NamedOrBlankNodeRef::BlankNode(_) => None,
                    }),
            )
            .collect()
    }

    /// Named subjects by IRI, then restriction nodes by the classes they restrict and their property.
    fn sort_key(&self, subject: NamedOrBlankNodeRef<'_>) -> (bool, String, String) {
        let graph = self.graph();
        let NamedOrBlankNodeRef::BlankNode(_) = subject else {
            return (false, subject.to_string(), String::new());
        };
        let mut classes = [rdfs::SUB_CLASS_OF, owl::EQUIVALENT_CLASS]
            .into_iter()
            .flat_map(|predicate| graph.subjects_for_predicate_object(predicate, subject))
            .filter_map(|s| match s {
                NamedOrBlankNodeRef::NamedNode(s) => Some(s.as_str()),
                NamedOrBlankNodeRef::BlankNode(_) => None,
            })
            .collect::<Vec<_>>();
        classes.sort_unstable();
        let property = match graph.object_for_subject_predicate(subject, owl::ON_PROPERTY) {
            Some(TermRef::NamedNode(p)) => p.as_str().to_owned(),
            _ => String::new(),
        };
        (true, classes.join(" "), property)
    }

    fn is_class(&self, iri: NamedNodeRef<'_>) -> bool {
        iri == owl::THING || iri == owl::NOTHING || self.has_kind(iri, EntityKind::Class)
    }
}

fn is_datatype(iri: NamedNodeRef<'_>) -> bool {
    iri == rdfs::LITERAL || iri.as_str().starts_with(XSD_NAMESPACE)
}
