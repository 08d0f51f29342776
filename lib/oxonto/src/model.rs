//! Plain values describing ontology entities, as accepted and returned by [`Ontology`](crate::Ontology).

use crate::vocab::owl;
use oxrdf::vocab::{rdfs, xsd};
use oxrdf::{Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, Term};
use std::fmt;

/// The kinds of named entities an IRI may be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    Individual,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [
        Self::Class,
        Self::ObjectProperty,
        Self::DataProperty,
        Self::AnnotationProperty,
        Self::Individual,
    ];

    /// The `rdf:type` used to declare an entity of this kind.
    #[inline]
    pub const fn declaration(self) -> NamedNodeRef<'static> {
        match self {
            Self::Class => owl::CLASS,
            Self::ObjectProperty => owl::OBJECT_PROPERTY,
            Self::DataProperty => owl::DATATYPE_PROPERTY,
            Self::AnnotationProperty => owl::ANNOTATION_PROPERTY,
            Self::Individual => owl::NAMED_INDIVIDUAL,
        }
    }

    /// Maps an `rdf:type` value to the entity kind it declares.
    ///
    /// `rdfs:Class` is accepted for classes so that plain RDFS vocabularies are understood.
    pub fn from_declaration(type_iri: NamedNodeRef<'_>) -> Option<Self> {
        if type_iri == owl::CLASS || type_iri == rdfs::CLASS {
            Some(Self::Class)
        } else if type_iri == owl::OBJECT_PROPERTY {
            Some(Self::ObjectProperty)
        } else if type_iri == owl::DATATYPE_PROPERTY {
            Some(Self::DataProperty)
        } else if type_iri == owl::ANNOTATION_PROPERTY {
            Some(Self::AnnotationProperty)
        } else if type_iri == owl::NAMED_INDIVIDUAL {
            Some(Self::Individual)
        } else {
            None
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::ObjectProperty => "object property",
            Self::DataProperty => "data property",
            Self::AnnotationProperty => "annotation property",
            Self::Individual => "individual",
        }
    }

    #[inline]
    pub const fn is_property(self) -> bool {
        matches!(
            self,
            Self::ObjectProperty | Self::DataProperty | Self::AnnotationProperty
        )
    }
}

impl fmt::Display for EntityKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical characteristics of an object property.
///
/// Data properties only support [`Characteristic::Functional`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Characteristic {
    Functional,
    InverseFunctional,
    Transitive,
    Symmetric,
    Asymmetric,
    Reflexive,
    Irreflexive,
}

impl Characteristic {
    pub const ALL: [Self; 7] = [
        Self::Functional,
        Self::InverseFunctional,
        Self::Transitive,
        Self::Symmetric,
        Self::Asymmetric,
        Self::Reflexive,
        Self::Irreflexive,
    ];

    #[inline]
    pub const fn type_iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Functional => owl::FUNCTIONAL_PROPERTY,
            Self::InverseFunctional => owl::INVERSE_FUNCTIONAL_PROPERTY,
            Self::Transitive => owl::TRANSITIVE_PROPERTY,
            Self::Symmetric => owl::SYMMETRIC_PROPERTY,
            Self::Asymmetric => owl::ASYMMETRIC_PROPERTY,
            Self::Reflexive => owl::REFLEXIVE_PROPERTY,
            Self::Irreflexive => owl::IRREFLEXIVE_PROPERTY,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::InverseFunctional => "inverse-functional",
            Self::Transitive => "transitive",
            Self::Symmetric => "symmetric",
            Self::Asymmetric => "asymmetric",
            Self::Reflexive => "reflexive",
            Self::Irreflexive => "irreflexive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn from_type_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.type_iri() == iri)
    }
}

impl fmt::Display for Characteristic {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Range of a data property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Datatype {
    #[default]
    String,
    Integer,
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
    Time,
    Decimal,
    AnyUri,
    NonNegativeInteger,
    PositiveInteger,
    /// Any other datatype IRI.
    Other(NamedNode),
}

impl Datatype {
    const BUILTIN: [(&'static str, Self); 12] = [
        ("string", Self::String),
        ("integer", Self::Integer),
        ("float", Self::Float),
        ("double", Self::Double),
        ("boolean", Self::Boolean),
        ("date", Self::Date),
        ("dateTime", Self::DateTime),
        ("time", Self::Time),
        ("decimal", Self::Decimal),
        ("anyURI", Self::AnyUri),
        ("nonNegativeInteger", Self::NonNegativeInteger),
        ("positiveInteger", Self::PositiveInteger),
    ];

    #[inline]
    pub fn iri(&self) -> NamedNodeRef<'_> {
        match self {
            Self::String => xsd::STRING,
            Self::Integer => xsd::INTEGER,
            Self::Float => xsd::FLOAT,
            Self::Double => xsd::DOUBLE,
            Self::Boolean => xsd::BOOLEAN,
            Self::Date => xsd::DATE,
            Self::DateTime => xsd::DATE_TIME,
            Self::Time => xsd::TIME,
            Self::Decimal => xsd::DECIMAL,
            Self::AnyUri => xsd::ANY_URI,
            Self::NonNegativeInteger => xsd::NON_NEGATIVE_INTEGER,
            Self::PositiveInteger => xsd::POSITIVE_INTEGER,
            Self::Other(iri) => iri.as_ref(),
        }
    }

    /// Looks up a datatype by its XSD local name (`integer`), prefixed name (`xsd:integer`) or IRI.
    ///
    /// ```
    /// use oxonto::Datatype;
    ///
    /// assert_eq!(Datatype::from_name("xsd:dateTime"), Some(Datatype::DateTime));
    /// assert_eq!(Datatype::from_name("nope"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let local = name.strip_prefix("xsd:").unwrap_or(name);
        if let Some((_, datatype)) = Self::BUILTIN.iter().find(|(n, _)| *n == local) {
            return Some(datatype.clone());
        }
        if name.contains("://") {
            return NamedNode::new(name).ok().map(Self::from_iri);
        }
        None
    }

    pub fn from_iri(iri: NamedNode) -> Self {
        Self::BUILTIN
            .iter()
            .find(|(_, d)| d.iri() == iri.as_ref())
            .map_or(Self::Other(iri), |(_, d)| d.clone())
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::BUILTIN.iter().find(|(_, d)| d == self) {
            Some((name, _)) => write!(f, "xsd:{name}"),
            None => write!(f, "{}", self.iri()),
        }
    }
}

/// The value of a property assertion on an individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Another individual, by name or IRI.
    Individual(String),
    /// A data value.
    Literal(Literal),
}

impl PropertyValue {
    #[inline]
    pub fn individual(name: impl Into<String>) -> Self {
        Self::Individual(name.into())
    }

    #[inline]
    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal(value.into())
    }
}

impl From<Literal> for PropertyValue {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

/// What a quantified or qualified restriction ranges over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filler {
    /// A class, for object properties.
    Class(String),
    /// A datatype, for data properties.
    Datatype(Datatype),
}

impl Filler {
    #[inline]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }
}

/// A property restriction to attach to a class as an anonymous superclass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Restriction {
    SomeValuesFrom(Filler),
    AllValuesFrom(Filler),
    HasValue(PropertyValue),
    /// Qualified when `qualifier` is set.
    MinCardinality {
        cardinality: u32,
        qualifier: Option<Filler>,
    },
    /// Qualified when `qualifier` is set.
    MaxCardinality {
        cardinality: u32,
        qualifier: Option<Filler>,
    },
    /// Qualified when `qualifier` is set.
    ExactCardinality {
        cardinality: u32,
        qualifier: Option<Filler>,
    },
}

impl Restriction {
    pub fn kind(&self) -> RestrictionKind {
        match self {
            Self::SomeValuesFrom(_) => RestrictionKind::SomeValuesFrom,
            Self::AllValuesFrom(_) => RestrictionKind::AllValuesFrom,
            Self::HasValue(_) => RestrictionKind::HasValue,
            Self::MinCardinality { qualifier, .. } => {
                if qualifier.is_some() {
                    RestrictionKind::MinQualifiedCardinality
                } else {
                    RestrictionKind::MinCardinality
                }
            }
            Self::MaxCardinality { qualifier, .. } => {
                if qualifier.is_some() {
                    RestrictionKind::MaxQualifiedCardinality
                } else {
                    RestrictionKind::MaxCardinality
                }
            }
            Self::ExactCardinality { qualifier, .. } => {
                if qualifier.is_some() {
                    RestrictionKind::QualifiedCardinality
                } else {
                    RestrictionKind::ExactCardinality
                }
            }
        }
    }
}

/// The OWL restriction vocabulary, one variant per constraining predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RestrictionKind {
    SomeValuesFrom,
    AllValuesFrom,
    HasValue,
    MinCardinality,
    MaxCardinality,
    ExactCardinality,
    MinQualifiedCardinality,
    MaxQualifiedCardinality,
    QualifiedCardinality,
}

impl RestrictionKind {
    pub const ALL: [Self; 9] = [
        Self::SomeValuesFrom,
        Self::AllValuesFrom,
        Self::HasValue,
        Self::MinCardinality,
        Self::MaxCardinality,
        Self::ExactCardinality,
        Self::MinQualifiedCardinality,
        Self::MaxQualifiedCardinality,
        Self::QualifiedCardinality,
    ];

    #[inline]
    pub const fn predicate(self) -> NamedNodeRef<'static> {
        match self {
            Self::SomeValuesFrom => owl::SOME_VALUES_FROM,
            Self::AllValuesFrom => owl::ALL_VALUES_FROM,
            Self::HasValue => owl::HAS_VALUE,
            Self::MinCardinality => owl::MIN_CARDINALITY,
            Self::MaxCardinality => owl::MAX_CARDINALITY,
            Self::ExactCardinality => owl::CARDINALITY,
            Self::MinQualifiedCardinality => owl::MIN_QUALIFIED_CARDINALITY,
            Self::MaxQualifiedCardinality => owl::MAX_QUALIFIED_CARDINALITY,
            Self::QualifiedCardinality => owl::QUALIFIED_CARDINALITY,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SomeValuesFrom => "someValuesFrom",
            Self::AllValuesFrom => "allValuesFrom",
            Self::HasValue => "hasValue",
            Self::MinCardinality => "minCardinality",
            Self::MaxCardinality => "maxCardinality",
            Self::ExactCardinality => "exactCardinality",
            Self::MinQualifiedCardinality => "minQualifiedCardinality",
            Self::MaxQualifiedCardinality => "maxQualifiedCardinality",
            Self::QualifiedCardinality => "qualifiedCardinality",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        if name == "cardinality" {
            return Some(Self::ExactCardinality);
        }
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    #[inline]
    pub const fn is_cardinality(self) -> bool {
        !matches!(
            self,
            Self::SomeValuesFrom | Self::AllValuesFrom | Self::HasValue
        )
    }

    #[inline]
    pub const fn is_qualified(self) -> bool {
        matches!(
            self,
            Self::MinQualifiedCardinality
                | Self::MaxQualifiedCardinality
                | Self::QualifiedCardinality
        )
    }
}

impl fmt::Display for RestrictionKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary relations between two entities of compatible kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    SubClassOf,
    EquivalentClass,
    DisjointWith,
    SubPropertyOf,
    EquivalentProperty,
    InverseOf,
    PropertyDisjointWith,
    SameAs,
    DifferentFrom,
}

impl RelationKind {
    pub const ALL: [Self; 9] = [
        Self::SubClassOf,
        Self::EquivalentClass,
        Self::DisjointWith,
        Self::SubPropertyOf,
        Self::EquivalentProperty,
        Self::InverseOf,
        Self::PropertyDisjointWith,
        Self::SameAs,
        Self::DifferentFrom,
    ];

    #[inline]
    pub const fn predicate(self) -> NamedNodeRef<'static> {
        match self {
            Self::SubClassOf => rdfs::SUB_CLASS_OF,
            Self::EquivalentClass => owl::EQUIVALENT_CLASS,
            Self::DisjointWith => owl::DISJOINT_WITH,
            Self::SubPropertyOf => rdfs::SUB_PROPERTY_OF,
            Self::EquivalentProperty => owl::EQUIVALENT_PROPERTY,
            Self::InverseOf => owl::INVERSE_OF,
            Self::PropertyDisjointWith => owl::PROPERTY_DISJOINT_WITH,
            Self::SameAs => owl::SAME_AS,
            Self::DifferentFrom => owl::DIFFERENT_FROM,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SubClassOf => "subClassOf",
            Self::EquivalentClass => "equivalentClass",
            Self::DisjointWith => "disjointWith",
            Self::SubPropertyOf => "subPropertyOf",
            Self::EquivalentProperty => "equivalentProperty",
            Self::InverseOf => "inverseOf",
            Self::PropertyDisjointWith => "propertyDisjointWith",
            Self::SameAs => "sameAs",
            Self::DifferentFrom => "differentFrom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Checks whether entities of the given kind may appear on both sides of this relation.
    pub const fn relates(self, kind: EntityKind) -> bool {
        match self {
            Self::SubClassOf | Self::EquivalentClass | Self::DisjointWith => {
                matches!(kind, EntityKind::Class)
            }
            Self::SubPropertyOf | Self::EquivalentProperty | Self::PropertyDisjointWith => {
                matches!(kind, EntityKind::ObjectProperty | EntityKind::DataProperty)
            }
            Self::InverseOf => matches!(kind, EntityKind::ObjectProperty),
            Self::SameAs | Self::DifferentFrom => matches!(kind, EntityKind::Individual),
        }
    }
}

impl fmt::Display for RelationKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A relation statement between two named entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub subject: NamedNode,
    pub kind: RelationKind,
    pub object: NamedNode,
}

/// A non-structural statement about a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub predicate: NamedNode,
    /// A literal or an IRI.
    pub value: Term,
}

/// A named class with its direct hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub iri: NamedNode,
    pub label: Option<String>,
    pub comment: Option<String>,
    /// Named direct superclasses.
    pub parents: Vec<NamedNode>,
    /// Named direct subclasses.
    pub children: Vec<NamedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPropertyInfo {
    pub iri: NamedNode,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub domains: Vec<NamedNode>,
    pub ranges: Vec<NamedNode>,
    pub characteristics: Vec<Characteristic>,
    pub inverses: Vec<NamedNode>,
    pub parents: Vec<NamedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPropertyInfo {
    pub iri: NamedNode,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub domains: Vec<NamedNode>,
    pub ranges: Vec<NamedNode>,
    pub functional: bool,
    pub parents: Vec<NamedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationPropertyInfo {
    pub iri: NamedNode,
    pub label: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualInfo {
    pub iri: NamedNode,
    pub label: Option<String>,
    pub comment: Option<String>,
    /// Asserted types other than `owl:NamedIndividual`.
    pub classes: Vec<NamedNode>,
    /// Object and data property assertions, sorted by property.
    pub values: Vec<(NamedNode, Term)>,
}

/// A restriction as found in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionInfo {
    /// The (usually blank) node denoting the restriction.
    pub node: NamedOrBlankNode,
    /// Named classes declaring the restriction as superclass.
    pub classes: Vec<NamedNode>,
    pub property: NamedNode,
    pub kind: RestrictionKind,
    /// The filler class or datatype, or the required value.
    pub value: Option<Term>,
    pub cardinality: Option<u32>,
    /// `owl:onClass` or `owl:onDataRange` of qualified cardinalities.
    pub qualifier: Option<NamedNode>,
}

/// Any entity of the ontology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Class(ClassInfo),
    ObjectProperty(ObjectPropertyInfo),
    DataProperty(DataPropertyInfo),
    AnnotationProperty(AnnotationPropertyInfo),
    Individual(IndividualInfo),
    Restriction(RestrictionInfo),
}

impl Entity {
    /// The entity kind, `None` for anonymous restrictions.
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::Class(_) => Some(EntityKind::Class),
            Self::ObjectProperty(_) => Some(EntityKind::ObjectProperty),
            Self::DataProperty(_) => Some(EntityKind::DataProperty),
            Self::AnnotationProperty(_) => Some(EntityKind::AnnotationProperty),
            Self::Individual(_) => Some(EntityKind::Individual),
            Self::Restriction(_) => None,
        }
    }

    pub fn iri(&self) -> Option<&NamedNode> {
        match self {
            Self::Class(info) => Some(&info.iri),
            Self::ObjectProperty(info) => Some(&info.iri),
            Self::DataProperty(info) => Some(&info.iri),
            Self::AnnotationProperty(info) => Some(&info.iri),
            Self::Individual(info) => Some(&info.iri),
            Self::Restriction(_) => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Class(info) => info.label.as_deref(),
            Self::ObjectProperty(info) => info.label.as_deref(),
            Self::DataProperty(info) => info.label.as_deref(),
            Self::AnnotationProperty(info) => info.label.as_deref(),
            Self::Individual(info) => info.label.as_deref(),
            Self::Restriction(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_names() {
        assert_eq!(Datatype::from_name("integer"), Some(Datatype::Integer));
        assert_eq!(Datatype::from_name("xsd:anyURI"), Some(Datatype::AnyUri));
        assert_eq!(
            Datatype::from_name("http://www.w3.org/2001/XMLSchema#boolean"),
            Some(Datatype::Boolean)
        );
        assert_eq!(
            Datatype::from_name("http://example.com/dt"),
            Some(Datatype::Other(NamedNode::new_unchecked(
                "http://example.com/dt"
            )))
        );
        assert_eq!(Datatype::DateTime.to_string(), "xsd:dateTime");
    }

    #[test]
    fn restriction_kinds() {
        let qualified = Restriction::MinCardinality {
            cardinality: 1,
            qualifier: Some(Filler::class("Wheel")),
        };
        assert_eq!(qualified.kind(), RestrictionKind::MinQualifiedCardinality);
        assert!(qualified.kind().is_qualified());
        assert_eq!(
            RestrictionKind::from_name("cardinality"),
            Some(RestrictionKind::ExactCardinality)
        );
        assert!(!RestrictionKind::HasValue.is_cardinality());
    }

    #[test]
    fn relation_kinds() {
        assert!(RelationKind::SubClassOf.relates(EntityKind::Class));
        assert!(RelationKind::SubPropertyOf.relates(EntityKind::DataProperty));
        assert!(!RelationKind::InverseOf.relates(EntityKind::DataProperty));
        assert_eq!(RelationKind::from_name("sameAs"), Some(RelationKind::SameAs));
        assert_eq!(
            Characteristic::from_name("Inverse-Functional"),
            Some(Characteristic::InverseFunctional)
        );
    }
}
