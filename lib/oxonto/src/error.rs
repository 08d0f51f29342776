use crate::io::OntologyFormat;
use crate::model::EntityKind;
use oxiri::IriParseError;
use oxrdf::{LanguageTagParseError, NamedNode};
use oxrdfio::RdfParseError;
use std::error::Error;
use std::io;
use thiserror::Error;

/// An error raised by an [`Ontology`](crate::Ontology) operation.
///
/// Whatever the variant, the ontology is left exactly as it was before the failed call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OntologyError {
    /// The IRI is already declared, possibly as another kind of entity.
    #[error("{iri} is already declared as {existing}")]
    DuplicateIdentifier {
        /// The IRI the operation tried to declare.
        iri: NamedNode,
        /// What the IRI already denotes.
        existing: EntityKind,
    },
    /// A referenced entity does not exist.
    #[error("there is no {} named {iri}", expected_name(.expected))]
    UnknownReference {
        /// The IRI that could not be found.
        iri: NamedNode,
        /// The kind of entity the operation expected, if it requires one.
        expected: Option<EntityKind>,
    },
    /// Adding the `rdfs:subClassOf` edge would close a cycle in the class hierarchy.
    #[error("making {sub} a subclass of {sup} would create a cycle")]
    CycleDetected {
        /// The would-be subclass.
        sub: NamedNode,
        /// The would-be superclass.
        sup: NamedNode,
    },
    /// The entity can not be deleted because other statements still mention it.
    #[error("{iri} is still referenced by {references} triple(s)")]
    EntityInUse {
        /// The entity that was supposed to be deleted.
        iri: NamedNode,
        /// The number of triples referencing it.
        references: usize,
    },
    /// A name did not resolve to a valid IRI.
    #[error("invalid IRI '{iri}': {error}")]
    InvalidIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
    /// The restriction is not consistent with its property.
    #[error("invalid restriction: {0}")]
    InvalidRestriction(String),
    /// The relation does not apply to the given entities.
    #[error("{relation} can not relate {subject} and {object}")]
    InvalidRelation {
        /// The relation name.
        relation: &'static str,
        /// The subject of the relation.
        subject: NamedNode,
        /// The object of the relation.
        object: NamedNode,
    },
    /// An axiom is missing members or has members of the wrong kind.
    #[error("invalid axiom: {0}")]
    InvalidAxiom(String),
    /// The value does not fit the kind of the property it is asserted with.
    #[error("invalid value for {property}: {message}")]
    InvalidValue {
        /// The property of the assertion.
        property: NamedNode,
        /// What is wrong with the value.
        message: String,
    },
    /// A language tag is not valid BCP47.
    #[error("invalid language tag '{tag}': {error}")]
    InvalidLanguageTag {
        /// The tag itself.
        tag: String,
        /// The parsing error.
        #[source]
        error: LanguageTagParseError,
    },
    /// An import failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A reasoning run failed.
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
    /// Error from the OS I/O layer while exporting.
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn expected_name(kind: &Option<EntityKind>) -> &'static str {
    kind.map_or("entity", EntityKind::name)
}

impl OntologyError {
    pub(crate) fn invalid_iri(iri: impl Into<String>, error: IriParseError) -> Self {
        Self::InvalidIri {
            iri: iri.into(),
            error,
        }
    }
}

impl From<OntologyError> for io::Error {
    #[inline]
    fn from(error: OntologyError) -> Self {
        match error {
            OntologyError::Io(error) => error,
            OntologyError::Parse(error) => error.into(),
            OntologyError::Reasoning(_) => Self::other(error),
            _ => Self::new(io::ErrorKind::InvalidInput, error),
        }
    }
}

/// An error raised while importing a document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid in the announced format.
    #[error("invalid {format} document: {source}")]
    Syntax {
        /// The format the document was parsed as.
        format: OntologyFormat,
        /// The parser error.
        #[source]
        source: RdfParseError,
    },
    /// The format is known but can only be exported.
    #[error("{0} documents can not be imported")]
    UnsupportedFormat(OntologyFormat),
    /// The format name or file extension is not recognized.
    #[error("unknown ontology format '{0}'")]
    UnknownFormat(String),
    /// The base IRI is invalid.
    #[error("invalid base IRI '{iri}': {error}")]
    InvalidBaseIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
}

impl From<ParseError> for io::Error {
    #[inline]
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Syntax {
                source: RdfParseError::Io(error),
                ..
            } => error,
            _ => Self::new(io::ErrorKind::InvalidData, error),
        }
    }
}

/// An error raised by a [`Reasoner`](crate::reasoner::Reasoner).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReasoningError {
    /// A consistency rule fired.
    #[error("the ontology is inconsistent ({rule}): {message}")]
    Inconsistent {
        /// Name of the rule that detected the inconsistency.
        rule: &'static str,
        /// Human readable description of the clash.
        message: String,
    },
    /// An RDF list used by an axiom is cyclic, truncated or too long.
    #[error("malformed RDF list starting at {0}")]
    MalformedList(String),
    /// The fixpoint was not reached in the allowed number of rounds.
    #[error("reasoning did not converge after {0} rounds")]
    IterationLimit(usize),
    /// More triples would be inferred than allowed.
    #[error("reasoning would infer more than {0} triples")]
    TooManyInferences(usize),
    /// Error raised by the inference engine the reasoning was delegated to.
    #[error("the reasoning engine failed: {0}")]
    Engine(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl ReasoningError {
    /// Wraps an error raised by an inference engine.
    #[inline]
    pub fn engine(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Engine(error.into())
    }
}
