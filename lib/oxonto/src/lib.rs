#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod error;
pub mod io;
mod list;
mod model;
mod namespace;
mod ontology;
pub mod reasoner;
mod stats;
pub mod validate;
pub mod vocab;

pub use error::{OntologyError, ParseError, ReasoningError};
pub use list::{MAX_LIST_LENGTH, build_list, read_list};
pub use model::{
    Annotation, AnnotationPropertyInfo, Characteristic, ClassInfo, DataPropertyInfo, Datatype,
    Entity, EntityKind, Filler, IndividualInfo, ObjectPropertyInfo, PropertyValue, Relation,
    RelationKind, Restriction, RestrictionInfo, RestrictionKind,
};
pub use namespace::{DEFAULT_BASE_IRI, Namespace, local_name};
pub use ontology::{
    ANNOTATION_SHORTCUTS, ClassDefinition, ClassExpression, ClassExpressionKind, ClassUpdate,
    DataPropertyDefinition, DataPropertyUpdate, DeletionPolicy, IndividualDefinition,
    IndividualUpdate, ListAxiom, ObjectPropertyDefinition, ObjectPropertyUpdate,
    OntologyMetadata, Ontology,
};
pub use oxrdf;
pub use stats::Statistics;
