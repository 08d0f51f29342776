//! Minting and shortening of ontology IRIs.

use crate::error::OntologyError;
use crate::vocab::{DC_ELEMENTS_NAMESPACE, dcterms, owl, skos};
use oxiri::Iri;
use oxrdf::{NamedNode, NamedNodeRef};
use std::collections::BTreeMap;

/// Base IRI of a fresh [`Ontology`](crate::Ontology).
pub const DEFAULT_BASE_IRI: &str = "http://example.org/ontology#";

const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub(crate) const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// The base IRI under which new entities are minted, together with the prefix map.
///
/// The base always ends with `#` or `/`; the ontology IRI is the base without it.
///
/// ```
/// use oxonto::Namespace;
///
/// let namespace = Namespace::new("http://example.com/zoo")?;
/// assert_eq!(namespace.base(), "http://example.com/zoo#");
/// assert_eq!(namespace.ontology_iri().as_str(), "http://example.com/zoo");
/// assert_eq!(
///     namespace.resolve("Lion")?.as_str(),
///     "http://example.com/zoo#Lion"
/// );
/// assert_eq!(
///     namespace.resolve("owl:Thing")?.as_str(),
///     "http://www.w3.org/2002/07/owl#Thing"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    base: String,
    ontology: NamedNode,
    prefixes: BTreeMap<String, String>,
}

impl Namespace {
    /// Builds a namespace, appending `#` to the base if it ends with neither `#` nor `/`.
    pub fn new(base: impl Into<String>) -> Result<Self, OntologyError> {
        let base = normalize_base(base.into());
        Iri::parse(base.as_str()).map_err(|e| OntologyError::invalid_iri(base.as_str(), e))?;
        let ontology = ontology_iri_for(&base)?;
        let mut prefixes = default_prefixes();
        prefixes.insert(String::new(), base.clone());
        Ok(Self {
            base,
            ontology,
            prefixes,
        })
    }

    #[inline]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The IRI of the `owl:Ontology` resource.
    #[inline]
    pub fn ontology_iri(&self) -> &NamedNode {
        &self.ontology
    }

    /// Turns a name into an IRI.
    ///
    /// Absolute `http`, `https` and `urn` IRIs are kept, `prefix:local` names are expanded
    /// using the prefix map and anything else is appended to the base.
    pub fn resolve(&self, name: &str) -> Result<NamedNode, OntologyError> {
        let name = name.trim();
        if name.is_empty() {
            // The empty string is not an absolute IRI: this reports the parse error.
            return NamedNode::new(name).map_err(|e| OntologyError::invalid_iri(name, e));
        }
        let iri = if is_absolute(name) {
            name.to_owned()
        } else if let Some(expanded) = self.expand(name) {
            expanded
        } else {
            format!("{}{name}", self.base)
        };
        NamedNode::new(iri.as_str()).map_err(|e| OntologyError::invalid_iri(iri, e))
    }

    /// Shortens an IRI to `prefix:local` using the longest matching namespace.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, namespace)| {
                iri.len() > namespace.len()
                    && iri.starts_with(namespace.as_str())
                    && !iri[namespace.len()..].contains(['/', '#'])
            })
            .max_by_key(|(_, namespace)| namespace.len())
            .map(|(prefix, namespace)| format!("{prefix}:{}", &iri[namespace.len()..]))
    }

    /// The prefixes, sorted by prefix name.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    /// Binds a prefix, replacing any previous binding.
    pub fn set_prefix(
        &mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<(), OntologyError> {
        let namespace = namespace.into();
        Iri::parse(namespace.as_str())
            .map_err(|e| OntologyError::invalid_iri(namespace.as_str(), e))?;
        self.prefixes.insert(prefix.into(), namespace);
        Ok(())
    }

    fn expand(&self, name: &str) -> Option<String> {
        let (prefix, local) = name.split_once(':')?;
        let namespace = self.prefixes.get(prefix)?;
        Some(format!("{namespace}{local}"))
    }

    /// Uses an existing ontology IRI instead of the one derived from the base.
    pub(crate) fn with_ontology_iri(mut self, ontology: NamedNode) -> Self {
        self.ontology = ontology;
        self
    }

    /// Rewrites an IRI minted under `old` to the same local name under this base.
    pub(crate) fn rebase_iri(&self, old: &Self, iri: NamedNodeRef<'_>) -> Option<NamedNode> {
        if iri == old.ontology.as_ref() {
            return Some(self.ontology.clone());
        }
        let local = iri.as_str().strip_prefix(old.base.as_str())?;
        Some(NamedNode::new_unchecked(format!("{}{local}", self.base)))
    }

    /// Keeps the prefixes of `other` that do not clash with the ones of `self`.
    pub(crate) fn inherit_prefixes(&mut self, other: &Self) {
        for (prefix, namespace) in &other.prefixes {
            if !prefix.is_empty() && namespace != &other.base {
                self.prefixes
                    .entry(prefix.clone())
                    .or_insert_with(|| namespace.clone());
            }
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        let mut prefixes = default_prefixes();
        prefixes.insert(String::new(), DEFAULT_BASE_IRI.into());
        Self {
            base: DEFAULT_BASE_IRI.into(),
            ontology: NamedNode::new_unchecked(DEFAULT_BASE_IRI.trim_end_matches(['#', '/'])),
            prefixes,
        }
    }
}

/// The local part of an IRI: what follows the last `#`, or else the last `/`.
///
/// ```
/// assert_eq!(oxonto::local_name("http://example.com/a#B"), "B");
/// assert_eq!(oxonto::local_name("http://example.com/a/B"), "B");
/// ```
pub fn local_name(iri: &str) -> &str {
    if let Some((_, local)) = iri.rsplit_once('#') {
        local
    } else if let Some((_, local)) = iri.rsplit_once('/') {
        local
    } else {
        iri
    }
}

fn is_absolute(name: &str) -> bool {
    name.starts_with("http://") || name.starts_with("https://") || name.starts_with("urn:")
}

fn normalize_base(mut base: String) -> String {
    if !base.ends_with('#') && !base.ends_with('/') {
        base.push('#');
    }
    base
}

fn ontology_iri_for(base: &str) -> Result<NamedNode, OntologyError> {
    let iri = base.trim_end_matches(['#', '/']);
    NamedNode::new(iri).map_err(|e| OntologyError::invalid_iri(iri, e))
}

fn default_prefixes() -> BTreeMap<String, String> {
    [
        ("dc", DC_ELEMENTS_NAMESPACE),
        ("dcterms", dcterms::NAMESPACE),
        ("owl", owl::NAMESPACE),
        ("rdf", RDF_NAMESPACE),
        ("rdfs", RDFS_NAMESPACE),
        ("skos", skos::NAMESPACE),
        ("xsd", XSD_NAMESPACE),
    ]
    .into_iter()
    .map(|(prefix, namespace)| (prefix.to_owned(), namespace.to_owned()))
    .collect()
}
