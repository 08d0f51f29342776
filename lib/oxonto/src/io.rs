//! Import and export of whole ontologies.
//!
//! Imports are atomic: the document is fully parsed into a fresh graph before it replaces
//! the current one. Exports are deterministic: blank nodes get canonical labels and triples
//! are written in a stable order, so that exporting the same graph twice gives the same bytes.

use crate::error::{OntologyError, ParseError};
use crate::namespace::Namespace;
use crate::ontology::Ontology;
use crate::vocab::owl;
use oxjsonld::JsonLdProfileSet;
use oxrdf::vocab::rdf;
use oxrdf::{
    BlankNode, BlankNodeRef, Graph, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term,
    TermRef, Triple, TripleRef,
};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use std::fmt;
use std::hash::Hasher;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::{debug, info};

/// The serialization formats an ontology can be exchanged in.
///
/// JSON-LD is export only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntologyFormat {
    Turtle,
    RdfXml,
    NTriples,
    N3,
    JsonLd,
}

impl OntologyFormat {
    pub const ALL: [Self; 5] = [
        Self::Turtle,
        Self::RdfXml,
        Self::NTriples,
        Self::N3,
        Self::JsonLd,
    ];

    /// The format name.
    ///
    /// ```
    /// use oxonto::io::OntologyFormat;
    ///
    /// assert_eq!(OntologyFormat::RdfXml.name(), "RDF/XML")
    /// ```
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Turtle => "Turtle",
            Self::RdfXml => "RDF/XML",
            Self::NTriples => "N-Triples",
            Self::N3 => "N3",
            Self::JsonLd => "JSON-LD",
        }
    }

    /// The canonical file extension.
    #[inline]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::RdfXml => "rdf",
            Self::NTriples => "nt",
            Self::N3 => "n3",
            Self::JsonLd => "jsonld",
        }
    }

    #[inline]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::RdfXml => "application/rdf+xml",
            Self::NTriples => "application/n-triples",
            Self::N3 => "text/n3",
            Self::JsonLd => "application/ld+json",
        }
    }

    /// Whether documents in this format can be imported.
    #[inline]
    pub const fn is_importable(self) -> bool {
        !matches!(self, Self::JsonLd)
    }

    /// Looks up a format from a name, a file extension or a media type, ignoring case.
    ///
    /// ```
    /// use oxonto::io::OntologyFormat;
    ///
    /// assert_eq!(OntologyFormat::from_name("ttl"), Some(OntologyFormat::Turtle));
    /// assert_eq!(OntologyFormat::from_name("OWL"), Some(OntologyFormat::RdfXml));
    /// assert_eq!(
    ///     OntologyFormat::from_name("application/n-triples"),
    ///     Some(OntologyFormat::NTriples)
    /// );
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Some(match name.as_str() {
            "turtle" | "ttl" => Self::Turtle,
            "xml" | "rdf" | "owl" | "rdfxml" | "rdf/xml" | "rdf-xml" | "pretty-xml" => Self::RdfXml,
            "nt" | "ntriples" | "n-triples" => Self::NTriples,
            "n3" => Self::N3,
            "jsonld" | "json-ld" | "json" => Self::JsonLd,
            _ => return Self::from_media_type(&name),
        })
    }

    /// Looks up a format from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::from_name(extension.trim_start_matches('.'))
            .filter(|_| !extension.contains('/'))
    }

    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let media_type = media_type
            .split(';')
            .next()
            .unwrap_or(media_type)
            .trim()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.media_type() == media_type)
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            Self::Turtle => RdfFormat::Turtle,
            Self::RdfXml => RdfFormat::RdfXml,
            Self::NTriples => RdfFormat::NTriples,
            Self::N3 => RdfFormat::N3,
            Self::JsonLd => RdfFormat::JsonLd {
                profile: JsonLdProfileSet::empty(),
            },
        }
    }

    fn supports_prefixes(self) -> bool {
        matches!(self, Self::Turtle | Self::N3)
    }
}

impl fmt::Display for OntologyFormat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OntologyFormat {
    type Err = ParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| ParseError::UnknownFormat(name.into()))
    }
}

impl Ontology {
    /// Replaces the ontology by the content of a document.
    ///
    /// On success, the namespace is recovered from the `owl:Ontology` declaration of the
    /// document (if any) and the document prefixes are added to the prefix map.
    /// On failure the ontology is left untouched.
    /// Returns the number of triples read.
    ///
    /// ```
    /// use oxonto::Ontology;
    /// use oxonto::io::OntologyFormat;
    ///
    /// let mut ontology = Ontology::default();
    /// ontology.import_from_str(
    ///     "@prefix : <http://example.com/zoo#> .
    ///      @prefix owl: <http://www.w3.org/2002/07/owl#> .
    ///      <http://example.com/zoo> a owl:Ontology .
    ///      :Lion a owl:Class .",
    ///     OntologyFormat::Turtle,
    ///     None,
    /// )?;
    /// assert_eq!(ontology.namespace().base(), "http://example.com/zoo#");
    /// assert_eq!(ontology.classes()[0].iri.as_str(), "http://example.com/zoo#Lion");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn import_from_reader(
        &mut self,
        reader: impl Read,
        format: OntologyFormat,
        base_iri: Option<&str>,
    ) -> Result<usize, OntologyError> {
        if !format.is_importable() {
            return Err(ParseError::UnsupportedFormat(format).into());
        }
        let mut parser = RdfParser::from_format(format.rdf_format())
            .without_named_graphs()
            .rename_blank_nodes();
        if let Some(base_iri) = base_iri {
            parser = parser
                .with_base_iri(base_iri)
                .map_err(|error| ParseError::InvalidBaseIri {
                    iri: base_iri.into(),
                    error,
                })?;
        }
        let mut parser = parser.for_reader(reader);
        let mut graph = Graph::new();
        for quad in &mut parser {
            let quad = quad.map_err(|source| ParseError::Syntax { format, source })?;
            graph.insert(&Triple::from(quad));
        }
        // The parser keeps every prefix declared in the document
        let prefixes = parser
            .prefixes()
            .map(|(name, iri)| (name.to_owned(), iri.to_owned()))
            .collect::<Vec<_>>();

        let mut namespace = recover_namespace(&graph).unwrap_or_else(|| self.namespace().clone());
        for (name, iri) in prefixes {
            if name.is_empty() && iri != namespace.base() {
                continue;
            }
            if let Err(error) = namespace.set_prefix(name.as_str(), iri.as_str()) {
                debug!(%error, prefix = name, "ignoring document prefix");
            }
        }
        let len = graph.len();
        info!(
            %format,
            triples = len,
            base = namespace.base(),
            "imported ontology"
        );
        self.replace(graph, namespace);
        Ok(len)
    }

    /// Same as [`import_from_reader`](Self::import_from_reader) on an in-memory document.
    pub fn import_from_str(
        &mut self,
        data: &str,
        format: OntologyFormat,
        base_iri: Option<&str>,
    ) -> Result<usize, OntologyError> {
        self.import_from_reader(data.as_bytes(), format, base_iri)
    }

    /// Writes the ontology to `writer` and returns it.
    ///
    /// The output only depends on the graph content, the prefix map and the format.
    pub fn export_to_writer<W: Write>(
        &self,
        writer: W,
        format: OntologyFormat,
    ) -> Result<W, OntologyError> {
        let mut serializer = RdfSerializer::from_format(format.rdf_format());
        if format.supports_prefixes() {
            for (name, iri) in self.namespace().prefixes() {
                serializer = serializer
                    .with_prefix(name, iri)
                    .map_err(|e| OntologyError::invalid_iri(iri, e))?;
            }
        }
        let triples = canonical_triples(self.graph());
        let mut serializer = serializer.for_writer(writer);
        for triple in &triples {
            serializer.serialize_triple(triple)?;
        }
        info!(%format, triples = triples.len(), "exported ontology");
        Ok(serializer.finish()?)
    }

    pub fn export_to_string(&self, format: OntologyFormat) -> Result<String, OntologyError> {
        let buffer = self.export_to_writer(Vec::new(), format)?;
        String::from_utf8(buffer).map_err(|e| {
            OntologyError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

/// Derives the namespace from the first `owl:Ontology` declaration.
///
/// The separator of an ontology IRI lacking one is taken from a sample class or property
/// minted under it, `#` by default.
fn recover_namespace(graph: &Graph) -> Option<Namespace> {
    let ontology = graph
        .subjects_for_predicate_object(rdf::TYPE, owl::ONTOLOGY)
        .filter_map(|s| match s {
            NamedOrBlankNodeRef::NamedNode(s) => Some(s),
            NamedOrBlankNodeRef::BlankNode(_) => None,
        })
        .min_by_key(|s| s.as_str())?;
    let iri = ontology.as_str();
    let base = if iri.ends_with('#') || iri.ends_with('/') {
        iri.to_owned()
    } else {
        let separator = [owl::CLASS, owl::OBJECT_PROPERTY]
            .into_iter()
            .find_map(|kind| sample_entity(graph, kind))
            .and_then(|sample| sample.as_str().strip_prefix(iri)?.chars().next())
            .filter(|c| *c == '/')
            .unwrap_or('#');
        format!("{iri}{separator}")
    };
    match Namespace::new(base) {
        Ok(namespace) => Some(namespace.with_ontology_iri(ontology.into_owned())),
        Err(error) => {
            debug!(%error, "the ontology IRI can not be used as base");
            None
        }
    }
}

fn sample_entity<'a>(graph: &'a Graph, kind: NamedNodeRef<'_>) -> Option<NamedNodeRef<'a>> {
    graph
        .subjects_for_predicate_object(rdf::TYPE, kind)
        .filter_map(|s| match s {
            NamedOrBlankNodeRef::NamedNode(s) => Some(s),
            NamedOrBlankNodeRef::BlankNode(_) => None,
        })
        .min_by_key(|s| s.as_str())
}

/// The graph triples with canonical blank node labels, in N-Triples lexicographic order.
fn canonical_triples(graph: &Graph) -> Vec<Triple> {
    let labels = canonical_labels(graph);
    let relabel = |node: BlankNodeRef<'_>| {
        labels
            .get(&node)
            .cloned()
            .unwrap_or_else(|| node.into_owned())
    };
    let mut triples = graph
        .iter()
        .map(|t| {
            let subject: NamedOrBlankNode = match t.subject {
                NamedOrBlankNodeRef::BlankNode(b) => relabel(b).into(),
                s => s.into_owned(),
            };
            let object: Term = match t.object {
                TermRef::BlankNode(b) => relabel(b).into(),
                o => o.into_owned(),
            };
            Triple::new(subject, t.predicate.into_owned(), object)
        })
        .collect::<Vec<_>>();
    triples.sort_by_cached_key(Triple::to_string);
    triples
}

/// Labels blank nodes `b0`, `b1`, ... in the order of a hash of their neighbourhood.
///
/// The hashes are refined by iteratively folding in the hashes of the neighbouring blank
/// nodes until the partition they induce stops getting finer.
fn canonical_labels(graph: &Graph) -> FxHashMap<BlankNodeRef<'_>, BlankNode> {
    let mut nodes = Vec::new();
    let mut seen = FxHashSet::default();
    for triple in graph {
        if let NamedOrBlankNodeRef::BlankNode(b) = triple.subject {
            if seen.insert(b) {
                nodes.push(b);
            }
        }
        if let TermRef::BlankNode(b) = triple.object {
            if seen.insert(b) {
                nodes.push(b);
            }
        }
    }
    if nodes.is_empty() {
        return FxHashMap::default();
    }

    let mut hashes = nodes
        .iter()
        .map(|node| (*node, 0))
        .collect::<FxHashMap<_, u64>>();
    let mut classes = 1;
    for _ in 0..nodes.len() {
        let refined = nodes
            .iter()
            .map(|node| (*node, neighbourhood_hash(graph, *node, &hashes)))
            .collect::<FxHashMap<_, _>>();
        let refined_classes = refined.values().collect::<FxHashSet<_>>().len();
        hashes = refined;
        if refined_classes <= classes {
            break;
        }
        classes = refined_classes;
    }

    nodes.sort_by(|a, b| {
        hashes[a]
            .cmp(&hashes[b])
            .then_with(|| a.as_str().cmp(b.as_str()))
    });
    nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| (node, BlankNode::new_unchecked(format!("b{i}"))))
        .collect()
}

fn neighbourhood_hash(
    graph: &Graph,
    node: BlankNodeRef<'_>,
    hashes: &FxHashMap<BlankNodeRef<'_>, u64>,
) -> u64 {
    let key = |term: TermRef<'_>| match term {
        TermRef::BlankNode(b) => format!("_:{:016x}", hashes.get(&b).copied().unwrap_or_default()),
        term => term.to_string(),
    };
    let mut signatures = graph
        .triples_for_subject(node)
        .map(|t| format!("> {} {}", t.predicate, key(t.object)))
        .chain(graph.triples_for_object(node).map(|t: TripleRef<'_>| {
            format!("< {} {}", key(t.subject.into()), t.predicate)
        }))
        .collect::<Vec<_>>();
    signatures.sort_unstable();
    let mut hasher = FxHasher::default();
    hasher.write_u64(hashes.get(&node).copied().unwrap_or_default());
    for signature in signatures {
        hasher.write(signature.as_bytes());
        hasher.write_u8(0xFF);
    }
    hasher.finish()
}
