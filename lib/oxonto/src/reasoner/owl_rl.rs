//! Bridge to the [`reasonable`](https://docs.rs/reasonable) OWL 2 RL engine.

use crate::error::ReasoningError;
use oxrdf::{BlankNodeRef, Graph, NamedOrBlankNodeRef, TermRef, Triple};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};
use reasonable::reasoner::Reasoner as Engine;
use rustc_hash::FxHashSet;
use std::io::{BufWriter, Write};
use tracing::debug;

/// Computes the OWL 2 RL closure of `graph`.
///
/// The engine loads its input from files: the graph is handed over as a temporary Turtle
/// document and the closure is read back as N-Triples.
/// Conclusions about blank nodes the engine minted itself are dropped.
pub(super) fn owl_rl_closure(graph: &Graph) -> Result<Vec<Triple>, ReasoningError> {
    let mut file = tempfile::Builder::new()
        .prefix("oxonto-")
        .suffix(".ttl")
        .tempfile()
        .map_err(ReasoningError::engine)?;
    let mut serializer = RdfSerializer::from_format(RdfFormat::NTriples)
        .for_writer(BufWriter::new(file.as_file_mut()));
    for triple in graph {
        serializer
            .serialize_triple(triple)
            .map_err(ReasoningError::engine)?;
    }
    serializer
        .finish()
        .map_err(ReasoningError::engine)?
        .flush()
        .map_err(ReasoningError::engine)?;
    let path = file
        .path()
        .to_str()
        .ok_or_else(|| ReasoningError::engine("the temporary file path is not valid UTF-8"))?;

    let mut engine = Engine::new();
    engine.load_file(path).map_err(ReasoningError::engine)?;
    engine.reason();

    let mut document = String::new();
    for triple in engine.get_triples() {
        // Display of a triple is its N-Triples form without the final dot
        document.push_str(&triple.to_string());
        document.push_str(" .\n");
    }
    let known = blank_nodes(graph);
    let mut closure = Vec::new();
    for triple in RdfParser::from_format(RdfFormat::NTriples).for_reader(document.as_bytes()) {
        let triple = match triple {
            Ok(quad) => Triple::from(quad),
            Err(error) => {
                debug!(%error, "skipping a conclusion that is not a valid RDF triple");
                continue;
            }
        };
        if mentions_only(&triple, &known) {
            closure.push(triple);
        }
    }
    debug!(triples = closure.len(), "reasonable computed the OWL 2 RL closure");
    Ok(closure)
}

fn blank_nodes(graph: &Graph) -> FxHashSet<String> {
    let mut nodes = FxHashSet::default();
    for t in graph {
        if let NamedOrBlankNodeRef::BlankNode(b) = t.subject {
            nodes.insert(b.as_str().to_owned());
        }
        if let TermRef::BlankNode(b) = t.object {
            nodes.insert(b.as_str().to_owned());
        }
    }
    nodes
}

fn mentions_only(triple: &Triple, known: &FxHashSet<String>) -> bool {
    let is_known = |b: BlankNodeRef<'_>| known.contains(b.as_str());
    let subject = match triple.subject.as_ref() {
        NamedOrBlankNodeRef::BlankNode(b) => is_known(b),
        NamedOrBlankNodeRef::NamedNode(_) => true,
    };
    let object = match triple.object.as_ref() {
        TermRef::BlankNode(b) => is_known(b),
        _ => true,
    };
    subject && object
}
