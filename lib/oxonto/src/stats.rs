use crate::model::EntityKind;
use crate::ontology::Ontology;
use crate::vocab::owl;
use oxrdf::vocab::rdf;
use std::fmt;

/// Entity and triple counts of an ontology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub classes: usize,
    pub object_properties: usize,
    pub data_properties: usize,
    pub annotation_properties: usize,
    pub individuals: usize,
    pub restrictions: usize,
    pub total_triples: usize,
    /// Triples not describing the ontology header.
    pub content_triples: usize,
}

impl Ontology {
    /// Counts the declared entities and the triples.
    ///
    /// ```
    /// use oxonto::Ontology;
    ///
    /// let mut ontology = Ontology::default();
    /// ontology.add_class("Person", None)?;
    /// let statistics = ontology.statistics();
    /// assert_eq!(statistics.classes, 1);
    /// assert_eq!(statistics.total_triples, 2);
    /// assert_eq!(statistics.content_triples, 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn statistics(&self) -> Statistics {
        let graph = self.graph();
        let header = graph.triples_for_subject(self.ontology_iri()).count();
        Statistics {
            classes: self.entities(EntityKind::Class).len(),
            object_properties: self.entities(EntityKind::ObjectProperty).len(),
            data_properties: self.entities(EntityKind::DataProperty).len(),
            annotation_properties: self.entities(EntityKind::AnnotationProperty).len(),
            individuals: self.entities(EntityKind::Individual).len(),
            restrictions: graph
                .subjects_for_predicate_object(rdf::TYPE, owl::RESTRICTION)
                .count(),
            total_triples: graph.len(),
            content_triples: graph.len() - header,
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "classes: {}", self.classes)?;
        writeln!(f, "object properties: {}", self.object_properties)?;
        writeln!(f, "data properties: {}", self.data_properties)?;
        writeln!(f, "annotation properties: {}", self.annotation_properties)?;
        writeln!(f, "individuals: {}", self.individuals)?;
        writeln!(f, "restrictions: {}", self.restrictions)?;
        writeln!(f, "triples: {}", self.total_triples)?;
        write!(f, "content triples: {}", self.content_triples)
    }
}
