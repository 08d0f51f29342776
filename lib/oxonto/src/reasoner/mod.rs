//! RDFS and OWL 2 RL materialization.
//!
//! Inference engines implement [`Reasoner`]: they compute the triples entailed by a graph
//! without touching it. [`Ontology::apply_reasoning_with`] then adds the new triples in a
//! single step, so a failing engine leaves the ontology as it was.
//!
//! [`DefaultReasoner`] is the built-in engine. OWL 2 RL entailment is delegated to the
//! [`reasonable`](https://docs.rs/reasonable) engine, while the RDFS rules are applied by a
//! small forward chainer. The OWL 2 RL consistency rules are checked on the resulting closure.

mod owl_rl;
mod rules;

pub use rules::{ConsistencyRule, Rule};

use crate::error::{OntologyError, ReasoningError};
use crate::ontology::{ChangeSet, Ontology};
use oxrdf::{Graph, Triple};
use rules::{CONSISTENCY_RULES, Inferences, RDFS_RULES};
use std::fmt;
use tracing::{debug, info, warn};

/// The entailment regime to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReasoningProfile {
    /// The RDFS rules only.
    Rdfs,
    /// OWL 2 RL, computed by the `reasonable` engine.
    #[default]
    OwlRl,
    /// OWL 2 RL closed under the RDFS rules as well.
    OwlRlExt,
}

impl ReasoningProfile {
    pub const ALL: [Self; 3] = [Self::Rdfs, Self::OwlRl, Self::OwlRlExt];

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rdfs => "rdfs",
            Self::OwlRl => "owl-rl",
            Self::OwlRlExt => "owl-rl-ext",
        }
    }

    /// Looks up a profile by name, ignoring case.
    ///
    /// ```
    /// use oxonto::reasoner::ReasoningProfile;
    ///
    /// assert_eq!(ReasoningProfile::from_name("OWL-RL"), Some(ReasoningProfile::OwlRl));
    /// assert_eq!(ReasoningProfile::from_name("owl-rl-ext"), Some(ReasoningProfile::OwlRlExt));
    /// assert_eq!(ReasoningProfile::from_name("owl"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// The RDFS rules applied by the built-in chainer. Plain OWL 2 RL uses none of them.
    pub fn rules(self) -> &'static [Rule] {
        match self {
            Self::Rdfs | Self::OwlRlExt => &RDFS_RULES,
            Self::OwlRl => &[],
        }
    }

    /// Whether OWL 2 RL entailment is computed by the `reasonable` engine.
    #[inline]
    pub const fn uses_owl_rl(self) -> bool {
        matches!(self, Self::OwlRl | Self::OwlRlExt)
    }

    /// The rules detecting inconsistencies. RDFS has none.
    pub fn consistency_rules(self) -> &'static [ConsistencyRule] {
        if self.uses_owl_rl() {
            &CONSISTENCY_RULES
        } else {
            &[]
        }
    }
}

impl fmt::Display for ReasoningProfile {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the [`DefaultReasoner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonerConfig {
    /// Maximum number of RDFS rounds, and of OWL 2 RL/RDFS alternations for `owl-rl-ext`.
    pub max_iterations: usize,
    /// Maximum number of triples to infer (None = unlimited).
    pub max_inferred_triples: Option<usize>,
    /// Whether to run the consistency rules on the closed graph.
    pub check_consistency: bool,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_inferred_triples: None,
            check_consistency: true,
        }
    }
}

impl ReasonerConfig {
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_max_inferred_triples(mut self, max_inferred_triples: usize) -> Self {
        self.max_inferred_triples = Some(max_inferred_triples);
        self
    }

    #[must_use]
    pub fn without_consistency_check(mut self) -> Self {
        self.check_consistency = false;
        self
    }
}

/// An inference engine.
pub trait Reasoner {
    /// A short name used in logs.
    fn name(&self) -> &str;

    /// Returns the triples entailed by `graph` under `profile`.
    ///
    /// The result may contain triples already in `graph`: the caller filters them out.
    fn infer(&self, graph: &Graph, profile: ReasoningProfile) -> Result<Vec<Triple>, ReasoningError>;
}

/// The built-in engine: `reasonable` for OWL 2 RL, forward chaining for RDFS.
///
/// ```
/// use oxonto::Ontology;
/// use oxonto::reasoner::{DefaultReasoner, Reasoner, ReasoningProfile};
///
/// let mut ontology = Ontology::default();
/// ontology.add_class("Person", None)?;
/// ontology.add_class("Student", Some("Person"))?;
/// ontology.add_individual("alice", &["Student"], &[])?;
///
/// let inferred = DefaultReasoner::new().infer(ontology.graph(), ReasoningProfile::Rdfs)?;
/// assert_eq!(inferred.len(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultReasoner {
    config: ReasonerConfig,
}

impl DefaultReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReasonerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    /// Applies the RDFS rules until no new triple is derived.
    fn rdfs_closure(&self, closure: &mut Closure) -> Result<(), ReasoningError> {
        let mut rounds = 0;
        loop {
            if rounds >= self.config.max_iterations {
                return Err(ReasoningError::IterationLimit(self.config.max_iterations));
            }
            rounds += 1;
            let mut inferences = Inferences::new(&closure.graph);
            for rule in &RDFS_RULES {
                rule.apply(&closure.graph, &mut inferences);
            }
            let new = inferences.into_triples();
            if new.is_empty() {
                debug!(rounds, "reached the RDFS fixpoint");
                return Ok(());
            }
            closure.extend(new, &self.config)?;
        }
    }

    fn owl_rl_closure(&self, closure: &mut Closure) -> Result<(), ReasoningError> {
        let triples = owl_rl::owl_rl_closure(&closure.graph)?;
        closure.extend(triples, &self.config)
    }
}

impl Reasoner for DefaultReasoner {
    fn name(&self) -> &str {
        "default"
    }

    fn infer(&self, graph: &Graph, profile: ReasoningProfile) -> Result<Vec<Triple>, ReasoningError> {
        let mut closure = Closure {
            graph: graph.iter().collect(),
            inferred: Vec::new(),
        };
        if profile.uses_owl_rl() {
            rules::check_lists(graph)?;
        }
        match profile {
            ReasoningProfile::Rdfs => self.rdfs_closure(&mut closure)?,
            ReasoningProfile::OwlRl => self.owl_rl_closure(&mut closure)?,
            ReasoningProfile::OwlRlExt => {
                let mut rounds = 0;
                loop {
                    if rounds >= self.config.max_iterations {
                        return Err(ReasoningError::IterationLimit(self.config.max_iterations));
                    }
                    rounds += 1;
                    let before = closure.inferred.len();
                    self.owl_rl_closure(&mut closure)?;
                    self.rdfs_closure(&mut closure)?;
                    if closure.inferred.len() == before {
                        break;
                    }
                }
            }
        }
        if self.config.check_consistency {
            for rule in profile.consistency_rules() {
                rule.check(&closure.graph)?;
            }
        }
        debug!(%profile, inferred = closure.inferred.len(), "computed the closure");
        Ok(closure.inferred)
    }
}

/// The input graph with the triples inferred so far.
struct Closure {
    graph: Graph,
    inferred: Vec<Triple>,
}

impl Closure {
    /// Adds the triples not in the graph yet, within the configured inference limit.
    fn extend(
        &mut self,
        triples: impl IntoIterator<Item = Triple>,
        config: &ReasonerConfig,
    ) -> Result<(), ReasoningError> {
        for triple in triples {
            if self.graph.insert(&triple) {
                self.inferred.push(triple);
                if let Some(limit) = config.max_inferred_triples {
                    if self.inferred.len() > limit {
                        return Err(ReasoningError::TooManyInferences(limit));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Ontology {
    /// Materializes the triples entailed under `profile` with the built-in [`DefaultReasoner`].
    ///
    /// Returns the number of added triples, so a second run returns 0.
    pub fn apply_reasoning(&mut self, profile: ReasoningProfile) -> Result<usize, OntologyError> {
        self.apply_reasoning_with(&DefaultReasoner::new(), profile)
    }

    /// Materializes the triples entailed under `profile` according to `reasoner`.
    ///
    /// Nothing is added if the engine fails.
    pub fn apply_reasoning_with(
        &mut self,
        reasoner: &dyn Reasoner,
        profile: ReasoningProfile,
    ) -> Result<usize, OntologyError> {
        let inferred = match reasoner.infer(self.graph(), profile) {
            Ok(inferred) => inferred,
            Err(error) => {
                warn!(reasoner = reasoner.name(), %profile, %error, "reasoning failed");
                return Err(error.into());
            }
        };
        let mut changes = ChangeSet::default();
        for triple in inferred {
            if !self.graph().contains(&triple) {
                changes.insert(triple);
            }
        }
        let added = self.commit(changes);
        info!(
            reasoner = reasoner.name(),
            %profile,
            added,
            "applied reasoning"
        );
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::owl;
    use oxrdf::vocab::{rdf, rdfs};
    use oxrdf::{BlankNode, Literal, NamedNode, Term};

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{name}"))
    }

    fn chain(len: usize) -> Graph {
        let mut graph = Graph::new();
        for i in 0..len {
            graph.insert(&Triple::new(
                iri(&format!("c{i}")),
                rdfs::SUB_CLASS_OF,
                iri(&format!("c{}", i + 1)),
            ));
        }
        graph
    }

    #[test]
    fn iteration_limit() {
        let reasoner =
            DefaultReasoner::with_config(ReasonerConfig::default().with_max_iterations(1));
        assert!(matches!(
            reasoner.infer(&chain(2), ReasoningProfile::Rdfs),
            Err(ReasoningError::IterationLimit(1))
        ));
    }

    #[test]
    fn inference_limit() {
        let reasoner =
            DefaultReasoner::with_config(ReasonerConfig::default().with_max_inferred_triples(1));
        assert!(matches!(
            reasoner.infer(&chain(3), ReasoningProfile::Rdfs),
            Err(ReasoningError::TooManyInferences(1))
        ));
    }

    #[test]
    fn rdfs_closure_of_a_chain() {
        let inferred = DefaultReasoner::new()
            .infer(&chain(3), ReasoningProfile::Rdfs)
            .unwrap();
        assert_eq!(inferred.len(), 3);
        assert!(inferred.contains(&Triple::new(iri("c0"), rdfs::SUB_CLASS_OF, iri("c3"))));
    }

    #[test]
    fn cyclic_list_is_malformed() {
        let cell = BlankNode::default();
        let mut graph = Graph::new();
        graph.insert(&Triple::new(iri("C"), owl::UNION_OF, cell.clone()));
        graph.insert(&Triple::new(cell.clone(), rdf::FIRST, iri("A")));
        graph.insert(&Triple::new(cell.clone(), rdf::REST, cell));
        for profile in [ReasoningProfile::OwlRl, ReasoningProfile::OwlRlExt] {
            assert!(matches!(
                DefaultReasoner::new().infer(&graph, profile),
                Err(ReasoningError::MalformedList(_))
            ));
        }
        // RDFS ignores class expressions
        assert!(
            DefaultReasoner::new()
                .infer(&graph, ReasoningProfile::Rdfs)
                .is_ok_and(|t| t.is_empty())
        );
    }

    #[test]
    fn literal_objects_are_not_swapped_into_subjects() {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(iri("p"), rdf::TYPE, owl::SYMMETRIC_PROPERTY));
        graph.insert(&Triple::new(iri("a"), iri("p"), Literal::new_simple_literal("x")));
        let inferred = DefaultReasoner::new()
            .infer(&graph, ReasoningProfile::OwlRl)
            .unwrap();
        assert!(!inferred.iter().any(|t| t.object == Term::from(iri("a"))));
    }

    #[test]
    fn inferred_triples_are_new() {
        let mut graph = chain(2);
        graph.insert(&Triple::new(iri("x"), rdf::TYPE, iri("c0")));
        for profile in ReasoningProfile::ALL {
            let inferred = DefaultReasoner::new().infer(&graph, profile).unwrap();
            assert!(inferred.iter().all(|t| !graph.contains(t)), "{profile}");
            assert!(
                inferred.contains(&Triple::new(iri("x"), rdf::TYPE, iri("c2"))),
                "{profile}"
            );
        }
    }
}
