//! Consistency rules run by the validating state constructor.
//!
//! Rules are derived from structure alone (atom polarity, declared
//! constraints), never from relation-name literals, so the same set works
//! across arbitrary domains.

use retrograde_model::{Atom, Constraint, Domain, Relation};

/// A structural admissibility check over a candidate state's canonical
/// content. Implementations must be pure.
pub trait ConsistencyRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// True if the candidate may be inserted into the graph.
    fn admissible(&self, atoms: &[Atom], constraints: &[Constraint]) -> bool;
}

/// Rejects a state that asserts an atom together with its negation.
pub struct NegationRule;

impl ConsistencyRule for NegationRule {
    fn name(&self) -> &'static str {
        "negation-mutex"
    }

    fn admissible(&self, atoms: &[Atom], _constraints: &[Constraint]) -> bool {
        // atoms are sorted with all negated atoms ordering apart from their
        // positive counterpart, so a membership scan is required either way
        atoms
            .iter()
            .filter(|a| a.positive)
            .all(|a| !atoms.contains(&a.negated()))
    }
}

/// Rejects a state carrying an unsatisfiable constraint: an inequality whose
/// endpoints turned out equal, or an equality pinned to two distinct
/// constants.
pub struct ConstraintRule;

impl ConsistencyRule for ConstraintRule {
    fn name(&self) -> &'static str {
        "constraint"
    }

    fn admissible(&self, _atoms: &[Atom], constraints: &[Constraint]) -> bool {
        constraints.iter().all(|c| match c.relation() {
            Relation::Neq => !c.endpoints_equal(),
            Relation::Eq => !c.settled_distinct(),
        })
    }
}

/// The rule set applied to every candidate state before insertion.
pub struct Consistency {
    rules: Vec<Box<dyn ConsistencyRule>>,
}

impl Consistency {
    /// The generic rule set: negation mutex plus constraint satisfiability.
    pub fn new() -> Consistency {
        Consistency {
            rules: vec![Box::new(NegationRule), Box::new(ConstraintRule)],
        }
    }

    /// Rule set for a validated domain. Mutexes declared by the schemas
    /// themselves (parameter inequality clauses) reach states as constraints
    /// carried over by the matcher, so no per-domain rule is derived beyond
    /// the generic set; the constructor keeps the seam explicit.
    pub fn for_domain(_domain: &Domain) -> Consistency {
        Consistency::new()
    }

    pub fn admits(&self, atoms: &[Atom], constraints: &[Constraint]) -> bool {
        self.rules.iter().all(|r| r.admissible(atoms, constraints))
    }
}

impl Default for Consistency {
    fn default() -> Self {
        Consistency::new()
    }
}
