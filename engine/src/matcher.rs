//! Matching one action schema against one abstract state: fresh renaming,
//! precondition unification, and per-branch effect application.

use retrograde_model::{
    ActionSchema, Atom, Constraint, EffectEntry, EffectKind, OutcomeBranch, Relation, Substitution, Sym, Term,
    unify_atom,
};

use crate::consistency::Consistency;
use crate::state::AbstractState;

/// How positive preconditions are matched against state atoms.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum MatchStrategy {
    /// Declaration order, committing to the first compatible state atom per
    /// precondition. This is the reference behavior and is incomplete: an
    /// early commitment can mask a viable substitution found further right.
    #[default]
    Greedy,
    /// Exhaustive search over per-precondition candidates, accepting the
    /// first substitution that also passes the negative-precondition and
    /// constraint checks.
    Backtracking,
}

/// Fresh-variable generator scoped to one exploration call, reset when the
/// next goal starts. Keeps renamed variables reproducible across runs.
#[derive(Default, Debug)]
pub struct VarSupply {
    next: u32,
}

impl VarSupply {
    pub fn new() -> VarSupply {
        VarSupply::default()
    }

    fn next_index(&mut self) -> u32 {
        let n = self.next;
        self.next += 1;
        n
    }

    /// Renames every parameter of the schema with one fresh suffix. The `~`
    /// separator never occurs in source variable names, so renamed variables
    /// cannot collide with anything already present in a state.
    pub(crate) fn rename(&mut self, schema: &ActionSchema) -> RenamedSchema {
        let n = self.next_index();
        let mut renaming = Substitution::new();
        let parameters: Vec<Sym> = schema
            .parameters
            .iter()
            .map(|p| {
                let fresh = Sym::from(format!("{p}~{n}"));
                renaming
                    .bind(p, &Term::Var(fresh.clone()))
                    .expect("parameters are distinct");
                fresh
            })
            .collect();
        RenamedSchema {
            name: schema.name.clone(),
            parameters,
            preconditions: schema.preconditions.iter().map(|a| renaming.sub_atom(a)).collect(),
            constraints: schema.constraints.iter().map(|c| renaming.sub_constraint(c)).collect(),
            outcomes: schema
                .outcomes
                .iter()
                .map(|b| OutcomeBranch::new(
                    b.entries
                        .iter()
                        .map(|e| EffectEntry {
                            kind: e.kind,
                            atom: renaming.sub_atom(&e.atom),
                        })
                        .collect(),
                ))
                .collect(),
        }
    }
}

/// An action schema with all parameters renamed apart from the state.
pub(crate) struct RenamedSchema {
    pub(crate) name: Sym,
    pub(crate) parameters: Vec<Sym>,
    pub(crate) preconditions: Vec<Atom>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) outcomes: Vec<OutcomeBranch>,
}

/// One successor produced by applying an outcome branch of a matched action.
pub struct Successor {
    pub state: AbstractState,
    pub action: Sym,
    /// Parameter instantiation, resolved under the substitution; parameters
    /// the preconditions left unconstrained stay variables.
    pub args: Vec<Term>,
    pub subst: Substitution,
    pub branch: usize,
}

/// Applies `schema` to `state`: one substitution satisfying all
/// preconditions, then every outcome branch applied independently. An
/// inapplicable action or a branch failing validation simply contributes
/// nothing.
pub fn apply_schema(
    schema: &ActionSchema,
    state: &AbstractState,
    supply: &mut VarSupply,
    strategy: MatchStrategy,
    consistency: &Consistency,
) -> Vec<Successor> {
    let renamed = supply.rename(schema);
    let Some(subst) = match_preconditions(&renamed, state, strategy) else {
        return Vec::new();
    };
    let Some(carried) = carried_constraints(&renamed, &subst) else {
        return Vec::new();
    };

    let args: Vec<Term> = renamed
        .parameters
        .iter()
        .map(|p| subst.resolve(&Term::Var(p.clone())))
        .collect();

    let mut successors = Vec::new();
    for (branch, outcome) in renamed.outcomes.iter().enumerate() {
        // start from the parent's atoms under the match substitution: the
        // unifier may have pinned variables of the state itself
        let mut atoms: Vec<Atom> = state.atoms().iter().map(|a| subst.sub_atom(a)).collect();
        for entry in &outcome.entries {
            let atom = subst.sub_atom(&entry.atom);
            match entry.kind {
                EffectKind::Add => atoms.push(atom),
                EffectKind::Delete => atoms.retain(|a| a != &atom),
            }
        }
        let mut constraints: Vec<Constraint> =
            state.constraints().iter().map(|c| subst.sub_constraint(c)).collect();
        constraints.extend(carried.iter().cloned());

        if let Some(next) = AbstractState::build(atoms, constraints, state.depth() + 1, consistency) {
            successors.push(Successor {
                state: next,
                action: renamed.name.clone(),
                args: args.clone(),
                subst: subst.clone(),
                branch,
            });
        }
        // a branch failing validation is silently dropped
    }
    successors
}

fn match_preconditions(
    schema: &RenamedSchema,
    state: &AbstractState,
    strategy: MatchStrategy,
) -> Option<Substitution> {
    let positives: Vec<&Atom> = schema.preconditions.iter().filter(|a| a.positive).collect();
    match strategy {
        MatchStrategy::Greedy => {
            let mut subst = Substitution::new();
            for pre in &positives {
                subst = state
                    .atoms()
                    .iter()
                    .filter(|a| a.positive)
                    .find_map(|a| unify_atom(pre, a, &subst))?;
            }
            viable(schema, state, &subst).then_some(subst)
        }
        MatchStrategy::Backtracking => backtrack(schema, state, &positives, &Substitution::new()),
    }
}

fn backtrack(
    schema: &RenamedSchema,
    state: &AbstractState,
    remaining: &[&Atom],
    subst: &Substitution,
) -> Option<Substitution> {
    let Some((pre, rest)) = remaining.split_first() else {
        return viable(schema, state, subst).then(|| subst.clone());
    };
    state
        .atoms()
        .iter()
        .filter(|a| a.positive)
        .filter_map(|a| unify_atom(pre, a, subst))
        .find_map(|extended| backtrack(schema, state, rest, &extended))
}

/// Negative preconditions must be absent after substitution, and no schema
/// constraint may already be violated.
fn viable(schema: &RenamedSchema, state: &AbstractState, subst: &Substitution) -> bool {
    let negatives_absent = schema
        .preconditions
        .iter()
        .filter(|a| !a.positive)
        .all(|pre| !state.contains(&subst.sub_atom(pre).negated()));
    negatives_absent && carried_constraints(schema, subst).is_some()
}

/// Substitutes the schema's own constraints and splits them into violated
/// (whole match fails), settled (dropped) and open (carried into successors).
pub(crate) fn carried_constraints(schema: &RenamedSchema, subst: &Substitution) -> Option<Vec<Constraint>> {
    let mut carried = Vec::new();
    for c in &schema.constraints {
        let c = subst.sub_constraint(c);
        match c.relation() {
            Relation::Neq if c.endpoints_equal() => return None,
            Relation::Neq if c.settled_distinct() => {}
            Relation::Eq if c.settled_distinct() => return None,
            Relation::Eq if c.endpoints_equal() => {}
            _ => carried.push(c),
        }
    }
    Some(carried)
}
