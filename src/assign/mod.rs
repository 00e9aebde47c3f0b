// Module `assign` implements the trail, Boolean Constraint Propagation and decision var selection.

/// the VSIDS heap
mod heap;
/// Boolean constraint propagation
mod propagate;
/// assignment management
mod stack;

pub use self::{
    heap::{VarHeapIF, VarIdHeap},
    propagate::PropagateIF,
    stack::AssignStack,
};
use {crate::types::*, std::fmt};

/// API for reading the assignment state.
pub trait AssignIF {
    /// return the number of allocated vars.
    fn num_vars(&self) -> usize;
    /// return the current decision level.
    fn decision_level(&self) -> DecisionLevel;
    /// return the value of a literal.
    fn assigned(&self, l: Lit) -> Option<bool>;
    /// return the value of a var.
    fn assign(&self, vi: VarId) -> Option<bool>;
    /// return the decision level at which a var was assigned.
    fn level(&self, vi: VarId) -> DecisionLevel;
    /// return the antecedent of a var.
    fn reason(&self, vi: VarId) -> AssignReason;
    /// return the saved phase of a var.
    fn phase(&self, vi: VarId) -> bool;
    /// return the assigned literals in order.
    fn trail(&self) -> &[Lit];
    /// return the trail position where level `lv` starts.
    fn len_upto(&self, lv: DecisionLevel) -> usize;
    /// return `true` if there are assignments not yet propagated.
    fn remains(&self) -> bool;
    /// return `true` if every present var is assigned.
    fn at_leaf(&self) -> bool;
    /// return `true` if a var was removed by a preprocessor.
    fn var_is_deleted(&self, vi: VarId) -> bool;
}

/// Reasons of assignments
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum AssignReason {
    /// Implication by a binary clause; holds the other, falsified literal.
    BinaryLink(Lit),
    /// Assigned by decision, or as a unit (level 1) or an assumption (level 2).
    Decision(DecisionLevel),
    /// Assigned by a clause of length three or more.
    Implication(ClauseId),
    /// None of the above.
    None,
}

impl fmt::Display for AssignReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssignReason::BinaryLink(l) => write!(f, "Implied by a binary clause with {l}"),
            AssignReason::Decision(1) => write!(f, "Asserted"),
            AssignReason::Decision(2) => write!(f, "Assumed"),
            AssignReason::Decision(lvl) => write!(f, "Decided at level {lvl}"),
            AssignReason::Implication(cid) => write!(f, "Implied by {cid}"),
            AssignReason::None => write!(f, "Not assigned"),
        }
    }
}

/// The falsified structure found by propagation or by the unit replay.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Conflict {
    #[default]
    None,
    /// every literal of a clause is false.
    Clause(ClauseId),
    /// both literals of a binary clause are false.
    Binary(Lit, Lit),
    /// a unit clause is false at level 1.
    Fact(Lit),
    /// the database holds an empty clause.
    Empty,
}

impl Conflict {
    pub fn is_none(&self) -> bool {
        matches!(self, Conflict::None)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Conflict::None => write!(f, "no conflict"),
            Conflict::Clause(cid) => write!(f, "conflict on {cid}"),
            Conflict::Binary(l1, l2) => write!(f, "conflict on binary ({l1}, {l2})"),
            Conflict::Fact(l) => write!(f, "conflict on fact {l}"),
            Conflict::Empty => write!(f, "empty clause"),
        }
    }
}
