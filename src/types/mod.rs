//! Module `types` provides various building blocks, including
//! some common traits.

/// methods on CNF file
pub mod cnf;
/// methods on flags used in Var and Clause
pub mod flags;
/// methods on literals
pub mod lit;

pub use self::{cnf::*, flags::*, lit::*};

pub use crate::{assign::AssignReason, cdb::ClauseId, config::Config};

use thiserror::Error;

/// Var index; vars are numbered from zero.
pub type VarId = usize;

/// Decision Level Representation.
pub type DecisionLevel = u32;

/// API for object instantiation based on `Config` and `CNFDescription`.
/// This is implemented by all the sub modules of `Solver`.
///
/// # Example
///
/// ```
/// use uipsat::{assign::AssignStack, config::Config, types::*};
/// let asg = AssignStack::instantiate(&Config::default(), &CNFDescription::default());
/// assert_eq!(asg.num_vars, 0);
/// ```
pub trait Instantiate {
    /// make and return an object from `Config` and `CNFDescription`.
    fn instantiate(conf: &Config, cnf: &CNFDescription) -> Self;
}

/// API for activity-based heuristics on vars and clauses.
pub trait ActivityIF<Ix> {
    /// return one's activity.
    fn activity(&self, ix: Ix) -> f64;
    /// set activity.
    fn set_activity(&mut self, ix: Ix, val: f64);
    /// add the current increment to one's activity; rescale all on overflow.
    fn bump_activity(&mut self, ix: Ix);
    /// grow the increment; called once per resolved conflict.
    fn update_activity_inc(&mut self);
}

/// activities are rescaled when one exceeds this.
pub const ACTIVITY_LIMIT: f64 = 1e50;

/// Errors detected while building a problem, or an interrupted `solve`.
/// Other search outcomes are [`SolveState`](crate::solver::SolveState)s.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum SolverError {
    /// a clause mentions `0` or a var beyond the declared range.
    #[error("invalid literal {0}")]
    InvalidLiteral(i32),
    /// a file couldn't be read.
    #[error("io error: {0}")]
    IOError(String),
    /// malformed DIMACS input.
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    /// `solve` was stopped by the stop flag or ran out of its limits.
    #[error("interrupted")]
    Interrupted,
}

impl From<std::io::Error> for SolverError {
    fn from(e: std::io::Error) -> Self {
        SolverError::IOError(e.to_string())
    }
}

/// A Return type used by fallible building functions.
pub type MaybeInconsistent = Result<(), SolverError>;
