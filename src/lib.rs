//! A sequential CDCL SAT solver core.
//!
//! - a clause arena with compacting garbage collection,
//! - two-watched-literal propagation with blocking literals,
//! - first-UIP learning with recursive minimization,
//! - VSIDS, Luby or glucose restarts, and clause reduction with freezing.
//!
//! # Examples
//!
//! ```
//! use uipsat::*;
//!
//! let v: Vec<Vec<i32>> = vec![vec![1, 2], vec![-1, 3], vec![1, -3], vec![-1, 2]];
//! match Certificate::try_from(v) {
//!     Ok(Certificate::SAT(ans)) => println!("s SATISFIABLE: {:?}", ans),
//!     Ok(Certificate::UNSAT) => println!("s UNSATISFIABLE"),
//!     Ok(Certificate::AssumptionFail) => unreachable!(),
//!     Err(e) => panic!("s UNKNOWN; {}", e),
//! }
//! ```

/// Module `assign` implements the trail, Boolean Constraint Propagation and decision var selection.
pub mod assign;
/// Module `cdb` provides the clause arena and [`ClauseDB`](`crate::cdb::ClauseDB`).
pub mod cdb;
/// Module `config` provides solver's configuration.
pub mod config;
/// Module `primitive` provides the Luby series.
pub mod primitive;
/// Module `solver` provides the top-level API as a SAT solver.
pub mod solver;
/// Module `state` is a collection of internal data.
pub mod state;
/// Module `types` provides various building blocks, including some common traits.
pub mod types;

pub use {
    config::Config,
    solver::{Certificate, SatSolverIF, SolveIF, Solver, ValidateIF},
    types::SolverError,
};
