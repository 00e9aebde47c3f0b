/// Module `solver` provides the top-level API as a SAT solver.
/// Conflict analysis: cut, minimization and clause building
mod analyze;
/// API to instantiate
mod build;
/// Module 'conflict' handles conflicts.
mod conflict;
/// Module `extension` builds models from preprocessor records.
pub mod extension;
/// Module `reduce` schedules clause-database reduction.
pub mod reduce;
/// Module `restart` provides restart heuristics.
pub mod restart;
/// CDCL search engine
mod search;
/// Module `validate` implements a model checker.
mod validate;

pub use self::{
    analyze::Learner,
    build::SatSolverIF,
    extension::{Extension, ExtensionStack},
    reduce::{ReductionIF, ReductionManager},
    restart::{RestartIF, RestartManager},
    search::SolveIF,
    validate::ValidateIF,
};

use crate::{assign::AssignStack, cdb::ClauseDB, state::*, types::*};

/// Normal results returned by Solver.
#[derive(Debug, Eq, PartialEq)]
pub enum Certificate {
    /// It is satisfiable; `vec` is such an assignment sorted by var order.
    SAT(Vec<i32>),
    /// It is unsatisfiable.
    UNSAT,
    /// It is unsatisfiable under the enabled assumptions.
    AssumptionFail,
}

/// The return type of `Solver::solve`.
/// This captures the following cases:
/// * `Certificate::SAT` -- solved with a satisfiable assignment set,
/// * `Certificate::UNSAT` -- proved that it's an unsatisfiable problem,
/// * `Certificate::AssumptionFail` -- the assumptions can't hold together, and
/// * `SolverError::Interrupted` -- stopped by the stop flag, the timeout, or the conflict budget.
pub type SolverResult = Result<Certificate, SolverError>;

/// The outcomes of one `search` call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SolveState {
    #[default]
    Unknown,
    /// the iteration budget ran out or the stop flag is set.
    Break,
    Satisfied,
    Unsatisfiable,
    /// a conflict at the assumption level.
    AssumptionFail,
}

/// The SAT solver object consisting of the following sub modules.
///
/// # Examples
///
/// ```
/// use uipsat::*;
/// use std::path::Path;
///
/// let v = vec![vec![1, 2], vec![-1, 3], vec![1, -3], vec![-1, 2]];
/// let mut s = Solver::try_from((Config::default(), v.as_ref())).expect("can't build");
/// if let Ok(Certificate::SAT(ans)) = s.solve() {
///     assert!(s.validate(&ans).is_none());
/// } else {
///     panic!("It should be satisfied!");
/// }
/// assert!(Solver::try_from(Path::new("no-such-file.cnf")).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Solver {
    /// assignment management
    pub asg: AssignStack,
    /// clause container
    pub cdb: ClauseDB,
    /// records to extend a model over removed vars
    pub ext: ExtensionStack,
    /// conflict analysis
    pub learn: Learner,
    /// clause reduction schedule
    pub rdc: ReductionManager,
    /// restart schedule
    pub rst: RestartManager,
    /// misc data holder
    pub state: State,
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! run {
        ($vec: expr) => {
            println!(
                "{:>46} =| {:?}",
                format!("{:?}", $vec),
                match Solver::try_from((Config::default(), $vec.as_ref())).map(|mut s| s.solve()) {
                    Err(e) => e,
                    Ok(s) => s,
                }
            );
        };
    }

    macro_rules! sat {
        ($vec: expr, $should_be: pat) => {
            println!("{:>46} =| ", format!("{:?}", $vec));
            let result = Certificate::try_from($vec);
            println!("{:?}", result);
            assert!(matches!(result, $should_be));
        };
    }

    #[test]
    fn test_on_memory_solving() {
        let mut v: Vec<Vec<i32>> = Vec::new();
        run!(v);
        v.push(Vec::new());
        run!(v);
        run!(vec![vec![1]]);
        run!(vec![vec![1], vec![-1]]);
        run!(vec![vec![1, 2], vec![-1, 3], vec![1, -3], vec![-1, 2]]);

        // auto conversion via `as_ref`
        let (v1, v2, v3, v4, v5) = (vec![1, 2], vec![-1, 3], vec![1, -3], vec![-1, 2], vec![-3]);
        run!(vec![&v1, &v2, &v3, &v4, &v5]); // : Vec<&[i32]>
        run!([&v1, &v2, &v3, &v4, &v5]); // [&[i32]; 5]

        let v0: Vec<Vec<i32>> = vec![];
        sat!(v0, Ok(Certificate::SAT(_)));
        let v1: Vec<Vec<i32>> = vec![vec![]];
        sat!(v1, Ok(Certificate::UNSAT));
        sat!(vec![vec![1i32]], Ok(Certificate::SAT(_)));
        sat!(vec![vec![1i32], vec![-1]], Ok(Certificate::UNSAT));
        sat!(
            vec![vec![1i32, 2], vec![-1, 3], vec![1, -3], vec![-1, 2]],
            Ok(Certificate::SAT(_))
        );
        sat!(
            vec![
                vec![1i32, 2],
                vec![-1, 3],
                vec![1, -3],
                vec![-1, -2],
                vec![-2, -3]
            ],
            Ok(Certificate::SAT(_))
        );
        sat!(
            vec![
                vec![1i32, 2],
                vec![-1, 3],
                vec![-1, -3],
                vec![-1, -2],
                vec![1, -2]
            ],
            Ok(Certificate::UNSAT)
        );
        sat!(vec![vec![1i32, 0]], Err(SolverError::InvalidLiteral(0)));
    }

    #[test]
    fn test_assumption_fail() {
        let v = vec![vec![1, 2], vec![-1, 2], vec![3, 4]];
        let mut s = Solver::try_from((Config::default(), v.as_ref())).expect("can't build");
        s.asg.assumption_enable(Lit::from(-2));
        assert_eq!(s.solve(), Ok(Certificate::AssumptionFail));
        s.asg.assumption_disable(Lit::from(-2));
        s.asg.assumption_enable(Lit::from(-3));
        match s.solve() {
            Ok(Certificate::SAT(ans)) => {
                assert!(ans.contains(&2) && ans.contains(&-3) && ans.contains(&4));
            }
            other => panic!("{other:?}"),
        }
    }
}
