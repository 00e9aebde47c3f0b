//! Module `validate` implements a model checker.
use crate::{solver::Solver, types::*};

/// API for SAT validator like [`validate`](`crate::solver::ValidateIF::validate`).
pub trait ValidateIF {
    /// return `None` if the given assignment satisfies every essential clause.
    /// Otherwise return the first clause falsified by it.
    fn validate(&self, model: &[i32]) -> Option<Vec<i32>>;
}

impl ValidateIF for Solver {
    /// An assignment set is represented by a list of `i32`; missing vars are unassigned.
    ///
    /// # Example
    ///
    /// ```
    /// use uipsat::{solver::ValidateIF, *};
    ///
    /// let v = vec![vec![1, 2], vec![-1, 3]];
    /// let s = Solver::try_from((Config::default(), v.as_ref())).expect("can't build");
    /// assert_eq!(s.validate(&[1, -2, 3]), None);
    /// assert_eq!(s.validate(&[1, 2, -3]), Some(vec![-1, 3]));
    ///```
    fn validate(&self, model: &[i32]) -> Option<Vec<i32>> {
        let mut value = vec![None; self.asg.num_vars];
        for i in model {
            if let Some(l) = Lit::try_from_dimacs(*i, self.asg.num_vars) {
                value[l.vi()] = Some(bool::from(l));
            }
        }
        let arena = &self.cdb.arena;
        arena
            .iter()
            .filter(|c| arena.is(*c, FlagClause::ESSENTIAL))
            .find(|c| {
                !arena
                    .lits(*c)
                    .any(|l| value[l.vi()] == Some(bool::from(l)))
            })
            .map(|c| i32s(&arena.to_vec(c)))
    }
}
