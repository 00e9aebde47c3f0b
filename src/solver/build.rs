//! Solver Builder
use {
    super::{
        analyze::Learner, extension::ExtensionStack, reduce::ReductionIF, Certificate, SolveIF,
        Solver, SolverResult,
    },
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::{ClauseDB, ClauseDBIF},
        solver::{ReductionManager, RestartManager},
        state::State,
        types::*,
    },
    std::{
        fs::File,
        io::{BufRead, BufReader},
        path::Path,
    },
};

/// API for SAT solver creation and modification.
pub trait SatSolverIF: Instantiate {
    /// add a var to solver and return the number of vars.
    ///
    /// # Example
    /// ```
    /// use uipsat::*;
    ///
    /// let v = vec![vec![1, 2], vec![-1, -2]];
    /// let mut s = Solver::try_from((Config::default(), v.as_ref())).expect("can't build");
    /// assert_eq!(s.asg.num_vars, 2);
    /// assert_eq!(s.add_var(), 3);
    /// assert!(s.add_clause([-3]).is_ok());
    /// assert!(matches!(s.solve(), Ok(Certificate::SAT(ans)) if ans[2] == -3));
    /// ```
    fn add_var(&mut self) -> usize;
    /// add a clause given in DIMACS integers.
    /// Duplicated literals are merged; a tautology is ignored.
    ///
    /// # Errors
    ///
    /// * `SolverError::InvalidLiteral` if a literal is `0` or out of range for var index.
    ///
    /// # Example
    ///```
    /// use uipsat::*;
    ///
    /// let v = vec![vec![1, 2], vec![-1, 2]];
    /// let mut s = Solver::try_from((Config::default(), v.as_ref())).expect("can't build");
    /// assert!(s.add_clause([1, -2]).is_ok());
    /// assert!(s.add_clause([-1, -2]).is_ok());
    /// assert!(matches!(s.add_clause([3, 1]), Err(SolverError::InvalidLiteral(3))));
    /// assert!(matches!(s.add_clause([0, 1]), Err(SolverError::InvalidLiteral(0))));
    /// assert_eq!(s.solve(), Ok(Certificate::UNSAT));
    ///```
    fn add_clause<V>(&mut self, vec: V) -> Result<&mut Solver, SolverError>
    where
        V: AsRef<[i32]>;
    /// allocate, set essential, and install a clause. No var may be assigned.
    fn input_clause(&mut self, lits: &[Lit]) -> ClauseId;
    /// seed the reduction limits with the size of the loaded problem.
    fn input_finish(&mut self);
    /// make a solver from a DIMACS stream.
    ///
    /// # Errors
    ///
    /// * `SolverError::Parse` if the text isn't DIMACS CNF.
    /// * `SolverError::InvalidLiteral` if a literal is out of the declared range.
    /// * `SolverError::IOError` if reading fails.
    fn from_reader<R: BufRead>(config: &Config, reader: R) -> Result<Solver, SolverError>;
    /// remove a var from the search; for preprocessors.
    fn delete_var(&mut self, vi: VarId);
}

impl Default for Solver {
    fn default() -> Solver {
        Solver::instantiate(&Config::default(), &CNFDescription::default())
    }
}

impl Instantiate for Solver {
    /// ```
    /// use uipsat::{config::Config, types::*};
    /// use uipsat::solver::Solver;
    /// let s = Solver::instantiate(&Config::default(), &CNFDescription::default());
    ///```
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Solver {
        Solver {
            asg: AssignStack::instantiate(config, cnf),
            cdb: ClauseDB::instantiate(config, cnf),
            ext: ExtensionStack::default(),
            learn: Learner::instantiate(config, cnf),
            rdc: ReductionManager::instantiate(config, cnf),
            rst: RestartManager::instantiate(config, cnf),
            state: State::instantiate(config, cnf),
        }
    }
}

impl<V> TryFrom<(Config, &[V])> for Solver
where
    V: AsRef<[i32]>,
{
    type Error = SolverResult;
    fn try_from((config, vec): (Config, &[V])) -> Result<Self, Self::Error> {
        let cnf = CNFDescription::from(vec);
        Solver::instantiate(&config, &cnf)
            .inject_from_vec(vec)
            .map_err(Err)
    }
}

impl TryFrom<&Path> for Solver {
    type Error = SolverError;
    /// return a new solver build for a CNF file.
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        Solver::build(&Config::default(), path)
    }
}

impl SatSolverIF for Solver {
    fn add_var(&mut self) -> usize {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut learn,
            ref mut state,
            ..
        } = self;
        asg.new_var();
        cdb.new_var();
        learn.new_var();
        state.target.num_of_variables += 1;
        asg.num_vars
    }
    fn add_clause<V>(&mut self, vec: V) -> Result<&mut Solver, SolverError>
    where
        V: AsRef<[i32]>,
    {
        let nv = self.asg.num_vars;
        let mut lits = vec
            .as_ref()
            .iter()
            .map(|i| Lit::try_from_dimacs(*i, nv).ok_or(SolverError::InvalidLiteral(*i)))
            .collect::<Result<Vec<Lit>, SolverError>>()?;
        lits.sort();
        lits.dedup();
        // sorted, so `l` and `!l` are adjacent
        if lits.windows(2).any(|w| w[0] == !w[1]) {
            return Ok(self);
        }
        self.input_clause(&lits);
        Ok(self)
    }
    fn input_clause(&mut self, lits: &[Lit]) -> ClauseId {
        assert_eq!(self.asg.decision_level(), 0, "adding a clause during search");
        self.cdb.input_clause(lits)
    }
    fn input_finish(&mut self) {
        self.rdc.seed(self.cdb.num_active);
    }
    fn from_reader<R: BufRead>(config: &Config, reader: R) -> Result<Solver, SolverError> {
        let mut reader = CNFReader::new(reader)?;
        let mut s = Solver::instantiate(config, &reader.cnf);
        s.inject(&mut reader)?;
        Ok(s)
    }
    fn delete_var(&mut self, vi: VarId) {
        self.asg.delete_var(vi);
    }
}

impl Solver {
    /// make a solver from a CNF file with a configuration.
    ///
    /// # Errors
    ///
    /// same as [`SatSolverIF::from_reader`].
    pub fn build(config: &Config, path: &Path) -> Result<Solver, SolverError> {
        let mut reader = CNFReader::<BufReader<File>>::try_from(path)?;
        let mut s = Solver::instantiate(config, &reader.cnf);
        s.inject(&mut reader)?;
        Ok(s)
    }
    fn inject<R: BufRead>(&mut self, reader: &mut CNFReader<R>) -> MaybeInconsistent {
        while let Some(clause) = reader.next_clause()? {
            self.add_clause(clause)?;
        }
        self.input_finish();
        Ok(())
    }
    fn inject_from_vec<V>(mut self, v: &[V]) -> Result<Solver, SolverError>
    where
        V: AsRef<[i32]>,
    {
        for ints in v.iter() {
            self.add_clause(ints)?;
        }
        self.input_finish();
        Ok(self)
    }
}

impl<V: AsRef<[i32]>> TryFrom<Vec<V>> for Certificate {
    type Error = SolverError;
    fn try_from(vec: Vec<V>) -> SolverResult {
        Solver::try_from((Config::default(), vec.as_ref())).map_or_else(
            |e: SolverResult| e,
            |mut solver| solver.solve(),
        )
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::{io::Cursor, path::PathBuf},
    };

    #[test]
    fn test_add_var() {
        let v = vec![vec![1, 2], vec![-1, 2], vec![1, -2]];
        let mut s = Solver::try_from((Config::default(), v.as_ref())).expect("can't build");
        assert_eq!(s.asg.num_vars, 2);
        assert_eq!(s.add_var(), 3);
        assert_eq!(s.state.target.num_of_variables, 3);
        s.add_clause([-1, -2, -3]).expect("a valid clause");
        assert_eq!(s.solve(), Ok(Certificate::SAT(vec![1, 2, -3])));
    }

    #[test]
    fn test_clause_normalization() {
        let mut s = Solver::instantiate(
            &Config::default(),
            &CNFDescription {
                num_of_variables: 3,
                ..CNFDescription::default()
            },
        );
        s.add_clause([1, -1, 2]).expect("a tautology");
        assert_eq!(s.cdb.num_active, 0);
        s.add_clause([2, 3, 2]).expect("a duplicate");
        assert_eq!(s.cdb.num_active, 1);
        let cid = s.cdb.arena.iter().next().expect("a clause");
        assert_eq!(s.cdb.arena.len(cid), 2);
    }

    #[test]
    fn test_from_reader() {
        let text = "c sample\np cnf 3 4\n1 2 0\n-1 2 0\n-2 3 0\n-3 -2 0\n";
        let mut s = Solver::from_reader(&Config::default(), Cursor::new(text)).expect("a cnf");
        assert_eq!(s.state.target.num_of_clauses, 4);
        assert_eq!(s.solve(), Ok(Certificate::UNSAT));
        let broken = "p cnf 2 1\n1 5 0\n";
        assert!(matches!(
            Solver::from_reader(&Config::default(), Cursor::new(broken)),
            Err(SolverError::InvalidLiteral(5))
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from("no/such/file.cnf");
        assert!(matches!(
            Solver::try_from(path.as_path()),
            Err(SolverError::IOError(_))
        ));
    }
}
