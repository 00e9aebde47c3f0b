/// Module `state` is a collection of internal data.
use {
    crate::{assign::Conflict, types::*},
    std::{
        fmt,
        sync::{atomic::AtomicBool, Arc},
        time::Instant,
    },
};

/// Counters reported at the end of solving.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    //
    //## clause space
    //
    pub clause_reallocs: usize,
    pub clause_collects: usize,
    pub deleted_clauses: usize,

    //
    //## search
    //
    pub conflicts: usize,
    pub decisions: usize,
    pub propagations: usize,
    /// the sum of cut sizes before minimization
    pub learned_lits: usize,
    pub learned_units: usize,
    pub learned_binary: usize,
    /// the sum of learned clause sizes after minimization
    pub minimized_lits: usize,
    pub restarts: usize,

    //
    //## clause reduction
    //
    pub clauses_active: usize,
    pub clauses_not_active: usize,
    pub clauses_considered: usize,
    pub clause_deletions: usize,
    pub clause_freezes: usize,
    pub clause_unfreezes: usize,
    pub reduction_runs: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let per = |a: usize, b: usize| if b == 0 { 0.0 } else { a as f64 / b as f64 };
        writeln!(
            f,
            "c search | conflicts: {:>10}, decisions: {:>10}, propagations: {:>12}, restarts: {:>7}",
            self.conflicts, self.decisions, self.propagations, self.restarts,
        )?;
        writeln!(
            f,
            "c learn  | units: {:>7}, binaries: {:>8}, cut/clause: {:>6.2}, min/clause: {:>6.2}",
            self.learned_units,
            self.learned_binary,
            per(self.learned_lits, self.conflicts),
            per(self.minimized_lits, self.conflicts),
        )?;
        writeln!(
            f,
            "c reduce | runs: {:>6}, active: {:>9}, considered: {:>9}, deleted: {:>9}, frozen: {:>9}, unfrozen: {:>9}",
            self.reduction_runs,
            self.clauses_active,
            self.clauses_considered,
            self.clause_deletions,
            self.clause_freezes,
            self.clause_unfreezes,
        )?;
        write!(
            f,
            "c space  | reallocs: {:>4}, collections: {:>6}, deleted clauses: {:>9}",
            self.clause_reallocs, self.clause_collects, self.deleted_clauses,
        )
    }
}

/// Data storage for `Solver`.
#[derive(Clone, Debug)]
pub struct State {
    /// solver configuration
    pub config: Config,
    /// the problem.
    pub target: CNFDescription,
    pub stats: Stats,
    /// the current conflict; at most one is active.
    pub conflict: Conflict,
    /// the decision level of the last conflict
    pub last_conflict_level: DecisionLevel,
    /// a cooperative stop request, polled between search iterations
    pub stop: Arc<AtomicBool>,
    /// the time when the solver was built
    pub start: Instant,
}

impl Default for State {
    fn default() -> State {
        State {
            config: Config::default(),
            target: CNFDescription::default(),
            stats: Stats::default(),
            conflict: Conflict::None,
            last_conflict_level: 0,
            stop: Arc::new(AtomicBool::new(false)),
            start: Instant::now(),
        }
    }
}

impl Instantiate for State {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> State {
        State {
            config: config.clone(),
            target: cnf.clone(),
            ..State::default()
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "c {} | restart: {}, reduction: {}, time: {:.2}s",
            self.target,
            self.config.restart_strategy.to_str(),
            self.config.reduction_model.to_str(),
            self.start.elapsed().as_secs_f64(),
        )?;
        write!(f, "{}", self.stats)
    }
}
