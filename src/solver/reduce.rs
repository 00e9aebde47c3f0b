//! Clause-database reduction: schedules and the freeze/unfreeze pass.
use {
    super::search::{reset, start},
    crate::{
        assign::AssignStack,
        cdb::{ClauseDB, ClauseDBIF},
        config::ReductionModel,
        state::State,
        types::*,
    },
    std::fmt,
    tracing::debug,
};

/// API for reduction scheduling.
pub trait ReductionIF: Instantiate {
    /// count one search iteration and return `true` if a reduction is due.
    /// `num_learnt` is the number of installed clauses which aren't essential.
    fn check(&mut self, num_learnt: usize) -> bool;
    /// seed the limits from the size of the loaded problem.
    fn seed(&mut self, num_clauses: usize);
    /// return the number of reductions requested.
    fn num_reduction(&self) -> usize;
}

/// Reduction schedule
#[derive(Clone, Debug)]
pub struct ReductionManager {
    model: ReductionModel,

    //
    //## agile
    //
    agile_counter: usize,
    agile_base: usize,
    agile_interval: usize,
    agile_slowdown: usize,

    //
    //## geometric
    //
    size_limit: f64,
    size_factor: f64,
    inc_counter: usize,
    inc_base: usize,
    inc_limit: f64,
    inc_factor: f64,

    num_reduction: usize,
}

impl Instantiate for ReductionManager {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Self {
        let mut rdc = ReductionManager {
            model: config.reduction_model,
            agile_counter: 0,
            agile_base: config.agile_interval,
            agile_interval: config.agile_interval,
            agile_slowdown: config.agile_slowdown,
            size_limit: 0.0,
            size_factor: config.geom_size_factor,
            inc_counter: 0,
            inc_base: config.geom_inc_limit,
            inc_limit: config.geom_inc_limit as f64,
            inc_factor: config.geom_inc_factor,
            num_reduction: 0,
        };
        rdc.seed(cnf.num_of_clauses);
        rdc
    }
}

impl ReductionIF for ReductionManager {
    fn check(&mut self, num_learnt: usize) -> bool {
        let reduce = match self.model {
            ReductionModel::Agile => {
                self.agile_counter += 1;
                if self.agile_counter < self.agile_interval {
                    false
                } else {
                    self.agile_counter = 0;
                    self.agile_interval += self.agile_slowdown;
                    true
                }
            }
            ReductionModel::Geometric => {
                let reduce = self.size_limit <= num_learnt as f64;
                self.inc_counter += 1;
                if self.inc_limit <= self.inc_counter as f64 {
                    self.size_limit *= self.size_factor;
                    self.inc_limit *= self.inc_factor;
                    self.inc_counter = 0;
                }
                reduce
            }
        };
        if reduce {
            self.num_reduction += 1;
        }
        reduce
    }
    fn seed(&mut self, num_clauses: usize) {
        self.agile_counter = 0;
        self.agile_interval = self.agile_base;
        self.size_limit = (num_clauses / 3 + 10) as f64;
        self.inc_counter = 0;
        self.inc_limit = self.inc_base as f64;
    }
    fn num_reduction(&self) -> usize {
        self.num_reduction
    }
}

impl fmt::Display for ReductionManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.model {
            ReductionModel::Agile => write!(
                f,
                "Reduction[Agile, counter:{}/{}]",
                self.agile_counter, self.agile_interval
            ),
            ReductionModel::Geometric => write!(
                f,
                "Reduction[Geometric, size:{:.1}, inc:{}/{:.1}]",
                self.size_limit, self.inc_counter, self.inc_limit
            ),
        }
    }
}

/// Remove or freeze inactive learnt clauses, and reinstall frozen ones
/// that agree with the saved phases. Ends with a fresh `start`.
pub fn reduce_clauses(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) {
    assert!(state.conflict.is_none(), "reducing at conflict");
    let candidates = cdb
        .arena
        .iter()
        .filter(|c| {
            !cdb.arena.is(*c, FlagClause::ESSENTIAL)
                && 3 <= cdb.arena.len(*c)
                && !cdb.is_antecedent(&*asg, *c)
        })
        .collect::<Vec<_>>();
    let mut queue = Vec::new();
    for cid in candidates {
        if cdb.activity_inc < cdb.activity(cid) {
            state.stats.clauses_active += 1;
        } else {
            state.stats.clauses_not_active += 1;
            queue.push(cid);
        }
    }
    reset(asg, state);
    let freeze_lbd = state.config.freeze_lbd;
    let unfreeze_psm = state.config.unfreeze_psm;
    let (mut freezes, mut unfreezes, mut deletions) = (0, 0, 0);
    for cid in queue {
        state.stats.clauses_considered += 1;
        if cdb.arena.is(cid, FlagClause::FROZEN) {
            if cdb.psm(&*asg, cid) <= unfreeze_psm {
                cdb.unfreeze(cid);
                unfreezes += 1;
            }
        } else if cdb.arena.lbd(cid) <= freeze_lbd {
            if cdb.arena.is(cid, FlagClause::INSTALLED) {
                cdb.freeze(&*asg, cid);
            } else {
                cdb.quick_freeze(cid);
            }
            freezes += 1;
        } else {
            if cdb.arena.is(cid, FlagClause::INSTALLED) {
                cdb.uninstall(&*asg, cid);
            }
            cdb.delete_clause(cid);
            deletions += 1;
        }
    }
    state.stats.clause_freezes += freezes;
    state.stats.clause_unfreezes += unfreezes;
    state.stats.clause_deletions += deletions;
    state.stats.reduction_runs += 1;
    debug!(freezes, unfreezes, deletions, "clause reduction");
    start(asg, cdb, state);
}

#[cfg(test)]
mod tests {
    use {super::*, crate::assign::AssignIF};

    fn manager(model: ReductionModel, num_clauses: usize) -> ReductionManager {
        let config = Config {
            reduction_model: model,
            agile_interval: 3,
            agile_slowdown: 2,
            geom_inc_limit: 4,
            geom_size_factor: 2.0,
            geom_inc_factor: 2.0,
            ..Config::default()
        };
        let cnf = CNFDescription {
            num_of_clauses: num_clauses,
            ..CNFDescription::default()
        };
        ReductionManager::instantiate(&config, &cnf)
    }

    #[test]
    fn test_agile_interval_grows() {
        let mut rdc = manager(ReductionModel::Agile, 0);
        let runs = (1..=20).filter(|_| rdc.check(0)).count();
        // intervals 3, 5, 7
        assert_eq!(runs, 3);
        assert_eq!(rdc.num_reduction(), 3);
    }

    #[test]
    fn test_geometric_counts_real_reductions() {
        // size_limit starts at 30 / 3 + 10 = 20
        let mut rdc = manager(ReductionModel::Geometric, 30);
        assert!(!rdc.check(19));
        assert!(rdc.check(20));
        assert!(!rdc.check(0));
        assert_eq!(rdc.num_reduction(), 1);
        // the fourth call still sees 20, then doubles both limits
        assert!(rdc.check(20));
        assert!(!rdc.check(39));
        assert!(rdc.check(40));
        assert_eq!(rdc.num_reduction(), 3);
        rdc.seed(3);
        assert!(rdc.check(11));
        assert_eq!(rdc.num_reduction(), 4);
    }

    #[test]
    fn test_reduce_freezes_and_deletes() {
        let cnf = CNFDescription {
            num_of_variables: 6,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        let lits = |v: &[i32]| v.iter().map(|i| Lit::from(*i)).collect::<Vec<_>>();
        cdb.input_clause(&lits(&[1, 2, 3]));
        let low = cdb.new_clause(&lits(&[-1, 4, 5]));
        cdb.arena.set_lbd(low, 2);
        cdb.install(low);
        let high = cdb.new_clause(&lits(&[-2, -4, 6]));
        cdb.arena.set_lbd(high, 20);
        cdb.install(high);
        let busy = cdb.new_clause(&lits(&[-3, -5, -6]));
        cdb.arena.set_lbd(busy, 20);
        cdb.set_activity(busy, 10.0);
        cdb.install(busy);
        reduce_clauses(&mut asg, &mut cdb, &mut state);
        assert!(cdb.arena.is(low, FlagClause::FROZEN));
        assert!(!cdb.arena.is_present(high));
        assert!(cdb.arena.is(busy, FlagClause::INSTALLED));
        assert_eq!(state.stats.clauses_active, 1);
        assert_eq!(state.stats.clauses_considered, 2);
        assert_eq!(state.stats.clause_freezes, 1);
        assert_eq!(state.stats.clause_deletions, 1);
        assert_eq!(state.stats.reduction_runs, 1);
        // `start` opened the unit and assumption levels
        assert_eq!(asg.decision_level(), 2);
    }
}
