/// Conflict-Driven Clause Learning Search engine
use {
    super::{
        conflict::handle_conflict,
        reduce::{reduce_clauses, ReductionIF},
        restart::RestartIF,
        Certificate, SolveState, Solver, SolverResult, State,
    },
    crate::{
        assign::{AssignIF, AssignStack, Conflict, PropagateIF, VarHeapIF},
        cdb::{ClauseDB, ClauseDBIF},
        types::*,
    },
    std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        time::Instant,
    },
    tracing::{debug, info},
};

/// API for the search driver like [`solve`](`crate::solver::SolveIF::solve`),
/// [`search`](`crate::solver::SolveIF::search`) and so on.
pub trait SolveIF {
    /// assert the unit clauses at level 1 and the assumptions at level 2.
    /// The decision level must be 0.
    fn start(&mut self);
    /// pick the unassigned var with the highest activity and assign its saved phase.
    fn decide(&mut self);
    /// run unit propagation unless in conflict; a conflict found is kept.
    fn propagate(&mut self);
    fn at_conflict(&self) -> bool;
    /// return `true` if the conflict can be learnt from.
    fn is_resolvable(&self) -> bool;
    /// return `true` if the conflict proves the problem unsatisfiable.
    fn is_unsatisfiable(&self) -> bool;
    /// return `true` if the conflict refutes the assumptions.
    fn is_failed_assumption(&self) -> bool;
    /// learn from the current conflict and backjump.
    fn resolve_conflict(&mut self);
    fn check_restart(&mut self);
    fn check_clause_reduction(&mut self);
    fn check_clause_garbage(&mut self);
    /// run at most `search_budget` iterations.
    fn search(&mut self) -> SolveState;
    /// search until an answer is found.
    ///
    /// # Errors
    ///
    /// * `SolverError::Interrupted` if the stop flag is set, or the timeout or
    ///   the conflict budget in `Config` ran out.
    fn solve(&mut self) -> SolverResult;
    /// drop the conflict and every assignment.
    fn reset(&mut self);
    /// return the flag which stops `solve` from another thread.
    fn stop_handle(&self) -> Arc<AtomicBool>;
}

impl SolveIF for Solver {
    fn start(&mut self) {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut state,
            ..
        } = self;
        start(asg, cdb, state);
    }
    fn decide(&mut self) {
        let asg = &mut self.asg;
        let vi = loop {
            match asg.get_heap_root() {
                Some(vi) if asg.assign(vi).is_none() => break vi,
                Some(_) => (),
                None => panic!("no var to decide at a non-leaf"),
            }
        };
        let lit = Lit::from((vi, asg.phase(vi)));
        asg.push_level();
        let lv = asg.decision_level();
        asg.push_assign(lit, AssignReason::Decision(lv));
        asg.num_decision += 1;
    }
    fn propagate(&mut self) {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut state,
            ..
        } = self;
        propagate(asg, cdb, state);
    }
    fn at_conflict(&self) -> bool {
        !self.state.conflict.is_none()
    }
    fn is_resolvable(&self) -> bool {
        self.at_conflict() && 2 < self.asg.decision_level()
    }
    fn is_unsatisfiable(&self) -> bool {
        self.at_conflict() && self.asg.decision_level() <= 1
    }
    fn is_failed_assumption(&self) -> bool {
        self.at_conflict() && self.asg.decision_level() == 2
    }
    fn resolve_conflict(&mut self) {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut learn,
            ref mut state,
            ..
        } = self;
        handle_conflict(asg, cdb, learn, state);
    }
    fn check_restart(&mut self) {
        let Solver {
            ref mut asg,
            ref mut rst,
            ref mut state,
            ..
        } = self;
        if rst.check(state.last_conflict_level, state.stats.conflicts) {
            asg.backjump(2);
            state.stats.restarts += 1;
            debug!(
                restarts = state.stats.restarts,
                conflicts = state.stats.conflicts,
                "restart"
            );
        }
    }
    fn check_clause_reduction(&mut self) {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut rdc,
            ref mut state,
            ..
        } = self;
        if rdc.check(cdb.num_learnt()) {
            reduce_clauses(asg, cdb, state);
        }
    }
    fn check_clause_garbage(&mut self) {
        if self.cdb.check_garbage() {
            self.cdb.collect_garbage(&mut self.asg);
        }
    }
    fn search(&mut self) -> SolveState {
        let budget = self.state.config.search_budget;
        let mut iteration: usize = 0;
        loop {
            while self.at_conflict() {
                if !self.is_resolvable() {
                    return if self.is_failed_assumption() {
                        SolveState::AssumptionFail
                    } else {
                        SolveState::Unsatisfiable
                    };
                }
                self.resolve_conflict();
                self.asg.update_activity_inc();
                self.cdb.update_activity_inc();
                self.propagate();
            }
            self.check_restart();
            self.check_clause_reduction();
            self.check_clause_garbage();
            // a reduction restarts from the facts, which may conflict
            if self.at_conflict() {
                continue;
            }
            if self.asg.at_leaf() {
                return SolveState::Satisfied;
            }
            iteration += 1;
            if budget < iteration || self.state.stop.load(Ordering::Relaxed) {
                return SolveState::Break;
            }
            self.decide();
            self.propagate();
        }
    }
    /// # Examples
    ///
    /// ```
    /// use uipsat::*;
    ///
    /// let v = vec![vec![1, 2], vec![-1, 3], vec![1, -3], vec![-1, 2]];
    /// let mut s = Solver::try_from((Config::default(), v.as_ref())).expect("can't build");
    /// match s.solve() {
    ///     Ok(Certificate::SAT(ans)) => assert!(ans.contains(&1) && ans.contains(&2)),
    ///     other => panic!("{other:?}"),
    /// }
    ///```
    fn solve(&mut self) -> SolverResult {
        self.reset();
        self.start();
        let started = Instant::now();
        let base_conflicts = self.state.stats.conflicts;
        let mut last_report = started;
        let answer = loop {
            if self.state.stop.load(Ordering::Relaxed)
                || self.is_out_of_limits(started, base_conflicts)
            {
                break Err(SolverError::Interrupted);
            }
            if self.state.config.progress_interval <= last_report.elapsed() {
                self.report_progress(started);
                last_report = Instant::now();
            }
            match self.search() {
                SolveState::Break | SolveState::Unknown => continue,
                SolveState::Satisfied => {
                    let Solver {
                        ref mut asg,
                        ref ext,
                        ..
                    } = self;
                    ext.build_model(asg);
                    let model = (0..asg.num_vars)
                        .map(|vi| i32::from(Lit::from((vi, asg.model_value(vi)))))
                        .collect::<Vec<_>>();
                    break Ok(Certificate::SAT(model));
                }
                SolveState::Unsatisfiable => break Ok(Certificate::UNSAT),
                SolveState::AssumptionFail => break Ok(Certificate::AssumptionFail),
            }
        };
        self.sync_stats();
        match &answer {
            Ok(Certificate::SAT(_)) => info!("satisfiable"),
            Ok(Certificate::UNSAT) => info!("unsatisfiable"),
            Ok(Certificate::AssumptionFail) => info!("unsatisfiable under the assumptions"),
            Err(e) => info!(error = %e, "stopped"),
        }
        self.reset();
        answer
    }
    fn reset(&mut self) {
        reset(&mut self.asg, &mut self.state);
    }
    fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.state.stop)
    }
}

impl Solver {
    /// copy the counters owned by sub-modules into `state.stats`.
    pub fn sync_stats(&mut self) {
        let stats = &mut self.state.stats;
        stats.decisions = self.asg.num_decision;
        stats.propagations = self.asg.num_propagation;
        stats.clause_reallocs = self.cdb.arena.num_realloc;
        stats.clause_collects = self.cdb.num_collect;
        stats.deleted_clauses = self.cdb.num_deleted;
    }
    /// return `true` if the timeout or the conflict budget of this `solve` ran out.
    fn is_out_of_limits(&self, started: Instant, base_conflicts: usize) -> bool {
        let config = &self.state.config;
        config.timeout.is_some_and(|t| t <= started.elapsed())
            || config
                .conflict_budget
                .is_some_and(|b| b <= self.state.stats.conflicts - base_conflicts)
    }
    fn report_progress(&mut self, started: Instant) {
        self.sync_stats();
        let stats = &self.state.stats;
        info!(
            elapsed = started.elapsed().as_secs_f64(),
            conflicts = stats.conflicts,
            decisions = stats.decisions,
            propagations = stats.propagations,
            restarts = stats.restarts,
            learnt = self.cdb.num_learnt(),
            "progress"
        );
    }
}

/// Keep the first conflict found.
fn raise_conflict(state: &mut State, conflict: Conflict) {
    assert!(state.conflict.is_none(), "{conflict} over another conflict");
    state.conflict = conflict;
    state.stats.conflicts += 1;
}

pub(super) fn propagate(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) {
    if !state.conflict.is_none() {
        return;
    }
    if let Err(c) = asg.propagate(cdb) {
        raise_conflict(state, c);
    }
}

pub(super) fn reset(asg: &mut AssignStack, state: &mut State) {
    state.conflict = Conflict::None;
    asg.backjump(0);
}

/// Level 1 holds the facts, level 2 the assumptions.
/// Stops at the first conflict, which is left in `state`.
pub(super) fn start(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) {
    assert_eq!(asg.decision_level(), 0, "starting above the root level");
    asg.push_level();
    if cdb.has_empty() {
        raise_conflict(state, Conflict::Empty);
        return;
    }
    for i in 0..cdb.units().len() {
        let lit = cdb.units()[i];
        if !assert_at(asg, cdb, state, lit, 1) {
            return;
        }
    }
    asg.push_level();
    for i in 0..asg.assumptions.len() {
        let lit = asg.assumptions[i];
        if !assert_at(asg, cdb, state, lit, 2) {
            return;
        }
    }
}

/// assign and propagate `lit` as a decision at `lv`; return `false` on conflict.
fn assert_at(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    lit: Lit,
    lv: DecisionLevel,
) -> bool {
    match asg.assigned(lit) {
        Some(true) => true,
        Some(false) => {
            raise_conflict(state, Conflict::Fact(lit));
            false
        }
        None => {
            asg.push_assign(lit, AssignReason::Decision(lv));
            propagate(asg, cdb, state);
            state.conflict.is_none()
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::solver::SatSolverIF, std::time::Duration};

    fn solver(v: &[Vec<i32>]) -> Solver {
        match Solver::try_from((Config::default(), v)) {
            Ok(s) => s,
            Err(e) => panic!("{e:?}"),
        }
    }

    #[test]
    fn test_start_opens_two_levels() {
        let mut s = solver(&[vec![1], vec![-1, 2], vec![2, 3, 4]]);
        s.asg.assumption_enable(Lit::from(-3));
        s.start();
        assert!(!s.at_conflict());
        assert_eq!(s.asg.decision_level(), 2);
        assert_eq!(s.asg.level(1), 1);
        assert_eq!(s.asg.level(2), 2);
        assert_eq!(s.asg.reason(1), AssignReason::BinaryLink(Lit::from(-1)));
    }

    #[test]
    fn test_conflicting_facts() {
        let mut s = solver(&[vec![1, 2]]);
        s.add_clause(&[1]).expect("a valid clause");
        s.add_clause(&[-1]).expect("a valid clause");
        s.start();
        assert!(s.at_conflict());
        assert!(s.is_unsatisfiable());
        assert!(!s.is_resolvable());
        assert_eq!(s.search(), SolveState::Unsatisfiable);
    }

    #[test]
    fn test_decide_uses_saved_phase() {
        let mut s = solver(&[vec![1, 2, 3]]);
        s.start();
        s.decide();
        assert_eq!(s.asg.decision_level(), 3);
        let l = s.asg.trail()[0];
        // a fresh var has the negative phase
        assert!(!bool::from(l));
        assert_eq!(s.state.stats.decisions, 0);
        s.sync_stats();
        assert_eq!(s.state.stats.decisions, 1);
    }

    /// `n + 1` pigeons into `n` holes
    fn pigeonhole(n: i32) -> Vec<Vec<i32>> {
        let var = |p: i32, h: i32| p * n + h + 1;
        let mut v = (0..=n)
            .map(|p| (0..n).map(|h| var(p, h)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        for h in 0..n {
            for p in 0..=n {
                for q in p + 1..=n {
                    v.push(vec![-var(p, h), -var(q, h)]);
                }
            }
        }
        v
    }

    #[test]
    fn test_conflict_budget_interrupts() {
        let config = Config {
            search_budget: 1,
            conflict_budget: Some(1),
            progress_interval: Duration::ZERO,
            ..Config::default()
        };
        let mut s = Solver::try_from((config, pigeonhole(6).as_slice())).expect("a valid problem");
        assert_eq!(s.solve(), Err(SolverError::Interrupted));
        assert!(1 <= s.state.stats.conflicts);
        assert_eq!(s.asg.decision_level(), 0);
        // the budget counts the conflicts of each call separately
        s.state.config.conflict_budget = None;
        assert_eq!(s.solve(), Ok(Certificate::UNSAT));
    }

    #[test]
    fn test_timeout_interrupts() {
        let config = Config {
            timeout: Some(Duration::ZERO),
            ..Config::default()
        };
        let mut s = Solver::try_from((config, pigeonhole(6).as_slice())).expect("a valid problem");
        assert_eq!(s.solve(), Err(SolverError::Interrupted));
        assert_eq!(s.state.stats.conflicts, 0);
        s.state.config.timeout = Some(Duration::from_secs(3600));
        assert_eq!(s.solve(), Ok(Certificate::UNSAT));
    }

    #[test]
    fn test_search_breaks_on_stop() {
        let mut s = solver(&[vec![1, 2], vec![-1, 2], vec![3, 4]]);
        let stop = s.stop_handle();
        stop.store(true, Ordering::Relaxed);
        s.reset();
        s.start();
        assert_eq!(s.search(), SolveState::Break);
        assert_eq!(s.solve(), Err(SolverError::Interrupted));
    }
}
