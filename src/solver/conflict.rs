//! Conflict Analysis
use {
    super::{analyze::Learner, search::start, State},
    crate::{
        assign::{AssignIF, AssignStack, Conflict, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF},
        types::*,
    },
    tracing::trace,
};

/// Learn a clause from the current conflict, backjump, and assert its UIP.
/// A clause whose second literal sits below the assumption level sends
/// the search back to `start`.
pub fn handle_conflict(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    learn: &mut Learner,
    state: &mut State,
) {
    let conflict = state.conflict;
    let conflicting_level = asg.decision_level();
    assert!(2 < conflicting_level, "resolving {conflict} at level {conflicting_level}");
    state.last_conflict_level = conflicting_level;
    learn.analyze(asg, cdb, conflict);
    let learnt = learn.learnt();
    let cid = cdb.new_clause(learnt);
    let lbd = asg.compute_lbd(learnt.iter().copied());
    cdb.arena.set_lbd(cid, lbd);
    cdb.set_activity(cid, cdb.activity_inc);
    let level = if 1 < learnt.len() {
        asg.level(learnt[1].vi())
    } else {
        0
    };
    state.stats.learned_lits += learn.cut_len();
    state.stats.minimized_lits += learnt.len();
    match learnt.len() {
        1 => state.stats.learned_units += 1,
        2 => state.stats.learned_binary += 1,
        _ => (),
    }
    trace!(
        clause = ?i32s(learnt),
        lbd,
        from = conflicting_level,
        to = level,
        "learnt"
    );
    state.conflict = Conflict::None;
    if level < 2 {
        asg.backjump(0);
        cdb.install(cid);
        learn.reset();
        start(asg, cdb, state);
        return;
    }
    asg.backjump(level);
    cdb.install(cid);
    let reason = if learnt.len() == 2 {
        AssignReason::BinaryLink(learnt[1])
    } else {
        AssignReason::Implication(cid)
    };
    asg.push_assign(learnt[0], reason);
    learn.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(i: i32) -> Lit {
        Lit::from(i)
    }

    fn setup(n: usize, clauses: &[&[i32]]) -> (AssignStack, ClauseDB, Learner, State) {
        let cnf = CNFDescription {
            num_of_variables: n,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        for c in clauses {
            let v = c.iter().map(|i| lit(*i)).collect::<Vec<_>>();
            cdb.input_clause(&v);
        }
        (
            AssignStack::instantiate(&config, &cnf),
            cdb,
            Learner::instantiate(&config, &cnf),
            State::instantiate(&config, &cnf),
        )
    }

    fn decide(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State, l: i32) {
        asg.push_level();
        let lv = asg.decision_level();
        asg.push_assign(lit(l), AssignReason::Decision(lv));
        if let Err(c) = asg.propagate(cdb) {
            state.conflict = c;
        }
    }

    #[test]
    fn test_backjump_and_assert() {
        let (mut asg, mut cdb, mut learn, mut state) = setup(
            5,
            &[&[-1, -2, 3], &[-2, 4], &[-3, -4, 5], &[-3, -4, -5]],
        );
        start(&mut asg, &mut cdb, &mut state);
        decide(&mut asg, &mut cdb, &mut state, 1);
        decide(&mut asg, &mut cdb, &mut state, 2);
        assert!(!state.conflict.is_none());
        handle_conflict(&mut asg, &mut cdb, &mut learn, &mut state);
        // (-2 -1) asserts -2 at level 3
        assert!(state.conflict.is_none());
        assert_eq!(asg.decision_level(), 3);
        assert_eq!(asg.assigned(lit(-2)), Some(true));
        assert_eq!(asg.reason(1), AssignReason::BinaryLink(lit(-1)));
        assert_eq!(state.stats.learned_binary, 1);
        assert_eq!(state.last_conflict_level, 4);
        assert_eq!(cdb.num_learnt(), 1);
    }

    #[test]
    fn test_unit_learnt_restarts_from_facts() {
        let (mut asg, mut cdb, mut learn, mut state) =
            setup(3, &[&[-1, 2], &[-1, -2, 3], &[-1, -2, -3]]);
        start(&mut asg, &mut cdb, &mut state);
        decide(&mut asg, &mut cdb, &mut state, 1);
        assert!(!state.conflict.is_none());
        handle_conflict(&mut asg, &mut cdb, &mut learn, &mut state);
        assert_eq!(state.stats.learned_units, 1);
        assert_eq!(cdb.units(), &[lit(-1)]);
        // `start` asserted the fact at level 1 and reopened level 2
        assert_eq!(asg.decision_level(), 2);
        assert_eq!(asg.level(0), 1);
        assert_eq!(asg.assigned(lit(-1)), Some(true));
    }
}
