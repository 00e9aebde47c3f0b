use {
    proptest::prelude::*,
    uipsat::{
        assign::{AssignIF, Conflict, PropagateIF},
        types::*,
        *,
    },
};

const NUM_VARS: usize = 12;

/// One step of a search driven from outside: a decision, or a backjump to a
/// level picked by the selector.
#[derive(Clone, Copy, Debug)]
enum Step {
    Decide,
    Backjump(u32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::Decide),
        1 => any::<u32>().prop_map(Step::Backjump),
    ]
}

fn clause() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec((1..=NUM_VARS as i32, any::<bool>()), 2..=4)
        .prop_map(|v| v.into_iter().map(|(x, b)| if b { x } else { -x }).collect())
}

/// No installed clause is falsified, and none is unit with its last literal unassigned.
fn check_propagated(s: &Solver) -> Result<(), TestCaseError> {
    for cid in s.cdb.arena.iter() {
        if !s.cdb.arena.is(cid, FlagClause::INSTALLED) {
            continue;
        }
        let values = s
            .cdb
            .arena
            .lits(cid)
            .map(|l| s.asg.assigned(l))
            .collect::<Vec<_>>();
        if values.contains(&Some(true)) {
            continue;
        }
        let free = values.iter().filter(|v| v.is_none()).count();
        let lits = i32s(&s.cdb.arena.to_vec(cid));
        prop_assert!(free != 0, "{:?} is falsified", lits);
        prop_assert!(free != 1, "{:?} is unit but unpropagated", lits);
    }
    Ok(())
}

/// Levels along the trail never decrease and never exceed the decision level.
fn check_trail_levels(s: &Solver) -> Result<(), TestCaseError> {
    let levels = s
        .asg
        .trail()
        .iter()
        .map(|l| s.asg.level(l.vi()))
        .collect::<Vec<_>>();
    prop_assert!(levels.windows(2).all(|w| w[0] <= w[1]), "{:?}", levels);
    if let Some(last) = levels.last() {
        prop_assert!(*last <= s.asg.decision_level());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn propagation_keeps_the_trail_consistent(
        cnf in prop::collection::vec(clause(), 1..60),
        steps in prop::collection::vec(step(), 1..40),
    ) {
        let mut s = match Solver::try_from((Config::default(), cnf.as_slice())) {
            Ok(s) => s,
            Err(_) => return Ok(()),
        };
        s.start();
        if s.at_conflict() {
            return Ok(());
        }
        check_propagated(&s)?;
        check_trail_levels(&s)?;
        for step in steps {
            let level = s.asg.decision_level();
            if s.at_conflict() {
                // undo the conflicting level at least
                let target = match step {
                    Step::Backjump(sel) => 2 + sel % (level - 2),
                    Step::Decide => level - 1,
                };
                s.asg.backjump(target);
                s.state.conflict = Conflict::None;
            } else {
                match step {
                    Step::Backjump(sel) => s.asg.backjump(2 + sel % (level - 1)),
                    Step::Decide if s.asg.at_leaf() => break,
                    Step::Decide => {
                        s.decide();
                        s.propagate();
                    }
                }
            }
            check_trail_levels(&s)?;
            if !s.at_conflict() {
                check_propagated(&s)?;
            }
        }
    }
}
