use {
    proptest::prelude::*,
    uipsat::{
        config::{ReductionModel, RestartStrategy},
        types::Lit,
        *,
    },
};

const NUM_VARS: usize = 8;

fn holds(clause: &[i32], bits: usize) -> bool {
    clause.iter().any(|l| {
        let b = bits & (1 << (l.unsigned_abs() as usize - 1)) != 0;
        b == (0 < *l)
    })
}

/// return `true` if some assignment satisfies every clause and every unit in `assumed`.
fn brute_force(cnf: &[Vec<i32>], assumed: &[i32]) -> bool {
    (0..1usize << NUM_VARS).any(|bits| {
        cnf.iter().all(|c| holds(c, bits)) && assumed.iter().all(|a| holds(&[*a], bits))
    })
}

/// a configuration that reduces, restarts and collects garbage very often.
fn stressed(restart: RestartStrategy, reduction: ReductionModel) -> Config {
    Config {
        restart_strategy: restart,
        luby_scale: 2,
        glucose_window: 4,
        reduction_model: reduction,
        agile_interval: 3,
        agile_slowdown: 1,
        geom_inc_limit: 2,
        freeze_lbd: 2,
        unfreeze_psm: 1,
        arena_bytes: 64,
        gc_slack_bytes: 0,
        search_budget: 7,
        ..Config::default()
    }
}

fn build(config: Config, cnf: &[Vec<i32>]) -> Solver {
    let mut s = match Solver::try_from((config, cnf)) {
        Ok(s) => s,
        Err(e) => panic!("{e:?}"),
    };
    while s.asg.num_vars < NUM_VARS {
        s.add_var();
    }
    s
}

fn check(mut s: Solver, cnf: &[Vec<i32>]) -> Result<(), TestCaseError> {
    match s.solve() {
        Ok(Certificate::SAT(ans)) => {
            prop_assert_eq!(ans.len(), NUM_VARS);
            prop_assert_eq!(s.validate(&ans), None);
            prop_assert!(brute_force(cnf, &[]));
        }
        Ok(Certificate::UNSAT) => prop_assert!(!brute_force(cnf, &[])),
        other => prop_assert!(false, "unexpected {:?}", other),
    }
    Ok(())
}

fn clause() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec((1..=NUM_VARS as i32, any::<bool>()), 1..=3)
        .prop_map(|v| v.into_iter().map(|(x, b)| if b { x } else { -x }).collect())
}

fn cnf() -> impl Strategy<Value = Vec<Vec<i32>>> {
    prop::collection::vec(clause(), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn agrees_with_brute_force(cnf in cnf()) {
        check(build(Config::default(), &cnf), &cnf)?;
    }

    #[test]
    fn agrees_under_stress(cnf in cnf(), glucose in any::<bool>(), geometric in any::<bool>()) {
        let restart = if glucose { RestartStrategy::Glucose } else { RestartStrategy::Luby };
        let reduction = if geometric { ReductionModel::Geometric } else { ReductionModel::Agile };
        check(build(stressed(restart, reduction), &cnf), &cnf)?;
    }

    #[test]
    fn assumptions_agree_with_brute_force(
        cnf in cnf(),
        assumed in prop::sample::subsequence((1..=NUM_VARS as i32).collect::<Vec<_>>(), 0..=3),
        signs in prop::collection::vec(any::<bool>(), 3),
    ) {
        let assumed = assumed
            .iter()
            .zip(signs.iter())
            .map(|(x, b)| if *b { *x } else { -*x })
            .collect::<Vec<_>>();
        let mut s = build(stressed(RestartStrategy::Luby, ReductionModel::Agile), &cnf);
        for a in assumed.iter() {
            s.asg.assumption_enable(Lit::from(*a));
        }
        match s.solve() {
            Ok(Certificate::SAT(ans)) => {
                prop_assert_eq!(s.validate(&ans), None);
                prop_assert!(assumed.iter().all(|a| ans.contains(a)));
            }
            // learnt clauses never depend on assumptions
            Ok(Certificate::UNSAT) => prop_assert!(!brute_force(&cnf, &[])),
            Ok(Certificate::AssumptionFail) => prop_assert!(!brute_force(&cnf, &assumed)),
            Err(e) => prop_assert!(false, "{}", e),
        }
    }

    #[test]
    fn incremental_clauses_agree(cnf in cnf(), extra in cnf()) {
        let mut s = build(stressed(RestartStrategy::Glucose, ReductionModel::Geometric), &cnf);
        let first = s.solve();
        prop_assert_eq!(matches!(first, Ok(Certificate::SAT(_))), brute_force(&cnf, &[]));
        for c in extra.iter() {
            s.add_clause(c).map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        let all = cnf.iter().chain(extra.iter()).cloned().collect::<Vec<_>>();
        check(s, &all)?;
    }
}
