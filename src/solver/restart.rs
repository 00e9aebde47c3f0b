//! Crate `restart` provides restart heuristics.
use {
    crate::{config::RestartStrategy, primitive::LubySeries, types::*},
    std::fmt,
};

/// API for [`check`](`crate::solver::RestartIF::check`).
pub trait RestartIF: Instantiate {
    /// count one search iteration and return `true` if a restart is due.
    /// `last_level` is the decision level of the last conflict, and
    /// `conflicts` is the number of conflicts so far.
    fn check(&mut self, last_level: DecisionLevel, conflicts: usize) -> bool;
    /// return the number of restarts requested.
    fn num_restart(&self) -> usize;
}

/// Luby restart: a fixed period `scale * luby(n)` after the `n`-th restart.
#[derive(Clone, Debug)]
struct LubyRestart {
    series: LubySeries,
    scale: usize,
    counter: usize,
    period: usize,
}

impl Instantiate for LubyRestart {
    fn instantiate(config: &Config, _: &CNFDescription) -> Self {
        LubyRestart {
            series: LubySeries::default(),
            scale: config.luby_scale,
            counter: 0,
            period: config.luby_scale,
        }
    }
}

impl LubyRestart {
    fn check(&mut self) -> bool {
        self.counter += 1;
        if self.counter < self.period {
            return false;
        }
        self.counter = 0;
        self.period = self.scale * self.series.next().unwrap_or(1);
        true
    }
}

/// Glucose restart: compare the recent conflict levels with the global average.
#[derive(Clone, Debug)]
struct GlucoseRestart {
    /// ring buffer of recent conflict levels
    ring: Vec<DecisionLevel>,
    head: usize,
    margin: f64,
    /// the samples seen since the last restart
    counter: usize,
    short_sum: u64,
    long_sum: u64,
}

impl Instantiate for GlucoseRestart {
    fn instantiate(config: &Config, _: &CNFDescription) -> Self {
        GlucoseRestart {
            ring: vec![0; config.glucose_window.max(1)],
            head: 0,
            margin: config.glucose_margin,
            counter: 0,
            short_sum: 0,
            long_sum: 0,
        }
    }
}

impl GlucoseRestart {
    /// the number of samples needed before a restart.
    const WARMUP: usize = 100;
    fn check(&mut self, level: DecisionLevel, conflicts: usize) -> bool {
        let old = std::mem::replace(&mut self.ring[self.head], level);
        self.head = (self.head + 1) % self.ring.len();
        self.short_sum = self.short_sum + level as u64 - old as u64;
        self.long_sum += level as u64;
        self.counter += 1;
        if self.counter <= Self::WARMUP || conflicts == 0 {
            return false;
        }
        let short_avg = self.short_sum as f64 / self.ring.len() as f64;
        let long_avg = self.long_sum as f64 / conflicts as f64;
        if self.margin * short_avg <= long_avg {
            return false;
        }
        // `short_sum` is the sum of `ring`.
        self.ring.iter_mut().for_each(|x| *x = 0);
        self.counter = 0;
        self.short_sum = 0;
        true
    }
}

/// Restart manager: the selected policy and its counter.
#[derive(Clone, Debug)]
pub struct RestartManager {
    strategy: RestartStrategy,
    luby: LubyRestart,
    glucose: GlucoseRestart,
    num_restart: usize,
}

impl Instantiate for RestartManager {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Self {
        RestartManager {
            strategy: config.restart_strategy,
            luby: LubyRestart::instantiate(config, cnf),
            glucose: GlucoseRestart::instantiate(config, cnf),
            num_restart: 0,
        }
    }
}

impl RestartIF for RestartManager {
    fn check(&mut self, last_level: DecisionLevel, conflicts: usize) -> bool {
        let restart = match self.strategy {
            RestartStrategy::Luby => self.luby.check(),
            RestartStrategy::Glucose => self.glucose.check(last_level, conflicts),
        };
        if restart {
            self.num_restart += 1;
        }
        restart
    }
    fn num_restart(&self) -> usize {
        self.num_restart
    }
}

impl fmt::Display for RestartManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.strategy {
            RestartStrategy::Luby => write!(
                f,
                "Restart[Luby, {}, counter:{}/{}]",
                self.luby.series, self.luby.counter, self.luby.period
            ),
            RestartStrategy::Glucose => write!(
                f,
                "Restart[Glucose, samples:{}, short:{}, long:{}]",
                self.glucose.counter, self.glucose.short_sum, self.glucose.long_sum
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(strategy: RestartStrategy) -> RestartManager {
        let config = Config {
            restart_strategy: strategy,
            luby_scale: 2,
            ..Config::default()
        };
        RestartManager::instantiate(&config, &CNFDescription::default())
    }

    #[test]
    fn test_luby_periods() {
        let mut rst = manager(RestartStrategy::Luby);
        let mut restarts_at = Vec::new();
        for i in 1..=20 {
            if rst.check(0, 0) {
                restarts_at.push(i);
            }
        }
        // periods: 2, then 2 * (1, 1, 2, 1, 1, 2, 4)
        assert_eq!(restarts_at, vec![2, 4, 6, 10, 12, 14, 18]);
        assert_eq!(rst.num_restart(), 7);
    }

    #[test]
    fn test_glucose_needs_warmup() {
        let mut rst = manager(RestartStrategy::Glucose);
        for _ in 0..GlucoseRestart::WARMUP {
            assert!(!rst.check(50, 1));
        }
        // recent levels are far above the global average
        assert!(rst.check(50, 1_000_000));
        assert_eq!(rst.num_restart(), 1);
        assert!(!rst.check(50, 1_000_000));
    }

    #[test]
    fn test_glucose_stays_on_flat_levels() {
        let mut rst = manager(RestartStrategy::Glucose);
        for conflicts in 1..=1000 {
            assert!(!rst.check(10, conflicts));
        }
    }
}
