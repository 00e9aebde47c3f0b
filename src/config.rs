use std::time::Duration;

/// Restart policy
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RestartStrategy {
    /// restart at `luby_scale * luby(n)` search iterations
    #[default]
    Luby,
    /// restart when recent conflict levels run high against the global average
    Glucose,
}

impl RestartStrategy {
    pub fn to_str(&self) -> &'static str {
        match self {
            RestartStrategy::Luby => "Luby",
            RestartStrategy::Glucose => "Glucose",
        }
    }
}

/// Clause-database reduction schedule
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReductionModel {
    /// reduce every `interval` iterations; the interval grows linearly
    #[default]
    Agile,
    /// reduce when learnt clauses exceed a geometrically growing limit
    Geometric,
}

impl ReductionModel {
    pub fn to_str(&self) -> &'static str {
        match self {
            ReductionModel::Agile => "Agile",
            ReductionModel::Geometric => "Geometric",
        }
    }
}

/// `Solver`'s parameters.
#[derive(Clone, Debug)]
pub struct Config {
    //
    //## restart
    //
    pub restart_strategy: RestartStrategy,
    /// the unit of the Luby sequence.
    pub luby_scale: usize,
    /// the size of the ring buffer of recent conflict levels.
    pub glucose_window: usize,
    /// restart if `glucose_margin * short_avg > long_avg`.
    pub glucose_margin: f64,

    //
    //## clause reduction
    //
    pub reduction_model: ReductionModel,
    /// the first agile interval.
    pub agile_interval: usize,
    /// the growth of the agile interval per run.
    pub agile_slowdown: usize,
    pub geom_size_factor: f64,
    pub geom_inc_factor: f64,
    /// the first period of geometric growth.
    pub geom_inc_limit: usize,
    /// queued clauses with LBD up to this are frozen, not deleted.
    pub freeze_lbd: u32,
    /// frozen clauses with PSM up to this are reinstalled.
    pub unfreeze_psm: usize,

    //
    //## activity
    //
    pub var_activity_factor: f64,
    pub clause_activity_factor: f64,

    //
    //## clause space
    //
    /// the initial size of the clause arena.
    pub arena_bytes: usize,
    /// the extra space added at each garbage collection.
    pub gc_slack_bytes: usize,

    //
    //## limits
    //
    /// the number of iterations a `search` call may run.
    pub search_budget: usize,
    /// stop `solve` once this many conflicts have been found.
    pub conflict_budget: Option<usize>,
    /// stop `solve` after this much wall-clock time.
    pub timeout: Option<Duration>,
    /// the minimal time between two progress reports.
    pub progress_interval: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            restart_strategy: RestartStrategy::default(),
            luby_scale: 100,
            glucose_window: 100,
            glucose_margin: 0.7,
            reduction_model: ReductionModel::default(),
            agile_interval: 500,
            agile_slowdown: 100,
            geom_size_factor: 1.1,
            geom_inc_factor: 1.1,
            geom_inc_limit: 100,
            freeze_lbd: 8,
            unfreeze_psm: 3,
            var_activity_factor: 1.05,
            clause_activity_factor: 1.05,
            arena_bytes: 4 * 1024 * 1024,
            gc_slack_bytes: 4 * 1024 * 1024,
            search_budget: 1000,
            conflict_budget: None,
            timeout: None,
            progress_interval: Duration::from_secs(5),
        }
    }
}
