use crate::statistics::StatisticBlock;

/// The counters an engine maintains over its lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EngineStatistics {
    /// The number of branching decisions.
    pub num_decisions: u64,
    /// The number of branching decisions which picked a random variable.
    pub num_random_decisions: u64,
    pub num_conflicts: u64,
    /// The number of literals taken from the trail and propagated.
    pub num_propagations: u64,
    pub num_restarts: u64,
    /// The number of restarts which were postponed because the trail was unusually long.
    pub num_blocked_restarts: u64,
    /// The number of learnt clause database reductions.
    pub num_reduce_db: u64,
    /// The number of learnt clauses removed by reductions.
    pub num_removed_clauses: u64,
    /// The total number of literals in learnt clauses after minimisation.
    pub num_conflict_literals: u64,
    /// The total number of literals in learnt clauses before minimisation.
    pub num_conflict_literals_before_minimisation: u64,
    pub num_learnt_units: u64,
    pub num_learnt_binaries: u64,
    /// The number of learnt clauses with an LBD of at most two.
    pub num_learnt_glue: u64,
    pub longest_learnt_clause: usize,
    pub num_solve_calls: u64,
}

impl EngineStatistics {
    /// The percentage of learnt literals removed by minimisation.
    pub fn minimised_literal_percentage(&self) -> f64 {
        if self.num_conflict_literals_before_minimisation == 0 {
            return 0.0;
        }

        let removed =
            self.num_conflict_literals_before_minimisation - self.num_conflict_literals;
        removed as f64 * 100.0 / self.num_conflict_literals_before_minimisation as f64
    }

    pub fn append_to(&self, block: &mut StatisticBlock) {
        let _ = block
            .add("restarts", self.num_restarts)
            .add("blocked_restarts", self.num_blocked_restarts)
            .add("reduce_db", self.num_reduce_db)
            .add("removed_clauses", self.num_removed_clauses)
            .add("learnts_glue", self.num_learnt_glue)
            .add("learnts_size_2", self.num_learnt_binaries)
            .add("learnts_size_1", self.num_learnt_units)
            .add("conflicts", self.num_conflicts)
            .add("decisions", self.num_decisions)
            .add("random_decisions", self.num_random_decisions)
            .add("propagations", self.num_propagations)
            .add("conflict_literals", self.num_conflict_literals)
            .add(
                "minimised_literal_percentage",
                format!("{:.2}", self.minimised_literal_percentage()),
            )
            .add("solve_calls", self.num_solve_calls);
    }
}
