use fnv::FnvHashSet;
use log::debug;
use log::info;
use log::warn;

use super::assignments::Assignments;
use super::clause_database::ClauseDatabase;
use super::clause_database::ClauseReference;
use super::conflict_analysis::ConflictAnalyser;
use super::restart_strategy::RestartStrategy;
use super::variable_selector::VariableSelector;
use super::watch_lists::WatchLists;
use super::watch_lists::Watcher;
use crate::basic_types::Literal;
use crate::basic_types::SolveResult;
use crate::basic_types::Variable;
use crate::engine::ClauseDatabaseError;
use crate::engine::EngineOptions;
use crate::engine::EngineStatistics;
use crate::engine::MetricSamples;
use crate::engine::SatEngine;
use crate::proof::ProofLog;
use crate::termination::TerminationCondition;

/// A conflict-driven clause-learning engine.
///
/// Propagation uses two watched literals per clause with blocking literals. Conflicts are analysed
/// to the first unique implication point and the learnt clause is minimised using the reasons of
/// its literals. Branching follows VSIDS with phase saving, restarts follow the Glucose scheme of
/// [`RestartOptions`](crate::engine::RestartOptions), and learnt clauses with a high LBD are
/// periodically removed.
///
/// Assumptions are decided in order before any other decision, each on its own decision level.
#[derive(Debug)]
pub struct CdclEngine {
    options: EngineOptions,
    assignments: Assignments,
    clause_database: ClauseDatabase,
    watch_lists: WatchLists,
    variable_selector: VariableSelector,
    conflict_analyser: ConflictAnalyser,
    restart_strategy: RestartStrategy,
    /// The position on the trail of the next literal to propagate.
    propagation_head: usize,
    is_consistent: bool,
    /// The values of the variables in the last model; empty if the last solve found none.
    model: Vec<bool>,
    statistics: EngineStatistics,
    metric_samples: MetricSamples,
    proof_log: ProofLog,
    next_reduce: u64,
    reduce_interval: u64,
}

impl Default for CdclEngine {
    fn default() -> Self {
        CdclEngine::new(EngineOptions::default())
    }
}

impl CdclEngine {
    pub fn new(options: EngineOptions) -> CdclEngine {
        CdclEngine {
            assignments: Assignments::default(),
            clause_database: ClauseDatabase::new(options.learning_options.clause_decay),
            watch_lists: WatchLists::default(),
            variable_selector: VariableSelector::new(
                options.variable_decay,
                options.random_decision_frequency,
            ),
            conflict_analyser: ConflictAnalyser::default(),
            restart_strategy: RestartStrategy::new(options.restart_options),
            propagation_head: 0,
            is_consistent: true,
            model: vec![],
            statistics: EngineStatistics::default(),
            metric_samples: MetricSamples::new(options.metric_interval),
            proof_log: ProofLog::default(),
            next_reduce: options.learning_options.first_reduce_interval,
            reduce_interval: options.learning_options.first_reduce_interval,
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn add_root_clause(
        &mut self,
        literals: &[Literal],
        is_learnt: bool,
    ) -> Result<bool, ClauseDatabaseError> {
        if !self.is_consistent {
            return Ok(false);
        }
        debug_assert_eq!(self.assignments.decision_level(), 0);
        debug_assert!(literals
            .iter()
            .all(|literal| literal.variable().index() < self.num_variables()));

        let mut clause = Vec::new();
        clause.try_reserve(literals.len())?;
        clause.extend_from_slice(literals);
        clause.sort();
        clause.dedup();

        // A literal and its negation are adjacent after sorting.
        let is_tautology = clause.windows(2).any(|pair| pair[0] == !pair[1]);
        let is_satisfied = clause
            .iter()
            .any(|&literal| self.assignments.is_literal_true(literal));
        if is_tautology || is_satisfied {
            return Ok(true);
        }

        clause.retain(|&literal| !self.assignments.is_literal_false(literal));

        match clause.len() {
            0 => self.mark_inconsistent(),
            1 => {
                if is_learnt {
                    report_proof_error(self.proof_log.log_learnt_clause(&clause));
                }
                self.assignments.assign(clause[0], None);
                if self.propagate().is_some() {
                    self.mark_inconsistent();
                }
            }
            _ => {
                let lbd = if is_learnt {
                    report_proof_error(self.proof_log.log_learnt_clause(&clause));
                    self.options.learning_options.protected_lbd
                } else {
                    0
                };
                let reference = self.clause_database.add(clause, is_learnt, lbd)?;
                self.watch_lists
                    .watch_clause(reference, self.clause_database.literals(reference));
            }
        }

        Ok(self.is_consistent)
    }

    fn mark_inconsistent(&mut self) {
        self.is_consistent = false;
        report_proof_error(self.proof_log.log_contradiction());
    }

    /// Propagates the trail from the propagation head, returning the first clause found to be
    /// falsified.
    fn propagate(&mut self) -> Option<ClauseReference> {
        while self.propagation_head < self.assignments.trail_len() {
            let literal = self.assignments.trail_entry(self.propagation_head);
            self.propagation_head += 1;
            self.statistics.num_propagations += 1;

            let false_literal = !literal;
            let mut watchers = self.watch_lists.take(literal);
            let mut conflict = None;
            let mut read = 0;
            let mut write = 0;

            while read < watchers.len() {
                let watcher = watchers[read];
                read += 1;

                if self.assignments.is_literal_true(watcher.blocker) {
                    watchers[write] = watcher;
                    write += 1;
                    continue;
                }

                let clause = self.clause_database.literals_mut(watcher.clause);
                if clause[0] == false_literal {
                    clause.swap(0, 1);
                }
                debug_assert_eq!(clause[1], false_literal);

                let first = clause[0];
                let kept = Watcher {
                    clause: watcher.clause,
                    blocker: first,
                };
                if first != watcher.blocker && self.assignments.is_literal_true(first) {
                    watchers[write] = kept;
                    write += 1;
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&position| !self.assignments.is_literal_false(clause[position]));
                if let Some(position) = replacement {
                    clause.swap(1, position);
                    self.watch_lists.push(!clause[1], kept);
                    continue;
                }

                watchers[write] = kept;
                write += 1;

                if self.assignments.is_literal_false(first) {
                    conflict = Some(watcher.clause);
                    while read < watchers.len() {
                        watchers[write] = watchers[read];
                        write += 1;
                        read += 1;
                    }
                    self.propagation_head = self.assignments.trail_len();
                } else {
                    self.assignments.assign(first, Some(watcher.clause));
                }
            }

            watchers.truncate(write);
            self.watch_lists.restore(literal, watchers);

            if conflict.is_some() {
                return conflict;
            }
        }

        None
    }

    fn backtrack(&mut self, level: usize) {
        let variable_selector = &mut self.variable_selector;
        self.assignments
            .backtrack(level, |literal| variable_selector.on_unassign(literal));
        self.propagation_head = self.propagation_head.min(self.assignments.trail_len());
    }

    fn search(
        &mut self,
        assumptions: &[Literal],
        termination: &mut dyn TerminationCondition,
    ) -> Result<SolveResult, ClauseDatabaseError> {
        if !self.is_consistent {
            return Ok(SolveResult::Unsatisfiable);
        }

        loop {
            if let Some(conflict) = self.propagate() {
                self.statistics.num_conflicts += 1;

                if self.assignments.decision_level() == 0 {
                    self.mark_inconsistent();
                    return Ok(SolveResult::Unsatisfiable);
                }

                self.resolve_conflict(conflict)?;
                continue;
            }

            if self.restart_strategy.should_restart() {
                self.restart();
                continue;
            }

            if self.statistics.num_conflicts >= self.next_reduce {
                self.reduce_learnt_clauses();
            }

            if termination.should_stop() {
                return Ok(SolveResult::Indeterminate);
            }

            let mut decision = None;
            while self.assignments.decision_level() < assumptions.len() {
                let assumption = assumptions[self.assignments.decision_level()];
                debug_assert!(assumption.variable().index() < self.num_variables());

                match self.assignments.literal_value(assumption) {
                    Some(true) => self.assignments.new_decision_level(),
                    Some(false) => return Ok(SolveResult::Unsatisfiable),
                    None => {
                        decision = Some(assumption);
                        break;
                    }
                }
            }

            let decision = match decision {
                Some(assumption) => assumption,
                None => match self.variable_selector.next_decision(&self.assignments) {
                    Some((literal, is_random)) => {
                        if is_random {
                            self.statistics.num_random_decisions += 1;
                        }
                        literal
                    }
                    None => {
                        self.save_model();
                        return Ok(SolveResult::Satisfiable);
                    }
                },
            };

            self.statistics.num_decisions += 1;
            termination.decision_has_been_made();
            self.assignments.new_decision_level();
            self.assignments.assign(decision, None);
        }
    }

    fn resolve_conflict(&mut self, conflict: ClauseReference) -> Result<(), ClauseDatabaseError> {
        let learnt = self.conflict_analyser.analyse(
            conflict,
            &self.assignments,
            &mut self.clause_database,
            &mut self.variable_selector,
            self.options.learning_options.minimise_learnt_clauses,
        );

        let length = learnt.literals.len();
        self.statistics.num_conflict_literals += length as u64;
        self.statistics.num_conflict_literals_before_minimisation +=
            learnt.num_literals_before_minimisation as u64;
        self.statistics.longest_learnt_clause = self.statistics.longest_learnt_clause.max(length);
        match length {
            1 => self.statistics.num_learnt_units += 1,
            2 => self.statistics.num_learnt_binaries += 1,
            _ => {}
        }
        if learnt.lbd <= 2 {
            self.statistics.num_learnt_glue += 1;
        }

        let trail_length = self.assignments.trail_len() as u64;
        if self.restart_strategy.notify_conflict(learnt.lbd, trail_length) {
            self.statistics.num_blocked_restarts += 1;
        }

        self.backtrack(learnt.backjump_level);
        report_proof_error(self.proof_log.log_learnt_clause(&learnt.literals));

        let asserting_literal = learnt.literals[0];
        if length == 1 {
            self.assignments.assign(asserting_literal, None);
        } else {
            let reference = self
                .clause_database
                .add(learnt.literals, true, learnt.lbd)?;
            self.watch_lists
                .watch_clause(reference, self.clause_database.literals(reference));
            self.clause_database.bump_activity(reference);
            self.assignments.assign(asserting_literal, Some(reference));
        }

        self.variable_selector.decay();
        self.clause_database.decay_activities();
        self.metric_samples.on_conflict(&self.statistics)?;
        self.log_progress();

        Ok(())
    }

    fn restart(&mut self) {
        self.backtrack(0);
        self.restart_strategy.notify_restart();
        self.statistics.num_restarts += 1;
    }

    /// Removes the less useful half of the learnt clauses whose LBD exceeds the protected LBD.
    /// Clauses which are the reason for a current assignment are kept.
    fn reduce_learnt_clauses(&mut self) {
        self.statistics.num_reduce_db += 1;
        self.reduce_interval += self.options.learning_options.reduce_interval_increment;
        self.next_reduce = self.statistics.num_conflicts + self.reduce_interval;

        let protected_lbd = self.options.learning_options.protected_lbd;
        let mut candidates = self
            .clause_database
            .learnt_clauses()
            .iter()
            .copied()
            .filter(|&reference| {
                self.clause_database.lbd(reference) > protected_lbd && !self.is_locked(reference)
            })
            .collect::<Vec<_>>();

        let database = &self.clause_database;
        candidates.sort_by(|&a, &b| {
            database
                .lbd(b)
                .cmp(&database.lbd(a))
                .then(database.activity(a).total_cmp(&database.activity(b)))
        });
        candidates.truncate(candidates.len() / 2);

        let to_remove = candidates.into_iter().collect::<FnvHashSet<_>>();
        let removed = self
            .clause_database
            .delete_where(|reference, _| to_remove.contains(&reference));
        self.watch_lists.remove_deleted(&self.clause_database);

        for literals in &removed {
            report_proof_error(self.proof_log.log_deletion(literals));
        }
        self.statistics.num_removed_clauses += removed.len() as u64;

        debug!(
            "Reduced the learnt clause database by {} clauses, {} remain",
            removed.len(),
            self.clause_database.num_learnt()
        );
    }

    fn is_locked(&self, reference: ClauseReference) -> bool {
        let propagated = self.clause_database.literals(reference)[0];
        self.assignments.is_literal_true(propagated)
            && self.assignments.reason(propagated.variable()) == Some(reference)
    }

    fn save_model(&mut self) {
        self.model = (0..self.num_variables())
            .map(|index| {
                self.assignments
                    .variable_value(Variable::new(index as u32))
                    .unwrap_or(false)
            })
            .collect();
    }

    fn log_progress(&self) {
        let Some(interval) = self.options.progress_interval else {
            return;
        };
        if interval == 0 || self.statistics.num_conflicts % interval != 0 {
            return;
        }

        info!(
            "{:>10} conflicts | {:>10} decisions | {:>8} clauses | {:>8} learnt | {:>6} restarts",
            self.statistics.num_conflicts,
            self.statistics.num_decisions,
            self.clause_database.num_permanent(),
            self.clause_database.num_learnt(),
            self.statistics.num_restarts,
        );
    }
}

fn report_proof_error(result: std::io::Result<()>) {
    if let Err(error) = result {
        warn!("Failed to write to the certificate: {error}");
    }
}

impl SatEngine for CdclEngine {
    fn new_variable(&mut self) -> Variable {
        let variable = Variable::new(self.num_variables() as u32);

        self.assignments.grow();
        self.watch_lists.grow();
        self.variable_selector.grow();
        self.conflict_analyser.grow();

        variable
    }

    fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    fn add_clause(&mut self, literals: &[Literal]) -> Result<bool, ClauseDatabaseError> {
        self.add_root_clause(literals, false)
    }

    fn add_learnt_clause(&mut self, literals: &[Literal]) -> Result<bool, ClauseDatabaseError> {
        self.add_root_clause(literals, true)
    }

    fn is_consistent(&self) -> bool {
        self.is_consistent
    }

    fn solve(
        &mut self,
        assumptions: &[Literal],
        termination: &mut dyn TerminationCondition,
    ) -> Result<SolveResult, ClauseDatabaseError> {
        self.statistics.num_solve_calls += 1;
        self.model.clear();
        debug!(
            "Solving with {} variables, {} clauses and {} assumptions",
            self.num_variables(),
            self.clause_database.num_permanent(),
            assumptions.len()
        );

        let result = self.search(assumptions, termination);
        self.backtrack(0);
        report_proof_error(self.proof_log.flush());

        result
    }

    fn model_value(&self, variable: Variable) -> Option<bool> {
        self.model.get(variable.index()).copied()
    }

    fn simplify(&mut self) -> bool {
        if !self.is_consistent {
            return false;
        }
        debug_assert_eq!(self.assignments.decision_level(), 0);

        if self.propagate().is_some() {
            self.mark_inconsistent();
            return false;
        }
        self.assignments.forget_root_reasons();

        let assignments = &self.assignments;
        let removed = self.clause_database.delete_where(|_, literals| {
            literals
                .iter()
                .any(|&literal| assignments.is_literal_true(literal))
        });
        self.watch_lists.remove_deleted(&self.clause_database);
        for literals in &removed {
            report_proof_error(self.proof_log.log_deletion(literals));
        }

        let assignments = &self.assignments;
        let shortened = self
            .clause_database
            .strip_unwatched_literals(|literal| assignments.is_literal_false(literal));
        for reference in shortened {
            report_proof_error(
                self.proof_log
                    .log_learnt_clause(self.clause_database.literals(reference)),
            );
        }

        debug!(
            "Simplification removed {} satisfied clauses, {} root assignments",
            removed.len(),
            self.assignments.trail_len()
        );

        true
    }

    fn statistics(&self) -> &EngineStatistics {
        &self.statistics
    }

    fn metric_samples(&self) -> &MetricSamples {
        &self.metric_samples
    }

    fn set_random_seed(&mut self, seed: f64) {
        self.variable_selector.set_seed(seed);
    }

    fn num_clauses(&self) -> usize {
        self.clause_database.num_permanent()
    }

    fn num_learnt_clauses(&self) -> usize {
        self.clause_database.num_learnt()
    }

    fn longest_clause_length(&self) -> usize {
        self.clause_database
            .permanent_clauses()
            .iter()
            .map(|&reference| self.clause_database.literals(reference).len())
            .max()
            .unwrap_or(0)
    }

    fn simplified_clauses(&self) -> Vec<Vec<Literal>> {
        if !self.is_consistent {
            return vec![vec![]];
        }

        let mut clauses = self
            .assignments
            .trail()
            .iter()
            .map(|&literal| vec![literal])
            .collect::<Vec<_>>();

        for &reference in self.clause_database.permanent_clauses() {
            let literals = self.clause_database.literals(reference);
            if literals
                .iter()
                .any(|&literal| self.assignments.is_literal_true(literal))
            {
                continue;
            }

            clauses.push(
                literals
                    .iter()
                    .copied()
                    .filter(|&literal| !self.assignments.is_literal_false(literal))
                    .collect(),
            );
        }

        clauses
    }

    fn apply_ordering_hint(&mut self, hint: &[(Variable, f64)]) {
        self.variable_selector.apply_hint(hint);
    }

    fn attach_proof_log(&mut self, proof_log: ProofLog) {
        self.proof_log = proof_log;
        if !self.is_consistent {
            report_proof_error(self.proof_log.log_contradiction());
        }
    }
}
