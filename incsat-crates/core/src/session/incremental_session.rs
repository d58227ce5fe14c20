use std::io::Write;

use cpu_time::ProcessTime;
use log::debug;
use log::warn;

use super::AssumptionSet;
use super::ClauseBuffer;
use super::LearntClauseFilter;
use super::SessionError;
use crate::basic_types::Literal;
use crate::basic_types::SolveResult;
use crate::basic_types::Variable;
use crate::engine::CdclEngine;
use crate::engine::ClauseDatabaseError;
use crate::engine::EngineOptions;
use crate::engine::SatEngine;
use crate::ordering::VariableOrdering;
use crate::proof::ProofLog;
use crate::statistics::should_log_statistics;
use crate::statistics::StatisticBlock;
use crate::termination::CancellationController;
use crate::termination::CancellationPoll;
use crate::termination::Combinator;
use crate::termination::Indefinite;
use crate::termination::TerminationCondition;

/// What committing an empty buffer means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EmptyClausePolicy {
    /// The commit is rejected with [`SessionError::EmptyClause`] and nothing reaches the engine.
    #[default]
    Reject,
    /// The empty clause is added, which makes the clause database contradictory.
    AssertFalse,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SessionOptions {
    pub empty_clause_policy: EmptyClausePolicy,
    pub engine_options: EngineOptions,
}

/// How often the committing operations of a session were called.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionCounters {
    /// Every call to [`Session::commit_clause`], including empty and rejected ones.
    pub commits: u64,
    /// Commits of an empty buffer, on either the clause or the learnt clause path.
    pub empty_commits: u64,
    /// Learnt clauses given to the engine, through the buffer or by injection.
    pub learnt_commits: u64,
    pub solves: u64,
}

/// The outcome of [`Session::inject_learnt_clauses`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InjectionReport {
    pub accepted: usize,
    pub duplicates: usize,
    /// Whether the clause database is free of a contradiction after the injection.
    pub consistent: bool,
}

/// An incremental solving session over one engine.
///
/// See the [module documentation](crate::session) for the staging protocol. The session polls a
/// [`CancellationController`] (by default [`CancellationController::process`]) at every decision
/// point of a solve.
#[derive(Debug)]
pub struct Session<Engine: SatEngine = CdclEngine> {
    engine: Engine,
    clause_buffer: ClauseBuffer,
    learnt_clause_buffer: ClauseBuffer,
    assumptions: AssumptionSet,
    learnt_clause_filter: LearntClauseFilter,
    empty_clause_policy: EmptyClausePolicy,
    controller: &'static CancellationController,
    /// Whether the engine holds a model which may be queried.
    has_model: bool,
    has_solved: bool,
    resource_exhausted: bool,
    counters: SessionCounters,
    /// The CPU time of the process when the session was created.
    created_at: ProcessTime,
}

impl Default for Session<CdclEngine> {
    fn default() -> Self {
        Session::new(SessionOptions::default())
    }
}

impl Session<CdclEngine> {
    pub fn new(options: SessionOptions) -> Self {
        Session::with_engine(
            CdclEngine::new(options.engine_options),
            options.empty_clause_policy,
        )
    }
}

impl<Engine: SatEngine> Session<Engine> {
    pub fn with_engine(engine: Engine, empty_clause_policy: EmptyClausePolicy) -> Self {
        Session {
            engine,
            clause_buffer: ClauseBuffer::default(),
            learnt_clause_buffer: ClauseBuffer::default(),
            assumptions: AssumptionSet::default(),
            learnt_clause_filter: LearntClauseFilter::default(),
            empty_clause_policy,
            controller: CancellationController::process(),
            has_model: false,
            has_solved: false,
            resource_exhausted: false,
            counters: SessionCounters::default(),
            created_at: ProcessTime::now(),
        }
    }

    /// Poll `controller` instead of the process-wide controller.
    pub fn with_controller(mut self, controller: &'static CancellationController) -> Self {
        self.controller = controller;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Allocates a new variable; every call returns a different one.
    pub fn create_variable(&mut self) -> Variable {
        self.engine.new_variable()
    }

    pub fn num_variables(&self) -> usize {
        self.engine.num_variables()
    }

    /// Appends a literal to the clause buffer, creating its variable if needed.
    ///
    /// A rejected literal spoils the clause under construction: the next
    /// [`Session::commit_clause`] fails with [`SessionError::IncompleteClause`] and adds nothing.
    pub fn stage_literal(&mut self, code: i32) -> Result<(), SessionError> {
        match self.decode(code) {
            Ok(literal) => {
                self.clause_buffer.push(literal);
                Ok(())
            }
            Err(error) => {
                self.clause_buffer.reject();
                Err(error)
            }
        }
    }

    pub fn discard_clause(&mut self) {
        self.clause_buffer.clear();
    }

    /// Adds the staged literals to the engine as one clause, and empties the buffer.
    ///
    /// Returns `Ok(false)` if the clause database is contradictory afterwards; every later solve
    /// then reports [`SolveResult::Unsatisfiable`]. An empty buffer is handled according to the
    /// [`EmptyClausePolicy`].
    pub fn commit_clause(&mut self) -> Result<bool, SessionError> {
        self.counters.commits += 1;
        self.has_model = false;

        let literals = self
            .clause_buffer
            .take()
            .ok_or(SessionError::IncompleteClause)?;
        self.check_empty_commit(&literals)?;

        let result = self.engine.add_clause(&literals);
        self.record_exhaustion(result)
    }

    pub fn stage_assumption(&mut self, code: i32) -> Result<(), SessionError> {
        let literal = self.decode(code)?;
        self.assumptions.push(literal);
        Ok(())
    }

    pub fn staged_assumptions(&self) -> &[Literal] {
        self.assumptions.literals()
    }

    /// Searches for a model of the committed clauses in which the staged assumptions hold. The
    /// assumptions are consumed, whatever the outcome.
    pub fn solve(&mut self) -> SolveResult {
        self.solve_with(&mut Indefinite)
    }

    /// [`Session::solve`], which additionally gives up when `termination` triggers.
    pub fn solve_with<T: TerminationCondition + ?Sized>(
        &mut self,
        termination: &mut T,
    ) -> SolveResult {
        let assumptions = self.assumptions.take();
        self.has_model = false;
        self.has_solved = true;
        self.counters.solves += 1;

        let controller = self.controller;
        let result = {
            let _guard = controller.enter_solve();
            let mut termination = Combinator::new(CancellationPoll::new(controller), termination);
            self.engine.solve(&assumptions, &mut termination)
        };

        let result = match result {
            Ok(result) => result,
            Err(error) => {
                warn!("The solve was abandoned: {error}");
                self.resource_exhausted = true;
                SolveResult::Indeterminate
            }
        };

        match result {
            SolveResult::Satisfiable => self.has_model = true,
            SolveResult::Indeterminate if controller.is_requested() => self.report_interrupt(),
            _ => {}
        }

        result
    }

    /// The value of the variable of `code` in the model found by the most recent solve. The sign
    /// of `code` is ignored.
    pub fn value_of(&self, code: i32) -> Result<bool, SessionError> {
        let variable = Literal::from_dimacs(code)?.variable();
        if !self.has_model {
            return Err(SessionError::StaleQuery);
        }

        self.engine
            .model_value(variable)
            .ok_or(SessionError::UnknownVariable(variable))
    }

    pub fn has_model(&self) -> bool {
        self.has_model
    }

    /// [`Session::stage_literal`] for the learnt clause buffer.
    pub fn stage_learnt_literal(&mut self, code: i32) -> Result<(), SessionError> {
        match self.decode(code) {
            Ok(literal) => {
                self.learnt_clause_buffer.push(literal);
                Ok(())
            }
            Err(error) => {
                self.learnt_clause_buffer.reject();
                Err(error)
            }
        }
    }

    pub fn discard_learnt_clause(&mut self) {
        self.learnt_clause_buffer.clear();
    }

    /// [`Session::commit_clause`] for the learnt clause buffer. The clause must follow from the
    /// committed clauses; it is stored among the learnt clauses of the engine.
    ///
    /// A clause which was given to this session as a learnt clause before is not added again; the
    /// commit then only reports whether the clause database is consistent.
    pub fn commit_learnt_clause(&mut self) -> Result<bool, SessionError> {
        let literals = self
            .learnt_clause_buffer
            .take()
            .ok_or(SessionError::IncompleteClause)?;

        match self.add_learnt(literals)? {
            Some(consistent) => Ok(consistent),
            None => Ok(self.engine.is_consistent()),
        }
    }

    /// Commits every clause through the learnt path, skipping clauses which were given to this
    /// session as learnt clauses before.
    ///
    /// Stops at the first rejected clause; the clauses before it remain committed.
    pub fn inject_learnt_clauses<Clause: AsRef<[i32]>>(
        &mut self,
        clauses: impl IntoIterator<Item = Clause>,
    ) -> Result<InjectionReport, SessionError> {
        let mut report = InjectionReport {
            accepted: 0,
            duplicates: 0,
            consistent: self.engine.is_consistent(),
        };

        for clause in clauses {
            let literals = clause
                .as_ref()
                .iter()
                .map(|&code| self.decode(code))
                .collect::<Result<Vec<_>, _>>()?;

            match self.add_learnt(literals)? {
                Some(consistent) => {
                    report.accepted += 1;
                    report.consistent = consistent;
                }
                None => report.duplicates += 1,
            }
        }

        debug!(
            "Injected {} learnt clauses, skipped {} duplicates",
            report.accepted, report.duplicates
        );
        if !report.consistent {
            warn!("The injected learnt clauses made the clause database contradictory");
        }
        Ok(report)
    }

    /// The number of decisions made over all solves.
    pub fn decision_count(&self) -> u64 {
        self.engine.statistics().num_decisions
    }

    /// The number of learnt clauses currently held by the engine.
    pub fn learnt_clause_count(&self) -> u64 {
        self.engine.num_learnt_clauses() as u64
    }

    /// Seeds the random decisions of the engine. Only allowed before the first solve.
    pub fn set_random_seed(&mut self, seed: f64) -> Result<(), SessionError> {
        if self.has_solved {
            return Err(SessionError::SeedAfterSolve);
        }

        self.engine.set_random_seed(seed);
        Ok(())
    }

    /// Propagates the root assignments and removes satisfied clauses. Returns `false` if this
    /// reveals a contradiction.
    pub fn simplify(&mut self) -> bool {
        self.engine.simplify()
    }

    /// Seeds the branching order of the engine with the hint computed by `ordering` over the
    /// current clauses.
    pub fn apply_ordering(&mut self, ordering: &dyn VariableOrdering) {
        let clauses = self.engine.simplified_clauses();
        let hint = ordering.compute_hint(&clauses, self.engine.num_variables());
        debug!(
            "Ordering '{}' scored {} variables",
            ordering.name(),
            hint.len()
        );
        self.engine.apply_ordering_hint(&hint);
    }

    pub fn attach_proof_log(&mut self, proof_log: ProofLog) {
        self.engine.attach_proof_log(proof_log);
    }

    /// Writes the committed clauses, simplified under the root assignments, in DIMACS CNF.
    pub fn write_dimacs(&self, mut writer: impl Write) -> std::io::Result<()> {
        let clauses = self.engine.simplified_clauses();

        writeln!(writer, "p cnf {} {}", self.engine.num_variables(), clauses.len())?;
        for clause in clauses {
            for literal in clause {
                write!(writer, "{literal} ")?;
            }
            writeln!(writer, "0")?;
        }

        writer.flush()
    }

    /// Logs the counters of the engine and the session as statistics.
    pub fn print_incremental_stats(&self) {
        if !should_log_statistics() {
            return;
        }

        let mut block = StatisticBlock::default();
        self.engine.statistics().append_to(&mut block);
        let _ = block
            .add("commits", self.counters.commits)
            .add("empty_commits", self.counters.empty_commits)
            .add("learnt_commits", self.counters.learnt_commits)
            .add("learnt_clauses", self.engine.num_learnt_clauses())
            .add(
                "cpu_time",
                format!("{:.3}", self.created_at.elapsed().as_secs_f64()),
            );
        block.log();
    }

    pub fn is_consistent(&self) -> bool {
        self.engine.is_consistent()
    }

    /// Whether the engine ran out of memory at some point.
    pub fn resource_exhausted(&self) -> bool {
        self.resource_exhausted
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn commit_count(&self) -> u64 {
        self.counters.commits
    }

    pub fn empty_commit_count(&self) -> u64 {
        self.counters.empty_commits
    }

    fn decode(&mut self, code: i32) -> Result<Literal, SessionError> {
        let literal = Literal::from_dimacs(code)?;
        while self.engine.num_variables() <= literal.variable().index() {
            let _ = self.engine.new_variable();
        }
        Ok(literal)
    }

    /// Gives a learnt clause to the engine unless it was given before, in which case `None` is
    /// returned.
    fn add_learnt(&mut self, literals: Vec<Literal>) -> Result<Option<bool>, SessionError> {
        self.has_model = false;
        self.check_empty_commit(&literals)?;

        if !self.learnt_clause_filter.admit(&literals) {
            return Ok(None);
        }

        self.counters.learnt_commits += 1;
        let result = self.engine.add_learnt_clause(&literals);
        self.record_exhaustion(result).map(Some)
    }

    fn check_empty_commit(&mut self, literals: &[Literal]) -> Result<(), SessionError> {
        if !literals.is_empty() {
            return Ok(());
        }

        self.counters.empty_commits += 1;
        match self.empty_clause_policy {
            EmptyClausePolicy::Reject => Err(SessionError::EmptyClause),
            EmptyClausePolicy::AssertFalse => Ok(()),
        }
    }

    fn record_exhaustion(
        &mut self,
        result: Result<bool, ClauseDatabaseError>,
    ) -> Result<bool, SessionError> {
        result.map_err(|error| {
            self.resource_exhausted = true;
            SessionError::from(error)
        })
    }

    fn report_interrupt(&self) {
        warn!("*** INTERRUPTED ***");
        self.print_incremental_stats();
    }
}
