use cpu_time::ProcessTime;

use super::MetricSeries;
use super::RunLog;
use super::RunRecord;
use super::SolvedInstance;
use crate::basic_types::SolveResult;
use crate::engine::Metric;
use crate::engine::SatEngine;
use crate::Session;

/// The state captured by [`InstrumentationRecorder::begin`].
#[derive(Debug)]
pub struct InstanceRun {
    instance_name: String,
    clauses_at_start: usize,
    longest_clause_before_solving: usize,
    first_metric_sample: usize,
    started_at: ProcessTime,
    alternate_mode: bool,
}

impl InstanceRun {
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn set_alternate_mode(&mut self, alternate_mode: bool) {
        self.alternate_mode = alternate_mode;
    }
}

/// Builds the [`RunLog`] of a batch, together with the summary of when each run completed.
#[derive(Debug)]
pub struct InstrumentationRecorder {
    run_log: RunLog,
    solved_instances: Vec<SolvedInstance>,
    created_at: ProcessTime,
}

impl Default for InstrumentationRecorder {
    fn default() -> Self {
        InstrumentationRecorder {
            run_log: RunLog::default(),
            solved_instances: vec![],
            created_at: ProcessTime::now(),
        }
    }
}

impl InstrumentationRecorder {
    /// Starts a run of `session` on the instance labelled `instance_name`.
    pub fn begin<Engine: SatEngine>(
        &self,
        session: &Session<Engine>,
        instance_name: impl Into<String>,
    ) -> InstanceRun {
        let engine = session.engine();

        InstanceRun {
            instance_name: instance_name.into(),
            clauses_at_start: engine.num_clauses(),
            longest_clause_before_solving: engine.longest_clause_length(),
            first_metric_sample: engine.metric_samples().len(),
            started_at: ProcessTime::now(),
            alternate_mode: false,
        }
    }

    /// Completes `run` and appends its record to the log.
    pub fn finish<Engine: SatEngine>(
        &mut self,
        run: InstanceRun,
        session: &Session<Engine>,
        result: SolveResult,
    ) -> &RunRecord {
        let engine = session.engine();
        let samples = engine.metric_samples();
        let steps = samples.steps_since(run.first_metric_sample);

        let metrics = Metric::ALL
            .into_iter()
            .map(|metric| {
                let mut series = MetricSeries::new(metric.name());
                for (&step, value) in steps
                    .iter()
                    .zip(samples.values_since(run.first_metric_sample, metric))
                {
                    series.push(step, value as f64);
                }
                series
            })
            .collect();

        self.run_log.push(RunRecord {
            instance_name: run.instance_name,
            clauses_at_start: run.clauses_at_start,
            clauses_at_end: engine.num_clauses(),
            num_variables: engine.num_variables(),
            longest_clause_before_solving: run.longest_clause_before_solving,
            longest_learnt_clause: engine.statistics().longest_learnt_clause,
            cpu_time_seconds: run.started_at.elapsed().as_secs_f64(),
            result,
            alternate_mode: run.alternate_mode,
            metrics,
        });
        self.solved_instances.push(SolvedInstance {
            index: self.run_log.len(),
            elapsed_seconds: self.created_at.elapsed().as_secs_f64(),
        });

        self.run_log
            .last()
            .expect("a record was pushed just before")
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    pub fn solved_instances(&self) -> &[SolvedInstance] {
        &self.solved_instances
    }

    pub fn into_parts(self) -> (RunLog, Vec<SolvedInstance>) {
        (self.run_log, self.solved_instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsatisfiable_session() -> Session {
        let mut session = Session::default();
        for clause in [[1, 2], [1, -2], [-1, 2], [-1, -2]] {
            for literal in clause {
                session.stage_literal(literal).expect("non-zero literal");
            }
            let _ = session.commit_clause().expect("accepted clause");
        }
        session
    }

    #[test]
    fn finishing_does_not_change_the_session() {
        let mut recorder = InstrumentationRecorder::default();
        let mut session = unsatisfiable_session();

        let run = recorder.begin(&session, "square");
        let result = session.solve();
        let counters = session.counters();
        let record = recorder.finish(run, &session, result).clone();

        assert_eq!(session.counters(), counters);
        assert_eq!(record.instance_name, "square");
        assert_eq!(record.result, SolveResult::Unsatisfiable);
        assert_eq!(record.clauses_at_start, 4);
        assert_eq!(record.num_variables, 2);
        assert_eq!(record.longest_clause_before_solving, 2);
        assert_eq!(record.metrics.len(), Metric::COUNT);
        assert!(record
            .metrics
            .iter()
            .all(|series| series.steps().len() == series.values().len()));
    }

    #[test]
    fn equal_names_give_separate_records() {
        let mut recorder = InstrumentationRecorder::default();

        for _ in 0..2 {
            let mut session = unsatisfiable_session();
            let mut run = recorder.begin(&session, "twice");
            run.set_alternate_mode(true);
            let result = session.solve();
            let _ = recorder.finish(run, &session, result);
        }

        let (run_log, solved) = recorder.into_parts();
        assert_eq!(run_log.len(), 2);
        assert!(run_log.records().iter().all(|record| record.alternate_mode));
        assert_eq!(
            solved.iter().map(|entry| entry.index).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(solved[0].elapsed_seconds <= solved[1].elapsed_seconds);
    }
}
