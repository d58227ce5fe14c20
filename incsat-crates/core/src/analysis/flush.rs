use log::debug;
use log::warn;

use super::AnalysisSink;
use super::SinkError;
use crate::instrumentation::RunLog;
use crate::instrumentation::SolvedInstance;

/// What happened while handing a run log to a sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Records for which both the record and the raw export were accepted.
    pub exported_runs: usize,
    pub failures: usize,
    /// The sink became unavailable and the remaining exports were skipped.
    pub abandoned: bool,
}

impl FlushReport {
    /// Returns whether the flush should continue.
    fn record(&mut self, result: Result<(), SinkError>) -> bool {
        match result {
            Ok(()) => true,
            Err(error @ SinkError::CollaboratorUnavailable { .. }) => {
                warn!("{error}; skipping the remaining exports");
                self.failures += 1;
                self.abandoned = true;
                false
            }
            Err(error) => {
                warn!("{error}");
                self.failures += 1;
                true
            }
        }
    }
}

/// Exports every record of `run_log`, followed by the batch summary.
///
/// Failures are logged and counted rather than returned: the run log is only read, so it stays
/// complete whatever the sink does. Once the sink reports
/// [`SinkError::CollaboratorUnavailable`], no further calls are made to it.
pub fn flush_run_log(
    run_log: &RunLog,
    solved_instances: &[SolvedInstance],
    sink: Option<&mut dyn AnalysisSink>,
) -> FlushReport {
    let mut report = FlushReport::default();
    let Some(sink) = sink else {
        debug!(
            "No analysis sink is configured; {} records are not exported",
            run_log.len()
        );
        return report;
    };

    for record in run_log.records() {
        let run_exported = sink.export_run(record);
        let run_ok = run_exported.is_ok();
        if !report.record(run_exported) {
            return report;
        }

        let raw_exported = sink.export_raw(&record.instance_name, record.alternate_mode);
        let raw_ok = raw_exported.is_ok();
        if !report.record(raw_exported) {
            return report;
        }

        if run_ok && raw_ok {
            report.exported_runs += 1;
        }
    }

    if report.record(sink.export_summary(solved_instances)) {
        let _ = report.record(sink.flush());
    }

    report
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;
    use crate::instrumentation::RunRecord;
    use crate::SolveResult;

    #[derive(Default)]
    struct ScriptedSink {
        calls: Vec<String>,
        unavailable_after: Option<usize>,
    }

    impl ScriptedSink {
        fn call(&mut self, name: String) -> Result<(), SinkError> {
            if self
                .unavailable_after
                .is_some_and(|limit| self.calls.len() >= limit)
            {
                return Err(SinkError::CollaboratorUnavailable {
                    target: "scripted".to_owned(),
                    source: std::io::Error::from(ErrorKind::NotFound),
                });
            }
            self.calls.push(name);
            Ok(())
        }
    }

    impl AnalysisSink for ScriptedSink {
        fn export_run(&mut self, record: &RunRecord) -> Result<(), SinkError> {
            self.call(format!("run {}", record.instance_name))
        }

        fn export_raw(&mut self, instance_name: &str, _: bool) -> Result<(), SinkError> {
            self.call(format!("raw {instance_name}"))
        }

        fn export_summary(&mut self, solved: &[SolvedInstance]) -> Result<(), SinkError> {
            self.call(format!("summary {}", solved.len()))
        }
    }

    fn run_log(names: &[&str]) -> RunLog {
        let mut run_log = RunLog::default();
        for name in names {
            run_log.push(RunRecord {
                instance_name: (*name).to_owned(),
                clauses_at_start: 0,
                clauses_at_end: 0,
                num_variables: 0,
                longest_clause_before_solving: 0,
                longest_learnt_clause: 0,
                cpu_time_seconds: 0.0,
                result: SolveResult::Satisfiable,
                alternate_mode: false,
                metrics: vec![],
            });
        }
        run_log
    }

    #[test]
    fn records_are_exported_in_order() {
        let run_log = run_log(&["a", "b"]);
        let mut sink = ScriptedSink::default();

        let report = flush_run_log(&run_log, &[], Some(&mut sink));

        assert_eq!(report.exported_runs, 2);
        assert_eq!(report.failures, 0);
        assert_eq!(
            sink.calls,
            vec!["run a", "raw a", "run b", "raw b", "summary 0"]
        );
    }

    #[test]
    fn unavailable_sink_stops_the_flush() {
        let run_log = run_log(&["a", "b"]);
        let mut sink = ScriptedSink {
            unavailable_after: Some(1),
            ..ScriptedSink::default()
        };

        let report = flush_run_log(&run_log, &[], Some(&mut sink));

        assert!(report.abandoned);
        assert_eq!(report.failures, 1);
        assert_eq!(report.exported_runs, 0);
        assert_eq!(sink.calls, vec!["run a"]);
        assert_eq!(run_log.len(), 2);
    }

    #[test]
    fn missing_sink_is_not_a_failure() {
        let report = flush_run_log(&run_log(&["a"]), &[], None);

        assert_eq!(report, FlushReport::default());
    }
}
