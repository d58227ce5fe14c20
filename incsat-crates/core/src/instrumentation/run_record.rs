use serde::Serialize;

use super::MetricSeries;
use crate::basic_types::SolveResult;

/// The summary of solving one named instance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunRecord {
    /// A label; several records may carry the same name.
    pub instance_name: String,
    pub clauses_at_start: usize,
    pub clauses_at_end: usize,
    pub num_variables: usize,
    pub longest_clause_before_solving: usize,
    pub longest_learnt_clause: usize,
    /// The CPU time the process spent between the start and the end of the run.
    pub cpu_time_seconds: f64,
    pub result: SolveResult,
    /// Whether the run used an externally computed variable ordering.
    pub alternate_mode: bool,
    pub metrics: Vec<MetricSeries>,
}
