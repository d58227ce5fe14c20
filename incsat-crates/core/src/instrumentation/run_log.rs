use serde::Serialize;

use super::RunRecord;

/// The records of a batch, in the order in which the runs completed. Records are only appended.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunLog {
    records: Vec<RunRecord>,
}

impl RunLog {
    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&RunRecord> {
        self.records.last()
    }
}

/// One entry of the batch summary: the one-based position of a completed run, and the time since
/// the batch started at which it completed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SolvedInstance {
    pub index: usize,
    pub elapsed_seconds: f64,
}
