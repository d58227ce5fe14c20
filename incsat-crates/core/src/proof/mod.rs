//! Unsatisfiability certificates.

mod proof_log;

pub use proof_log::ProofLog;
