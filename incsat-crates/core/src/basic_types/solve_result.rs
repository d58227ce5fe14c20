use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

/// The verdict of one `solve` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SolveResult {
    Satisfiable,
    Unsatisfiable,
    /// The call was interrupted or ran into a resource bound before reaching a verdict.
    Indeterminate,
}

impl SolveResult {
    pub fn label(self) -> &'static str {
        match self {
            SolveResult::Satisfiable => "SATISFIABLE",
            SolveResult::Unsatisfiable => "UNSATISFIABLE",
            SolveResult::Indeterminate => "INDETERMINATE",
        }
    }
}

impl Display for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
