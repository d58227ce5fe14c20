use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

/// A boolean variable, identified by its zero-based index.
///
/// Variables are only ever created by the engine; the index of the `n`-th created variable is
/// `n - 1`. In the signed-integer encoding used at the session boundary, the variable with index
/// `i` is referred to by `i + 1` (positive) or `-(i + 1)` (negated).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Variable {
    index: u32,
}

impl Variable {
    pub fn new(index: u32) -> Variable {
        Variable { index }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }

    /// The positive signed-integer code of this variable.
    pub fn to_dimacs(self) -> i32 {
        self.index as i32 + 1
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.to_dimacs())
    }
}
