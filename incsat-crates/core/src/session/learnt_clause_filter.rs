use fnv::FnvHashSet;

use crate::basic_types::Literal;

/// Remembers the externally derived clauses given to a session, so that the same clause is not
/// added twice. Clauses are compared as sets of literals.
#[derive(Debug, Default, Clone)]
pub struct LearntClauseFilter {
    seen: FnvHashSet<Vec<Literal>>,
}

impl LearntClauseFilter {
    /// Returns `true` if the clause was not seen before; it is then remembered.
    pub fn admit(&mut self, literals: &[Literal]) -> bool {
        let mut key = literals.to_vec();
        key.sort();
        key.dedup();
        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
