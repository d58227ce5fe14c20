use crate::basic_types::Literal;
use crate::engine::ClauseDatabaseError;

/// A handle to a clause stored in the [`ClauseDatabase`]. Handles of deleted clauses are reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ClauseReference(u32);

impl ClauseReference {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct StoredClause {
    /// For clauses of length two and more, the first two literals are watched; the literal a
    /// clause propagated is always at position 0.
    literals: Vec<Literal>,
    is_learnt: bool,
    is_deleted: bool,
    lbd: u32,
    activity: f64,
}

const MAX_ACTIVITY: f64 = 1e20;

#[derive(Debug)]
pub(crate) struct ClauseDatabase {
    clauses: Vec<StoredClause>,
    free_slots: Vec<ClauseReference>,
    permanent: Vec<ClauseReference>,
    learnt: Vec<ClauseReference>,
    activity_increment: f64,
    activity_decay: f64,
}

impl ClauseDatabase {
    pub(crate) fn new(activity_decay: f64) -> ClauseDatabase {
        ClauseDatabase {
            clauses: vec![],
            free_slots: vec![],
            permanent: vec![],
            learnt: vec![],
            activity_increment: 1.0,
            activity_decay,
        }
    }

    pub(crate) fn add(
        &mut self,
        literals: Vec<Literal>,
        is_learnt: bool,
        lbd: u32,
    ) -> Result<ClauseReference, ClauseDatabaseError> {
        debug_assert!(literals.len() >= 2, "units are not stored as clauses");

        if is_learnt {
            self.learnt.try_reserve(1)?;
        } else {
            self.permanent.try_reserve(1)?;
        }

        let stored = StoredClause {
            literals,
            is_learnt,
            is_deleted: false,
            lbd,
            activity: 0.0,
        };

        let reference = match self.free_slots.pop() {
            Some(reference) => {
                self.clauses[reference.index()] = stored;
                reference
            }
            None => {
                self.clauses.try_reserve(1)?;
                let reference = ClauseReference(self.clauses.len() as u32);
                self.clauses.push(stored);
                reference
            }
        };

        if is_learnt {
            self.learnt.push(reference);
        } else {
            self.permanent.push(reference);
        }

        Ok(reference)
    }

    pub(crate) fn literals(&self, reference: ClauseReference) -> &[Literal] {
        &self.clauses[reference.index()].literals
    }

    pub(crate) fn literals_mut(&mut self, reference: ClauseReference) -> &mut [Literal] {
        &mut self.clauses[reference.index()].literals
    }

    pub(crate) fn is_deleted(&self, reference: ClauseReference) -> bool {
        self.clauses[reference.index()].is_deleted
    }

    pub(crate) fn lbd(&self, reference: ClauseReference) -> u32 {
        self.clauses[reference.index()].lbd
    }

    pub(crate) fn activity(&self, reference: ClauseReference) -> f64 {
        self.clauses[reference.index()].activity
    }

    pub(crate) fn bump_activity(&mut self, reference: ClauseReference) {
        let clause = &mut self.clauses[reference.index()];
        if !clause.is_learnt {
            return;
        }

        clause.activity += self.activity_increment;
        if clause.activity > MAX_ACTIVITY {
            for &learnt in &self.learnt {
                self.clauses[learnt.index()].activity /= MAX_ACTIVITY;
            }
            self.activity_increment /= MAX_ACTIVITY;
        }
    }

    pub(crate) fn decay_activities(&mut self) {
        self.activity_increment /= self.activity_decay;
    }

    pub(crate) fn permanent_clauses(&self) -> &[ClauseReference] {
        &self.permanent
    }

    pub(crate) fn learnt_clauses(&self) -> &[ClauseReference] {
        &self.learnt
    }

    pub(crate) fn num_permanent(&self) -> usize {
        self.permanent.len()
    }

    pub(crate) fn num_learnt(&self) -> usize {
        self.learnt.len()
    }

    /// Marks the clause as deleted and releases its storage. Its watchers have to be removed by
    /// the caller before the handle is handed out again, i.e. before the next [`Self::add`].
    pub(crate) fn delete(&mut self, reference: ClauseReference) -> Vec<Literal> {
        let clause = &mut self.clauses[reference.index()];
        debug_assert!(!clause.is_deleted);

        clause.is_deleted = true;
        let literals = std::mem::take(&mut clause.literals);

        if clause.is_learnt {
            self.learnt.retain(|&other| other != reference);
        } else {
            self.permanent.retain(|&other| other != reference);
        }
        self.free_slots.push(reference);

        literals
    }

    /// Deletes every clause for which `should_delete` holds, returning the literals of the deleted
    /// clauses.
    pub(crate) fn delete_where(
        &mut self,
        mut should_delete: impl FnMut(ClauseReference, &[Literal]) -> bool,
    ) -> Vec<Vec<Literal>> {
        let mut deleted = vec![];

        for list in [&mut self.permanent, &mut self.learnt] {
            list.retain(|&reference| {
                let clause = &mut self.clauses[reference.index()];
                if should_delete(reference, &clause.literals) {
                    clause.is_deleted = true;
                    deleted.push(std::mem::take(&mut clause.literals));
                    self.free_slots.push(reference);
                    false
                } else {
                    true
                }
            });
        }

        deleted
    }

    /// Removes the literals for which `should_remove` holds from positions 2 and onwards of every
    /// clause, leaving the watched literals in place. Returns the references of the clauses which
    /// changed.
    pub(crate) fn strip_unwatched_literals(
        &mut self,
        mut should_remove: impl FnMut(Literal) -> bool,
    ) -> Vec<ClauseReference> {
        let mut changed = vec![];

        for &reference in self.permanent.iter().chain(self.learnt.iter()) {
            let literals = &mut self.clauses[reference.index()].literals;
            let original_len = literals.len();

            let mut position = 2;
            while position < literals.len() {
                if should_remove(literals[position]) {
                    let _ = literals.swap_remove(position);
                } else {
                    position += 1;
                }
            }

            if literals.len() != original_len {
                changed.push(reference);
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(codes: &[i32]) -> Vec<Literal> {
        codes
            .iter()
            .map(|&code| Literal::from_dimacs(code).expect("valid literal"))
            .collect()
    }

    #[test]
    fn deleted_slots_are_reused() {
        let mut database = ClauseDatabase::new(0.999);
        let first = database.add(clause(&[1, 2]), false, 0).expect("memory");
        let second = database.add(clause(&[-1, 3]), true, 3).expect("memory");

        assert_eq!(database.num_permanent(), 1);
        assert_eq!(database.num_learnt(), 1);

        let literals = database.delete(second);
        assert_eq!(literals, clause(&[-1, 3]));
        assert!(database.is_deleted(second));
        assert_eq!(database.num_learnt(), 0);

        let third = database.add(clause(&[2, 3]), false, 0).expect("memory");
        assert_eq!(third, second);
        assert_ne!(third, first);
        assert!(!database.is_deleted(third));
        assert_eq!(database.num_permanent(), 2);
    }

    #[test]
    fn only_learnt_clauses_gain_activity() {
        let mut database = ClauseDatabase::new(0.5);
        let permanent = database.add(clause(&[1, 2]), false, 0).expect("memory");
        let learnt = database.add(clause(&[1, 3]), true, 2).expect("memory");

        database.bump_activity(permanent);
        database.bump_activity(learnt);
        database.decay_activities();
        database.bump_activity(learnt);

        assert_eq!(database.activity(permanent), 0.0);
        assert_eq!(database.activity(learnt), 3.0);
    }

    #[test]
    fn stripping_keeps_watched_literals() {
        let mut database = ClauseDatabase::new(0.999);
        let reference = database
            .add(clause(&[1, 2, 3, 4]), false, 0)
            .expect("memory");

        let changed = database.strip_unwatched_literals(|literal| literal.to_dimacs() != 4);

        assert_eq!(changed, vec![reference]);
        assert_eq!(database.literals(reference), clause(&[1, 2, 4]).as_slice());
    }
}
