use super::clause_database::ClauseReference;
use crate::basic_types::Literal;
use crate::basic_types::Variable;

/// The partial assignment, together with the trail that produced it.
#[derive(Debug, Default, Clone)]
pub(crate) struct Assignments {
    values: Vec<Option<bool>>,
    levels: Vec<usize>,
    reasons: Vec<Option<ClauseReference>>,
    trail: Vec<Literal>,
    /// The trail length at the start of each decision level.
    trail_delimiters: Vec<usize>,
}

impl Assignments {
    pub(crate) fn grow(&mut self) {
        self.values.push(None);
        self.levels.push(0);
        self.reasons.push(None);
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn variable_value(&self, variable: Variable) -> Option<bool> {
        self.values[variable.index()]
    }

    pub(crate) fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.values[literal.variable().index()].map(|value| value == literal.is_positive())
    }

    pub(crate) fn is_literal_true(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(true)
    }

    pub(crate) fn is_literal_false(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(false)
    }

    pub(crate) fn is_unassigned(&self, variable: Variable) -> bool {
        self.values[variable.index()].is_none()
    }

    pub(crate) fn level(&self, variable: Variable) -> usize {
        self.levels[variable.index()]
    }

    pub(crate) fn reason(&self, variable: Variable) -> Option<ClauseReference> {
        self.reasons[variable.index()]
    }

    pub(crate) fn decision_level(&self) -> usize {
        self.trail_delimiters.len()
    }

    pub(crate) fn new_decision_level(&mut self) {
        self.trail_delimiters.push(self.trail.len());
    }

    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn trail_entry(&self, index: usize) -> Literal {
        self.trail[index]
    }

    pub(crate) fn trail(&self) -> &[Literal] {
        &self.trail
    }

    pub(crate) fn assign(&mut self, literal: Literal, reason: Option<ClauseReference>) {
        let index = literal.variable().index();
        debug_assert!(self.values[index].is_none(), "{literal:?} is already assigned");

        self.values[index] = Some(literal.is_positive());
        self.levels[index] = self.decision_level();
        self.reasons[index] = reason;
        self.trail.push(literal);
    }

    /// Undoes every assignment above `level`, reporting each unassigned literal to
    /// `on_unassign` (most recent first).
    pub(crate) fn backtrack(&mut self, level: usize, mut on_unassign: impl FnMut(Literal)) {
        if level >= self.decision_level() {
            return;
        }

        let new_len = self.trail_delimiters[level];
        while self.trail.len() > new_len {
            let literal = self.trail.pop().expect("trail is longer than the new length");
            let index = literal.variable().index();
            self.values[index] = None;
            self.reasons[index] = None;
            on_unassign(literal);
        }
        self.trail_delimiters.truncate(level);
    }

    /// Root assignments never need their reason again; dropping them allows the reason clauses
    /// to be removed from the database.
    pub(crate) fn forget_root_reasons(&mut self) {
        let root_len = self
            .trail_delimiters
            .first()
            .copied()
            .unwrap_or(self.trail.len());
        for literal in &self.trail[..root_len] {
            self.reasons[literal.variable().index()] = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(code: i32) -> Literal {
        Literal::from_dimacs(code).expect("valid literal")
    }

    #[test]
    fn backtracking_unassigns_above_level() {
        let mut assignments = Assignments::default();
        for _ in 0..3 {
            assignments.grow();
        }

        assignments.assign(literal(1), None);
        assignments.new_decision_level();
        assignments.assign(literal(-2), None);
        assignments.new_decision_level();
        assignments.assign(literal(3), None);

        let mut unassigned = vec![];
        assignments.backtrack(1, |literal| unassigned.push(literal));

        assert_eq!(unassigned, vec![literal(3)]);
        assert_eq!(assignments.decision_level(), 1);
        assert!(assignments.is_literal_false(literal(2)));
        assert!(assignments.is_literal_true(literal(1)));
        assert!(assignments.is_unassigned(Variable::new(2)));
        assert_eq!(assignments.level(Variable::new(1)), 1);
    }
}
