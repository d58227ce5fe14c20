use fnv::FnvHashSet;

use super::assignments::Assignments;
use super::clause_database::ClauseDatabase;
use super::clause_database::ClauseReference;
use super::variable_selector::VariableSelector;
use crate::basic_types::Literal;

/// The result of analysing a conflict.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LearntClause {
    /// The asserting literal is at position 0; if there are other literals, the one with the
    /// highest decision level is at position 1.
    pub(crate) literals: Vec<Literal>,
    pub(crate) backjump_level: usize,
    pub(crate) lbd: u32,
    pub(crate) num_literals_before_minimisation: usize,
}

/// Derives first unique implication point clauses from conflicts.
#[derive(Debug, Default)]
pub(crate) struct ConflictAnalyser {
    seen: Vec<bool>,
}

impl ConflictAnalyser {
    pub(crate) fn grow(&mut self) {
        self.seen.push(false);
    }

    /// Resolves the `conflict` clause with the reasons of the literals on the trail until only one
    /// literal of the current decision level remains. Every clause taking part is bumped, as is
    /// every variable.
    pub(crate) fn analyse(
        &mut self,
        conflict: ClauseReference,
        assignments: &Assignments,
        clause_database: &mut ClauseDatabase,
        variable_selector: &mut VariableSelector,
        minimise: bool,
    ) -> LearntClause {
        let current_level = assignments.decision_level();
        debug_assert!(current_level > 0, "root conflicts cannot be analysed");

        // Position 0 is reserved for the asserting literal.
        let mut learnt = vec![assignments.trail_entry(0)];
        let mut num_current_level_literals = 0;
        let mut trail_index = assignments.trail_len();
        let mut clause = conflict;
        let mut skip_first = false;

        let asserting_literal = loop {
            clause_database.bump_activity(clause);

            let literals = clause_database.literals(clause);
            let start = usize::from(skip_first);
            for &literal in &literals[start..] {
                let variable = literal.variable();
                if self.seen[variable.index()] || assignments.level(variable) == 0 {
                    continue;
                }

                self.seen[variable.index()] = true;
                variable_selector.bump(variable);
                if assignments.level(variable) >= current_level {
                    num_current_level_literals += 1;
                } else {
                    learnt.push(literal);
                }
            }

            let pivot = loop {
                trail_index -= 1;
                let candidate = assignments.trail_entry(trail_index);
                if self.seen[candidate.variable().index()] {
                    break candidate;
                }
            };
            self.seen[pivot.variable().index()] = false;
            num_current_level_literals -= 1;

            if num_current_level_literals == 0 {
                break pivot;
            }

            clause = assignments
                .reason(pivot.variable())
                .expect("only the decision of a level has no reason");
            skip_first = true;
        };
        learnt[0] = !asserting_literal;

        let num_literals_before_minimisation = learnt.len();
        let analysed = learnt.clone();
        if minimise {
            self.minimise(&mut learnt, assignments, clause_database);
        }
        for literal in analysed {
            self.seen[literal.variable().index()] = false;
        }

        let backjump_level = if learnt.len() == 1 {
            0
        } else {
            let (position, level) = learnt
                .iter()
                .enumerate()
                .skip(1)
                .map(|(position, literal)| (position, assignments.level(literal.variable())))
                .max_by_key(|&(_, level)| level)
                .expect("the clause has at least two literals");
            learnt.swap(1, position);
            level
        };

        let lbd = learnt
            .iter()
            .map(|literal| assignments.level(literal.variable()))
            .collect::<FnvHashSet<_>>()
            .len() as u32;

        LearntClause {
            literals: learnt,
            backjump_level,
            lbd,
            num_literals_before_minimisation,
        }
    }

    /// Removes literals whose reason only contains literals which are already in the clause (or
    /// are fixed at the root).
    fn minimise(
        &self,
        learnt: &mut Vec<Literal>,
        assignments: &Assignments,
        clause_database: &ClauseDatabase,
    ) {
        let mut kept = 1;
        for position in 1..learnt.len() {
            let literal = learnt[position];
            let is_redundant = assignments
                .reason(literal.variable())
                .is_some_and(|reason| {
                    clause_database.literals(reason)[1..].iter().all(|other| {
                        let variable = other.variable();
                        self.seen[variable.index()] || assignments.level(variable) == 0
                    })
                });

            if !is_redundant {
                learnt[kept] = literal;
                kept += 1;
            }
        }
        learnt.truncate(kept);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(code: i32) -> Literal {
        Literal::from_dimacs(code).expect("valid literal")
    }

    fn clause(codes: &[i32]) -> Vec<Literal> {
        codes.iter().map(|&code| literal(code)).collect()
    }

    #[test]
    fn first_unique_implication_point() {
        let mut assignments = Assignments::default();
        let mut selector = VariableSelector::new(0.95, 0.0);
        let mut analyser = ConflictAnalyser::default();
        for _ in 0..4 {
            assignments.grow();
            selector.grow();
            analyser.grow();
        }
        let mut database = ClauseDatabase::new(0.999);

        // Level 1 decides 1, level 2 decides 2 which implies 3 through (3 -2), after which
        // (-3 -1 4) implies 4 and (-4 -3) is in conflict.
        let reason_3 = database.add(clause(&[3, -2]), false, 0).expect("memory");
        let reason_4 = database.add(clause(&[4, -3, -1]), false, 0).expect("memory");
        let conflict = database.add(clause(&[-4, -3]), false, 0).expect("memory");

        assignments.new_decision_level();
        assignments.assign(literal(1), None);
        assignments.new_decision_level();
        assignments.assign(literal(2), None);
        assignments.assign(literal(3), Some(reason_3));
        assignments.assign(literal(4), Some(reason_4));

        let learnt = analyser.analyse(
            conflict,
            &assignments,
            &mut database,
            &mut selector,
            true,
        );

        assert_eq!(learnt.literals, clause(&[-3, -1]));
        assert_eq!(learnt.backjump_level, 1);
        assert_eq!(learnt.lbd, 2);
        assert!(analyser.seen.iter().all(|&seen| !seen));
    }
}
