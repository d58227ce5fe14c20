use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use super::assignments::Assignments;
use crate::basic_types::KeyValueHeap;
use crate::basic_types::Literal;
use crate::basic_types::Variable;

const MAX_ACTIVITY: f64 = 1e100;
const DEFAULT_SEED: u64 = 91648253;

/// Picks the next decision: the unassigned variable with the highest VSIDS activity, set to the
/// polarity it last had (phase saving). With a configurable probability a random unassigned
/// variable is picked instead.
#[derive(Debug)]
pub(crate) struct VariableSelector {
    heap: KeyValueHeap,
    /// How much the activity of a variable grows when it appears in a conflict. Grows after every
    /// conflict instead of decaying all activities.
    increment: f64,
    decay_factor: f64,
    saved_phases: Vec<bool>,
    random_decision_frequency: f64,
    rng: SmallRng,
}

impl VariableSelector {
    pub(crate) fn new(decay_factor: f64, random_decision_frequency: f64) -> VariableSelector {
        VariableSelector {
            heap: KeyValueHeap::default(),
            increment: 1.0,
            decay_factor,
            saved_phases: vec![],
            random_decision_frequency,
            rng: SmallRng::seed_from_u64(DEFAULT_SEED),
        }
    }

    pub(crate) fn grow(&mut self) {
        self.heap.grow(0.0);
        self.saved_phases.push(false);
        debug_assert_eq!(self.heap.len(), self.saved_phases.len());
    }

    pub(crate) fn set_seed(&mut self, seed: f64) {
        self.rng = SmallRng::seed_from_u64(seed.to_bits());
    }

    pub(crate) fn bump(&mut self, variable: Variable) {
        if self.heap.value(variable) + self.increment >= MAX_ACTIVITY {
            self.heap.divide_values(MAX_ACTIVITY);
            self.increment /= MAX_ACTIVITY;
        }
        self.heap.increment(variable, self.increment);
    }

    pub(crate) fn decay(&mut self) {
        self.increment /= self.decay_factor;
    }

    pub(crate) fn on_unassign(&mut self, literal: Literal) {
        let variable = literal.variable();
        self.saved_phases[variable.index()] = literal.is_positive();
        self.heap.restore_key(variable);
    }

    /// Returns the decision literal and whether it was picked at random, or `None` if every
    /// variable is assigned.
    pub(crate) fn next_decision(&mut self, assignments: &Assignments) -> Option<(Literal, bool)> {
        if self.random_decision_frequency > 0.0
            && assignments.num_variables() > 0
            && self.rng.gen::<f64>() < self.random_decision_frequency
        {
            let candidate = Variable::new(self.rng.gen_range(0..assignments.num_variables()) as u32);
            if assignments.is_unassigned(candidate) {
                return Some((self.with_saved_phase(candidate), true));
            }
        }

        loop {
            let candidate = self.heap.peek_max()?;
            if assignments.is_unassigned(candidate) {
                return Some((self.with_saved_phase(candidate), false));
            }
            let _ = self.heap.pop_max();
        }
    }

    /// Adds `score / max_score` to the activity of every hinted variable.
    pub(crate) fn apply_hint(&mut self, hint: &[(Variable, f64)]) {
        let max_score = hint
            .iter()
            .map(|&(_, score)| score)
            .fold(0.0_f64, f64::max);
        if max_score <= 0.0 {
            return;
        }

        let mut bonus = vec![0.0; self.saved_phases.len()];
        for &(variable, score) in hint {
            if let Some(entry) = bonus.get_mut(variable.index()) {
                *entry += score.max(0.0) / max_score * self.increment;
            }
        }

        self.heap
            .rebuild(|variable, activity| activity + bonus[variable.index()]);
    }

    fn with_saved_phase(&self, variable: Variable) -> Literal {
        Literal::new(variable, self.saved_phases[variable.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector_with(num_variables: usize) -> (VariableSelector, Assignments) {
        let mut selector = VariableSelector::new(0.95, 0.0);
        let mut assignments = Assignments::default();
        for _ in 0..num_variables {
            selector.grow();
            assignments.grow();
        }
        (selector, assignments)
    }

    #[test]
    fn most_active_unassigned_variable_is_picked() {
        let (mut selector, mut assignments) = selector_with(3);
        selector.bump(Variable::new(1));
        selector.bump(Variable::new(2));
        selector.bump(Variable::new(2));

        let (decision, random) = selector.next_decision(&assignments).expect("unassigned");
        assert_eq!(decision, Literal::new(Variable::new(2), false));
        assert!(!random);

        assignments.assign(decision, None);
        let (decision, _) = selector.next_decision(&assignments).expect("unassigned");
        assert_eq!(decision.variable(), Variable::new(1));
    }

    #[test]
    fn unassigned_literals_keep_their_phase() {
        let (mut selector, mut assignments) = selector_with(1);
        let literal = Literal::new(Variable::new(0), true);

        assignments.new_decision_level();
        assignments.assign(literal, None);
        assert_eq!(selector.next_decision(&assignments), None);

        assignments.backtrack(0, |literal| selector.on_unassign(literal));
        assert_eq!(selector.next_decision(&assignments), Some((literal, false)));
    }

    #[test]
    fn hints_order_untouched_variables() {
        let (mut selector, assignments) = selector_with(3);

        selector.apply_hint(&[(Variable::new(0), 1.0), (Variable::new(2), 4.0)]);

        let (decision, _) = selector.next_decision(&assignments).expect("unassigned");
        assert_eq!(decision.variable(), Variable::new(2));
    }
}
