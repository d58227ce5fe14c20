use super::VariableOrdering;
use crate::basic_types::Literal;
use crate::basic_types::Variable;

/// Prefers variables which occur in many short clauses: the score of a variable is the number of
/// clauses it occurs in, divided by the average length of those clauses.
#[derive(Clone, Copy, Debug, Default)]
pub struct OccurrenceOrdering;

impl OccurrenceOrdering {
    pub const NAME: &'static str = "occurrence";
}

impl VariableOrdering for OccurrenceOrdering {
    fn name(&self) -> &'static str {
        OccurrenceOrdering::NAME
    }

    fn compute_hint(&self, clauses: &[Vec<Literal>], num_variables: usize) -> Vec<(Variable, f64)> {
        let mut occurrences = vec![0_u64; num_variables];
        let mut total_length = vec![0_u64; num_variables];

        for clause in clauses {
            for literal in clause {
                let index = literal.variable().index();
                if index < num_variables {
                    occurrences[index] += 1;
                    total_length[index] += clause.len() as u64;
                }
            }
        }

        occurrences
            .iter()
            .zip(&total_length)
            .enumerate()
            .filter(|(_, (&count, _))| count > 0)
            .map(|(index, (&count, &length))| {
                let average_length = length as f64 / count as f64;
                (Variable::new(index as u32), count as f64 / average_length)
            })
            .collect()
    }
}
