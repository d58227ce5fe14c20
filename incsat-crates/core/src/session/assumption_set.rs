use crate::basic_types::Literal;

/// Literals which hold for the next solve only, in the order in which they are decided.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssumptionSet {
    literals: Vec<Literal>,
}

impl AssumptionSet {
    pub fn push(&mut self, literal: Literal) {
        self.literals.push(literal);
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Consumes the assumptions, leaving the set empty.
    pub fn take(&mut self) -> Vec<Literal> {
        std::mem::take(&mut self.literals)
    }
}
