use crate::basic_types::Literal;

/// The literals of a clause under construction.
///
/// The buffer is either empty or accumulating; taking its contents always leaves it empty. Once a
/// literal was rejected, the clause under construction is no longer the clause the caller meant,
/// and the buffer refuses to hand out its contents until it is emptied.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClauseBuffer {
    literals: Vec<Literal>,
    rejected: bool,
}

impl ClauseBuffer {
    pub fn push(&mut self, literal: Literal) {
        self.literals.push(literal);
    }

    /// Records that a literal meant for this clause could not be staged.
    pub fn reject(&mut self) {
        self.rejected = true;
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
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

    pub fn clear(&mut self) {
        self.literals.clear();
        self.rejected = false;
    }

    /// Moves the staged literals out of the buffer, or `None` if a literal was rejected since the
    /// buffer was last emptied. The buffer is empty afterwards in both cases.
    pub fn take(&mut self) -> Option<Vec<Literal>> {
        let literals = std::mem::take(&mut self.literals);
        if std::mem::take(&mut self.rejected) {
            None
        } else {
            Some(literals)
        }
    }
}
