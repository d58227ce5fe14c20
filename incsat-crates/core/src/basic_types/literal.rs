use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Not;

use thiserror::Error;

use super::Variable;

/// A [`Variable`] together with a polarity.
///
/// Internally a literal is stored as `2 * index + is_negated`, which makes a literal and its
/// negation adjacent when literals are sorted, and gives every literal a dense index that can be
/// used for per-literal tables (e.g. watch lists).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    code: u32,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("0 is not a valid literal")]
    Zero,
    #[error("{0} is outside of the supported literal range")]
    OutOfRange(i32),
}

impl Literal {
    pub fn new(variable: Variable, is_positive: bool) -> Literal {
        Literal {
            code: (variable.index() as u32) * 2 + u32::from(!is_positive),
        }
    }

    /// Decode a caller-facing signed integer: the magnitude minus one is the variable index and
    /// the sign is the polarity.
    pub fn from_dimacs(code: i32) -> Result<Literal, LiteralError> {
        if code == 0 {
            return Err(LiteralError::Zero);
        }
        if code == i32::MIN {
            return Err(LiteralError::OutOfRange(code));
        }

        let variable = Variable::new(code.unsigned_abs() - 1);
        Ok(Literal::new(variable, code > 0))
    }

    pub fn to_dimacs(self) -> i32 {
        let code = self.variable().to_dimacs();
        if self.is_positive() {
            code
        } else {
            -code
        }
    }

    pub fn variable(self) -> Variable {
        Variable::new(self.code / 2)
    }

    pub fn is_positive(self) -> bool {
        self.code & 1 == 0
    }

    pub fn is_negative(self) -> bool {
        !self.is_positive()
    }

    /// A dense index, unique per literal.
    pub(crate) fn to_index(self) -> usize {
        self.code as usize
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.variable())
        } else {
            write!(f, "~{}", self.variable())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_codes_map_to_index_and_polarity() {
        let positive = Literal::from_dimacs(3).expect("valid literal");
        let negative = Literal::from_dimacs(-3).expect("valid literal");

        assert_eq!(positive.variable(), Variable::new(2));
        assert_eq!(negative.variable(), Variable::new(2));
        assert!(positive.is_positive());
        assert!(negative.is_negative());
        assert_eq!(!positive, negative);
        assert_eq!(negative.to_dimacs(), -3);
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(Literal::from_dimacs(0), Err(LiteralError::Zero));
    }

    #[test]
    fn minimum_integer_is_rejected() {
        assert_eq!(
            Literal::from_dimacs(i32::MIN),
            Err(LiteralError::OutOfRange(i32::MIN))
        );
    }

    #[test]
    fn complementary_literals_are_adjacent_when_sorted() {
        let mut literals = [-2, 1, 2, -1]
            .into_iter()
            .map(|code| Literal::from_dimacs(code).expect("valid literal"))
            .collect::<Vec<_>>();
        literals.sort();

        let codes = literals.iter().map(|l| l.to_dimacs()).collect::<Vec<_>>();
        assert_eq!(codes, vec![1, -1, 2, -2]);
    }
}
