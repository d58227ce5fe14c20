use super::SequenceGenerator;

/// f(0) = a, f(i) = f(i-1) * m, where intermediate values are rounded down.
#[derive(Debug, Copy, Clone)]
pub(crate) struct GeometricSequence {
    current_value: i64,
    multiplication_factor: f64,
}

impl GeometricSequence {
    pub(crate) fn new(starting_value: i64, multiplication_factor: f64) -> GeometricSequence {
        GeometricSequence {
            current_value: starting_value,
            multiplication_factor,
        }
    }
}

impl SequenceGenerator for GeometricSequence {
    fn next(&mut self) -> i64 {
        let next_value = self.current_value;
        self.current_value = (self.current_value as f64 * self.multiplication_factor) as i64;
        next_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_rounded_down_per_step() {
        let mut sequence = GeometricSequence::new(100, 1.5);
        let values = (0..6).map(|_| sequence.next()).collect::<Vec<_>>();
        assert_eq!(values, vec![100, 150, 225, 337, 505, 757]);
    }
}
