use std::fmt::Debug;

pub(crate) trait MovingAverage: Debug {
    fn add_term(&mut self, new_term: u64);

    /// The current average; by convention 0 when no terms have been added.
    fn value(&self) -> f64;

    /// Adapts the internal data structures to the given interval length. This only makes sense
    /// for averages over the `k` most recent terms.
    fn adapt(&mut self, interval_length: u64);
}
