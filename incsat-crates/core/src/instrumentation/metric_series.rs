use serde::Serialize;

/// A named sequence of `(step, value)` pairs. The steps are the conflict indices at which the
/// metric was sampled.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetricSeries {
    name: String,
    steps: Vec<u64>,
    values: Vec<f64>,
}

impl MetricSeries {
    pub fn new(name: impl Into<String>) -> MetricSeries {
        MetricSeries {
            name: name.into(),
            steps: vec![],
            values: vec![],
        }
    }

    pub fn push(&mut self, step: u64, value: f64) {
        self.steps.push(step);
        self.values.push(value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The index domain; always as long as [`MetricSeries::values`].
    pub fn steps(&self) -> &[u64] {
        &self.steps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
