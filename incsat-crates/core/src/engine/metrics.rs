use super::ClauseDatabaseError;
use super::EngineStatistics;

/// The counters which are sampled into metric series while the engine searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Restarts,
    Conflicts,
    Decisions,
    ConflictLiterals,
    BlockedRestarts,
    ReducedDatabase,
    Propagations,
}

impl Metric {
    pub const COUNT: usize = 7;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Restarts,
        Metric::Conflicts,
        Metric::Decisions,
        Metric::ConflictLiterals,
        Metric::BlockedRestarts,
        Metric::ReducedDatabase,
        Metric::Propagations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Restarts => "restarts",
            Metric::Conflicts => "conflicts",
            Metric::Decisions => "decisions",
            Metric::ConflictLiterals => "conflict_literals",
            Metric::BlockedRestarts => "blocked_restarts",
            Metric::ReducedDatabase => "reduced_database",
            Metric::Propagations => "propagations",
        }
    }

    fn read(self, statistics: &EngineStatistics) -> u64 {
        match self {
            Metric::Restarts => statistics.num_restarts,
            Metric::Conflicts => statistics.num_conflicts,
            Metric::Decisions => statistics.num_decisions,
            Metric::ConflictLiterals => statistics.num_conflict_literals,
            Metric::BlockedRestarts => statistics.num_blocked_restarts,
            Metric::ReducedDatabase => statistics.num_reduce_db,
            Metric::Propagations => statistics.num_propagations,
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

/// Samples of the cumulative [`Metric`] counters, taken every `interval` conflicts.
///
/// Samples are only appended, so a reader can remember [`MetricSamples::len`] and later read only
/// what was sampled since.
#[derive(Debug, Clone)]
pub struct MetricSamples {
    interval: u64,
    steps: Vec<u64>,
    values: Vec<[u64; Metric::COUNT]>,
}

impl MetricSamples {
    pub(crate) fn new(interval: u64) -> MetricSamples {
        MetricSamples {
            interval: interval.max(1),
            steps: vec![],
            values: vec![],
        }
    }

    /// Takes a sample if the conflict count is a multiple of the interval. Running out of memory
    /// is reported like any other allocation failure of the engine.
    pub(crate) fn on_conflict(
        &mut self,
        statistics: &EngineStatistics,
    ) -> Result<(), ClauseDatabaseError> {
        if statistics.num_conflicts % self.interval != 0 {
            return Ok(());
        }

        let mut sample = [0; Metric::COUNT];
        for metric in Metric::ALL {
            sample[metric.position()] = metric.read(statistics);
        }
        self.steps.try_reserve(1)?;
        self.values.try_reserve(1)?;
        self.steps.push(statistics.num_conflicts);
        self.values.push(sample);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The conflict index of every sample taken from sample `from` onwards.
    pub fn steps_since(&self, from: usize) -> &[u64] {
        self.steps.get(from..).unwrap_or(&[])
    }

    /// The value of `metric` in every sample taken from sample `from` onwards.
    pub fn values_since(&self, from: usize, metric: Metric) -> impl Iterator<Item = u64> + '_ {
        self.values
            .get(from..)
            .unwrap_or(&[])
            .iter()
            .map(move |sample| sample[metric.position()])
    }
}

impl Default for MetricSamples {
    fn default() -> Self {
        MetricSamples::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_taken_every_interval() {
        let mut samples = MetricSamples::new(2);
        let mut statistics = EngineStatistics::default();

        for conflict in 1..=5 {
            statistics.num_conflicts = conflict;
            statistics.num_decisions = conflict * 10;
            samples.on_conflict(&statistics).expect("enough memory");
        }

        assert_eq!(samples.steps_since(0), &[2, 4]);
        assert_eq!(
            samples
                .values_since(0, Metric::Decisions)
                .collect::<Vec<_>>(),
            vec![20, 40]
        );
        assert_eq!(samples.steps_since(1), &[4]);
        assert!(samples.steps_since(10).is_empty());
    }
}
