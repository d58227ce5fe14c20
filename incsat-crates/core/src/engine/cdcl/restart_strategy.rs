use crate::basic_types::moving_averages::CumulativeMovingAverage;
use crate::basic_types::moving_averages::MovingAverage;
use crate::basic_types::moving_averages::WindowedMovingAverage;
use crate::basic_types::sequence_generators::ConstantSequence;
use crate::basic_types::sequence_generators::GeometricSequence;
use crate::basic_types::sequence_generators::LubySequence;
use crate::basic_types::sequence_generators::SequenceGenerator;
use crate::basic_types::SequenceGeneratorType;
use crate::engine::RestartOptions;

/// Decides when the engine restarts, following the Glucose scheme described on
/// [`RestartOptions`].
#[derive(Debug)]
pub(crate) struct RestartStrategy {
    /// Generates the minimum number of conflicts between two restarts.
    sequence_generator: Box<dyn SequenceGenerator + Send>,
    number_of_conflicts_encountered_since_restart: u64,
    /// The minimum number of conflicts until the next restart is able to take place; reaching it
    /// does not guarantee a restart.
    number_of_conflicts_until_restart: u64,
    minimum_number_of_conflicts_before_first_restart: u64,
    lbd_short_term_moving_average: WindowedMovingAverage,
    lbd_coefficient: f64,
    lbd_long_term_moving_average: CumulativeMovingAverage,
    number_of_variables_coefficient: f64,
    number_of_assigned_variables_moving_average: WindowedMovingAverage,
    number_of_restarts: u64,
    no_restarts: bool,
}

impl RestartStrategy {
    pub(crate) fn new(options: RestartOptions) -> Self {
        let base_interval = options.base_interval.max(1) as i64;
        let mut sequence_generator: Box<dyn SequenceGenerator + Send> =
            match options.sequence_generator_type {
                SequenceGeneratorType::Constant => Box::new(ConstantSequence::new(base_interval)),
                SequenceGeneratorType::Geometric => Box::new(GeometricSequence::new(
                    base_interval,
                    options.geometric_coef.unwrap_or(1.5),
                )),
                SequenceGeneratorType::Luby => Box::new(LubySequence::new(base_interval)),
            };

        let number_of_conflicts_until_restart = next_interval(sequence_generator.as_mut());

        RestartStrategy {
            sequence_generator,
            number_of_conflicts_encountered_since_restart: 0,
            number_of_conflicts_until_restart,
            minimum_number_of_conflicts_before_first_restart: options
                .min_num_conflicts_before_first_restart,
            lbd_short_term_moving_average: WindowedMovingAverage::new(base_interval as u64),
            lbd_coefficient: options.lbd_coef,
            lbd_long_term_moving_average: CumulativeMovingAverage::default(),
            number_of_variables_coefficient: options.num_assigned_coef,
            number_of_assigned_variables_moving_average: WindowedMovingAverage::new(
                options.num_assigned_window.max(1),
            ),
            number_of_restarts: 0,
            no_restarts: options.no_restarts,
        }
    }

    /// A restart takes place when
    /// - the minimum number of conflicts before the first restart has passed,
    /// - the number of conflicts given by the sequence has passed since the last restart, and
    /// - the short-term LBD average is at least the long-term average times the LBD coefficient.
    pub(crate) fn should_restart(&self) -> bool {
        if self.no_restarts || self.should_restart_first_time() {
            return false;
        }

        if !self.should_trigger_later_restart() {
            return false;
        }

        self.lbd_long_term_moving_average.value() * self.lbd_coefficient
            <= self.lbd_short_term_moving_average.value()
    }

    fn should_restart_first_time(&self) -> bool {
        self.number_of_restarts == 0
            && self.number_of_conflicts_encountered_since_restart
                < self.minimum_number_of_conflicts_before_first_restart
    }

    /// Records a conflict. Returns `true` if a pending restart was blocked because the trail was
    /// much longer than in the recent past.
    pub(crate) fn notify_conflict(&mut self, lbd: u32, trail_length: u64) -> bool {
        self.number_of_assigned_variables_moving_average
            .add_term(trail_length);
        self.lbd_short_term_moving_average.add_term(lbd as u64);
        self.lbd_long_term_moving_average.add_term(lbd as u64);

        self.number_of_conflicts_encountered_since_restart += 1;

        if self.should_block_restart(trail_length) {
            self.reset_values();
            true
        } else {
            false
        }
    }

    fn should_block_restart(&self, trail_length: u64) -> bool {
        if self.no_restarts || self.should_restart_first_time() {
            return false;
        }

        let close_to_solution = trail_length as f64
            > self.number_of_assigned_variables_moving_average.value()
                * self.number_of_variables_coefficient;

        self.should_trigger_later_restart() && close_to_solution
    }

    fn should_trigger_later_restart(&self) -> bool {
        self.number_of_conflicts_until_restart <= self.number_of_conflicts_encountered_since_restart
    }

    pub(crate) fn notify_restart(&mut self) {
        self.number_of_restarts += 1;
        self.reset_values()
    }

    fn reset_values(&mut self) {
        self.number_of_conflicts_until_restart = next_interval(self.sequence_generator.as_mut());
        self.number_of_conflicts_encountered_since_restart = 0;
        self.lbd_short_term_moving_average
            .adapt(self.number_of_conflicts_until_restart);
    }
}

fn next_interval(sequence_generator: &mut (dyn SequenceGenerator + Send)) -> u64 {
    sequence_generator.next().max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eager_options() -> RestartOptions {
        RestartOptions {
            base_interval: 2,
            min_num_conflicts_before_first_restart: 0,
            lbd_coef: 1.0,
            num_assigned_coef: 100.0,
            ..RestartOptions::default()
        }
    }

    #[test]
    fn no_restart_before_the_first_threshold() {
        let mut strategy = RestartStrategy::new(RestartOptions {
            min_num_conflicts_before_first_restart: 10,
            ..eager_options()
        });

        for _ in 0..9 {
            let _ = strategy.notify_conflict(5, 10);
        }
        assert!(!strategy.should_restart());

        let _ = strategy.notify_conflict(5, 10);
        assert!(strategy.should_restart());
    }

    #[test]
    fn worsening_lbd_triggers_a_restart() {
        let mut strategy = RestartStrategy::new(eager_options());

        let _ = strategy.notify_conflict(2, 10);
        let _ = strategy.notify_conflict(8, 10);
        assert!(strategy.should_restart());

        strategy.notify_restart();
        assert!(!strategy.should_restart());
    }

    #[test]
    fn long_trail_blocks_the_restart() {
        let mut strategy = RestartStrategy::new(RestartOptions {
            num_assigned_coef: 1.2,
            ..eager_options()
        });

        assert!(!strategy.notify_conflict(4, 10));
        assert!(strategy.notify_conflict(4, 100));
        assert!(!strategy.should_restart());
    }

    #[test]
    fn disabled_restarts_never_trigger() {
        let mut strategy = RestartStrategy::new(RestartOptions {
            no_restarts: true,
            ..eager_options()
        });

        for lbd in 1..100 {
            assert!(!strategy.notify_conflict(lbd, 10));
        }
        assert!(!strategy.should_restart());
    }
}
