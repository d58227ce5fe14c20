use crate::basic_types::SequenceGeneratorType;

/// The options of the [`CdclEngine`](super::CdclEngine).
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub restart_options: RestartOptions,
    pub learning_options: LearningOptions,
    /// The factor by which variable activities decay after every conflict.
    pub variable_decay: f64,
    /// The probability with which a decision picks a random variable instead of the most active
    /// one. The random generator is seeded through
    /// [`SatEngine::set_random_seed`](super::SatEngine::set_random_seed).
    pub random_decision_frequency: f64,
    /// Log a progress line every this many conflicts.
    pub progress_interval: Option<u64>,
    /// Record a metric sample every this many conflicts.
    pub metric_interval: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            restart_options: RestartOptions::default(),
            learning_options: LearningOptions::default(),
            variable_decay: 0.95,
            random_decision_frequency: 0.0,
            progress_interval: None,
            metric_interval: 1,
        }
    }
}

/// The options which are used by the engine to determine when a restart should occur.
///
/// The strategy follows Glucose: restart when the recent learnt clauses have a poor LBD compared
/// to the long-term average, and block a pending restart when the trail is much longer than it
/// was in the recent past (the search is then likely close to a model). The minimum number of
/// conflicts between restarts is taken from a [`SequenceGeneratorType`].
#[derive(Debug, Clone, Copy)]
pub struct RestartOptions {
    /// Decides the sequence based on which the restarts are performed.
    pub sequence_generator_type: SequenceGeneratorType,
    /// The base interval length is used as a multiplier to the restart sequence.
    pub base_interval: u64,
    /// The minimum number of conflicts to be reached before the first restart is considered.
    pub min_num_conflicts_before_first_restart: u64,
    /// A restart is forced when the short-term LBD average exceeds the long-term average
    /// multiplied by this coefficient.
    pub lbd_coef: f64,
    /// A restart is blocked when the number of assigned variables exceeds the recent average
    /// multiplied by this coefficient.
    pub num_assigned_coef: f64,
    /// The number of conflicts over which the recent number of assigned variables is averaged.
    pub num_assigned_window: u64,
    /// The coefficient of the geometric sequence; only used with
    /// [`SequenceGeneratorType::Geometric`].
    pub geometric_coef: Option<f64>,
    /// Never restart.
    pub no_restarts: bool,
}

impl Default for RestartOptions {
    fn default() -> Self {
        // The values are based on Glucose.
        Self {
            sequence_generator_type: SequenceGeneratorType::Constant,
            base_interval: 50,
            min_num_conflicts_before_first_restart: 10000,
            lbd_coef: 1.25,
            num_assigned_coef: 1.4,
            num_assigned_window: 5000,
            geometric_coef: None,
            no_restarts: false,
        }
    }
}

/// The options which govern the learnt clause database.
#[derive(Debug, Clone, Copy)]
pub struct LearningOptions {
    /// The number of conflicts before the first reduction of the learnt clause database.
    pub first_reduce_interval: u64,
    /// The amount by which the interval between two reductions grows.
    pub reduce_interval_increment: u64,
    /// Learnt clauses with an LBD at or below this value are never removed.
    pub protected_lbd: u32,
    /// The factor by which clause activities decay after every conflict.
    pub clause_decay: f64,
    /// Remove literals from learnt clauses which are implied by the other literals.
    pub minimise_learnt_clauses: bool,
}

impl Default for LearningOptions {
    fn default() -> Self {
        LearningOptions {
            first_reduce_interval: 2000,
            reduce_interval_increment: 300,
            protected_lbd: 2,
            clause_decay: 0.999,
            minimise_learnt_clauses: true,
        }
    }
}
