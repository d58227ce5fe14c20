//! A [`TerminationCondition`] is polled by the engine at every decision point. It indicates when
//! the engine should give up on the current `solve` call, even if no verdict has been reached.
//!
//! Besides the budgets ([`TimeBudget`], [`DecisionBudget`]), this module hosts the process-wide
//! [`CancellationController`], through which an asynchronous event (e.g. an OS signal) asks the
//! active solve to stop.

mod cancellation;
mod combinator;
mod decision_budget;
mod indefinite;
mod time_budget;

pub use cancellation::Activation;
pub use cancellation::CancellationController;
pub use cancellation::CancellationPoll;
pub use cancellation::CancellationState;
pub use cancellation::SolveGuard;
pub use combinator::Combinator;
pub use decision_budget::DecisionBudget;
pub use indefinite::Indefinite;
pub use time_budget::TimeBudget;

/// The central trait that defines a termination condition.
pub trait TerminationCondition {
    /// Returns `true` when the engine should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    /// Called by the engine after each branching decision.
    fn decision_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }

    fn decision_has_been_made(&mut self) {
        if let Some(t) = self {
            t.decision_has_been_made()
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }

    fn decision_has_been_made(&mut self) {
        (**self).decision_has_been_made()
    }
}
