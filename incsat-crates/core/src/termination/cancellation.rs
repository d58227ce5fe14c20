use std::sync::atomic::AtomicU8;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use super::TerminationCondition;

const CLEAR: u8 = 0;
const REQUESTED: u8 = 1;
const ESCALATED: u8 = 2;

static PROCESS_CONTROLLER: CancellationController = CancellationController::new();

/// The state of a [`CancellationController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancellationState {
    Clear,
    /// A stop has been requested; the active solve should return
    /// [`SolveResult::Indeterminate`](crate::SolveResult::Indeterminate) at its next decision
    /// point.
    Requested,
    /// The active solve did not respond to the request. The process is expected to terminate
    /// immediately; this state is never left.
    Escalated,
}

/// What a call to [`CancellationController::activate`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// The controller moved from [`CancellationState::Clear`] to
    /// [`CancellationState::Requested`].
    Requested,
    /// A stop was already requested and no solve is running, so there is nothing to escalate.
    AlreadyRequested,
    /// A second activation arrived while a solve was still running. The caller must terminate the
    /// process without running any cleanup (e.g. with `_exit`).
    Escalated,
}

/// A two-phase interrupt flag.
///
/// The first activation only sets a flag which every session polls at decision points
/// ([`CancellationPoll`]). A second activation while a solve is still active means the engine did
/// not respond, and is reported as [`Activation::Escalated`]. The controller itself never
/// terminates the process: the signal handler that observes the escalation does, since only it
/// knows which termination primitive is safe to call in its context.
///
/// All operations are lock-free atomics, which makes [`CancellationController::activate`] safe
/// to call from a signal handler. The engine is never touched from that path.
#[derive(Debug)]
pub struct CancellationController {
    state: AtomicU8,
    active_solves: AtomicUsize,
}

impl CancellationController {
    pub const fn new() -> CancellationController {
        CancellationController {
            state: AtomicU8::new(CLEAR),
            active_solves: AtomicUsize::new(0),
        }
    }

    /// The controller shared by the whole process.
    pub fn process() -> &'static CancellationController {
        &PROCESS_CONTROLLER
    }

    pub fn state(&self) -> CancellationState {
        match self.state.load(Ordering::SeqCst) {
            CLEAR => CancellationState::Clear,
            REQUESTED => CancellationState::Requested,
            _ => CancellationState::Escalated,
        }
    }

    pub fn is_requested(&self) -> bool {
        self.state.load(Ordering::SeqCst) != CLEAR
    }

    /// Register one external interrupt event.
    pub fn activate(&self) -> Activation {
        match self
            .state
            .compare_exchange(CLEAR, REQUESTED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => Activation::Requested,
            Err(ESCALATED) => Activation::Escalated,
            Err(_) => {
                if self.active_solves.load(Ordering::SeqCst) > 0 {
                    self.state.store(ESCALATED, Ordering::SeqCst);
                    Activation::Escalated
                } else {
                    Activation::AlreadyRequested
                }
            }
        }
    }

    /// Withdraw a pending request. An escalated controller stays escalated.
    pub fn reset(&self) {
        let _ = self
            .state
            .compare_exchange(REQUESTED, CLEAR, Ordering::SeqCst, Ordering::SeqCst);
    }

    pub fn active_solve_count(&self) -> usize {
        self.active_solves.load(Ordering::SeqCst)
    }

    /// Marks a solve as active for as long as the returned guard lives.
    pub fn enter_solve(&self) -> SolveGuard<'_> {
        let _ = self.active_solves.fetch_add(1, Ordering::SeqCst);
        SolveGuard { controller: self }
    }
}

impl Default for CancellationController {
    fn default() -> Self {
        CancellationController::new()
    }
}

/// Keeps a solve registered with a [`CancellationController`]; see
/// [`CancellationController::enter_solve`].
#[derive(Debug)]
pub struct SolveGuard<'a> {
    controller: &'a CancellationController,
}

impl Drop for SolveGuard<'_> {
    fn drop(&mut self) {
        let _ = self
            .controller
            .active_solves
            .fetch_sub(1, Ordering::SeqCst);
    }
}

/// A [`TerminationCondition`] which triggers once the controller has been activated.
#[derive(Clone, Copy, Debug)]
pub struct CancellationPoll<'a> {
    controller: &'a CancellationController,
}

impl<'a> CancellationPoll<'a> {
    pub fn new(controller: &'a CancellationController) -> Self {
        CancellationPoll { controller }
    }
}

impl TerminationCondition for CancellationPoll<'_> {
    fn should_stop(&mut self) -> bool {
        self.controller.is_requested()
    }
}
