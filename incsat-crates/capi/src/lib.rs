//! C bindings for [`Session`].
//!
//! A handle returned by [`incsat_init`] is an owned session; it is valid until it is passed to
//! [`incsat_release`]. Every other function accepts a null handle and then does nothing (or returns
//! the documented error value). A handle must not be used from two threads at the same time.
//!
//! Literals use the signed-integer encoding of the session: `v` is variable `v`, `-v` its
//! negation. Rejected operations (e.g. staging `0`) are logged and otherwise ignored.

use std::ffi::c_int;
use std::ffi::c_void;

use incsat_core::convert_case::Case;
use incsat_core::statistics::configure_statistic_logging;
use incsat_core::Session;
use incsat_core::SolveResult;
use log::warn;

/// Returned by [`incsat_solve`] when a model was found.
pub const INCSAT_SATISFIABLE: c_int = 0;
/// Returned by [`incsat_solve`] when the clauses, under the assumptions, have no model.
pub const INCSAT_UNSATISFIABLE: c_int = 1;
/// Returned by [`incsat_solve`] when the solve was interrupted or ran out of resources.
pub const INCSAT_INDETERMINATE: c_int = 2;

/// Recovers the session behind a handle.
///
/// # Safety
/// `handle` must be null or a handle returned by [`incsat_init`] which was not yet released, and
/// no other reference to the session may be live.
unsafe fn session<'a>(handle: *mut c_void) -> Option<&'a mut Session> {
    // SAFETY: by the contract of this function, a non-null handle points to a live session which
    // is not aliased.
    unsafe { handle.cast::<Session>().as_mut() }
}

/// Allocates a new session. Statistics printed by [`incsat_print_incremental_stats`] go to
/// stdout.
#[no_mangle]
pub extern "C" fn incsat_init() -> *mut c_void {
    let _ = configure_statistic_logging("c", Some(Case::Camel), None);
    Box::into_raw(Box::new(Session::default())).cast::<c_void>()
}

/// Releases a session.
///
/// # Safety
/// `handle` must be null or a handle returned by [`incsat_init`] which was not yet released. It
/// must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn incsat_release(handle: *mut c_void) {
    if handle.is_null() {
        return;
    }

    // SAFETY: the handle was created by `Box::into_raw` in `incsat_init` and is released once.
    drop(unsafe { Box::from_raw(handle.cast::<Session>()) });
}

/// Appends `literal` to the clause under construction. A rejected literal spoils the clause, so
/// that the next [`incsat_commit_clause`] fails and adds nothing.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_add_to_clause(handle: *mut c_void, literal: c_int) {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return;
    };

    if let Err(error) = session.stage_literal(literal) {
        warn!("Rejected clause literal {literal}: {error}");
    }
}

/// Discards the clause under construction.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_clean_clause(handle: *mut c_void) {
    // SAFETY: guaranteed by the caller.
    if let Some(session) = unsafe { session(handle) } {
        session.discard_clause();
    }
}

/// Commits the clause under construction. Returns `false` when the clauses are contradictory
/// afterwards, or when the commit was rejected (an empty clause, a rejected literal, or exhausted
/// memory).
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_commit_clause(handle: *mut c_void) -> bool {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return false;
    };

    session.commit_clause().unwrap_or_else(|error| {
        warn!("Clause was not committed: {error}");
        false
    })
}

/// Assumes `literal` for the next solve.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_assume(handle: *mut c_void, literal: c_int) {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return;
    };

    if let Err(error) = session.stage_assumption(literal) {
        warn!("Ignoring assumption: {error}");
    }
}

/// Solves under the staged assumptions, which are consumed. Returns [`INCSAT_SATISFIABLE`],
/// [`INCSAT_UNSATISFIABLE`] or [`INCSAT_INDETERMINATE`]; a null handle gives the latter.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_solve(handle: *mut c_void) -> c_int {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return INCSAT_INDETERMINATE;
    };

    match session.solve() {
        SolveResult::Satisfiable => INCSAT_SATISFIABLE,
        SolveResult::Unsatisfiable => INCSAT_UNSATISFIABLE,
        SolveResult::Indeterminate => INCSAT_INDETERMINATE,
    }
}

/// The value of the variable of `literal` in the last model: `1` for true, `0` for false, and `-1`
/// if there is no such value (no fresh model, or an unknown variable).
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_val(handle: *mut c_void, literal: c_int) -> c_int {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return -1;
    };

    match session.value_of(literal) {
        Ok(value) => c_int::from(value),
        Err(error) => {
            warn!("Value query rejected: {error}");
            -1
        }
    }
}

/// The number of decisions made over all solves.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_solver_nodes(handle: *mut c_void) -> u64 {
    // SAFETY: guaranteed by the caller.
    unsafe { session(handle) }.map_or(0, |session| session.decision_count())
}

/// The number of learnt clauses held by the engine.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_nb_learnt(handle: *mut c_void) -> u64 {
    // SAFETY: guaranteed by the caller.
    unsafe { session(handle) }.map_or(0, |session| session.learnt_clause_count())
}

/// Seeds the random decisions. Ignored, with a warning, after the first solve.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_set_random_seed(handle: *mut c_void, seed: f64) {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return;
    };

    if let Err(error) = session.set_random_seed(seed) {
        warn!("Ignoring random seed {seed}: {error}");
    }
}

/// Appends `literal` to the learnt clause under construction, see [`incsat_add_to_clause`].
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_add_to_learnt_clause(handle: *mut c_void, literal: c_int) {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return;
    };

    if let Err(error) = session.stage_learnt_literal(literal) {
        warn!("Rejected learnt clause literal {literal}: {error}");
    }
}

/// Discards the learnt clause under construction.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_clean_learnt_clause(handle: *mut c_void) {
    // SAFETY: guaranteed by the caller.
    if let Some(session) = unsafe { session(handle) } {
        session.discard_learnt_clause();
    }
}

/// Commits the learnt clause under construction, see [`incsat_commit_clause`].
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_commit_learnt_clause(handle: *mut c_void) -> bool {
    // SAFETY: guaranteed by the caller.
    let Some(session) = (unsafe { session(handle) }) else {
        return false;
    };

    session.commit_learnt_clause().unwrap_or_else(|error| {
        warn!("Learnt clause was not committed: {error}");
        false
    })
}

/// Prints the counters of the session as `c name=value` lines on stdout.
///
/// # Safety
/// `handle` must be null or a live handle returned by [`incsat_init`].
#[no_mangle]
pub unsafe extern "C" fn incsat_print_incremental_stats(handle: *mut c_void) {
    // SAFETY: guaranteed by the caller.
    if let Some(session) = unsafe { session(handle) } {
        session.print_incremental_stats();
    }
}
