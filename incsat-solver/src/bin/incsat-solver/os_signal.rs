use incsat_core::termination::Activation;
use incsat_core::termination::CancellationController;

/// Routes SIGINT, SIGTERM and SIGXCPU to the process-wide [`CancellationController`].
///
/// While no solve is running there is nobody to ask, and a signal terminates the process
/// immediately. During a solve the first signal asks it to stop at its next decision point, and a
/// second signal before it did so terminates the process. Termination skips all cleanup.
pub(crate) fn install() -> std::io::Result<()> {
    // The signals to listen to for termination.
    const TERMINATION_SIGNALS: &[std::ffi::c_int] = &[
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
        #[cfg(unix)]
        signal_hook::consts::SIGXCPU,
    ];

    for &signal in TERMINATION_SIGNALS {
        // SAFETY: the handler only performs atomic operations on a static controller and calls
        // `_exit`, both of which are async-signal-safe.
        let _ = unsafe { signal_hook::low_level::register(signal, on_termination_signal) }?;
    }

    Ok(())
}

fn on_termination_signal() {
    let controller = CancellationController::process();
    let activation = controller.activate();

    if activation == Activation::Escalated || controller.active_solve_count() == 0 {
        signal_hook::low_level::exit(1);
    }
}
