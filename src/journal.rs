use crate::reconcile::{DriverState, Reconciliation};
use crate::transition::{Transition, TransitionOutcome};

/// Priority and message for a profile change.
pub fn transition_entry(transition: &Transition) -> (&'static str, String) {
    match transition.outcome {
        TransitionOutcome::AlreadySet => (
            "debug",
            format!("{} profile already set, nothing to do", transition.to),
        ),
        TransitionOutcome::RebootRequired => (
            "notice",
            format!("{} profile configured, reboot required", transition.to),
        ),
        TransitionOutcome::Reconfigured => {
            ("info", format!("{} profile applied live", transition.to))
        }
    }
}

pub fn reconciliation_entry(result: &Reconciliation) -> (&'static str, String) {
    let failed = result.actions.failed().len();
    let state = match result.driver {
        DriverState::Disabled => "NVIDIA driver disabled",
        DriverState::Enabled => "NVIDIA driver enabled",
    };
    if failed == 0 {
        ("info", state.to_string())
    } else {
        ("warning", format!("{} ({} actions failed)", state, failed))
    }
}

/// Send a line to the systemd journal via `logger`. Failures are ignored.
pub fn log(priority: &str, message: &str) {
    let _ = std::process::Command::new("logger")
        .args(["-t", "primectl", "-p", &format!("user.{}", priority), message])
        .status();
}
