use crate::error::Result;
use serde::Serialize;

/// One best-effort side effect and whether it worked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub name: String,
    pub succeeded: bool,
}

/// Ordered record of best-effort actions. Failures are logged and kept here
/// instead of being propagated; callers may ignore the returned `bool`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fallible filesystem action.
    pub fn attempt(&mut self, name: impl Into<String>, result: Result<()>) -> bool {
        let name = name.into();
        match result {
            Ok(()) => self.record(name, true),
            Err(e) => {
                tracing::info!(action = %name, error = %e, "best-effort action failed");
                self.push(name, false)
            }
        }
    }

    /// Record an action whose outcome is already a success flag (external commands).
    pub fn record(&mut self, name: impl Into<String>, succeeded: bool) -> bool {
        let name = name.into();
        if succeeded {
            tracing::debug!(action = %name, "done");
        } else {
            tracing::info!(action = %name, "best-effort action failed");
        }
        self.push(name, succeeded)
    }

    fn push(&mut self, name: String, succeeded: bool) -> bool {
        self.records.push(ActionRecord { name, succeeded });
        succeeded
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    /// Names of every attempted action, in order.
    pub fn attempted(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| !r.succeeded)
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extend(&mut self, other: ActionLog) {
        self.records.extend(other.records);
    }
}
