use crate::system::SystemOps;

pub const DEFAULT_BINARY: &str = "linux-driver-management";

/// What the GPU-management helper says about this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperStatus {
    /// The helper could not be started.
    Missing,
    /// Installed, but it reports no Optimus configuration.
    NoOptimus,
    Optimus,
}

/// The external driver-management helper. Treated as an opaque tool: we only
/// ask it for its status and tell it to configure the GPU.
#[derive(Debug, Clone)]
pub struct Helper {
    binary: String,
}

impl Default for Helper {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl Helper {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn status(&self, ops: &mut impl SystemOps) -> HelperStatus {
        match ops.output(&self.binary, &["status"]) {
            None => HelperStatus::Missing,
            Some(out) if out.stdout.to_lowercase().contains("optimus") => HelperStatus::Optimus,
            Some(_) => HelperStatus::NoOptimus,
        }
    }

    /// Apply the helper's vendor driver configuration.
    pub fn configure_gpu(&self, ops: &mut impl SystemOps) -> bool {
        ops.run(&self.binary, &["configure", "gpu"])
    }
}
