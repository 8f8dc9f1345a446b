use crate::actions::ActionLog;
use crate::detect::modules::{self, CORE_MODULE};
use crate::detect::pci::Inventory;
use crate::persist;
use crate::power;
use crate::system::{Host, SystemOps};
use serde::Serialize;

/// One step of tearing down the discrete driver stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadStep {
    StopService(&'static str),
    RemoveModule(&'static str),
}

/// Users of the core module go first: the persistence daemon holds it open,
/// then the DRM front-end, unified memory and mode-setting layers.
pub const UNLOAD_SEQUENCE: [UnloadStep; 5] = [
    UnloadStep::StopService("nvidia-persistenced"),
    UnloadStep::RemoveModule("nvidia_drm"),
    UnloadStep::RemoveModule("nvidia_uvm"),
    UnloadStep::RemoveModule("nvidia_modeset"),
    UnloadStep::RemoveModule(CORE_MODULE),
];

impl UnloadStep {
    pub fn command(self) -> (&'static str, Vec<&'static str>) {
        match self {
            UnloadStep::StopService(service) => ("systemctl", vec!["stop", service]),
            UnloadStep::RemoveModule(module) => ("rmmod", vec![module]),
        }
    }

    pub fn name(self) -> String {
        let (program, args) = self.command();
        format!("{} {}", program, args.join(" "))
    }
}

/// Which way the reconciliation pushed the discrete driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverState {
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub driver: DriverState,
    pub actions: ActionLog,
}

/// Bring the live driver state in line with the persisted blacklist.
/// Idempotent; safe at boot or after a same-vendor profile change.
pub fn reconcile<O: SystemOps>(host: &mut Host<O>, inventory: &Inventory) -> Reconciliation {
    let mut actions = ActionLog::new();

    power::enable_runtime_pm(&host.root, inventory, &mut actions);

    let driver = if persist::blacklist_exists(&host.root) {
        actions.attempt(
            "clear helper settings",
            persist::clear_helper_settings(&host.root),
        );
        if !modules::is_offloaded(&host.root) {
            for step in UNLOAD_SEQUENCE {
                let (program, args) = step.command();
                let ok = host.ops.run(program, &args);
                actions.record(step.name(), ok);
            }
        }
        DriverState::Disabled
    } else {
        if modules::is_offloaded(&host.root) {
            let ok = host.ops.run("modprobe", &[CORE_MODULE]);
            actions.record(format!("modprobe {}", CORE_MODULE), ok);
        }
        DriverState::Enabled
    };

    Reconciliation { driver, actions }
}
