use crate::actions::ActionLog;
use crate::detect::pci::Inventory;
use crate::sysfs::SysfsRoot;

/// Put every discrete-GPU function under automatic runtime power management.
/// Functions without a `power/control` attribute are skipped silently.
pub fn enable_runtime_pm(root: &SysfsRoot, inventory: &Inventory, log: &mut ActionLog) {
    for function in inventory.functions() {
        let control = format!("{}/power/control", function.sysfs_dir());
        if !root.exists(&control) {
            tracing::debug!(address = %function.address, "no runtime PM control, skipping");
            continue;
        }
        log.attempt(
            format!("runtime PM auto for {}", function.address),
            root.write(&control, "auto"),
        );
    }
}

/// Runtime power state of the GPU core, e.g. `active` or `suspended`.
pub fn runtime_status(root: &SysfsRoot, inventory: &Inventory) -> String {
    inventory
        .primary()
        .and_then(|primary| {
            root.read_optional(format!("{}/power/runtime_status", primary.sysfs_dir()))
                .unwrap_or(None)
        })
        .filter(|status| !status.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
