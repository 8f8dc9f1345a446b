//! Files whose presence carries the chosen profile across reboots.
//!
//! Each artifact is either present with fixed content or absent. Writes
//! overwrite, removals tolerate an already-missing file.

use crate::error::Result;
use crate::sysfs::SysfsRoot;

pub const BLACKLIST_PATH: &str = "etc/modprobe.d/optimus-blacklist.conf";
pub const POWER_RULES_PATH: &str = "etc/udev/rules.d/80-pm-nvidia.rules";
pub const HELPER_CONFIG_PATH: &str = "etc/X11/xorg.conf.d/00-ldm.conf";
pub const HYBRID_MARKER_PATH: &str = "etc/X11/xorg.conf.d/00-ldm-hybrid.conf";

/// Modules kept from auto-loading under the intel profile.
pub const BLACKLISTED_MODULES: [&str; 4] =
    ["nvidia", "nvidia-drm", "nvidia-modeset", "nvidia-uvm"];

/// PCI classes of the GPU's sibling functions hidden by the power rules:
/// USB xHCI host controller, USB Type-C UCSI, HD audio.
const SIBLING_CLASSES: [(&str, &str); 3] = [
    ("USB xHCI Host Controller", "0x0c0330"),
    ("USB Type-C UCSI", "0x0c8000"),
    ("Audio", "0x040300"),
];

pub fn blacklist_content() -> String {
    let mut content = String::from("# Managed by primectl, do not edit\n");
    for module in BLACKLISTED_MODULES {
        content.push_str(&format!("blacklist {}\n", module));
    }
    content
}

pub fn power_rules_content() -> String {
    let mut content = String::from("# Managed by primectl, do not edit\n");
    for (label, class) in SIBLING_CLASSES {
        content.push_str(&format!(
            "\n# Remove NVIDIA {} devices, if present\n\
             ACTION==\"add\", SUBSYSTEM==\"pci\", ATTR{{vendor}}==\"0x10de\", ATTR{{class}}==\"{}\", ATTR{{remove}}=\"1\"\n",
            label, class
        ));
    }
    content
}

pub fn blacklist_exists(root: &SysfsRoot) -> bool {
    root.exists(BLACKLIST_PATH)
}

pub fn write_blacklist(root: &SysfsRoot) -> Result<()> {
    root.write_file(BLACKLIST_PATH, &blacklist_content())
}

pub fn remove_blacklist(root: &SysfsRoot) -> Result<()> {
    root.remove(BLACKLIST_PATH)
}

pub fn write_power_rules(root: &SysfsRoot) -> Result<()> {
    root.write_file(POWER_RULES_PATH, &power_rules_content())
}

pub fn remove_power_rules(root: &SysfsRoot) -> Result<()> {
    root.remove(POWER_RULES_PATH)
}

/// Delete the helper's own config and the hybrid marker. Both removals are
/// attempted; the first error is returned.
pub fn clear_helper_settings(root: &SysfsRoot) -> Result<()> {
    let config = root.remove(HELPER_CONFIG_PATH);
    let marker = root.remove(HYBRID_MARKER_PATH);
    config.and(marker)
}
