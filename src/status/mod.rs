use crate::detect::opengl::GlVendor;
use crate::detect::pci::Inventory;
use crate::power;
use crate::profile::{Observation, Profile};
use crate::system::{Host, SystemOps};
use serde::Serialize;

/// Current profile, OpenGL vendor and discrete GPU power state.
/// Each field is resolved on its own; one unknown never hides the others.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub profile: Option<Profile>,
    pub gl_vendor: GlVendor,
    pub power_state: String,
    pub primary_function: Option<String>,
}

impl StatusReport {
    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }
}

/// Build the status report. Read-only.
pub fn report<O: SystemOps>(host: &mut Host<O>, inventory: &Inventory) -> StatusReport {
    let observed = Observation::observe(host);

    StatusReport {
        profile: observed.profile(),
        gl_vendor: observed.vendor,
        power_state: power::runtime_status(&host.root, inventory),
        primary_function: inventory.primary().map(|f| f.address.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::helper::Helper;
    use crate::detect::pci::parse_lspci;
    use crate::sysfs::SysfsRoot;
    use crate::system::fake::FakeOps;
    use std::fs;

    #[test]
    fn test_report_nvidia() {
        let tmp = tempfile::tempdir().unwrap();
        let dev = tmp.path().join("sys/bus/pci/devices/0000:01:00.0/power");
        fs::create_dir_all(&dev).unwrap();
        fs::write(dev.join("runtime_status"), "active\n").unwrap();
        let root = SysfsRoot::new(tmp.path());
        let ops = FakeOps::new(root.clone())
            .with_output("glxinfo", "OpenGL vendor string: NVIDIA Corporation\n");
        let mut host = Host::new(root, ops, Helper::default());
        let inventory = Inventory::new(parse_lspci("0000:01:00.0 3D controller: NVIDIA\n"));

        let report = report(&mut host, &inventory);
        assert_eq!(report.profile, Some(Profile::Nvidia));
        assert_eq!(report.gl_vendor, GlVendor::Nvidia);
        assert_eq!(report.power_state, "active");
        assert_eq!(report.primary_function.as_deref(), Some("0000:01:00.0"));
        assert!(host.ops.calls.is_empty());
    }

    #[test]
    fn test_report_unknown_fields_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let root = SysfsRoot::new(tmp.path());
        let ops = FakeOps::new(root.clone()).with_output("glxinfo", "OpenGL vendor string: Intel\n");
        let mut host = Host::new(root, ops, Helper::default());
        let inventory = Inventory::new(parse_lspci("0000:01:00.1 Audio device: NVIDIA\n"));

        let report = report(&mut host, &inventory);
        assert_eq!(report.profile, Some(Profile::Intel));
        assert_eq!(report.power_state, "unknown");
        assert!(report.primary_function.is_none());
    }

    #[test]
    fn test_report_json_shape() {
        let report = StatusReport {
            profile: None,
            gl_vendor: GlVendor::Unknown,
            power_state: "unknown".to_string(),
            primary_function: None,
        };
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"profile\": null"));
        assert!(json.contains("\"gl_vendor\": \"unknown\""));
        assert!(!report.has_profile());
    }
}
