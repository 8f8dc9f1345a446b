use crate::sysfs::SysfsRoot;
use crate::system::SystemOps;

/// Proprietary NVIDIA core module. Its presence in the module table is the
/// offload signal.
pub const CORE_MODULE: &str = "nvidia";

/// Open-source driver that conflicts with the proprietary one.
pub const OPEN_MODULE: &str = "nouveau";

/// Whether `module` is currently loaded, according to `/proc/modules`.
/// Dashes and underscores are interchangeable in module names.
pub fn is_loaded(root: &SysfsRoot, module: &str) -> bool {
    let wanted = normalize(module);
    root.read_optional("proc/modules")
        .unwrap_or(None)
        .is_some_and(|table| {
            table
                .lines()
                .filter_map(|line| line.split_whitespace().next())
                .any(|name| normalize(name) == wanted)
        })
}

/// Whether the kernel knows about `module` at all (installed for the running kernel).
pub fn is_known(ops: &mut impl SystemOps, module: &str) -> bool {
    ops.run("modinfo", &[module])
}

/// The core module is "offloaded" when it is not loaded.
pub fn is_offloaded(root: &SysfsRoot) -> bool {
    !is_loaded(root, CORE_MODULE)
}

fn normalize(name: &str) -> String {
    name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MODULES: &str = "\
nvidia_drm 77824 2 - Live 0x0000000000000000
nvidia_modeset 1245184 3 nvidia_drm, Live 0x0000000000000000
nvidia 56623104 104 nvidia_modeset, Live 0x0000000000000000
i915 3870720 41 - Live 0x0000000000000000
";

    #[test]
    fn test_loaded_matches_whole_name() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("proc")).unwrap();
        fs::write(tmp.path().join("proc/modules"), MODULES).unwrap();
        let root = SysfsRoot::new(tmp.path());

        assert!(is_loaded(&root, "nvidia"));
        assert!(is_loaded(&root, "nvidia-drm"));
        assert!(!is_loaded(&root, "nvidia_uvm"));
        assert!(!is_loaded(&root, "nouveau"));
        assert!(!is_offloaded(&root));
    }

    #[test]
    fn test_missing_module_table_means_offloaded() {
        let tmp = tempfile::tempdir().unwrap();
        let root = SysfsRoot::new(tmp.path());

        assert!(!is_loaded(&root, CORE_MODULE));
        assert!(is_offloaded(&root));
    }
}
