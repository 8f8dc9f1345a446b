use crate::detect::modules;
use crate::detect::opengl::{self, GlVendor};
use crate::system::{Host, SystemOps};
use serde::Serialize;
use std::str::FromStr;

/// Rendering profile of a hybrid laptop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Integrated GPU only, discrete driver unloaded and blacklisted.
    Intel,
    /// Integrated GPU renders, discrete driver loaded for offload.
    Hybrid,
    /// Discrete GPU renders everything.
    Nvidia,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Intel, Profile::Hybrid, Profile::Nvidia];

    pub fn name(self) -> &'static str {
        match self {
            Profile::Intel => "intel",
            Profile::Hybrid => "hybrid",
            Profile::Nvidia => "nvidia",
        }
    }

    /// OpenGL vendor the display stack binds to under this profile.
    pub fn gl_vendor(self) -> GlVendor {
        match self {
            Profile::Intel | Profile::Hybrid => GlVendor::Intel,
            Profile::Nvidia => GlVendor::Nvidia,
        }
    }

    /// Derive the profile from the OpenGL vendor and whether the discrete
    /// core module is offloaded. Intel-vendor profiles differ only in the module.
    pub fn classify(vendor: GlVendor, offloaded: bool) -> Option<Profile> {
        match vendor {
            GlVendor::Nvidia => Some(Profile::Nvidia),
            GlVendor::Intel if offloaded => Some(Profile::Intel),
            GlVendor::Intel => Some(Profile::Hybrid),
            GlVendor::Unknown => None,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown profile '{}' (expected nvidia, hybrid or intel)", s))
    }
}

/// Live signals behind the current profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub vendor: GlVendor,
    pub offloaded: bool,
}

impl Observation {
    pub fn observe<O: SystemOps>(host: &mut Host<O>) -> Self {
        Self {
            vendor: opengl::probe_opengl_vendor(&mut host.ops),
            offloaded: modules::is_offloaded(&host.root),
        }
    }

    pub fn profile(&self) -> Option<Profile> {
        Profile::classify(self.vendor, self.offloaded)
    }
}

/// Current profile of the machine. Nothing persisted is trusted; `None` means unknown.
pub fn classify<O: SystemOps>(host: &mut Host<O>) -> Option<Profile> {
    Observation::observe(host).profile()
}

/// Display helper for an optional profile.
pub fn display_name(profile: Option<Profile>) -> &'static str {
    profile.map_or("unknown", Profile::name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::helper::Helper;
    use crate::sysfs::SysfsRoot;
    use crate::system::fake::FakeOps;

    #[test]
    fn test_classify_table() {
        assert_eq!(Profile::classify(GlVendor::Nvidia, false), Some(Profile::Nvidia));
        assert_eq!(Profile::classify(GlVendor::Nvidia, true), Some(Profile::Nvidia));
        assert_eq!(Profile::classify(GlVendor::Intel, true), Some(Profile::Intel));
        assert_eq!(Profile::classify(GlVendor::Intel, false), Some(Profile::Hybrid));
        assert_eq!(Profile::classify(GlVendor::Unknown, true), None);
        assert_eq!(Profile::classify(GlVendor::Unknown, false), None);
    }

    #[test]
    fn test_implied_vendor() {
        assert_eq!(Profile::Intel.gl_vendor(), GlVendor::Intel);
        assert_eq!(Profile::Hybrid.gl_vendor(), GlVendor::Intel);
        assert_eq!(Profile::Nvidia.gl_vendor(), GlVendor::Nvidia);
    }

    #[test]
    fn test_parse_profile() {
        assert_eq!("nvidia".parse::<Profile>(), Ok(Profile::Nvidia));
        assert_eq!("Hybrid".parse::<Profile>(), Ok(Profile::Hybrid));
        assert_eq!(" intel ".parse::<Profile>(), Ok(Profile::Intel));
        assert!("amd".parse::<Profile>().is_err());
        assert_eq!(display_name(None), "unknown");
        assert_eq!(display_name(Some(Profile::Hybrid)), "hybrid");
    }

    #[test]
    fn test_classify_live_hybrid() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("proc")).unwrap();
        std::fs::write(
            tmp.path().join("proc/modules"),
            "nvidia 56623104 0 - Live 0x0000000000000000\n",
        )
        .unwrap();
        let root = SysfsRoot::new(tmp.path());
        let ops = FakeOps::new(root.clone()).with_output("glxinfo", "OpenGL vendor string: Intel\n");
        let mut host = Host::new(root, ops, Helper::default());

        assert_eq!(classify(&mut host), Some(Profile::Hybrid));
        assert!(host.ops.calls.is_empty());
    }

    #[test]
    fn test_classify_without_display_is_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let root = SysfsRoot::new(tmp.path());
        let mut host = Host::new(root.clone(), FakeOps::new(root), Helper::default());

        assert_eq!(classify(&mut host), None);
    }
}
