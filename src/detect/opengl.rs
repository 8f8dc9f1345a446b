use crate::system::SystemOps;
use serde::Serialize;

/// Vendor of the OpenGL implementation the display stack is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlVendor {
    Intel,
    Nvidia,
    Unknown,
}

impl std::fmt::Display for GlVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlVendor::Intel => write!(f, "Intel"),
            GlVendor::Nvidia => write!(f, "NVIDIA"),
            GlVendor::Unknown => write!(f, "unknown"),
        }
    }
}

/// Ask the running display stack which OpenGL vendor it renders with.
pub fn probe_opengl_vendor(ops: &mut impl SystemOps) -> GlVendor {
    match ops.output("glxinfo", &[]) {
        Some(out) if out.success => parse_vendor(&out.stdout),
        _ => GlVendor::Unknown,
    }
}

/// Scan `glxinfo` output for a vendor name. Only the vendor string line is
/// considered when present, since extension lists can mention other vendors.
pub fn parse_vendor(output: &str) -> GlVendor {
    let text = output
        .lines()
        .find(|line| line.to_lowercase().contains("opengl vendor string"))
        .unwrap_or(output)
        .to_lowercase();

    if text.contains("nvidia") {
        GlVendor::Nvidia
    } else if text.contains("intel") {
        GlVendor::Intel
    } else {
        GlVendor::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_string_line() {
        let out = "name of display: :0\n\
                   OpenGL vendor string: Intel\n\
                   OpenGL renderer string: Mesa Intel(R) UHD Graphics 630 (CFL GT2)\n";
        assert_eq!(parse_vendor(out), GlVendor::Intel);

        let out = "OpenGL vendor string: NVIDIA Corporation\n\
                   OpenGL renderer string: NVIDIA GeForce GTX 1650/PCIe/SSE2\n";
        assert_eq!(parse_vendor(out), GlVendor::Nvidia);
    }

    #[test]
    fn test_vendor_line_wins_over_extensions() {
        let out = "GLX_NV_float_buffer, nvidia-ish extension\n\
                   OpenGL vendor string: Intel Open Source Technology Center\n";
        assert_eq!(parse_vendor(out), GlVendor::Intel);
    }

    #[test]
    fn test_whole_output_scanned_without_vendor_line() {
        assert_eq!(parse_vendor("renderer: NVIDIA GeForce"), GlVendor::Nvidia);
        assert_eq!(parse_vendor("Error: unable to open display"), GlVendor::Unknown);
        assert_eq!(parse_vendor(""), GlVendor::Unknown);
    }
}
