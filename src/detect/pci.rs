use crate::system::SystemOps;
use serde::Serialize;

/// PCI vendor ID of the discrete GPU.
pub const NVIDIA_VENDOR_ID: &str = "10de";

/// One PCI function of the discrete GPU (core, audio, USB controller, UCSI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PciFunction {
    pub address: String,
    pub description: String,
}

impl PciFunction {
    /// The GPU core itself is function 0; everything else is a sibling.
    pub fn is_primary(&self) -> bool {
        self.address.ends_with(".0")
    }

    /// sysfs directory of this function, relative to the filesystem root.
    pub fn sysfs_dir(&self) -> String {
        // lspci without -D omits the domain, sysfs never does
        if self.address.matches(':').count() >= 2 {
            format!("sys/bus/pci/devices/{}", self.address)
        } else {
            format!("sys/bus/pci/devices/0000:{}", self.address)
        }
    }
}

/// The discrete GPU's PCI functions, discovered once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    functions: Vec<PciFunction>,
}

impl Inventory {
    pub fn new(mut functions: Vec<PciFunction>) -> Self {
        functions.sort_by(|a, b| a.address.cmp(&b.address));
        Self { functions }
    }

    /// Run `lspci` filtered to the discrete vendor. `None` if lspci is unavailable.
    pub fn detect(ops: &mut impl SystemOps) -> Option<Self> {
        let filter = format!("{}:", NVIDIA_VENDOR_ID);
        let out = ops.output("lspci", &["-D", "-d", &filter])?;
        if !out.success {
            tracing::warn!("lspci exited with an error, treating the inventory as empty");
        }
        Some(Self::new(parse_lspci(&out.stdout)))
    }

    pub fn functions(&self) -> &[PciFunction] {
        &self.functions
    }

    pub fn primary(&self) -> Option<&PciFunction> {
        self.functions.iter().find(|f| f.is_primary())
    }

    /// Audio, USB and UCSI siblings of the GPU core.
    pub fn secondaries(&self) -> impl Iterator<Item = &PciFunction> {
        self.functions.iter().filter(|f| !f.is_primary())
    }
}

/// Parse lines like `0000:01:00.0 3D controller: NVIDIA Corporation TU117M`.
pub fn parse_lspci(output: &str) -> Vec<PciFunction> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (address, description) = line.split_once(char::is_whitespace)?;
            Some(PciFunction {
                address: address.to_string(),
                description: description.trim().to_string(),
            })
        })
        .collect()
}
