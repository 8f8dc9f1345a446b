pub mod helper;
pub mod modules;
pub mod opengl;
pub mod pci;

use crate::error::{Error, Result};
use crate::system::{Host, SystemOps};
use helper::HelperStatus;
use pci::Inventory;

/// Everything the tool needs to know before it is allowed to touch the system.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub helper: HelperStatus,
    pub open_driver_loaded: bool,
    pub proprietary_installed: bool,
    /// `None` when `lspci` could not be run.
    pub inventory: Option<Inventory>,
}

impl Capabilities {
    pub fn detect<O: SystemOps>(host: &mut Host<O>) -> Self {
        let helper = host.helper.status(&mut host.ops);
        let open_driver_loaded = modules::is_loaded(&host.root, modules::OPEN_MODULE);
        let proprietary_installed = modules::is_known(&mut host.ops, modules::CORE_MODULE);
        let inventory = Inventory::detect(&mut host.ops);

        Self {
            helper,
            open_driver_loaded,
            proprietary_installed,
            inventory,
        }
    }

    /// Refuse unsupported environments, in a fixed order so the first cause
    /// reported is the most fundamental one. Yields the PCI inventory.
    pub fn check(self) -> Result<Inventory> {
        match self.helper {
            HelperStatus::Missing => {
                return Err(Error::Unsupported(
                    "the GPU management helper (linux-driver-management) is not installed"
                        .to_string(),
                ));
            }
            HelperStatus::NoOptimus => {
                return Err(Error::Unsupported(
                    "no NVIDIA Optimus hardware detected".to_string(),
                ));
            }
            HelperStatus::Optimus => {}
        }

        if self.open_driver_loaded {
            return Err(Error::Unsupported(
                "the nouveau driver is loaded; the proprietary NVIDIA driver is required"
                    .to_string(),
            ));
        }

        if !self.proprietary_installed {
            return Err(Error::Unsupported(
                "the proprietary NVIDIA kernel module is not installed".to_string(),
            ));
        }

        self.inventory
            .ok_or_else(|| Error::Unsupported("lspci (pciutils) is not installed".to_string()))
    }
}
