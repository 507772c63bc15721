//! Wire-contract types for the driver runtime's JSON config document.
//!
//! The NVMe driver runtime loads a JSON document of named subsystems, each
//! holding an ordered list of `{"method": ..., "params": ...}` directives.
//! Method identifiers, parameter field names, casing, and nesting are fixed
//! by the runtime's schema; nothing in here is free-form internal data.

use serde::{Deserialize, Serialize};

/// Name of the block-device subsystem, always present and first.
pub const BDEV_SUBSYSTEM: &str = "bdev";

/// Name of the VMD acceleration subsystem, present only when injected.
pub const VMD_SUBSYSTEM: &str = "vmd";

/// Transport type for locally attached NVMe controllers.
pub const NVME_TRANSPORT_PCIE: &str = "PCIe";

/// Logical block size in bytes for file-backed AIO bdevs.
pub const AIO_FILE_BLOCK_SIZE: u64 = 4096;

/// Parameters for attaching one NVMe controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeAttachControllerParams {
    /// Transport type; always [`NVME_TRANSPORT_PCIE`] here.
    pub trtype: String,
    /// Generated bdev name for the controller.
    pub name: String,
    /// PCI transport address, passed through from the tier config.
    pub traddr: String,
}

/// Parameters for creating one AIO bdev over a file or kernel block device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AioCreateParams {
    /// Logical block size in bytes; 0 lets the driver infer it from the
    /// underlying device.
    pub block_size: u64,
    /// Generated bdev name.
    pub name: String,
    /// Backing file or device path.
    pub filename: String,
}

/// Parameters for enabling VMD device management. The method takes none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmdEnableParams {}

/// One driver configuration directive: a method and its parameters.
///
/// The variant is determined solely by the originating tier's storage class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Directive {
    /// Attach an NVMe controller at a PCI address.
    #[serde(rename = "bdev_nvme_attach_controller")]
    AttachController(NvmeAttachControllerParams),
    /// Create an AIO bdev backed by a file or kernel block device.
    #[serde(rename = "bdev_aio_create")]
    CreateAioDevice(AioCreateParams),
    /// Enable VMD device management.
    #[serde(rename = "enable")]
    EnableVmd(VmdEnableParams),
}

impl Directive {
    /// The generated bdev name the directive refers to, if any.
    pub fn device_name(&self) -> Option<&str> {
        match self {
            Directive::AttachController(p) => Some(&p.name),
            Directive::CreateAioDevice(p) => Some(&p.name),
            Directive::EnableVmd(_) => None,
        }
    }
}

/// A named group of directives in the driver config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsystem {
    /// Subsystem name, fixed by the runtime schema.
    pub name: String,
    /// Directives in execution order.
    pub configs: Vec<Directive>,
}

impl Subsystem {
    /// Creates an empty subsystem with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            configs: Vec::new(),
        }
    }
}

/// The full driver runtime configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Subsystems in load order; the bdev subsystem is always first.
    pub subsystems: Vec<Subsystem>,
}

impl DriverConfig {
    /// Renders the document as pretty-printed JSON.
    ///
    /// Field order follows the struct definitions and no map types are
    /// involved, so the rendering is deterministic for a given config.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
