#![warn(missing_docs)]

//! Strata bdev subsystem: storage-tier validation and driver runtime config compilation
//!
//! This crate compiles a node's declarative bdev tier configuration (NVMe
//! controllers, file-backed AIO devices, kernel block devices) into the
//! ordered JSON document the NVMe driver runtime loads at engine startup.
//! Compilation is pure and deterministic: the same request always produces a
//! byte-identical document, which keeps engine restarts idempotent and makes
//! config diffs meaningful in tests and deployment tooling.

pub mod compile;
pub mod directive;
pub mod error;
pub mod pci;
pub mod tier;

pub use compile::{bdev_name, compile, CompiledConfig};
pub use directive::{
    AioCreateParams, Directive, DriverConfig, NvmeAttachControllerParams, Subsystem,
    VmdEnableParams, AIO_FILE_BLOCK_SIZE, BDEV_SUBSYSTEM, NVME_TRANSPORT_PCIE, VMD_SUBSYSTEM,
};
pub use error::{BdevError, BdevResult};
pub use pci::{ParsePciAddressError, PciAddress};
pub use tier::{CompileRequest, EngineEnv, StorageClass, TierConfig};
