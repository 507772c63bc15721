//! Error types for the bdev config compiler.

use thiserror::Error;

/// Result type alias for bdev config operations.
pub type BdevResult<T> = Result<T, BdevError>;

/// Error variants for bdev tier validation and compilation.
///
/// Every variant carries the id of the offending tier so that engine startup
/// can report an actionable diagnostic. Compilation is all-or-nothing: the
/// first error aborts the whole compile and no partial document is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BdevError {
    /// An NVMe tier lists a device that is not a well-formed PCI address.
    #[error("tier {tier}: unexpected pci address {address:?}")]
    UnexpectedPciAddress {
        /// The tier the device belongs to.
        tier: u32,
        /// The device string that failed to parse.
        address: String,
    },

    /// A file-backed AIO tier requires non-zero bdev size.
    #[error("tier {tier}: file class requires non-zero bdev size")]
    ZeroFileSize {
        /// The tier configured without a file size.
        tier: u32,
    },

    /// An AIO tier lists an empty device path.
    #[error("tier {tier}: empty bdev device path")]
    EmptyDevicePath {
        /// The tier with the empty path.
        tier: u32,
    },
}
