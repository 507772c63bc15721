//! Bdev tier configuration and compilation request types.
//!
//! A tier is one group of block devices of a single class attached to one
//! storage engine. The request aggregates an engine's tiers together with
//! the host identity and the host-wide VMD flag; it is read-only to the
//! compiler.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage class of a bdev tier.
///
/// Persistent-memory and RAM-backed classes are handled elsewhere; only the
/// classes the driver runtime attaches as bdevs appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageClass {
    /// NVMe controllers attached by PCI address.
    Nvme,
    /// File-backed AIO bdevs.
    File,
    /// Kernel block devices driven through AIO.
    Kdev,
}

impl StorageClass {
    /// Tag used as the leading component of generated bdev names.
    pub fn bdev_name_tag(&self) -> &'static str {
        match self {
            StorageClass::Nvme => "Nvme",
            StorageClass::File | StorageClass::Kdev => "AIO",
        }
    }

    /// Device family the class belongs to, used as the engine's allocation
    /// hint.
    pub fn engine_env(&self) -> EngineEnv {
        match self {
            StorageClass::Nvme => EngineEnv::Nvme,
            StorageClass::File | StorageClass::Kdev => EngineEnv::Aio,
        }
    }
}

/// Coarse hint describing which device family backs an engine's bdev tiers.
///
/// The runtime launcher uses this to select the engine's allocation
/// strategy. A single engine is expected to use only one family; mixed
/// configurations are rejected upstream before compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineEnv {
    /// Tiers are NVMe controllers.
    Nvme,
    /// Tiers are AIO devices (file-backed or kernel block devices).
    Aio,
}

impl EngineEnv {
    /// String form handed to the runtime-launch collaborator.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineEnv::Nvme => "NVMe-backed",
            EngineEnv::Aio => "AIO-backed",
        }
    }
}

impl fmt::Display for EngineEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one bdev tier of a storage engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Tier id, unique within an engine's storage configuration. Used only
    /// for bdev naming, not ordering.
    pub tier: u32,
    /// Storage class of every device in the tier.
    pub class: StorageClass,
    /// Device identifiers in configuration order: PCI addresses for NVMe,
    /// filesystem paths otherwise.
    pub device_list: Vec<String>,
    /// Size in GB of each backing file; only meaningful for the file class.
    #[serde(default)]
    pub file_size_gb: u64,
}

impl TierConfig {
    /// Creates a tier with no file size set.
    pub fn new(tier: u32, class: StorageClass, device_list: Vec<String>) -> Self {
        Self {
            tier,
            class,
            device_list,
            file_size_gb: 0,
        }
    }

    /// Sets the backing file size in GB.
    pub fn with_file_size_gb(mut self, file_size_gb: u64) -> Self {
        self.file_size_gb = file_size_gb;
        self
    }
}

/// One engine's bdev compilation request.
///
/// Built from the already-validated engine configuration once per
/// engine-start sequence; immutable for the duration of one compile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Hostname of the node, stable for the lifetime of the node process.
    pub hostname: String,
    /// Bdev tiers in configuration order; output order follows this.
    pub tiers: Vec<TierConfig>,
    /// Whether VMD device management is enabled on this host.
    pub vmd_enabled: bool,
}

impl CompileRequest {
    /// Creates a request with VMD disabled.
    pub fn new(hostname: String, tiers: Vec<TierConfig>) -> Self {
        Self {
            hostname,
            tiers,
            vmd_enabled: false,
        }
    }

    /// Enables VMD device management for this request.
    pub fn with_vmd(mut self) -> Self {
        self.vmd_enabled = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bdev_name_tags() {
        assert_eq!(StorageClass::Nvme.bdev_name_tag(), "Nvme");
        assert_eq!(StorageClass::File.bdev_name_tag(), "AIO");
        assert_eq!(StorageClass::Kdev.bdev_name_tag(), "AIO");
    }

    #[test]
    fn test_engine_env_per_class() {
        assert_eq!(StorageClass::Nvme.engine_env(), EngineEnv::Nvme);
        assert_eq!(StorageClass::File.engine_env(), EngineEnv::Aio);
        assert_eq!(StorageClass::Kdev.engine_env(), EngineEnv::Aio);
    }

    #[test]
    fn test_engine_env_strings() {
        assert_eq!(EngineEnv::Nvme.as_str(), "NVMe-backed");
        assert_eq!(EngineEnv::Aio.as_str(), "AIO-backed");
        assert_eq!(format!("{}", EngineEnv::Nvme), "NVMe-backed");
    }

    #[test]
    fn test_tier_config_builder() {
        let tier = TierConfig::new(
            84,
            StorageClass::File,
            vec!["/d/f1".to_string(), "/d/f2".to_string()],
        )
        .with_file_size_gb(1);

        assert_eq!(tier.tier, 84);
        assert_eq!(tier.class, StorageClass::File);
        assert_eq!(tier.device_list.len(), 2);
        assert_eq!(tier.file_size_gb, 1);
    }

    #[test]
    fn test_request_vmd_flag() {
        let req = CompileRequest::new("nodeA".to_string(), Vec::new());
        assert!(!req.vmd_enabled);

        let req = req.with_vmd();
        assert!(req.vmd_enabled);
    }

    #[test]
    fn test_tier_config_serde_defaults_file_size() {
        let json = r#"{"tier":0,"class":"nvme","device_list":["0000:81:00.0"]}"#;
        let tier: TierConfig = serde_json::from_str(json).unwrap();
        assert_eq!(tier.class, StorageClass::Nvme);
        assert_eq!(tier.file_size_gb, 0);
    }
}
