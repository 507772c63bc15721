//! Compilation of bdev tier configuration into the driver runtime document.
//!
//! [`compile`] is a pure function over a borrowed request: per-class
//! validation, bdev name synthesis, directive synthesis, and VMD injection
//! run in one forward pass with no side effects. Identical requests always
//! compile to byte-identical documents, which the engine-start sequence
//! relies on for idempotent restarts. Distinct requests may be compiled
//! concurrently; no state is shared between calls.

use tracing::{debug, info};

use crate::directive::{
    AioCreateParams, Directive, DriverConfig, NvmeAttachControllerParams, Subsystem,
    VmdEnableParams, AIO_FILE_BLOCK_SIZE, BDEV_SUBSYSTEM, NVME_TRANSPORT_PCIE, VMD_SUBSYSTEM,
};
use crate::error::{BdevError, BdevResult};
use crate::pci::PciAddress;
use crate::tier::{CompileRequest, EngineEnv, StorageClass, TierConfig};

/// Output of one compilation: the driver document plus the allocation hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledConfig {
    /// The driver runtime configuration document.
    pub driver: DriverConfig,
    /// Device-family hint for the engine launcher; `None` when the request
    /// holds no bdev tier. Not written into the document itself.
    pub engine_env: Option<EngineEnv>,
}

impl CompiledConfig {
    /// String form of the environment hint; empty when no bdev tier exists.
    pub fn engine_env_str(&self) -> &'static str {
        self.engine_env.map(|env| env.as_str()).unwrap_or("")
    }
}

/// Generates the unique bdev name for one device.
///
/// Names have the form `<tag>_<hostname>_<index>_<tier>` with `index` the
/// zero-based position of the device within its tier's device list. Two
/// devices could only collide by sharing tag, host, index, and tier; index
/// is scoped per tier and the tier id distinguishes tiers, so all names in
/// one request are pairwise distinct. The scheme is stable across process
/// restarts so the runtime can correlate devices between engine starts.
pub fn bdev_name(class: StorageClass, hostname: &str, index: usize, tier: u32) -> String {
    format!("{}_{}_{}_{}", class.bdev_name_tag(), hostname, index, tier)
}

/// Compiles an engine's bdev tier configuration into a validated driver
/// runtime document.
///
/// Validation is fail-fast: the first invalid tier aborts the whole compile
/// and no partial document is observable. The base bdev subsystem is always
/// present and first, even with zero directives; the VMD subsystem is
/// appended last iff VMD is enabled and at least one NVMe controller was
/// attached.
pub fn compile(req: &CompileRequest) -> BdevResult<CompiledConfig> {
    for tier in &req.tiers {
        validate_tier(tier)?;
    }

    let mut bdev = Subsystem::new(BDEV_SUBSYSTEM);
    for tier in &req.tiers {
        debug!(
            "tier {}: synthesizing {} {:?} directive(s)",
            tier.tier,
            tier.device_list.len(),
            tier.class
        );
        synthesize_tier(tier, &req.hostname, &mut bdev.configs);
    }

    let attached_nvme = bdev
        .configs
        .iter()
        .any(|c| matches!(c, Directive::AttachController(_)));
    let directive_count = bdev.configs.len();

    let mut subsystems = vec![bdev];
    if req.vmd_enabled && attached_nvme {
        debug!("vmd enabled and nvme controllers present, appending vmd subsystem");
        subsystems.push(Subsystem {
            name: VMD_SUBSYSTEM.to_string(),
            configs: vec![Directive::EnableVmd(VmdEnableParams::default())],
        });
    }

    let engine_env = classify_env(&req.tiers);
    info!(
        "compiled bdev config for {}: {} directive(s), env {}",
        req.hostname,
        directive_count,
        engine_env.map(|env| env.as_str()).unwrap_or("none")
    );

    Ok(CompiledConfig {
        driver: DriverConfig { subsystems },
        engine_env,
    })
}

/// Checks one tier against its class rules. Cross-tier invariants (unique
/// tier ids, no duplicate devices, one class family per engine) are enforced
/// upstream before a request is built.
fn validate_tier(tier: &TierConfig) -> BdevResult<()> {
    match tier.class {
        StorageClass::Nvme => {
            for dev in &tier.device_list {
                if dev.parse::<PciAddress>().is_err() {
                    return Err(BdevError::UnexpectedPciAddress {
                        tier: tier.tier,
                        address: dev.clone(),
                    });
                }
            }
        }
        StorageClass::File => {
            if tier.file_size_gb == 0 {
                return Err(BdevError::ZeroFileSize { tier: tier.tier });
            }
            validate_device_paths(tier)?;
        }
        StorageClass::Kdev => {
            validate_device_paths(tier)?;
        }
    }
    Ok(())
}

fn validate_device_paths(tier: &TierConfig) -> BdevResult<()> {
    for dev in &tier.device_list {
        if dev.is_empty() {
            return Err(BdevError::EmptyDevicePath { tier: tier.tier });
        }
    }
    Ok(())
}

/// Emits one directive per device, preserving device-list order. Total over
/// validated input: every error condition was rejected by [`validate_tier`].
fn synthesize_tier(tier: &TierConfig, hostname: &str, out: &mut Vec<Directive>) {
    for (index, dev) in tier.device_list.iter().enumerate() {
        let name = bdev_name(tier.class, hostname, index, tier.tier);
        let directive = match tier.class {
            StorageClass::Nvme => Directive::AttachController(NvmeAttachControllerParams {
                trtype: NVME_TRANSPORT_PCIE.to_string(),
                name,
                traddr: dev.clone(),
            }),
            StorageClass::File => Directive::CreateAioDevice(AioCreateParams {
                block_size: AIO_FILE_BLOCK_SIZE,
                name,
                filename: dev.clone(),
            }),
            // Block size 0: the driver infers it from the kernel device.
            StorageClass::Kdev => Directive::CreateAioDevice(AioCreateParams {
                block_size: 0,
                name,
                filename: dev.clone(),
            }),
        };
        out.push(directive);
    }
}

/// The first bdev tier's class determines the engine's device family.
fn classify_env(tiers: &[TierConfig]) -> Option<EngineEnv> {
    tiers.first().map(|tier| tier.class.engine_env())
}
