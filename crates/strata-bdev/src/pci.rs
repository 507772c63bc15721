//! PCI address parsing for NVMe device identifiers.
//!
//! NVMe tiers identify controllers by extended BDF address in
//! `domain:bus:device.function` form, e.g. `0000:81:00.0`. The compiler only
//! needs to prove an identifier is well-formed before handing it to the
//! driver runtime verbatim, so the parsed form is used for validation and
//! diagnostics rather than carried through the artifact.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a well-formed PCI address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unexpected pci address {0:?}")]
pub struct ParsePciAddressError(
    /// The rejected input string.
    pub String,
);

/// A PCI address in `domain:bus:device.function` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PciAddress {
    /// PCI domain. Wider than 16 bits to admit synthetic domains assigned to
    /// VMD backing devices.
    pub domain: u32,
    /// Bus number.
    pub bus: u8,
    /// Device number.
    pub device: u8,
    /// Function number.
    pub function: u8,
}

impl PciAddress {
    /// Creates an address from its four components.
    pub fn new(domain: u32, bus: u8, device: u8, function: u8) -> Self {
        Self {
            domain,
            bus,
            device,
            function,
        }
    }
}

impl FromStr for PciAddress {
    type Err = ParsePciAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePciAddressError(s.to_string());

        let (domain, rest) = s.split_once(':').ok_or_else(err)?;
        let (bus, rest) = rest.split_once(':').ok_or_else(err)?;
        let (device, function) = rest.split_once('.').ok_or_else(err)?;

        Ok(Self {
            domain: u32::from_str_radix(domain, 16).map_err(|_| err())?,
            bus: u8::from_str_radix(bus, 16).map_err(|_| err())?,
            device: u8::from_str_radix(device, 16).map_err(|_| err())?,
            function: u8::from_str_radix(function, 16).map_err(|_| err())?,
        })
    }
}

impl fmt::Display for PciAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:02x}:{:02x}.{:x}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_address() {
        let addr: PciAddress = "0000:81:00.0".parse().unwrap();
        assert_eq!(addr, PciAddress::new(0, 0x81, 0, 0));

        let addr: PciAddress = "0000:81:00.1".parse().unwrap();
        assert_eq!(addr.function, 1);
    }

    #[test]
    fn test_parse_vmd_backing_domain() {
        // VMD backing devices carry a synthetic domain wider than 16 bits.
        let addr: PciAddress = "5d0505:01:00.0".parse().unwrap();
        assert_eq!(addr.domain, 0x5d0505);
        assert_eq!(addr.bus, 1);
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["0000:81:00.0", "0000:d8:01.7", "10000:5e:1f.3"] {
            let addr: PciAddress = s.parse().unwrap();
            assert_eq!(addr.to_string(), s);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in [
            "",
            "not a pci address",
            "0000:81:00",
            "0000:81.00.0",
            "zz00:81:00.0",
            "0000:81:00.q",
            "0000::00.0",
        ] {
            let got = s.parse::<PciAddress>();
            assert_eq!(got, Err(ParsePciAddressError(s.to_string())));
        }
    }

    #[test]
    fn test_parse_error_message_names_input() {
        let err = "bad-addr".parse::<PciAddress>().unwrap_err();
        assert_eq!(format!("{}", err), "unexpected pci address \"bad-addr\"");
    }

    #[test]
    fn test_ordering_is_by_component() {
        let a: PciAddress = "0000:81:00.0".parse().unwrap();
        let b: PciAddress = "0000:81:00.1".parse().unwrap();
        let c: PciAddress = "0001:00:00.0".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}
