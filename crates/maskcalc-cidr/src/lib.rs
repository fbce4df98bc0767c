//! Mask parsing and address range arithmetic
//!
//! Provides the computational core of maskcalc:
//! - Parse prefix lengths, dotted-quad masks, hex masks and CIDR notation
//! - Validate netmask and wildcard bit patterns
//! - Compute network, broadcast and usable ranges for IPv4 and IPv6
//! - Render masks, addresses and counts
//!
//! # Examples
//!
//! ```
//! use maskcalc_cidr::Cidr;
//!
//! let cidr = Cidr::parse("192.168.1.0/24").unwrap();
//! assert_eq!(cidr.prefix_len(), 24);
//! assert_eq!(cidr.network(), 0xC0A80100); // 192.168.1.0
//! assert_eq!(cidr.broadcast(), Some(0xC0A801FF)); // 192.168.1.255
//! ```

use maskcalc_core::{AddressFamily, CalcError, FamilyMode, Result};
use num_bigint::BigUint;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::trace;

pub mod format;
pub mod mask;
pub mod parse;

pub use mask::{interpret_mask, Mask};
pub use parse::{parse_input, ParsedInput};

/// Convert an address to its big-endian integer value
pub fn address_to_int(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from_be_bytes(v4.octets())),
        IpAddr::V6(v6) => u128::from_be_bytes(v6.octets()),
    }
}

/// Convert an integer back to an address of the given family
///
/// Keeps the low-order bytes that fit the family's width.
pub fn int_to_address(value: u128, family: AddressFamily) -> IpAddr {
    let bytes = value.to_be_bytes();
    match family {
        AddressFamily::IPv4 => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&bytes[16 - family.byte_len()..]);
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        AddressFamily::IPv6 => IpAddr::V6(Ipv6Addr::from(bytes)),
    }
}

/// Family of an address literal
pub fn family_of(addr: &IpAddr) -> AddressFamily {
    match addr {
        IpAddr::V4(_) => AddressFamily::IPv4,
        IpAddr::V6(_) => AddressFamily::IPv6,
    }
}

/// CIDR block: a network address and its mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    /// Network address with host bits cleared
    network: u128,
    mask: Mask,
}

/// Every derived address of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRange {
    pub network: IpAddr,
    /// IPv4 only
    pub broadcast: Option<IpAddr>,
    /// `None` when the block has no usable addresses
    pub first_usable: Option<IpAddr>,
    pub last_usable: Option<IpAddr>,
    pub usable_count: BigUint,
    pub total_count: BigUint,
}

impl Cidr {
    /// Parse `address/prefix` notation, inferring the family from the address
    ///
    /// # Examples
    ///
    /// ```
    /// use maskcalc_cidr::Cidr;
    ///
    /// let cidr = Cidr::parse("2001:db8::/32").unwrap();
    /// assert_eq!(cidr.prefix_len(), 32);
    /// assert_eq!(cidr.broadcast(), None);
    /// ```
    pub fn parse(cidr: &str) -> Result<Self> {
        parse::parse_cidr(cidr, FamilyMode::Auto).map(|(_, cidr)| cidr)
    }

    /// Create a block from any address inside it and a prefix length
    pub fn new(address: IpAddr, prefix_len: u8) -> Result<Self> {
        let family = family_of(&address);
        let mask = Mask::new(prefix_len, family).map_err(|_| CalcError::InvalidCidr {
            input: format!("{}/{}", address, prefix_len),
            reason: format!("prefix must be 0-{}", family.width()),
        })?;

        Ok(Self::from_parts(address_to_int(address), mask))
    }

    /// Create a block from an integer address and a mask
    pub fn from_parts(address: u128, mask: Mask) -> Self {
        Self {
            network: address & mask.netmask_bits(),
            mask,
        }
    }

    /// Get network address as an integer
    pub fn network(&self) -> u128 {
        self.network
    }

    /// Get network address
    pub fn network_addr(&self) -> IpAddr {
        int_to_address(self.network, self.family())
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn prefix_len(&self) -> u8 {
        self.mask.prefix_len()
    }

    pub fn family(&self) -> AddressFamily {
        self.mask.family()
    }

    /// Highest address in the block (`network + total - 1`)
    pub fn last_address(&self) -> u128 {
        self.network + self.mask.wildcard_bits()
    }

    /// Broadcast address, IPv4 only
    pub fn broadcast(&self) -> Option<u128> {
        self.family()
            .has_broadcast()
            .then(|| self.last_address())
    }

    /// First usable address
    ///
    /// IPv4 skips the network address and needs more than two addresses.
    /// IPv6 starts at the network address.
    pub fn first_usable(&self) -> Option<u128> {
        match self.broadcast() {
            Some(broadcast) if broadcast - self.network > 1 => Some(self.network + 1),
            Some(_) => None,
            None => Some(self.network),
        }
    }

    /// Last usable address, see [`Cidr::first_usable`]
    pub fn last_usable(&self) -> Option<u128> {
        match self.broadcast() {
            Some(broadcast) if broadcast - self.network > 1 => Some(broadcast - 1),
            Some(_) => None,
            None => Some(self.last_address()),
        }
    }

    /// Total number of addresses in this block
    pub fn size(&self) -> BigUint {
        self.mask.total()
    }

    /// Number of usable addresses in this block
    pub fn usable(&self) -> BigUint {
        self.mask.usable()
    }

    /// Compute every derived address of the block
    pub fn range(&self) -> AddressRange {
        let family = self.family();
        let to_addr = |value: u128| int_to_address(value, family);

        let range = AddressRange {
            network: self.network_addr(),
            broadcast: self.broadcast().map(to_addr),
            first_usable: self.first_usable().map(to_addr),
            last_usable: self.last_usable().map(to_addr),
            usable_count: self.usable(),
            total_count: self.size(),
        };
        trace!(?range, "computed address range");
        range
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_addr(), self.prefix_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    #[test]
    fn test_parse_cidr() {
        let cidr = Cidr::parse("192.168.1.0/24").unwrap();
        assert_eq!(cidr.network(), 0xC0A80100);
        assert_eq!(cidr.prefix_len(), 24);
        assert_eq!(cidr.family(), AddressFamily::IPv4);
    }

    #[test]
    fn test_parse_clears_host_bits() {
        let cidr = Cidr::parse("10.1.2.3/8").unwrap();
        assert_eq!(cidr.network(), 0x0A000000);
    }

    #[test]
    fn test_parse_invalid_cidr() {
        assert!(Cidr::parse("192.168.1.0/33").is_err());
        assert!(Cidr::parse("256.0.0.0/24").is_err());
        assert!(Cidr::parse("2001:db8::/129").is_err());
    }

    #[test]
    fn test_cidr_broadcast() {
        let cidr = Cidr::parse("192.168.1.0/24").unwrap();
        assert_eq!(cidr.broadcast(), Some(0xC0A801FF));
    }

    #[test]
    fn test_cidr_usable_range() {
        let cidr = Cidr::parse("192.168.1.0/24").unwrap();
        assert_eq!(cidr.first_usable(), Some(0xC0A80101));
        assert_eq!(cidr.last_usable(), Some(0xC0A801FE));
        assert_eq!(cidr.usable(), BigUint::from(254u32));
    }

    #[test]
    fn test_cidr_size() {
        let cidr16 = Cidr::parse("192.168.0.0/16").unwrap();
        assert_eq!(cidr16.size(), BigUint::from(65536u32));

        let cidr0 = Cidr::parse("0.0.0.0/0").unwrap();
        assert_eq!(cidr0.size(), BigUint::from(1u64 << 32));
        assert_eq!(cidr0.broadcast(), Some(0xFFFFFFFF));
    }

    #[test]
    fn test_cidr_slash_30() {
        let cidr = Cidr::parse("10.0.0.0/30").unwrap();
        assert_eq!(cidr.first_usable(), Some(0x0A000001));
        assert_eq!(cidr.last_usable(), Some(0x0A000002));
    }

    #[test]
    fn test_cidr_degenerate() {
        let cidr31 = Cidr::parse("10.0.0.0/31").unwrap();
        assert_eq!(cidr31.first_usable(), None);
        assert_eq!(cidr31.last_usable(), None);
        assert_eq!(cidr31.usable(), BigUint::from(0u8));

        let cidr32 = Cidr::parse("192.168.1.1/32").unwrap();
        assert_eq!(cidr32.size(), BigUint::from(1u8));
        assert_eq!(cidr32.broadcast(), Some(0xC0A80101));
        assert_eq!(cidr32.first_usable(), None);
    }

    #[test]
    fn test_cidr_ipv6() {
        let cidr = Cidr::parse("2001:db8::1/64").unwrap();
        assert_eq!(cidr.network_addr().to_string(), "2001:db8::");
        assert_eq!(cidr.broadcast(), None);
        assert_eq!(
            int_to_address(cidr.last_usable().unwrap(), AddressFamily::IPv6).to_string(),
            "2001:db8::ffff:ffff:ffff:ffff"
        );
        assert_eq!(cidr.first_usable(), Some(cidr.network()));
        assert_eq!(cidr.usable(), BigUint::from(1u128 << 64));
    }

    #[test]
    fn test_cidr_ipv6_whole_space() {
        let cidr = Cidr::parse("::/0").unwrap();
        assert_eq!(cidr.last_address(), u128::MAX);
        assert_eq!(cidr.usable(), BigUint::from(1u8) << 128usize);
    }

    #[test]
    fn test_cidr_range() {
        let range = Cidr::parse("192.168.1.0/24").unwrap().range();
        assert_eq!(range.network, v4(192, 168, 1, 0));
        assert_eq!(range.broadcast, Some(v4(192, 168, 1, 255)));
        assert_eq!(range.first_usable, Some(v4(192, 168, 1, 1)));
        assert_eq!(range.last_usable, Some(v4(192, 168, 1, 254)));
        assert_eq!(range.usable_count, BigUint::from(254u32));
        assert_eq!(range.total_count, BigUint::from(256u32));
    }

    #[test]
    fn test_cidr_new() {
        let cidr = Cidr::new(v4(192, 168, 1, 77), 24).unwrap();
        assert_eq!(cidr.network(), 0xC0A80100);
        assert!(matches!(
            Cidr::new(v4(10, 0, 0, 0), 33),
            Err(CalcError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn test_cidr_display() {
        let cidr = Cidr::parse("192.168.1.9/24").unwrap();
        assert_eq!(cidr.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_address_conversion() {
        assert_eq!(address_to_int(v4(10, 0, 0, 1)), 0x0A000001);
        assert_eq!(int_to_address(0x0A000001, AddressFamily::IPv4), v4(10, 0, 0, 1));

        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(int_to_address(address_to_int(v6), AddressFamily::IPv6), v6);
    }

    #[test]
    fn test_int_to_address_truncates() {
        let value = 0x1_0000_0000_C0A8_0101u128;
        assert_eq!(int_to_address(value, AddressFamily::IPv4), v4(192, 168, 1, 1));
    }
}
