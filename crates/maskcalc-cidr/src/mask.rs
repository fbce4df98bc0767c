//! Canonical masks and the netmask / wildcard validator

use maskcalc_core::{AddressFamily, CalcError, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use tracing::debug;

/// A prefix-length mask of a given family
///
/// Always canonical: `prefix_len` leading one-bits followed by zero-bits
/// across the family's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MaskRepr")]
pub struct Mask {
    prefix_len: u8,
    family: AddressFamily,
}

#[derive(Deserialize)]
struct MaskRepr {
    prefix_len: u8,
    family: AddressFamily,
}

impl TryFrom<MaskRepr> for Mask {
    type Error = CalcError;

    fn try_from(repr: MaskRepr) -> Result<Self> {
        Mask::new(repr.prefix_len, repr.family)
    }
}

impl Mask {
    /// Create a mask, rejecting prefix lengths wider than the family
    pub fn new(prefix_len: u8, family: AddressFamily) -> Result<Self> {
        if prefix_len > family.width() {
            return Err(CalcError::InvalidPrefixLength {
                input: prefix_len.to_string(),
                max: family.width(),
            });
        }

        Ok(Self { prefix_len, family })
    }

    /// Interpret a raw 32-bit netmask or wildcard mask as an IPv4 mask
    pub fn from_ipv4_bits(bits: u32) -> Result<Self> {
        let prefix_len = interpret_mask(bits)?;
        Self::new(prefix_len, AddressFamily::IPv4)
    }

    /// Get prefix length
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Get address family
    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Number of host bits
    pub fn host_bits(&self) -> u8 {
        self.family.width() - self.prefix_len
    }

    /// Wildcard (host) bits, right-aligned in a `u128`
    pub fn wildcard_bits(&self) -> u128 {
        u128::MAX
            .checked_shr(128 - u32::from(self.host_bits()))
            .unwrap_or(0)
    }

    /// Netmask bits, right-aligned in a `u128` to the family's width
    pub fn netmask_bits(&self) -> u128 {
        let all_ones = u128::MAX
            .checked_shr(128 - u32::from(self.family.width()))
            .unwrap_or(0);
        all_ones ^ self.wildcard_bits()
    }

    /// 32-bit netmask, for IPv4 masks only
    pub fn ipv4_netmask(&self) -> Option<u32> {
        match self.family {
            AddressFamily::IPv4 => Some(self.netmask_bits() as u32),
            AddressFamily::IPv6 => None,
        }
    }

    /// 32-bit wildcard mask, for IPv4 masks only
    pub fn ipv4_wildcard(&self) -> Option<u32> {
        match self.family {
            AddressFamily::IPv4 => Some(self.wildcard_bits() as u32),
            AddressFamily::IPv6 => None,
        }
    }

    /// Total addresses in a block of this size: `2^(width - prefix)`
    pub fn total(&self) -> BigUint {
        BigUint::from(1u8) << usize::from(self.host_bits())
    }

    /// Usable addresses in a block of this size
    ///
    /// IPv4 blocks lose the network and broadcast addresses, so /31 and /32
    /// have none. IPv6 blocks are usable in full.
    pub fn usable(&self) -> BigUint {
        let total = self.total();
        if !self.family.has_broadcast() {
            return total;
        }

        let reserved = BigUint::from(2u8);
        if total > reserved {
            total - reserved
        } else {
            BigUint::from(0u8)
        }
    }
}

/// Interpret a raw 32-bit pattern as a netmask or a wildcard mask
///
/// Returns the canonical prefix length. The netmask reading is tried first,
/// so `0` is /0 and `0xFFFFFFFF` is /32.
pub fn interpret_mask(n: u32) -> Result<u8> {
    let ones = n.count_ones();

    let netmask = u32::MAX.checked_shl(32 - ones).unwrap_or(0);
    if n == netmask {
        debug!(ones, "interpreted as netmask");
        return Ok(ones as u8);
    }

    let wildcard = u32::MAX.checked_shr(32 - ones).unwrap_or(0);
    if n == wildcard {
        debug!(ones, "interpreted as wildcard mask");
        return Ok((32 - ones) as u8);
    }

    Err(CalcError::InvalidMaskPattern(Ipv4Addr::from(n).to_string()))
}
