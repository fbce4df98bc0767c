//! Core types for maskcalc
//!
//! This crate provides the foundational types shared by the maskcalc crates:
//! - [`AddressFamily`] - IPv4 or IPv6, with its address width
//! - [`FamilyMode`] - how the family of an invocation is decided
//! - [`CalcError`] - Error taxonomy for parsing and validation
//!
//! ```
//! use maskcalc_core::{AddressFamily, FamilyMode};
//!
//! assert_eq!(AddressFamily::IPv6.width(), 128);
//! assert!(FamilyMode::Auto.admits(AddressFamily::IPv4));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;

/// Address family of a mask or address
///
/// Determines the address width and whether the block has a
/// broadcast address (IPv4 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// 32-bit addresses
    IPv4,
    /// 128-bit addresses
    IPv6,
}

impl AddressFamily {
    /// Address width in bits
    pub fn width(self) -> u8 {
        match self {
            AddressFamily::IPv4 => 32,
            AddressFamily::IPv6 => 128,
        }
    }

    /// Address width in bytes
    pub fn byte_len(self) -> usize {
        usize::from(self.width() / 8)
    }

    /// Whether blocks of this family reserve a broadcast address
    pub fn has_broadcast(self) -> bool {
        matches!(self, AddressFamily::IPv4)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::IPv4 => write!(f, "IPv4"),
            AddressFamily::IPv6 => write!(f, "IPv6"),
        }
    }
}

/// How the address family of one invocation is decided
///
/// `Auto` is dual-stack: the family is inferred from the input.
/// `V4` restricts the invocation to IPv4, `V6` forces IPv6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyMode {
    #[default]
    Auto,
    V4,
    V6,
}

impl FamilyMode {
    /// The family this mode forces, if any
    pub fn forced(self) -> Option<AddressFamily> {
        match self {
            FamilyMode::Auto => None,
            FamilyMode::V4 => Some(AddressFamily::IPv4),
            FamilyMode::V6 => Some(AddressFamily::IPv6),
        }
    }

    /// Whether a value of `family` is acceptable under this mode
    pub fn admits(self, family: AddressFamily) -> bool {
        self.forced().map_or(true, |forced| forced == family)
    }

    /// Largest prefix length a bare `/N` may carry under this mode
    pub fn max_prefix(self) -> u8 {
        match self {
            FamilyMode::V4 => AddressFamily::IPv4.width(),
            FamilyMode::Auto | FamilyMode::V6 => AddressFamily::IPv6.width(),
        }
    }
}

impl fmt::Display for FamilyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyMode::Auto => write!(f, "auto"),
            FamilyMode::V4 => write!(f, "ipv4"),
            FamilyMode::V6 => write!(f, "ipv6"),
        }
    }
}

impl FromStr for FamilyMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(FamilyMode::Auto),
            "4" | "v4" | "ipv4" => Ok(FamilyMode::V4),
            "6" | "v6" | "ipv6" => Ok(FamilyMode::V6),
            other => Err(format!("unknown address family mode: {}", other)),
        }
    }
}

/// Error types for mask parsing and validation
///
/// Every variant carries the offending input so the message can point at it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// Prefix length is not numeric or is outside 0..=max
    #[error("invalid prefix length: {input} (must be 0-{max})")]
    InvalidPrefixLength { input: String, max: u8 },

    /// Malformed address/prefix notation
    #[error("invalid CIDR address: {input} ({reason})")]
    InvalidCidr { input: String, reason: String },

    /// Dotted-quad mask with the wrong group count or an octet above 255
    #[error("{0} is not a valid netmask or inverse mask (expected n.n.n.n with octets 0-255)")]
    InvalidMask(String),

    /// Hex mask that is not exactly 8 hex digits after `0x`
    #[error("{0} is not a valid netmask or inverse mask (hex values need 8 chars)")]
    InvalidHexLength(String),

    /// Bit pattern is neither a contiguous netmask nor a contiguous wildcard mask
    #[error("{0} is not a valid netmask or inverse mask")]
    InvalidMaskPattern(String),

    /// Forced family conflicts with the family of the input
    #[error("{input} is an {found} value but {forced} was requested")]
    FamilyMismatch {
        input: String,
        forced: AddressFamily,
        found: AddressFamily,
    },

    /// Wrong command-line usage
    #[error("usage: {0}")]
    Usage(String),
}

/// Result type alias for maskcalc operations
pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_width() {
        assert_eq!(AddressFamily::IPv4.width(), 32);
        assert_eq!(AddressFamily::IPv6.width(), 128);
        assert_eq!(AddressFamily::IPv4.byte_len(), 4);
        assert_eq!(AddressFamily::IPv6.byte_len(), 16);
    }

    #[test]
    fn test_family_broadcast() {
        assert!(AddressFamily::IPv4.has_broadcast());
        assert!(!AddressFamily::IPv6.has_broadcast());
    }

    #[test]
    fn test_family_display() {
        assert_eq!(format!("{}", AddressFamily::IPv4), "IPv4");
        assert_eq!(format!("{}", AddressFamily::IPv6), "IPv6");
    }

    #[test]
    fn test_mode_admits() {
        assert!(FamilyMode::Auto.admits(AddressFamily::IPv4));
        assert!(FamilyMode::Auto.admits(AddressFamily::IPv6));
        assert!(FamilyMode::V4.admits(AddressFamily::IPv4));
        assert!(!FamilyMode::V4.admits(AddressFamily::IPv6));
        assert!(!FamilyMode::V6.admits(AddressFamily::IPv4));
    }

    #[test]
    fn test_mode_max_prefix() {
        assert_eq!(FamilyMode::V4.max_prefix(), 32);
        assert_eq!(FamilyMode::Auto.max_prefix(), 128);
        assert_eq!(FamilyMode::V6.max_prefix(), 128);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("auto".parse::<FamilyMode>(), Ok(FamilyMode::Auto));
        assert_eq!("4".parse::<FamilyMode>(), Ok(FamilyMode::V4));
        assert_eq!("IPv6".parse::<FamilyMode>(), Ok(FamilyMode::V6));
        assert!("ipv5".parse::<FamilyMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [FamilyMode::Auto, FamilyMode::V4, FamilyMode::V6] {
            assert_eq!(mode.to_string().parse::<FamilyMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_family_serialization() {
        let json = serde_json::to_string(&AddressFamily::IPv6).expect("serialization failed");
        assert_eq!(json, r#""ipv6""#);

        let family: AddressFamily = serde_json::from_str(r#""ipv4""#).expect("deserialization failed");
        assert_eq!(family, AddressFamily::IPv4);
    }

    #[test]
    fn test_error_display() {
        let err = CalcError::InvalidPrefixLength {
            input: "/33".to_string(),
            max: 32,
        };
        assert_eq!(format!("{}", err), "invalid prefix length: /33 (must be 0-32)");

        let err = CalcError::InvalidHexLength("0xfff".to_string());
        assert_eq!(
            format!("{}", err),
            "0xfff is not a valid netmask or inverse mask (hex values need 8 chars)"
        );

        let err = CalcError::FamilyMismatch {
            input: "255.255.255.0".to_string(),
            forced: AddressFamily::IPv6,
            found: AddressFamily::IPv4,
        };
        assert_eq!(
            format!("{}", err),
            "255.255.255.0 is an IPv4 value but IPv6 was requested"
        );
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<AddressFamily> {
            Err(CalcError::InvalidMaskPattern("255.0.255.0".to_string()))
        }

        let result = returns_result();
        assert!(matches!(result, Err(CalcError::InvalidMaskPattern(_))));
    }
}
