//! Classification and parsing of textual mask forms
//!
//! Accepted shapes, tried in order:
//! 1. `/N` prefix length
//! 2. `address/N` CIDR notation
//! 3. `n.n.n.n` dotted-quad netmask or wildcard mask
//! 4. `0xXXXXXXXX` hex netmask or wildcard mask
//! 5. bare `N`, read as `/N`

use maskcalc_core::{AddressFamily, CalcError, FamilyMode, Result};
use std::net::IpAddr;
use tracing::debug;

use crate::{family_of, Cidr, Mask};

/// One parsed command-line argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// `/N`
    PrefixLength(Mask),
    /// `address/N`, keeping the address as entered
    Cidr { address: IpAddr, cidr: Cidr },
    /// `n.n.n.n`, with the raw 32-bit value
    DottedQuad { value: u32, mask: Mask },
    /// `0xXXXXXXXX`, with the raw 32-bit value
    Hex { value: u32, mask: Mask },
    /// `N` without a leading slash
    BarePrefix(Mask),
}

impl ParsedInput {
    /// Canonical mask of the input
    pub fn mask(&self) -> Mask {
        match self {
            ParsedInput::PrefixLength(mask) | ParsedInput::BarePrefix(mask) => *mask,
            ParsedInput::Cidr { cidr, .. } => cidr.mask(),
            ParsedInput::DottedQuad { mask, .. } | ParsedInput::Hex { mask, .. } => *mask,
        }
    }

    /// Address as entered, for CIDR input
    pub fn entered(&self) -> Option<IpAddr> {
        match self {
            ParsedInput::Cidr { address, .. } => Some(*address),
            _ => None,
        }
    }

    /// Block of the input, for CIDR input
    pub fn cidr(&self) -> Option<&Cidr> {
        match self {
            ParsedInput::Cidr { cidr, .. } => Some(cidr),
            _ => None,
        }
    }

    /// Family decided for this input
    pub fn family(&self) -> AddressFamily {
        self.mask().family()
    }

    /// Short name of the input shape
    pub fn shape(&self) -> &'static str {
        match self {
            ParsedInput::PrefixLength(_) => "prefix",
            ParsedInput::Cidr { .. } => "cidr",
            ParsedInput::DottedQuad { .. } => "dotted-quad",
            ParsedInput::Hex { .. } => "hex",
            ParsedInput::BarePrefix(_) => "bare-prefix",
        }
    }
}

/// Classify and parse one argument
///
/// # Examples
///
/// ```
/// use maskcalc_cidr::parse_input;
/// use maskcalc_core::FamilyMode;
///
/// let parsed = parse_input("255.255.255.0", FamilyMode::Auto).unwrap();
/// assert_eq!(parsed.mask().prefix_len(), 24);
///
/// let parsed = parse_input("0x000000ff", FamilyMode::Auto).unwrap();
/// assert_eq!(parsed.mask().prefix_len(), 24);
/// ```
pub fn parse_input(input: &str, mode: FamilyMode) -> Result<ParsedInput> {
    let parsed = if let Some(digits) = input.strip_prefix('/') {
        ParsedInput::PrefixLength(parse_prefix_digits(digits, input, mode)?)
    } else if input.contains('/') {
        let (address, cidr) = parse_cidr(input, mode)?;
        ParsedInput::Cidr { address, cidr }
    } else if input.contains('.') {
        let (value, mask) = parse_dotted_mask(input, mode)?;
        ParsedInput::DottedQuad { value, mask }
    } else if input.starts_with("0x") {
        let (value, mask) = parse_hex_mask(input, mode)?;
        ParsedInput::Hex { value, mask }
    } else {
        ParsedInput::BarePrefix(parse_prefix_digits(input, input, mode)?)
    };

    debug!(
        input,
        shape = parsed.shape(),
        prefix_len = parsed.mask().prefix_len(),
        family = %parsed.family(),
        "parsed input"
    );
    Ok(parsed)
}

/// Parse `/N` prefix-length notation
///
/// Under [`FamilyMode::Auto`] a prefix above 32 selects IPv6.
pub fn parse_prefix_length(input: &str, mode: FamilyMode) -> Result<Mask> {
    let digits = input.strip_prefix('/').unwrap_or(input);
    parse_prefix_digits(digits, input, mode)
}

fn parse_prefix_digits(digits: &str, input: &str, mode: FamilyMode) -> Result<Mask> {
    let max = mode.max_prefix();
    let invalid = || CalcError::InvalidPrefixLength {
        input: input.to_string(),
        max,
    };

    let prefix_len = parse_decimal(digits)
        .filter(|&n| n <= u32::from(max))
        .ok_or_else(invalid)? as u8;

    let family = match mode.forced() {
        Some(family) => family,
        None if prefix_len > AddressFamily::IPv4.width() => AddressFamily::IPv6,
        None => AddressFamily::IPv4,
    };

    Mask::new(prefix_len, family).map_err(|_| invalid())
}

/// Parse `address/N` notation
///
/// Returns the address as entered and the block it belongs to.
pub fn parse_cidr(input: &str, mode: FamilyMode) -> Result<(IpAddr, Cidr)> {
    let invalid = |reason: String| CalcError::InvalidCidr {
        input: input.to_string(),
        reason,
    };

    let (addr_str, prefix_str) = input
        .split_once('/')
        .ok_or_else(|| invalid("expected address/prefix".to_string()))?;

    let address: IpAddr = addr_str
        .parse()
        .map_err(|_| invalid(format!("invalid address {:?}", addr_str)))?;

    let family = family_of(&address);
    check_family(input, family, mode)?;

    let max = family.width();
    let prefix_len = parse_decimal(prefix_str)
        .filter(|&n| n <= u32::from(max))
        .ok_or_else(|| invalid(format!("prefix must be 0-{}", max)))? as u8;

    let cidr = Cidr::new(address, prefix_len)?;
    Ok((address, cidr))
}

/// Parse a dotted-quad netmask or wildcard mask
///
/// Returns the raw 32-bit value and its canonical mask.
pub fn parse_dotted_mask(input: &str, mode: FamilyMode) -> Result<(u32, Mask)> {
    check_family(input, AddressFamily::IPv4, mode)?;

    let invalid = || CalcError::InvalidMask(input.to_string());

    let octets: Vec<&str> = input.split('.').collect();
    if octets.len() != 4 {
        return Err(invalid());
    }

    let mut value = 0u32;
    for octet_str in octets {
        let octet = parse_decimal(octet_str)
            .filter(|&n| n <= 255)
            .ok_or_else(invalid)?;
        value = (value << 8) | octet;
    }

    let mask = mask_from_bits(value, input)?;
    Ok((value, mask))
}

/// Parse a `0x`-prefixed 8-digit hex netmask or wildcard mask
///
/// Returns the raw 32-bit value and its canonical mask.
pub fn parse_hex_mask(input: &str, mode: FamilyMode) -> Result<(u32, Mask)> {
    check_family(input, AddressFamily::IPv4, mode)?;

    let digits = input
        .strip_prefix("0x")
        .filter(|d| d.len() == 8 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| CalcError::InvalidHexLength(input.to_string()))?;

    let value = u32::from_str_radix(digits, 16)
        .map_err(|_| CalcError::InvalidHexLength(input.to_string()))?;

    let mask = mask_from_bits(value, input)?;
    Ok((value, mask))
}

fn mask_from_bits(value: u32, input: &str) -> Result<Mask> {
    Mask::from_ipv4_bits(value).map_err(|_| CalcError::InvalidMaskPattern(input.to_string()))
}

fn check_family(input: &str, found: AddressFamily, mode: FamilyMode) -> Result<()> {
    match mode.forced() {
        Some(forced) if !mode.admits(found) => Err(CalcError::FamilyMismatch {
            input: input.to_string(),
            forced,
            found,
        }),
        _ => Ok(()),
    }
}

/// Plain unsigned decimal: ASCII digits only, no sign, not empty
fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
