//! Text renderings of masks, addresses and counts

use num_bigint::BigUint;
use std::net::{IpAddr, Ipv4Addr};

use crate::Mask;

/// Placeholder for an absent address
pub const NONE: &str = "<none>";

/// `/N`
pub fn prefix_string(mask: &Mask) -> String {
    format!("/{}", mask.prefix_len())
}

/// `a.b.c.d`
pub fn dotted_quad(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

/// `0x` followed by 8 lowercase hex digits
pub fn hex_mask(value: u32) -> String {
    format!("0x{:08x}", value)
}

/// Address text, or [`NONE`]
pub fn address(addr: Option<IpAddr>) -> String {
    addr.map_or_else(|| NONE.to_string(), |a| a.to_string())
}

/// Decimal with `,` between groups of three digits
///
/// # Examples
///
/// ```
/// use maskcalc_cidr::format::with_commas;
/// use num_bigint::BigUint;
///
/// assert_eq!(with_commas(&BigUint::from(16777214u32)), "16,777,214");
/// ```
pub fn with_commas(n: &BigUint) -> String {
    let digits = n.to_str_radix(10);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
