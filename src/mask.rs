//! Prefix truncation of textual IP addresses.
//!
//! Rather than comparing masked integers across differently sized word
//! arrays, both sides of a comparison are truncated to the same prefix and
//! formatted into a canonical string, which is then compared for equality.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Address family of a neighbor table, or of an address being masked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressFamily {
    #[default]
    V4,
    V6,
}

impl AddressFamily {
    /// Prefix length that covers a whole address, i.e. a single host
    #[inline]
    pub fn host_mask(&self) -> i32 {
        match self {
            AddressFamily::V4 => 32,
            AddressFamily::V6 => 128,
        }
    }

    /// Width in bits of each word of the address
    #[inline]
    fn word_bits(&self) -> u32 {
        match self {
            AddressFamily::V4 => 8,
            AddressFamily::V6 => 16,
        }
    }

    /// The flag `ip` takes to restrict itself to this family
    pub fn ip_flag(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "-4",
            AddressFamily::V6 => "-6",
        }
    }
}

/// Truncates `address` to its first `mask` bits, and returns the canonical
/// representation of the result: dotted decimal for IPv4, and uncompressed,
/// lower-case colon-hex for IPv6.
///
/// Returns None if `address` is not a valid literal of `family`, or if `mask`
/// is out of range for it.
///
/// ```
/// use arpview::{apply_mask, AddressFamily};
///
/// assert_eq!(apply_mask("192.0.2.77", 24, AddressFamily::V4).unwrap(), "192.0.2.0");
/// assert_eq!(
///     apply_mask("2001:db8::1", 32, AddressFamily::V6).unwrap(),
///     "2001:db8:0:0:0:0:0:0",
/// );
/// ```
pub fn apply_mask(address: &str, mask: i32, family: AddressFamily) -> Option<String> {
    if mask < 0 || mask > family.host_mask() {
        log::trace!("mask: prefix length {} out of range for {:?}", mask, family);
        return None;
    }

    let mut words: Vec<u16> = match family {
        AddressFamily::V4 => address
            .parse::<Ipv4Addr>()
            .ok()?
            .octets()
            .iter()
            .map(|&o| o as u16)
            .collect(),
        AddressFamily::V6 => address.parse::<Ipv6Addr>().ok()?.segments().to_vec(),
    };

    let width = family.word_bits();
    let mut remaining = mask as u32;
    for word in words.iter_mut() {
        let bits = remaining.min(width);
        *word &= leading_ones(bits, width);
        remaining -= bits;
    }

    let formatted: Vec<String> = match family {
        AddressFamily::V4 => words.iter().map(|w| w.to_string()).collect(),
        AddressFamily::V6 => words.iter().map(|w| format!("{:x}", w)).collect(),
    };
    Some(match family {
        AddressFamily::V4 => formatted.join("."),
        AddressFamily::V6 => formatted.join(":"),
    })
}

/// A `width` bit word with only its `bits` most significant bits set
#[inline]
fn leading_ones(bits: u32, width: u32) -> u16 {
    (((1_u32 << bits) - 1) << (width - bits)) as u16
}
