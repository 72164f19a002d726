use std::{collections::HashMap, fmt};

use crate::{find_interface, AddressFamily, NetworkInterface};

/// A single entry of the kernel neighbor table, as printed by `ip neigh show`:
///
/// ```text
/// 192.168.1.20 dev br-lan lladdr 00:11:22:33:44:55 REACHABLE
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRecord {
    pub address: String,
    pub flags: NeighborFlags,
    /// Neighbor state, e.g. `REACHABLE` or `STALE`
    pub state: String,
}

impl NeighborRecord {
    /// Parses a single line of `ip neigh show` output. Returns None if the
    /// line isn't of the form `<address> <flags...> <state>`, where the
    /// address is made up of lower-case hex digits, `.` and `:` only.
    pub fn from_line(line: &str) -> Option<Self> {
        let (address, rest) = line.split_once(' ')?;
        if address.is_empty() || !address.chars().all(is_address_char) {
            return None;
        }

        let (flags, state) = rest.rsplit_once(' ')?;
        if flags.is_empty() || state.is_empty() || state.contains(char::is_whitespace) {
            return None;
        }

        Some(Self {
            address: address.into(),
            flags: NeighborFlags::parse(flags),
            state: state.into(),
        })
    }

    /// Device this neighbor was seen on (`dev`)
    pub fn device(&self) -> Option<&str> {
        self.flags.get("dev")
    }

    /// Link layer address of this neighbor (`lladdr`), if it has been resolved
    pub fn hardware_address(&self) -> Option<&str> {
        self.flags.get("lladdr").filter(|a| !a.is_empty())
    }

    /// Whether the neighbor is flagged as a router
    pub fn is_router(&self) -> bool {
        self.flags.contains("router")
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.state == "FAILED"
    }
}

/// Flags of a [NeighborRecord], read as alternating key and value tokens.
///
/// A key at the very end with no value following it (e.g. `router`) is
/// recorded as present, without a value. Repeated keys keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborFlags(HashMap<String, Option<String>>);

impl NeighborFlags {
    pub fn parse(text: &str) -> Self {
        let mut flags = HashMap::new();
        let mut it = text.split_whitespace();
        while let Some(key) = it.next() {
            flags.insert(key.to_owned(), it.next().map(|v| v.to_owned()));
        }
        NeighborFlags(flags)
    }

    /// Value of `key`, if present and followed by a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// What to show in the interface column of a [NeighborRow]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceLabel {
    /// The logical interface the neighbor's address belongs to
    Network(String),
    /// No logical interface matched, so we fall back to the device name
    Device(String),
}

impl fmt::Display for InterfaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceLabel::Network(name) => write!(f, "{}", name),
            InterfaceLabel::Device(dev) => write!(f, "({})", dev),
        }
    }
}

/// One row of the rendered neighbor table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRow {
    pub address: String,
    /// Upper-cased link layer address
    pub hardware_address: String,
    pub interface: InterfaceLabel,
}

/// Parses `ip neigh show` output into table rows, resolving each neighbor
/// to the logical interface in `interfaces` that owns its address.
///
/// Lines that don't parse, are in `FAILED` state, carry a link-local IPv6
/// address, or have no link layer address are dropped. The remaining rows
/// keep the order of `text`, duplicates included.
pub fn parse_neighbors(
    text: &str,
    interfaces: &[NetworkInterface],
    family: AddressFamily,
) -> Vec<NeighborRow> {
    let mut rows = vec![];
    for line in text.trim().lines() {
        let record = match NeighborRecord::from_line(line) {
            Some(record) if !record.is_failed() => record,
            _ => {
                log::trace!("neigh: skipping unusable line '{}'", line);
                continue;
            }
        };
        if is_link_local(&record.address) {
            log::trace!("neigh: skipping link-local neighbor {}", record.address);
            continue;
        }
        let lladdr = match record.hardware_address() {
            Some(lladdr) => lladdr.to_uppercase(),
            None => {
                log::trace!("neigh: skipping {} without lladdr", record.address);
                continue;
            }
        };

        let interface = match record.device() {
            Some(dev) => {
                match find_interface(interfaces, dev, &record.address, family.host_mask(), family)
                {
                    Some(name) => InterfaceLabel::Network(name.to_owned()),
                    None => InterfaceLabel::Device(dev.to_owned()),
                }
            }
            None => InterfaceLabel::Device(UNKNOWN_DEVICE.into()),
        };

        rows.push(NeighborRow {
            address: record.address,
            hardware_address: lladdr,
            interface,
        });
    }
    log::debug!("neigh: parsed {} rows", rows.len());
    rows
}

#[inline]
fn is_address_char(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f' | ':' | '.')
}

/// Whether `address` starts with `fe8`..`fef`, optionally followed by one
/// more hex digit, and then a `:`
fn is_link_local(address: &str) -> bool {
    let rest = match address.strip_prefix("fe") {
        Some(rest) => rest,
        None => return false,
    };
    let mut chars = rest.chars();
    if !matches!(chars.next(), Some('8'..='9' | 'a'..='f')) {
        return false;
    }
    match chars.next() {
        Some(':') => true,
        Some(c) if c.is_ascii_hexdigit() && !c.is_ascii_uppercase() => chars.next() == Some(':'),
        _ => false,
    }
}

/// Label device used for neighbors that don't name one
const UNKNOWN_DEVICE: &str = "unknown";
