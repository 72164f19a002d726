use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A logical network interface, as reported by `network.interface dump`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterface {
    /// Logical name, e.g. `lan` or `wan6`
    #[serde(rename = "interface")]
    pub name: Option<String>,
    /// Physical device the interface is configured on
    pub device: Option<String>,
    /// Layer 3 device, which may differ from [NetworkInterface::device]
    /// (e.g. for PPPoE or tunnel interfaces)
    pub l3_device: Option<String>,
    #[serde(rename = "ipv4-address", default, deserialize_with = "lenient_entries")]
    pub ipv4_address: Vec<AddressEntry>,
    #[serde(rename = "ipv6-address", default, deserialize_with = "lenient_entries")]
    pub ipv6_address: Vec<AddressEntry>,
    #[serde(rename = "ipv6-prefix", default, deserialize_with = "lenient_entries")]
    pub ipv6_prefix: Vec<AddressEntry>,
    #[serde(rename = "ipv6-prefix-assignment", default, deserialize_with = "lenient_entries")]
    pub ipv6_prefix_assignment: Vec<AddressEntry>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub route: Vec<AddressEntry>,
}

impl NetworkInterface {
    /// Parses the reply of a `network.interface dump` call. Entries of the
    /// `interface` array that aren't valid interface objects are skipped, and
    /// a reply without that array is treated as having no interfaces.
    pub fn from_dump(reply: &Value) -> Vec<Self> {
        let entries = match reply.get("interface").and_then(Value::as_array) {
            Some(entries) => entries,
            None => {
                log::debug!("dump: reply has no interface list");
                return vec![];
            }
        };

        entries
            .iter()
            .filter_map(|entry| {
                if !entry.is_object() {
                    log::error!("dump: skipping non-object interface entry {}", entry);
                    return None;
                }
                match NetworkInterface::deserialize(entry) {
                    Ok(ifc) => Some(ifc),
                    Err(err) => {
                        log::error!("dump: skipping malformed interface entry: {}", err);
                        None
                    }
                }
            })
            .collect()
    }

    /// Whether this interface runs on `device`, either as its device or
    /// its layer 3 device
    pub fn serves_device(&self, device: &str) -> bool {
        self.device.as_deref() == Some(device) || self.l3_device.as_deref() == Some(device)
    }

    /// Address entries configured under `category`
    pub fn addresses(&self, category: AddressCategory) -> &[AddressEntry] {
        match category {
            AddressCategory::Ipv4Address => &self.ipv4_address,
            AddressCategory::Ipv6Address => &self.ipv6_address,
            AddressCategory::Ipv6Prefix => &self.ipv6_prefix,
            AddressCategory::Ipv6PrefixAssignment => &self.ipv6_prefix_assignment,
            AddressCategory::Route => &self.route,
        }
    }
}

/// The lists of addresses an interface can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressCategory {
    Ipv4Address,
    Ipv6Address,
    Ipv6Prefix,
    Ipv6PrefixAssignment,
    Route,
}

impl AddressCategory {
    /// All categories, in the order they're searched
    pub const ALL: [AddressCategory; 5] = [
        AddressCategory::Ipv4Address,
        AddressCategory::Ipv6Address,
        AddressCategory::Ipv6Prefix,
        AddressCategory::Ipv6PrefixAssignment,
        AddressCategory::Route,
    ];
}

/// A single address (or route) configured on a [NetworkInterface]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressEntry {
    pub address: Option<String>,
    /// Only set for route entries
    pub target: Option<String>,
    /// Prefix length
    pub mask: Option<i32>,
}

/// Decodes an address list one entry at a time, dropping the entries that
/// don't decode. Anything other than an array (e.g. `null`) is an empty list.
fn lenient_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<AddressEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        _ => return Ok(vec![]),
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match AddressEntry::deserialize(&entry) {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::trace!("dump: skipping address entry {}: {}", entry, err);
                None
            }
        })
        .collect())
}

impl AddressEntry {
    /// The address of this entry, falling back to the route target
    pub fn resolved_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .filter(|a| !a.is_empty())
            .or_else(|| self.target.as_deref().filter(|t| !t.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_dump() -> Value {
        json!({
            "interface": [
                {
                    "interface": "lan",
                    "up": true,
                    "device": "br-lan",
                    "l3_device": "br-lan",
                    "ipv4-address": [ { "address": "192.168.1.1", "mask": 24 } ],
                    "ipv6-address": [],
                    "ipv6-prefix-assignment": [
                        {
                            "address": "fd12:3456:789a::",
                            "mask": 60,
                            "local-address": { "address": "fd12:3456:789a::1", "mask": 60 }
                        }
                    ],
                    "route": []
                },
                "not an interface",
                {
                    "interface": "wan",
                    "device": "eth1",
                    "l3_device": "pppoe-wan",
                    "route": [ { "target": "0.0.0.0", "mask": 0, "nexthop": "10.64.0.1" } ]
                },
                { "interface": 42 }
            ]
        })
    }

    #[test]
    fn test_parse_dump() {
        let _ = env_logger::try_init();
        let interfaces = NetworkInterface::from_dump(&sample_dump());
        assert_eq!(interfaces.len(), 2);

        let lan = &interfaces[0];
        assert_eq!(lan.name.as_deref(), Some("lan"));
        assert_eq!(lan.ipv4_address.len(), 1);
        assert_eq!(lan.ipv4_address[0].mask, Some(24));
        assert_eq!(lan.ipv6_prefix_assignment[0].mask, Some(60));
        assert!(lan.ipv6_prefix.is_empty());

        let wan = &interfaces[1];
        assert!(wan.ipv4_address.is_empty());
        assert_eq!(wan.addresses(AddressCategory::Route)[0].resolved_address(), Some("0.0.0.0"));
    }

    #[test]
    fn test_bad_address_entries_keep_interface() {
        let _ = env_logger::try_init();
        let dump = json!({
            "interface": [
                {
                    "interface": "lan",
                    "device": "eth0",
                    "ipv4-address": [ { "address": "192.0.2.1", "mask": 24 } ],
                    "route": [
                        { "target": "198.51.100.0", "mask": "24" },
                        "0.0.0.0/0",
                        { "target": "0.0.0.0", "mask": 0 }
                    ]
                },
                {
                    "interface": "wan",
                    "device": "eth1",
                    "ipv4-address": [ { "address": "203.0.113.10", "mask": 24 } ],
                    "ipv6-address": { "address": "2001:db8::1" },
                    "ipv6-prefix": null
                }
            ]
        });
        let interfaces = NetworkInterface::from_dump(&dump);
        assert_eq!(interfaces.len(), 2);

        let lan = &interfaces[0];
        assert_eq!(lan.ipv4_address.len(), 1);
        assert_eq!(lan.route.len(), 1);
        assert_eq!(lan.route[0].mask, Some(0));

        let wan = &interfaces[1];
        assert_eq!(wan.ipv4_address.len(), 1);
        assert!(wan.ipv6_address.is_empty());
        assert!(wan.ipv6_prefix.is_empty());

        let rows = crate::parse_neighbors(
            "192.0.2.5 dev eth0 lladdr 00:11:22:33:44:55 REACHABLE",
            &interfaces,
            crate::AddressFamily::V4,
        );
        assert_eq!(rows[0].interface.to_string(), "lan");
    }

    #[test]
    fn test_dump_without_interfaces() {
        let _ = env_logger::try_init();
        assert!(NetworkInterface::from_dump(&json!({})).is_empty());
        assert!(NetworkInterface::from_dump(&json!({ "interface": {} })).is_empty());
    }

    #[test]
    fn test_serves_device() {
        let _ = env_logger::try_init();
        let interfaces = NetworkInterface::from_dump(&sample_dump());
        let wan = &interfaces[1];
        assert!(wan.serves_device("eth1"));
        assert!(wan.serves_device("pppoe-wan"));
        assert!(!wan.serves_device("br-lan"));
        assert!(!wan.serves_device("eth"));
    }

    #[test]
    fn test_resolved_address() {
        let entry = AddressEntry {
            address: Some("".into()),
            target: Some("10.0.0.0".into()),
            mask: Some(8),
        };
        assert_eq!(entry.resolved_address(), Some("10.0.0.0"));
        assert!(AddressEntry::default().resolved_address().is_none());
    }
}
