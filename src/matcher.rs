//! Longest-prefix matching of an address against configured interfaces.

use crate::{apply_mask, AddressCategory, AddressFamily, NetworkInterface};

/// Finds the logical interface on `device` that best owns `address`/`mask`,
/// and returns its name.
///
/// Every address, prefix and route entry of each interface on `device` is
/// a candidate. An entry matches if its prefix is no longer than `mask`, and
/// `address` truncated to that prefix equals the entry's own (truncated)
/// address. The longest matching prefix wins; among entries of equal length,
/// the first one encountered in `interfaces` order is kept.
///
/// Returns None if nothing matched, or if the longest match belongs to an
/// interface without a name.
pub fn find_interface<'a>(
    interfaces: &'a [NetworkInterface],
    device: &str,
    address: &str,
    mask: i32,
    family: AddressFamily,
) -> Option<&'a str> {
    let mut matching_iface: Option<&str> = None;
    let mut matching_prefix = -1;

    for ifc in interfaces.iter().filter(|i| i.serves_device(device)) {
        for category in AddressCategory::ALL {
            for entry in ifc.addresses(category) {
                let (cmp_addr, cmp_mask) = match (entry.resolved_address(), entry.mask) {
                    (Some(a), Some(m)) => (a, m),
                    _ => continue,
                };

                // the candidate must be at least as specific as the entry
                if mask < cmp_mask {
                    continue;
                }

                let (addr1, addr2) = match (
                    apply_mask(cmp_addr, cmp_mask, family),
                    apply_mask(address, cmp_mask, family),
                ) {
                    (Some(a1), Some(a2)) => (a1, a2),
                    _ => continue,
                };
                if addr1 != addr2 {
                    continue;
                }

                if cmp_mask > matching_prefix {
                    log::trace!(
                        "match: {} on {} matched {}/{} of {:?}",
                        address,
                        device,
                        cmp_addr,
                        cmp_mask,
                        ifc.name
                    );
                    matching_iface = ifc.name.as_deref();
                    matching_prefix = cmp_mask;
                }
            }
        }
    }

    matching_iface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AddressEntry;

    fn entry(address: &str, mask: i32) -> AddressEntry {
        AddressEntry {
            address: Some(address.into()),
            target: None,
            mask: Some(mask),
        }
    }

    fn route(target: &str, mask: i32) -> AddressEntry {
        AddressEntry {
            address: None,
            target: Some(target.into()),
            mask: Some(mask),
        }
    }

    fn iface(name: &str, device: &str, v4: Vec<AddressEntry>, routes: Vec<AddressEntry>) -> NetworkInterface {
        NetworkInterface {
            name: Some(name.into()),
            device: Some(device.into()),
            ipv4_address: v4,
            route: routes,
            ..Default::default()
        }
    }

    const V4: AddressFamily = AddressFamily::V4;

    #[test]
    fn test_longest_prefix_wins() {
        let _ = env_logger::try_init();
        let interfaces = vec![
            iface("wide", "eth0", vec![entry("10.1.0.0", 16)], vec![]),
            iface("narrow", "eth0", vec![entry("10.1.2.1", 24)], vec![]),
        ];
        assert_eq!(find_interface(&interfaces, "eth0", "10.1.2.9", 32, V4), Some("narrow"));
        assert_eq!(find_interface(&interfaces, "eth0", "10.1.3.9", 32, V4), Some("wide"));
        assert_eq!(find_interface(&interfaces, "eth0", "10.2.3.9", 32, V4), None);
    }

    #[test]
    fn test_default_route_is_last_resort() {
        let _ = env_logger::try_init();
        let interfaces = vec![
            iface("wan", "eth0", vec![], vec![route("0.0.0.0", 0)]),
            iface("lan", "eth0", vec![entry("192.168.1.1", 24)], vec![]),
        ];
        assert_eq!(find_interface(&interfaces, "eth0", "203.0.113.7", 32, V4), Some("wan"));
        assert_eq!(find_interface(&interfaces, "eth0", "8.8.8.8", 32, V4), Some("wan"));
        assert_eq!(find_interface(&interfaces, "eth0", "192.168.1.20", 32, V4), Some("lan"));
    }

    #[test]
    fn test_ties_keep_first_interface() {
        let _ = env_logger::try_init();
        let interfaces = vec![
            iface("first", "eth0", vec![entry("192.0.2.1", 24)], vec![]),
            iface("second", "eth0", vec![entry("192.0.2.2", 24)], vec![]),
        ];
        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.50", 32, V4), Some("first"));
    }

    #[test]
    fn test_device_filter() {
        let _ = env_logger::try_init();
        let mut pppoe = iface("wan", "eth1", vec![entry("100.64.0.2", 10)], vec![]);
        pppoe.l3_device = Some("pppoe-wan".into());
        let interfaces = vec![iface("lan", "br-lan", vec![entry("192.0.2.1", 24)], vec![]), pppoe];

        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.50", 32, V4), None);
        assert_eq!(find_interface(&interfaces, "br-lan", "192.0.2.50", 32, V4), Some("lan"));
        assert_eq!(find_interface(&interfaces, "pppoe-wan", "100.64.1.1", 32, V4), Some("wan"));
        assert_eq!(find_interface(&interfaces, "eth1", "100.64.1.1", 32, V4), Some("wan"));
    }

    #[test]
    fn test_candidate_less_specific_than_entry() {
        let _ = env_logger::try_init();
        let interfaces = vec![iface("lan", "eth0", vec![entry("192.0.2.1", 24)], vec![])];
        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.0", 16, V4), None);
        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.0", 24, V4), Some("lan"));
    }

    #[test]
    fn test_unusable_entries_are_skipped() {
        let _ = env_logger::try_init();
        let interfaces = vec![iface(
            "lan",
            "eth0",
            vec![
                AddressEntry::default(),
                entry("not-an-address", 8),
                entry("192.0.2.1", 40),
                AddressEntry {
                    address: Some("192.0.2.1".into()),
                    target: None,
                    mask: None,
                },
                entry("fd00::1", 64),
                entry("192.0.2.1", 26),
            ],
            vec![],
        )];
        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.20", 32, V4), Some("lan"));
        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.200", 32, V4), None);
    }

    #[test]
    fn test_unnamed_interface_shadows_shorter_match() {
        let _ = env_logger::try_init();
        let mut unnamed = iface("", "eth0", vec![entry("192.0.2.1", 28)], vec![]);
        unnamed.name = None;
        let interfaces = vec![unnamed, iface("lan", "eth0", vec![entry("192.0.2.1", 24)], vec![])];
        // the /28 owner has no name, so nothing is reported for its range
        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.5", 32, V4), None);
        // outside the /28, the named /24 still wins
        assert_eq!(find_interface(&interfaces, "eth0", "192.0.2.50", 32, V4), Some("lan"));
    }

    #[test]
    fn test_ipv6_prefix_assignment() {
        let _ = env_logger::try_init();
        let interfaces = vec![NetworkInterface {
            name: Some("lan".into()),
            device: Some("br-lan".into()),
            ipv6_prefix_assignment: vec![entry("fd12:3456:789a::", 60)],
            ..Default::default()
        }];
        let v6 = AddressFamily::V6;
        assert_eq!(
            find_interface(&interfaces, "br-lan", "fd12:3456:789a:3::42", 128, v6),
            Some("lan"),
        );
        assert_eq!(find_interface(&interfaces, "br-lan", "fd12:3456:789b::42", 128, v6), None);
    }
}
