//! The dashboard widget: fetches its inputs, correlates them, and renders
//! the neighbor table.
//!
//! A render cycle goes through [ArpWidget::load], which yields a [Snapshot] of
//! everything fetched, then [Snapshot::table], which parses it into an
//! [ArpTable], and finally markup. Nothing is kept between cycles, so a widget
//! can be refreshed any number of times.

use crate::{
    parse_neighbors, AddressFamily, CommandOutput, CommandRunner, Device, DeviceListProvider,
    Element, InterfaceDumpProvider, NeighborRow, NetworkInterface, Result, SysfsDeviceList,
    SystemCommandRunner, UbusInterfaceDump,
};

/// The ARP table widget. Create one with [ArpWidget::system] to read from
/// the running router, or with [ArpWidget::new] to supply your own
/// collaborators.
pub struct ArpWidget<D = UbusInterfaceDump, C = SystemCommandRunner, L = SysfsDeviceList> {
    dump: D,
    runner: C,
    devices: L,
    family: AddressFamily,
    ip_command: String,
    labels: Labels,
}

impl ArpWidget {
    /// A widget backed by `ubus`, `/sbin/ip` and `/sys/class/net`
    pub fn system() -> Self {
        ArpWidget::new(
            UbusInterfaceDump::new(),
            SystemCommandRunner,
            SysfsDeviceList::new(),
        )
    }
}

impl<D, C, L> ArpWidget<D, C, L>
where
    D: InterfaceDumpProvider,
    C: CommandRunner,
    L: DeviceListProvider,
{
    pub fn new(dump: D, runner: C, devices: L) -> Self {
        ArpWidget {
            dump,
            runner,
            devices,
            family: AddressFamily::V4,
            ip_command: DEFAULT_IP_COMMAND.into(),
            labels: Labels::default(),
        }
    }

    /// Address family of the neighbor table to show. Defaults to IPv4.
    pub fn with_family(mut self, family: AddressFamily) -> Self {
        self.family = family;
        self
    }

    /// Path of the `ip` binary used to read the neighbor table
    pub fn with_ip_command<P: Into<String>>(mut self, ip_command: P) -> Self {
        self.ip_command = ip_command.into();
        self
    }

    /// Title and column headings, e.g. for a translated UI
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn title(&self) -> &str {
        &self.labels.title
    }

    /// Fetches the interface dump, the neighbor table and the device list,
    /// all at once.
    ///
    /// If reading the neighbor table fails, it is treated as empty. Failures
    /// of the other two fetches are returned as errors.
    pub async fn load(&self) -> Result<Snapshot> {
        let args = [self.family.ip_flag(), "neigh", "show"];
        let (interfaces, neighbors, devices) = tokio::join!(
            self.dump.interface_dump(),
            self.runner.exec(&self.ip_command, &args),
            self.devices.devices(),
        );

        let neighbors = neighbors.unwrap_or_else(|err| {
            log::warn!("widget: reading neighbor table failed, showing none: {}", err);
            CommandOutput::default()
        });
        let snapshot = Snapshot {
            family: self.family,
            interfaces: interfaces?,
            neighbors: neighbors.stdout,
            devices: devices?,
        };
        log::debug!(
            "widget: loaded {} interfaces, {} devices, {} bytes of neighbors",
            snapshot.interfaces.len(),
            snapshot.devices.len(),
            snapshot.neighbors.len()
        );
        Ok(snapshot)
    }

    /// Renders `snapshot` into the widget's markup
    pub fn render(&self, snapshot: &Snapshot) -> Element {
        let table = snapshot.table().to_element(&self.labels);
        Element::new("div")
            .attr("class", "router-status-lan dashboard-bg box-s1")
            .child(
                Element::new("div")
                    .attr("class", "lan-info devices-list")
                    .child(Element::new("hr"))
                    .child(table),
            )
    }

    /// Loads fresh data and renders it
    pub async fn refresh(&self) -> Result<Element> {
        let snapshot = self.load().await?;
        Ok(self.render(&snapshot))
    }
}

/// Everything fetched for a single render cycle
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub family: AddressFamily,
    pub interfaces: Vec<NetworkInterface>,
    /// Raw `ip neigh show` output
    pub neighbors: String,
    /// Not needed to build the table, but fetched along with the rest
    pub devices: Vec<Device>,
}

impl Snapshot {
    /// Parses the neighbor table, and matches it against the interfaces
    pub fn table(&self) -> ArpTable {
        ArpTable {
            family: self.family,
            rows: parse_neighbors(&self.neighbors, &self.interfaces, self.family),
        }
    }
}

/// The rows to show, ready to be turned into markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpTable {
    pub family: AddressFamily,
    pub rows: Vec<NeighborRow>,
}

impl ArpTable {
    /// A `table` with a header row, followed by one row per neighbor
    pub fn to_element(&self, labels: &Labels) -> Element {
        let header = Element::new("tr")
            .attr("class", "tr table-titles dashboard-bg")
            .child(
                Element::new("th")
                    .attr("class", "th nowrap")
                    .text(labels.address(self.family)),
            )
            .child(Element::new("th").attr("class", "th").text(&labels.mac_address))
            .child(Element::new("th").attr("class", "th").text(&labels.interface));

        self.rows.iter().fold(
            Element::new("table")
                .attr("class", "table assoclist devices-info")
                .child(header),
            |table, row| {
                table.child(
                    Element::new("tr")
                        .attr("class", "tr")
                        .child(Element::new("td").attr("class", "td").text(&row.address))
                        .child(
                            Element::new("td")
                                .attr("class", "td")
                                .text(&row.hardware_address),
                        )
                        .child(
                            Element::new("td").attr("class", "td").child(
                                Element::new("span")
                                    .attr("class", "ifacebadge")
                                    .text(&row.interface.to_string()),
                            ),
                        ),
                )
            },
        )
    }
}

/// User visible strings of the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub title: String,
    pub ipv4_address: String,
    pub ipv6_address: String,
    pub mac_address: String,
    pub interface: String,
}

impl Labels {
    /// Heading of the address column for `family`
    pub fn address(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.ipv4_address,
            AddressFamily::V6 => &self.ipv6_address,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            title: "Arp table".into(),
            ipv4_address: "IPv4 address".into(),
            ipv6_address: "IPv6 address".into(),
            mac_address: "MAC address".into(),
            interface: "Interface".into(),
        }
    }
}

const DEFAULT_IP_COMMAND: &str = "/sbin/ip";
