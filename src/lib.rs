//! Library that renders the ARP table widget of a router dashboard: the
//! kernel's IPv4 neighbor table, with each neighbor attributed to the
//! configured network interface that owns its address.
//!
//! ## Examples
//! ```no_run
//! use arpview::*;
//!
//! // render the widget straight off the running router
//! async fn render_widget() -> Result<String> {
//!     let widget = ArpWidget::system();
//!     let html = widget.refresh().await?;
//!     Ok(html.to_string())
//! }
//!
//! // or work with the parsed rows directly
//! async fn print_neighbors() -> Result<()> {
//!     let widget = ArpWidget::system();
//!     let snapshot = widget.load().await?;
//!     for row in &snapshot.table().rows {
//!         println!("{} {} {}", row.address, row.hardware_address, row.interface);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The building blocks are usable on their own too:
//! ```
//! use arpview::*;
//!
//! let lan = NetworkInterface {
//!     name: Some("lan".into()),
//!     device: Some("eth0".into()),
//!     ipv4_address: vec![AddressEntry {
//!         address: Some("192.0.2.1".into()),
//!         target: None,
//!         mask: Some(24),
//!     }],
//!     ..Default::default()
//! };
//! let rows = parse_neighbors(
//!     "192.0.2.5 dev eth0 lladdr 00:11:22:33:44:55 REACHABLE",
//!     &[lan],
//!     AddressFamily::V4,
//! );
//! assert_eq!(rows[0].interface.to_string(), "lan");
//! ```

mod error;
pub use error::*;

mod markup;
pub use markup::*;

mod mask;
pub use mask::*;

mod matcher;
pub use matcher::*;

mod models;
pub use models::*;

mod provider;
pub use provider::*;

mod widget;
pub use widget::*;
