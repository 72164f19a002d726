//! All structured models of the neighbor table and the interface dump

mod interface;
pub use interface::*;

mod neighbor;
pub use neighbor::*;

/// A kernel network device, e.g. `eth0` or `br-lan`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
}

/// Output of a command run through a [CommandRunner](crate::CommandRunner)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
}
