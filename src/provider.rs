//! Collaborators the widget fetches its data from, along with the
//! implementations that talk to the running system.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

use crate::{CommandOutput, Device, Error, NetworkInterface, Result};

/// Source of the network configuration snapshot
#[async_trait]
pub trait InterfaceDumpProvider: Send + Sync {
    async fn interface_dump(&self) -> Result<Vec<NetworkInterface>>;
}

/// Runs a command and collects its stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn exec(&self, command: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Source of the list of kernel network devices
#[async_trait]
pub trait DeviceListProvider: Send + Sync {
    async fn devices(&self) -> Result<Vec<Device>>;
}

/// A [CommandRunner] that spawns processes on this host. A command that
/// exits unsuccessfully results in [Error::CommandFailed].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn exec(&self, command: &str, args: &[&str]) -> Result<CommandOutput> {
        log::trace!("exec: running {} {:?}", command, args);
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: std::iter::once(command)
                    .chain(args.iter().copied())
                    .collect::<Vec<_>>()
                    .join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(CommandOutput {
            stdout: String::from_utf8(output.stdout)?,
        })
    }
}

/// Fetches the interface dump by calling `network.interface dump` over
/// `ubus`, and parsing the JSON reply.
pub struct UbusInterfaceDump<R = SystemCommandRunner> {
    runner: R,
    ubus: String,
}

impl UbusInterfaceDump<SystemCommandRunner> {
    /// Uses the `ubus` binary found on `PATH`
    pub fn new() -> Self {
        Self::with_runner(SystemCommandRunner)
    }
}

impl Default for UbusInterfaceDump<SystemCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> UbusInterfaceDump<R> {
    pub fn with_runner(runner: R) -> Self {
        UbusInterfaceDump {
            runner,
            ubus: DEFAULT_UBUS.into(),
        }
    }

    /// Path of the `ubus` binary to call
    pub fn with_ubus<P: Into<String>>(mut self, ubus: P) -> Self {
        self.ubus = ubus.into();
        self
    }
}

#[async_trait]
impl<R: CommandRunner> InterfaceDumpProvider for UbusInterfaceDump<R> {
    async fn interface_dump(&self) -> Result<Vec<NetworkInterface>> {
        let output = self
            .runner
            .exec(&self.ubus, &["call", "network.interface", "dump"])
            .await?;
        let reply: serde_json::Value = serde_json::from_str(&output.stdout)?;
        let interfaces = NetworkInterface::from_dump(&reply);
        log::debug!("dump: received {} interfaces", interfaces.len());
        Ok(interfaces)
    }
}

/// Lists devices from the entries of a sysfs `class/net` directory
#[derive(Debug, Clone)]
pub struct SysfsDeviceList {
    path: PathBuf,
}

impl SysfsDeviceList {
    pub fn new() -> Self {
        Self::at(DEFAULT_SYSFS_NET)
    }

    /// Lists the entries of `path` instead of `/sys/class/net`
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        SysfsDeviceList {
            path: path.as_ref().to_owned(),
        }
    }
}

impl Default for SysfsDeviceList {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceListProvider for SysfsDeviceList {
    async fn devices(&self) -> Result<Vec<Device>> {
        let mut dir = tokio::fs::read_dir(&self.path).await?;
        let mut devices = vec![];
        while let Some(entry) = dir.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                devices.push(Device { name: name.into() });
            } else {
                log::debug!("devices: skipping non utf8 entry {:?}", entry.file_name());
            }
        }
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(devices)
    }
}

const DEFAULT_UBUS: &str = "ubus";
const DEFAULT_SYSFS_NET: &str = "/sys/class/net";
