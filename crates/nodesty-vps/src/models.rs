//! VPS models shared by the client and its tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// VNC console access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VpsVnc {
    /// Whether the console is enabled.
    pub enabled: bool,
    /// Console host.
    pub ip: String,
    /// Console port, as returned by the API.
    pub port: String,
    /// Console password.
    pub password: String,
}

/// Installed operating system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VpsOs {
    /// Display name.
    pub name: String,
    /// Distribution identifier.
    pub distro: String,
}

/// Usage of a bounded resource (disk, RAM or inodes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceUsage {
    /// Allocation. Bytes for disk and RAM, a count for inodes.
    pub limit: u64,
    /// Amount in use.
    pub used: u64,
    /// Amount left.
    pub free: u64,
    /// Percentage in use.
    pub percent: f64,
}

/// CPU allocation and usage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CpuUsage {
    /// Manufacturer.
    #[serde(rename = "manu")]
    pub manufacturer: String,
    /// Allocation in MHz.
    pub limit: f64,
    /// MHz in use.
    pub used: f64,
    /// MHz left.
    pub free: f64,
    /// Percentage in use.
    pub percent: f64,
    /// Core count.
    pub cores: u32,
}

/// Port speed in Mbps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetSpeed {
    /// Inbound Mbps.
    #[serde(rename = "in")]
    pub inbound: f64,
    /// Outbound Mbps.
    #[serde(rename = "out")]
    pub outbound: f64,
}

/// Bandwidth totals in bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandwidthTotal {
    /// Inbound plus outbound.
    pub usage: f64,
    /// Inbound bytes.
    #[serde(rename = "in")]
    pub inbound: f64,
    /// Outbound bytes.
    #[serde(rename = "out")]
    pub outbound: f64,
}

/// Bandwidth totals plus a time series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bandwidth {
    /// Totals for the period.
    pub total: BandwidthTotal,
    /// Combined usage per sample.
    #[serde(default)]
    pub usage: Vec<f64>,
    /// Inbound usage per sample.
    #[serde(rename = "in", default)]
    pub inbound: Vec<f64>,
    /// Outbound usage per sample.
    #[serde(rename = "out", default)]
    pub outbound: Vec<f64>,
    /// Sample labels.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Full state of a VPS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VpsInfo {
    /// Internal VPS ID.
    pub vps_id: u64,
    /// Hypervisor guest ID.
    pub proxmox_id: u64,
    /// Hostname.
    pub hostname: String,
    /// Remaining OS reinstalls.
    pub os_reinstall_limit: u32,
    /// Whether the VPS is running.
    pub status: bool,
    /// Console access.
    pub vnc: VpsVnc,
    /// Installed OS.
    pub os: VpsOs,
    /// Disk usage.
    pub disk: ResourceUsage,
    /// Assigned IP addresses.
    #[serde(default)]
    pub ips: Vec<String>,
    /// CPU usage.
    pub cpu: CpuUsage,
    /// RAM usage.
    pub ram: ResourceUsage,
    /// Inode usage.
    pub inode: ResourceUsage,
    /// Port speed.
    pub netspeed: NetSpeed,
    /// Bandwidth usage.
    pub bandwidth: Bandwidth,
}

/// Power action for a VPS.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VpsAction {
    /// Boot.
    Start,
    /// Graceful shutdown.
    Stop,
    /// Graceful reboot.
    Restart,
    /// Hard power off.
    #[serde(rename = "poweroff")]
    PowerOff,
}

impl VpsAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::PowerOff => "poweroff",
        }
    }
}

impl fmt::Display for VpsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST .../vps/action`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VpsActionRequest {
    /// Action to perform.
    pub action: VpsAction,
}

/// Body of `POST .../vps/change-password`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VpsChangePasswordRequest {
    /// Account to change.
    pub username: String,
    /// New password.
    pub password: String,
}

impl fmt::Debug for VpsChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VpsChangePasswordRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST .../vps/reinstall`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpsReinstallRequest {
    /// Root password for the fresh install.
    pub password: String,
    /// Template ID from [`VpsOsTemplate`].
    pub os_id: u64,
}

impl fmt::Debug for VpsReinstallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VpsReinstallRequest")
            .field("password", &"[REDACTED]")
            .field("os_id", &self.os_id)
            .finish()
    }
}

/// A stored backup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpsBackup {
    /// Backup date, used as a path segment when restoring.
    pub date: String,
    /// Backup file name, used as a path segment when restoring.
    pub file: String,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST .../vps/backups/{date}/{file}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VpsBackupRestoreRequest {
    /// Backup date.
    pub date: String,
    /// Backup file name.
    pub file: String,
}

/// Installable OS template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VpsOsTemplate {
    /// Template ID.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// Background task on a VPS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpsTask {
    /// What the task does.
    pub action: String,
    /// Progress, e.g. `"50%"`.
    pub progress: String,
    /// Start time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub started_at: DateTime<Utc>,
    /// End time; absent while running.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub ended_at: Option<DateTime<Utc>>,
}

impl VpsTask {
    /// Progress as a number, if the string parses.
    #[must_use]
    pub fn progress_percent(&self) -> Option<f64> {
        self.progress.trim().trim_end_matches('%').trim().parse().ok()
    }
}

/// Disk I/O series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IoSpeed {
    /// Read speed per sample.
    #[serde(default)]
    pub read: Vec<f64>,
    /// Write speed per sample.
    #[serde(default)]
    pub write: Vec<f64>,
    /// Unix timestamp of each sample.
    #[serde(default)]
    pub categories: Vec<i64>,
}

/// Network throughput series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSpeed {
    /// Download speed per sample.
    #[serde(default)]
    pub download: Vec<f64>,
    /// Upload speed per sample.
    #[serde(default)]
    pub upload: Vec<f64>,
    /// Unix timestamp of each sample.
    #[serde(default)]
    pub categories: Vec<i64>,
}

/// Monitoring graphs for a VPS.
///
/// The `*_usage` maps are keyed by sample label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VpsGraphs {
    /// Average download speed.
    pub avg_download: f64,
    /// Average upload speed.
    pub avg_upload: f64,
    /// Average disk read speed.
    pub avg_io_read: f64,
    /// Average disk write speed.
    pub avg_io_write: f64,
    /// CPU usage percent per sample.
    #[serde(default)]
    pub cpu_usage: BTreeMap<String, f64>,
    /// Inode count per sample.
    #[serde(default)]
    pub inode_usage: BTreeMap<String, f64>,
    /// RAM bytes per sample.
    #[serde(default)]
    pub ram_usage: BTreeMap<String, f64>,
    /// Disk bytes per sample.
    #[serde(default)]
    pub disk_usage: BTreeMap<String, f64>,
    /// Disk I/O series.
    pub io_speed: IoSpeed,
    /// Network throughput series.
    pub network_speed: NetworkSpeed,
}
