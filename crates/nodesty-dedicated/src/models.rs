//! Dedicated server models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of a dedicated server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedInfo {
    /// Server ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Power or provisioning state as reported by the API.
    pub status: String,
    /// Primary IP address.
    pub ip: String,
    /// Installed OS.
    pub os: String,
    /// CPU description.
    pub cpu: String,
    /// Memory description.
    pub memory: String,
    /// Disk description.
    pub disk: String,
    /// Uptime description.
    pub uptime: String,
    /// Datacenter location.
    pub location: String,
}

/// Processor details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedCpuInfo {
    /// Model name.
    pub model: String,
    /// Physical cores.
    pub cores: u32,
    /// Hardware threads.
    pub threads: u32,
    /// Clock frequency.
    pub frequency: String,
    /// Cache size.
    pub cache: String,
}

/// Memory details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedMemoryInfo {
    /// Installed capacity.
    pub total: String,
    /// Module type, e.g. DDR4.
    #[serde(rename = "type")]
    pub kind: String,
    /// Module speed.
    pub speed: String,
}

/// A physical drive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedDrive {
    /// Model name.
    pub model: String,
    /// Capacity.
    pub size: String,
    /// Drive type, e.g. NVMe.
    #[serde(rename = "type")]
    pub kind: String,
    /// Bus interface.
    pub interface: String,
}

/// Storage details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedStorageInfo {
    /// Installed drives.
    #[serde(default)]
    pub drives: Vec<DedicatedDrive>,
}

/// A network interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedNetworkInterface {
    /// Interface name.
    pub name: String,
    /// Link speed.
    pub speed: String,
    /// Interface type.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Network details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedNetworkInfo {
    /// Installed interfaces.
    #[serde(default)]
    pub interfaces: Vec<DedicatedNetworkInterface>,
}

/// Hardware inventory of a dedicated server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedHardware {
    /// Processor.
    pub cpu: DedicatedCpuInfo,
    /// Memory.
    pub memory: DedicatedMemoryInfo,
    /// Storage.
    pub storage: DedicatedStorageInfo,
    /// Network.
    pub network: DedicatedNetworkInfo,
}

/// Power action for a dedicated server.
///
/// The API accepts both the IPMI-style names and the short aliases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DedicatedAction {
    /// Power on.
    #[serde(rename = "setPowerOn")]
    SetPowerOn,
    /// Power off.
    #[serde(rename = "setPowerOff")]
    SetPowerOff,
    /// Power cycle.
    #[serde(rename = "setPowerReset")]
    SetPowerReset,
    /// Alias accepted by the API.
    #[serde(rename = "start")]
    Start,
    /// Alias accepted by the API.
    #[serde(rename = "stop")]
    Stop,
    /// Alias accepted by the API.
    #[serde(rename = "restart")]
    Restart,
    /// Alias accepted by the API.
    #[serde(rename = "reset")]
    Reset,
}

impl DedicatedAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetPowerOn => "setPowerOn",
            Self::SetPowerOff => "setPowerOff",
            Self::SetPowerReset => "setPowerReset",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for DedicatedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST .../dedicated/action`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedActionRequest {
    /// Action to perform.
    pub action: DedicatedAction,
}

/// Installable OS template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DedicatedOsTemplate {
    /// Template ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Release.
    pub version: String,
    /// CPU architecture.
    pub architecture: String,
    /// Family, e.g. linux or windows.
    pub category: String,
}

/// Body of `POST .../dedicated/reinstall`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DedicatedReinstallRequest {
    /// Template ID from [`DedicatedOsTemplate`].
    pub os_template_id: String,
    /// Hostname for the fresh install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Root password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Authorized SSH public keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<String>,
}

impl DedicatedReinstallRequest {
    /// Request a reinstall with the given template and nothing else.
    pub fn new(os_template_id: impl Into<String>) -> Self {
        Self {
            os_template_id: os_template_id.into(),
            hostname: None,
            password: None,
            ssh_keys: Vec::new(),
        }
    }

    /// Set the hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the root password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Add an SSH public key.
    #[must_use]
    pub fn with_ssh_key(mut self, key: impl Into<String>) -> Self {
        self.ssh_keys.push(key.into());
        self
    }
}

impl fmt::Debug for DedicatedReinstallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedicatedReinstallRequest")
            .field("os_template_id", &self.os_template_id)
            .field("hostname", &self.hostname)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("ssh_keys", &self.ssh_keys.len())
            .finish()
    }
}

/// Reinstall state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReinstallState {
    /// Queued.
    Pending,
    /// Running.
    InProgress,
    /// Finished.
    Completed,
    /// Failed.
    Failed,
    /// Any state this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Progress of a running or finished reinstall.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DedicatedReinstallStatus {
    /// Current state.
    pub status: ReinstallState,
    /// Percent complete.
    pub progress: f64,
    /// Status message.
    pub message: String,
    /// Start timestamp.
    pub started_at: String,
    /// Completion timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Task state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Queued.
    Pending,
    /// Running.
    Running,
    /// Finished.
    Completed,
    /// Failed.
    Failed,
    /// Any state this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Background task on a dedicated server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DedicatedTask {
    /// Task ID.
    pub id: String,
    /// Task type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Current state.
    pub status: TaskState,
    /// Percent complete.
    pub progress: f64,
    /// Status message.
    pub message: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Start timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Completion timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_wire_names() {
        for (action, wire) in [
            (DedicatedAction::SetPowerOn, "setPowerOn"),
            (DedicatedAction::SetPowerReset, "setPowerReset"),
            (DedicatedAction::Reset, "reset"),
        ] {
            let body = DedicatedActionRequest { action };
            assert_eq!(serde_json::to_value(body).unwrap(), json!({ "action": wire }));
            assert_eq!(action.to_string(), wire);
        }
    }

    #[test]
    fn reinstall_request_skips_unset_fields() {
        let request = DedicatedReinstallRequest::new("debian-12");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"osTemplateId": "debian-12"})
        );

        let request = request
            .with_hostname("db-1")
            .with_password("s3cret")
            .with_ssh_key("ssh-ed25519 AAAA");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sshKeys"], json!(["ssh-ed25519 AAAA"]));
        assert!(!format!("{request:?}").contains("s3cret"));
    }

    #[test]
    fn reinstall_status_decodes_snake_case_state() {
        let status: DedicatedReinstallStatus = serde_json::from_value(json!({
            "status": "in_progress",
            "progress": 35,
            "message": "Writing image",
            "startedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(status.status, ReinstallState::InProgress);
        assert!(status.completed_at.is_none());
    }
}
