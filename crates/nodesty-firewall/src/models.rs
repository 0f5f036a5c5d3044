//! Firewall models: attack logs, notifications, rDNS, rules and statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attack severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AttackSeverity {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
    /// Critical.
    Critical,
    /// Any severity this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Packet-level details of an attack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttackDetails {
    /// Attacking address.
    pub source_ip: String,
    /// Targeted port.
    pub target_port: u16,
    /// Protocol.
    pub protocol: String,
    /// Packets seen.
    pub packets: u64,
    /// Bytes seen.
    pub bytes: u64,
}

/// A logged attack against a protected IP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FirewallAttackLog {
    /// Log entry ID.
    pub id: String,
    /// Protected IP.
    pub ip: String,
    /// Attack classification.
    pub attack_type: String,
    /// Severity.
    pub severity: AttackSeverity,
    /// Detection timestamp.
    pub timestamp: String,
    /// Whether the attack was mitigated.
    pub blocked: bool,
    /// Packet-level details.
    pub details: AttackDetails,
}

/// Current attack notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirewallAttackNotification {
    /// Whether notifications are on.
    pub enabled: bool,
    /// Notification email address.
    pub email: String,
    /// Notification webhook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Minimum severity that triggers a notification.
    pub severity: AttackSeverity,
}

/// Body of `PUT .../attack-notification`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FirewallAttackNotificationRequest {
    /// Turn notifications on or off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Notification email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Notification webhook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Email notifications toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notification: Option<bool>,
    /// Discord webhook; an empty string clears it.
    #[serde(
        rename = "discordWebhookURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discord_webhook_url: Option<String>,
    /// Minimum severity that triggers a notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<AttackSeverity>,
}

/// rDNS record state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RdnsStatus {
    /// Live.
    Active,
    /// Propagating.
    Pending,
    /// Rejected.
    Failed,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Reverse DNS record of an IP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRdns {
    /// IP address.
    pub ip: String,
    /// PTR hostname.
    pub hostname: String,
    /// Record state.
    pub status: RdnsStatus,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Body of `PUT .../rdns`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirewallRdnsRequest {
    /// PTR hostname.
    pub hostname: String,
}

/// Protocol matched by a rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleProtocol {
    /// TCP only.
    Tcp,
    /// UDP only.
    Udp,
    /// TCP and UDP.
    Both,
    /// Any protocol this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// What a rule does with matching traffic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Let traffic through.
    Allow,
    /// Drop traffic.
    Deny,
    /// Any action this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// A firewall rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    /// Rule ID.
    pub id: String,
    /// Port.
    pub port: u16,
    /// Protocol.
    pub protocol: RuleProtocol,
    /// Action.
    pub action: RuleAction,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the rule is active.
    pub enabled: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// Body of `POST .../rules`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleRequest {
    /// Port to open.
    pub port: u16,
    /// Application profile ID.
    pub app_id: u64,
}

/// How a rule is addressed when deleting it: by ID or by sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FirewallRuleRef {
    /// Rule ID as returned in [`FirewallRule::id`].
    Id(String),
    /// Position in the rule list.
    Sequence(u32),
}

impl fmt::Display for FirewallRuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::Sequence(sequence) => write!(f, "{sequence}"),
        }
    }
}

impl From<u32> for FirewallRuleRef {
    fn from(sequence: u32) -> Self {
        Self::Sequence(sequence)
    }
}

impl From<&str> for FirewallRuleRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for FirewallRuleRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<&FirewallRule> for FirewallRuleRef {
    fn from(rule: &FirewallRule) -> Self {
        Self::Id(rule.id.clone())
    }
}

/// An address in the top attackers list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopAttacker {
    /// Attacking address.
    pub ip: String,
    /// Attack count.
    pub attacks: u64,
    /// Country of origin.
    pub country: String,
}

/// Attack count per classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttackTypeCount {
    /// Classification.
    #[serde(rename = "type")]
    pub kind: String,
    /// Attack count.
    pub count: u64,
}

/// Period covered by a statistics entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRange {
    /// Period start.
    pub start: String,
    /// Period end.
    pub end: String,
}

/// Firewall statistics for one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FirewallStats {
    /// Attacks detected.
    pub total_attacks: u64,
    /// Attacks mitigated.
    pub blocked_attacks: u64,
    /// Legitimate connections let through.
    pub allowed_connections: u64,
    /// Most active attackers.
    #[serde(default)]
    pub top_attackers: Vec<TopAttacker>,
    /// Attacks per classification.
    #[serde(default)]
    pub attacks_by_type: Vec<AttackTypeCount>,
    /// Period covered.
    pub time_range: TimeRange,
}
