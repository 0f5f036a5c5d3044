//! Firewall client and data models for the Nodesty API.
//!
//! Provides typed structures and an asynchronous client for attack logs,
//! attack notifications, reverse DNS, port rules and firewall statistics.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::FirewallClient;
pub use models::{
    AttackDetails, AttackSeverity, AttackTypeCount, FirewallAttackLog, FirewallAttackNotification,
    FirewallAttackNotificationRequest, FirewallRdns, FirewallRdnsRequest, FirewallRule,
    FirewallRuleRef, FirewallRuleRequest, FirewallStats, RdnsStatus, RuleAction, RuleProtocol,
    TimeRange, TopAttacker,
};

/// Convenient result alias that reuses the shared Nodesty error type.
pub type Result<T> = nodesty_core::Result<T>;
