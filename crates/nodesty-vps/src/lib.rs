//! VPS client and data models for the Nodesty API.
//!
//! Provides typed structures and an asynchronous client for VPS services:
//! state and graphs, power actions, passwords, reinstalls, backups, OS
//! templates and background tasks.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::VpsClient;
pub use models::{
    Bandwidth, BandwidthTotal, CpuUsage, IoSpeed, NetSpeed, NetworkSpeed, ResourceUsage,
    VpsAction, VpsActionRequest, VpsBackup, VpsBackupRestoreRequest, VpsChangePasswordRequest,
    VpsGraphs, VpsInfo, VpsOs, VpsOsTemplate, VpsReinstallRequest, VpsTask, VpsVnc,
};

/// Convenient result alias that reuses the shared Nodesty error type.
pub type Result<T> = nodesty_core::Result<T>;
