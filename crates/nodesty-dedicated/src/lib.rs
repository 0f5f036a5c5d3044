//! Dedicated server client and data models for the Nodesty API.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::DedicatedClient;
pub use models::{
    DedicatedAction, DedicatedActionRequest, DedicatedCpuInfo, DedicatedDrive, DedicatedHardware,
    DedicatedInfo, DedicatedMemoryInfo, DedicatedNetworkInfo, DedicatedNetworkInterface,
    DedicatedOsTemplate, DedicatedReinstallRequest, DedicatedReinstallStatus,
    DedicatedStorageInfo, DedicatedTask, ReinstallState, TaskState,
};

/// Convenient result alias that reuses the shared Nodesty error type.
pub type Result<T> = nodesty_core::Result<T>;
