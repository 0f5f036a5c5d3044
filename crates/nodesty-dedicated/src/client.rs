//! Asynchronous dedicated server client implementation.

use crate::models::{
    DedicatedAction, DedicatedActionRequest, DedicatedHardware, DedicatedInfo,
    DedicatedOsTemplate, DedicatedReinstallRequest, DedicatedReinstallStatus, DedicatedTask,
};
use crate::Result;
use nodesty_core::{ApiConfig, ApiResponse, HttpTransport, ServiceId};
use serde_json::Value;

/// Client for dedicated server services.
#[derive(Debug, Clone)]
pub struct DedicatedClient {
    transport: HttpTransport,
}

impl DedicatedClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Build a client with its own transport.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }

    /// Fetch the server summary.
    pub async fn get_info(&self, service_id: &ServiceId) -> ApiResponse<DedicatedInfo> {
        self.transport
            .get(&dedicated_path(service_id, "info"))
            .await
    }

    /// Fetch the hardware inventory.
    pub async fn get_hardware(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<Vec<DedicatedHardware>> {
        self.transport
            .get(&dedicated_path(service_id, "hardware"))
            .await
    }

    /// Send a power action.
    pub async fn perform_action(
        &self,
        service_id: &ServiceId,
        action: DedicatedAction,
    ) -> ApiResponse<Value> {
        let body = DedicatedActionRequest { action };
        self.transport
            .post(&dedicated_path(service_id, "action"), &body)
            .await
    }

    /// Power the server on.
    pub async fn start(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.perform_action(service_id, DedicatedAction::SetPowerOn)
            .await
    }

    /// Power the server off.
    pub async fn stop(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.perform_action(service_id, DedicatedAction::SetPowerOff)
            .await
    }

    /// Power cycle the server.
    pub async fn restart(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.perform_action(service_id, DedicatedAction::SetPowerReset)
            .await
    }

    /// Same as [`DedicatedClient::restart`].
    pub async fn reset(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.restart(service_id).await
    }

    /// Same as [`DedicatedClient::stop`].
    pub async fn power_off(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.stop(service_id).await
    }

    /// List installable OS templates.
    pub async fn get_os_templates(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<Vec<DedicatedOsTemplate>> {
        self.transport
            .get(&dedicated_path(service_id, "os-templates"))
            .await
    }

    /// Start an OS reinstall.
    pub async fn reinstall(
        &self,
        service_id: &ServiceId,
        request: &DedicatedReinstallRequest,
    ) -> ApiResponse<Value> {
        self.transport
            .post(&dedicated_path(service_id, "reinstall"), request)
            .await
    }

    /// Poll the progress of a reinstall.
    pub async fn get_reinstall_status(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<DedicatedReinstallStatus> {
        self.transport
            .get(&dedicated_path(service_id, "reinstall-status"))
            .await
    }

    /// List background tasks.
    pub async fn get_tasks(&self, service_id: &ServiceId) -> ApiResponse<Vec<DedicatedTask>> {
        self.transport
            .get(&dedicated_path(service_id, "tasks"))
            .await
    }
}

fn dedicated_path(service_id: &ServiceId, suffix: &str) -> String {
    format!("/api/services/{service_id}/dedicated/{suffix}")
}
