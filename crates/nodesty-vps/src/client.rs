//! Asynchronous VPS client implementation.

use crate::models::{
    VpsAction, VpsActionRequest, VpsBackup, VpsBackupRestoreRequest, VpsChangePasswordRequest,
    VpsGraphs, VpsInfo, VpsOsTemplate, VpsReinstallRequest, VpsTask,
};
use crate::Result;
use nodesty_core::{check_path_segment, ApiConfig, ApiResponse, HttpTransport, ServiceId};
use serde_json::Value;

/// Client for VPS services.
#[derive(Debug, Clone)]
pub struct VpsClient {
    transport: HttpTransport,
}

impl VpsClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Build a client with its own transport.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }

    /// Fetch the full state of a VPS.
    pub async fn get_info(&self, service_id: &ServiceId) -> ApiResponse<VpsInfo> {
        self.transport.get(&vps_path(service_id, "info")).await
    }

    /// Send a power action.
    pub async fn perform_action(
        &self,
        service_id: &ServiceId,
        action: VpsAction,
    ) -> ApiResponse<Value> {
        let body = VpsActionRequest { action };
        self.transport
            .post(&vps_path(service_id, "action"), &body)
            .await
    }

    /// Boot the VPS.
    pub async fn start(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.perform_action(service_id, VpsAction::Start).await
    }

    /// Shut the VPS down gracefully.
    pub async fn stop(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.perform_action(service_id, VpsAction::Stop).await
    }

    /// Reboot the VPS.
    pub async fn restart(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.perform_action(service_id, VpsAction::Restart).await
    }

    /// Cut power to the VPS.
    pub async fn power_off(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.perform_action(service_id, VpsAction::PowerOff).await
    }

    /// Change an account password inside the VPS.
    pub async fn change_password(
        &self,
        service_id: &ServiceId,
        request: &VpsChangePasswordRequest,
    ) -> ApiResponse<Value> {
        self.transport
            .post(&vps_path(service_id, "change-password"), request)
            .await
    }

    /// Fetch monitoring graphs.
    pub async fn get_graphs(&self, service_id: &ServiceId) -> ApiResponse<VpsGraphs> {
        self.transport.get(&vps_path(service_id, "graphs")).await
    }

    /// Reinstall the operating system.
    pub async fn reinstall(
        &self,
        service_id: &ServiceId,
        request: &VpsReinstallRequest,
    ) -> ApiResponse<Value> {
        self.transport
            .post(&vps_path(service_id, "reinstall"), request)
            .await
    }

    /// List stored backups.
    pub async fn get_backups(&self, service_id: &ServiceId) -> ApiResponse<Vec<VpsBackup>> {
        self.transport.get(&vps_path(service_id, "backups")).await
    }

    /// Restore a backup identified by date and file name.
    ///
    /// Both values become path segments; values that would alter the path
    /// resolve to a request error without contacting the API.
    pub async fn restore_backup(
        &self,
        service_id: &ServiceId,
        date: &str,
        file: &str,
    ) -> ApiResponse<Value> {
        if let Err(err) = check_path_segment("backup date", date)
            .and_then(|()| check_path_segment("backup file", file))
        {
            return ApiResponse::request_error(err.to_string());
        }

        let path = vps_path(service_id, &format!("backups/{date}/{file}"));
        let body = VpsBackupRestoreRequest {
            date: date.to_string(),
            file: file.to_string(),
        };
        self.transport.post(&path, &body).await
    }

    /// Restore a backup as returned by [`VpsClient::get_backups`].
    pub async fn restore_backup_from(
        &self,
        service_id: &ServiceId,
        backup: &VpsBackup,
    ) -> ApiResponse<Value> {
        self.restore_backup(service_id, &backup.date, &backup.file)
            .await
    }

    /// List installable OS templates.
    pub async fn get_os_templates(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<Vec<VpsOsTemplate>> {
        self.transport
            .get(&vps_path(service_id, "os-templates"))
            .await
    }

    /// List background tasks.
    pub async fn get_tasks(&self, service_id: &ServiceId) -> ApiResponse<Vec<VpsTask>> {
        self.transport.get(&vps_path(service_id, "tasks")).await
    }
}

fn vps_path(service_id: &ServiceId, suffix: &str) -> String {
    format!("/api/services/{service_id}/vps/{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use nodesty_core::FailureKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> VpsClient {
        let transport = HttpTransport::builder("test-token")
            .with_base_url(server.uri())
            .build()
            .unwrap();
        VpsClient::new(transport)
    }

    fn service() -> ServiceId {
        ServiceId::new("svc-1").unwrap()
    }

    #[tokio::test]
    async fn plain_text_action_reply_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/services/svc-1/vps/action"))
            .and(body_json(json!({ "action": "start" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("OK")
                    .insert_header("Content-Type", "text/plain"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client.start(&service()).await;

        assert!(response.is_success());
        assert_eq!(response.data(), Some(&json!("OK")));
        assert!(response.kind().is_none());
    }

    #[tokio::test]
    async fn power_helpers_send_expected_actions() {
        let server = MockServer::start().await;
        for action in ["start", "stop", "restart", "poweroff"] {
            Mock::given(method("POST"))
                .and(path("/api/services/svc-1/vps/action"))
                .and(body_json(json!({ "action": action })))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = test_client(&server);
        let id = service();
        for response in [
            client.start(&id).await,
            client.stop(&id).await,
            client.restart(&id).await,
            client.power_off(&id).await,
        ] {
            assert!(response.is_success());
            assert!(response.data().is_none());
        }
    }

    #[tokio::test]
    async fn change_password_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/services/svc-1/vps/change-password"))
            .and(body_json(json!({"username": "root", "password": "n3w-pass"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"changed": true})))
            .expect(1)
            .mount(&server)
            .await;

        let request = VpsChangePasswordRequest {
            username: "root".into(),
            password: "n3w-pass".into(),
        };
        let response = test_client(&server)
            .change_password(&service(), &request)
            .await;
        assert_eq!(response.data(), Some(&json!({"changed": true})));
    }

    #[tokio::test]
    async fn reinstall_posts_os_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/services/svc-1/vps/reinstall"))
            .and(body_json(json!({"password": "root-pass", "osId": 12})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let request = VpsReinstallRequest {
            password: "root-pass".into(),
            os_id: 12,
        };
        let response = test_client(&server).reinstall(&service(), &request).await;
        assert!(response.is_success());
        assert_eq!(response.message(), Some("Accepted"));
    }

    #[tokio::test]
    async fn backups_list_and_restore() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/svc-1/vps/backups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "date": "2024-05-01",
                "file": "vzdump-qemu-101.vma.zst",
                "createdAt": 1_714_521_600
            }])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(
                "/api/services/svc-1/vps/backups/2024-05-01/vzdump-qemu-101.vma.zst",
            ))
            .and(body_json(json!({
                "date": "2024-05-01",
                "file": "vzdump-qemu-101.vma.zst"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let backups = client.get_backups(&service()).await.into_data().unwrap();
        assert_eq!(
            backups[0].created_at,
            Utc.timestamp_opt(1_714_521_600, 0).unwrap()
        );

        let response = client.restore_backup_from(&service(), &backups[0]).await;
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn restore_backup_rejects_path_segments() {
        let server = MockServer::start().await;
        let response = test_client(&server)
            .restore_backup(&service(), "2024-05-01", "../../users/@me")
            .await;

        assert!(!response.is_success());
        assert_eq!(response.kind(), Some(FailureKind::RequestError));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn os_templates_and_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/svc-1/vps/os-templates"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 1, "name": "Debian 12"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/services/svc-1/vps/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "action": "Reinstall",
                "progress": "100%",
                "startedAt": 1_714_521_600,
                "endedAt": 1_714_522_200
            }])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let templates = client
            .get_os_templates(&service())
            .await
            .into_data()
            .unwrap();
        assert_eq!(templates[0].name, "Debian 12");

        let tasks = client.get_tasks(&service()).await.into_data().unwrap();
        assert_eq!(tasks[0].progress_percent(), Some(100.0));
        assert!(tasks[0].ended_at.is_some());
    }

    #[tokio::test]
    async fn get_info_server_error_reports_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/svc-1/vps/info"))
            .respond_with(
                ResponseTemplate::new(502).set_body_json(json!({"message": "hypervisor offline"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::builder("test-token")
            .with_base_url(server.uri())
            .with_max_retries(0)
            .build()
            .unwrap();
        let response = VpsClient::new(transport).get_info(&service()).await;

        assert_eq!(response.error(), Some("hypervisor offline"));
        assert_eq!(response.message(), Some("HTTP 502: Bad Gateway"));
        assert_eq!(response.kind(), Some(FailureKind::ServerError));
    }
}
