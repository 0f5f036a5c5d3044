//! Asynchronous firewall client implementation.
//!
//! Every endpoint is scoped to one protected IP of a service:
//! `/api/services/{service}/firewall/{ip}/...`.

use crate::models::{
    FirewallAttackLog, FirewallAttackNotification, FirewallAttackNotificationRequest,
    FirewallRdns, FirewallRdnsRequest, FirewallRule, FirewallRuleRef, FirewallRuleRequest,
    FirewallStats,
};
use crate::Result;
use nodesty_core::{check_path_segment, ApiConfig, ApiResponse, HttpTransport, ServiceId};
use serde_json::Value;
use std::net::IpAddr;

/// Client for the DDoS firewall, rDNS and attack notifications.
#[derive(Debug, Clone)]
pub struct FirewallClient {
    transport: HttpTransport,
}

impl FirewallClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Build a client with its own transport.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }

    /// List attacks detected against an IP.
    pub async fn get_attack_logs(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Vec<FirewallAttackLog>> {
        self.transport
            .get(&firewall_path(service_id, ip, "attack-logs"))
            .await
    }

    /// Fetch attack notification settings.
    pub async fn get_attack_notification(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<FirewallAttackNotification> {
        self.transport
            .get(&firewall_path(service_id, ip, "attack-notification"))
            .await
    }

    /// Update attack notification settings.
    pub async fn update_attack_notification(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        request: &FirewallAttackNotificationRequest,
    ) -> ApiResponse<Value> {
        self.transport
            .put(&firewall_path(service_id, ip, "attack-notification"), request)
            .await
    }

    /// Fetch the rDNS record.
    pub async fn get_rdns(&self, service_id: &ServiceId, ip: IpAddr) -> ApiResponse<FirewallRdns> {
        self.transport
            .get(&firewall_path(service_id, ip, "rdns"))
            .await
    }

    /// Set the rDNS hostname.
    pub async fn update_rdns(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        request: &FirewallRdnsRequest,
    ) -> ApiResponse<Value> {
        self.transport
            .put(&firewall_path(service_id, ip, "rdns"), request)
            .await
    }

    /// Remove the rDNS record.
    pub async fn delete_rdns(&self, service_id: &ServiceId, ip: IpAddr) -> ApiResponse<Value> {
        self.transport
            .delete(&firewall_path(service_id, ip, "rdns"))
            .await
    }

    /// List firewall rules.
    pub async fn get_rules(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Vec<FirewallRule>> {
        self.transport
            .get(&firewall_path(service_id, ip, "rules"))
            .await
    }

    /// Create a firewall rule.
    pub async fn create_rule(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        request: &FirewallRuleRequest,
    ) -> ApiResponse<Value> {
        self.transport
            .post(&firewall_path(service_id, ip, "rules"), request)
            .await
    }

    /// Delete a firewall rule by ID or sequence number.
    pub async fn delete_rule(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        rule: impl Into<FirewallRuleRef>,
    ) -> ApiResponse<Value> {
        let rule = rule.into();
        if let FirewallRuleRef::Id(id) = &rule {
            if let Err(err) = check_path_segment("rule id", id) {
                return ApiResponse::request_error(err.to_string());
            }
        }

        let path = firewall_path(service_id, ip, &format!("rules/{rule}"));
        self.transport.delete(&path).await
    }

    /// Fetch firewall statistics.
    pub async fn get_stats(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Vec<FirewallStats>> {
        self.transport
            .get(&firewall_path(service_id, ip, "stats"))
            .await
    }

    /// Turn email notifications on.
    pub async fn enable_email_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Value> {
        let request = FirewallAttackNotificationRequest {
            email_notification: Some(true),
            ..FirewallAttackNotificationRequest::default()
        };
        self.update_attack_notification(service_id, ip, &request)
            .await
    }

    /// Turn email notifications off.
    pub async fn disable_email_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Value> {
        let request = FirewallAttackNotificationRequest {
            email_notification: Some(false),
            ..FirewallAttackNotificationRequest::default()
        };
        self.update_attack_notification(service_id, ip, &request)
            .await
    }

    /// Send notifications to a Discord webhook.
    pub async fn set_discord_webhook(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        webhook_url: &str,
    ) -> ApiResponse<Value> {
        let request = FirewallAttackNotificationRequest {
            discord_webhook_url: Some(webhook_url.to_string()),
            ..FirewallAttackNotificationRequest::default()
        };
        self.update_attack_notification(service_id, ip, &request)
            .await
    }

    /// Turn email notifications on and set the Discord webhook. `None` clears
    /// the webhook.
    pub async fn enable_all_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        discord_webhook_url: Option<&str>,
    ) -> ApiResponse<Value> {
        let request = FirewallAttackNotificationRequest {
            email_notification: Some(true),
            discord_webhook_url: Some(discord_webhook_url.unwrap_or_default().to_string()),
            ..FirewallAttackNotificationRequest::default()
        };
        self.update_attack_notification(service_id, ip, &request)
            .await
    }

    /// Turn email notifications off and clear the Discord webhook.
    pub async fn disable_all_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Value> {
        let request = FirewallAttackNotificationRequest {
            email_notification: Some(false),
            discord_webhook_url: Some(String::new()),
            ..FirewallAttackNotificationRequest::default()
        };
        self.update_attack_notification(service_id, ip, &request)
            .await
    }

    /// Open a port for an application profile.
    pub async fn create_port_rule(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        port: u16,
        app_id: u64,
    ) -> ApiResponse<Value> {
        let request = FirewallRuleRequest { port, app_id };
        self.create_rule(service_id, ip, &request).await
    }
}

fn firewall_path(service_id: &ServiceId, ip: IpAddr, suffix: &str) -> String {
    format!("/api/services/{service_id}/firewall/{ip}/{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttackSeverity, RdnsStatus};
    use nodesty_core::FailureKind;
    use serde_json::json;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7));

    fn test_client(server: &MockServer) -> FirewallClient {
        let transport = HttpTransport::builder("test-token")
            .with_base_url(server.uri())
            .build()
            .unwrap();
        FirewallClient::new(transport)
    }

    fn service() -> ServiceId {
        ServiceId::new("svc-9").unwrap()
    }

    #[tokio::test]
    async fn get_attack_logs_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/svc-9/firewall/198.51.100.7/attack-logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "a1",
                "ip": "198.51.100.7",
                "attackType": "UDP flood",
                "severity": "critical",
                "timestamp": "2024-05-01T10:00:00Z",
                "blocked": true,
                "details": {
                    "sourceIp": "192.0.2.10",
                    "targetPort": 27015,
                    "protocol": "udp",
                    "packets": 1200000,
                    "bytes": 960000000
                }
            }])))
            .mount(&server)
            .await;

        let logs = test_client(&server)
            .get_attack_logs(&service(), IP)
            .await
            .into_data()
            .unwrap();
        assert_eq!(logs[0].severity, AttackSeverity::Critical);
        assert_eq!(logs[0].details.target_port, 27015);
    }

    #[tokio::test]
    async fn notification_settings_roundtrip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/svc-9/firewall/198.51.100.7/attack-notification"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "enabled": true,
                "email": "noc@example.com",
                "severity": "high"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/services/svc-9/firewall/198.51.100.7/attack-notification"))
            .and(body_json(json!({"severity": "medium"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let settings = client
            .get_attack_notification(&service(), IP)
            .await
            .into_data()
            .unwrap();
        assert!(settings.webhook.is_none());

        let request = FirewallAttackNotificationRequest {
            severity: Some(AttackSeverity::Medium),
            ..FirewallAttackNotificationRequest::default()
        };
        assert!(client
            .update_attack_notification(&service(), IP, &request)
            .await
            .is_success());
    }

    #[tokio::test]
    async fn notification_helpers_send_expected_bodies() {
        let server = MockServer::start().await;
        let route = "/api/services/svc-9/firewall/198.51.100.7/attack-notification";
        for body in [
            json!({"emailNotification": true}),
            json!({"emailNotification": false}),
            json!({"discordWebhookURL": "https://discord.example/hook"}),
            json!({"emailNotification": true, "discordWebhookURL": ""}),
            json!({"emailNotification": false, "discordWebhookURL": ""}),
        ] {
            Mock::given(method("PUT"))
                .and(path(route))
                .and(body_json(body))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = test_client(&server);
        let id = service();
        assert!(client.enable_email_notifications(&id, IP).await.is_success());
        assert!(client.disable_email_notifications(&id, IP).await.is_success());
        assert!(client
            .set_discord_webhook(&id, IP, "https://discord.example/hook")
            .await
            .is_success());
        assert!(client.enable_all_notifications(&id, IP, None).await.is_success());
        assert!(client.disable_all_notifications(&id, IP).await.is_success());
    }

    #[tokio::test]
    async fn rdns_get_update_delete() {
        let server = MockServer::start().await;
        let route = "/api/services/svc-9/firewall/198.51.100.7/rdns";
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ip": "198.51.100.7",
                "hostname": "mail.example.com",
                "status": "active",
                "updatedAt": "2024-05-01T10:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(route))
            .and(body_json(json!({"hostname": "mx.example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let rdns = client.get_rdns(&service(), IP).await.into_data().unwrap();
        assert_eq!(rdns.status, RdnsStatus::Active);

        let request = FirewallRdnsRequest {
            hostname: "mx.example.com".into(),
        };
        assert!(client.update_rdns(&service(), IP, &request).await.is_success());
        assert!(client.delete_rdns(&service(), IP).await.is_success());
    }

    #[tokio::test]
    async fn rules_create_list_delete() {
        let server = MockServer::start().await;
        let route = "/api/services/svc-9/firewall/198.51.100.7/rules";
        Mock::given(method("POST"))
            .and(path(route))
            .and(body_json(json!({"port": 25565, "appId": 4})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "r-1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "r-1",
                "port": 25565,
                "protocol": "tcp",
                "action": "allow",
                "enabled": true,
                "createdAt": "2024-05-01T10:00:00Z"
            }])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{route}/r-1").as_str()))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{route}/2").as_str()))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let created = client.create_port_rule(&service(), IP, 25565, 4).await;
        assert_eq!(created.data(), Some(&json!({"id": "r-1"})));

        let rules = client.get_rules(&service(), IP).await.into_data().unwrap();
        assert!(client
            .delete_rule(&service(), IP, &rules[0])
            .await
            .is_success());
        assert!(client.delete_rule(&service(), IP, 2_u32).await.is_success());
    }

    #[tokio::test]
    async fn delete_rule_rejects_unsafe_id() {
        let server = MockServer::start().await;
        let response = test_client(&server)
            .delete_rule(&service(), IP, "r-1/../../rdns")
            .await;

        assert_eq!(response.kind(), Some(FailureKind::RequestError));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_for_ipv6_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/svc-9/firewall/2001:db8::7/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "totalAttacks": 12,
                "blockedAttacks": 11,
                "allowedConnections": 90210,
                "topAttackers": [{"ip": "192.0.2.10", "attacks": 7, "country": "NL"}],
                "attacksByType": [{"type": "SYN flood", "count": 9}],
                "timeRange": {"start": "2024-05-01T00:00:00Z", "end": "2024-05-02T00:00:00Z"}
            }])))
            .mount(&server)
            .await;

        let ip = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 7));
        let stats = test_client(&server)
            .get_stats(&service(), ip)
            .await
            .into_data()
            .unwrap();
        assert_eq!(stats[0].blocked_attacks, 11);
        assert_eq!(stats[0].attacks_by_type[0].kind, "SYN flood");
    }
}
