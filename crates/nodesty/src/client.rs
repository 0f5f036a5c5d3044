//! The aggregate client.

use crate::Result;
use nodesty_core::{
    ApiConfig, ApiResponse, Backoff, ClientConfig, HttpTransport, HttpTransportBuilder,
    RetryPolicy, ServiceId, TicketId,
};
use nodesty_dedicated::{
    DedicatedAction, DedicatedClient, DedicatedHardware, DedicatedInfo, DedicatedOsTemplate,
    DedicatedReinstallRequest, DedicatedReinstallStatus, DedicatedTask,
};
use nodesty_firewall::{
    FirewallAttackLog, FirewallAttackNotification, FirewallAttackNotificationRequest,
    FirewallClient, FirewallRdns, FirewallRdnsRequest, FirewallRule, FirewallRuleRef,
    FirewallRuleRequest, FirewallStats,
};
use nodesty_user::{
    HealthStatus, Invoice, InvoiceSummary, Service, Ticket, TicketSummary, UserClient, UserInfo,
    UserSession,
};
use nodesty_vps::{
    VpsAction, VpsBackup, VpsChangePasswordRequest, VpsClient, VpsGraphs, VpsInfo, VpsOsTemplate,
    VpsReinstallRequest, VpsTask,
};
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builder for [`NodestyClient`].
#[derive(Debug)]
pub struct NodestyClientBuilder {
    inner: HttpTransportBuilder,
}

impl NodestyClientBuilder {
    /// Create a builder for the given personal access token.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            inner: HttpTransportBuilder::new(api_key),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.inner = self.inner.with_base_url(base_url);
        self
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    /// Override the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.inner = self.inner.with_max_retries(retries);
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Replace the timer used between retries.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.inner = self.inner.with_backoff(backoff);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NodestyClient> {
        Ok(NodestyClient::from_transport(self.inner.build()?))
    }
}

/// Single entry point to the Nodesty API.
///
/// All four areas (account, VPS, dedicated, firewall) share one transport, so
/// [`NodestyClient::update_api_key`] and [`NodestyClient::update_base_url`]
/// take effect everywhere at once.
#[derive(Debug, Clone)]
pub struct NodestyClient {
    transport: HttpTransport,
    user: UserClient,
    vps: VpsClient,
    dedicated: DedicatedClient,
    firewall: FirewallClient,
}

impl NodestyClient {
    /// Create a client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        NodestyClientBuilder::new(api_key).build()
    }

    /// Start a builder.
    pub fn builder(api_key: impl Into<String>) -> NodestyClientBuilder {
        NodestyClientBuilder::new(api_key)
    }

    /// Create a client from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::from_transport(HttpTransport::from_config(config)?))
    }

    /// Create a client from `NODESTY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ApiConfig::from_env()?)
    }

    /// Create a client over an existing transport.
    #[must_use]
    pub fn from_transport(transport: HttpTransport) -> Self {
        Self {
            user: UserClient::new(transport.clone()),
            vps: VpsClient::new(transport.clone()),
            dedicated: DedicatedClient::new(transport.clone()),
            firewall: FirewallClient::new(transport.clone()),
            transport,
        }
    }

    /// Replace the API key for every subsequent call.
    pub fn update_api_key(&self, api_key: impl Into<String>) {
        self.transport.update_credential(api_key);
    }

    /// Point every subsequent call at a different API host.
    pub fn update_base_url(&self, base_url: impl AsRef<str>) -> Result<()> {
        self.transport.update_base_url(base_url)
    }

    /// Current API host.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.transport.base_url()
    }

    /// Probe API availability.
    pub async fn health_check(&self) -> ApiResponse<HealthStatus> {
        self.user.health_check().await
    }

    // Account

    /// Fetch the current user's profile.
    pub async fn get_current_user(&self) -> ApiResponse<UserInfo> {
        self.user.get_current_user().await
    }

    /// List the current user's login sessions.
    pub async fn get_user_sessions(&self) -> ApiResponse<Vec<UserSession>> {
        self.user.get_user_sessions().await
    }

    /// List all services owned by the user.
    pub async fn get_services(&self) -> ApiResponse<Vec<Service>> {
        self.user.get_services().await
    }

    /// List support tickets.
    pub async fn get_tickets(&self) -> ApiResponse<Vec<TicketSummary>> {
        self.user.get_tickets().await
    }

    /// Fetch a ticket with its messages.
    pub async fn get_ticket(&self, ticket_id: &TicketId) -> ApiResponse<Ticket> {
        self.user.get_ticket(ticket_id).await
    }

    /// List invoices.
    pub async fn get_invoices(&self) -> ApiResponse<Vec<InvoiceSummary>> {
        self.user.get_invoices().await
    }

    /// Fetch an invoice with its line items.
    pub async fn get_invoice(&self, invoice_id: u64) -> ApiResponse<Invoice> {
        self.user.get_invoice(invoice_id).await
    }

    // VPS

    /// Fetch the full state of a VPS.
    pub async fn get_vps_info(&self, service_id: &ServiceId) -> ApiResponse<VpsInfo> {
        self.vps.get_info(service_id).await
    }

    /// Send a power action to a VPS.
    pub async fn perform_vps_action(
        &self,
        service_id: &ServiceId,
        action: VpsAction,
    ) -> ApiResponse<Value> {
        self.vps.perform_action(service_id, action).await
    }

    /// Boot a VPS.
    pub async fn start_vps(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.vps.start(service_id).await
    }

    /// Shut a VPS down gracefully.
    pub async fn stop_vps(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.vps.stop(service_id).await
    }

    /// Reboot a VPS.
    pub async fn restart_vps(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.vps.restart(service_id).await
    }

    /// Cut power to a VPS.
    pub async fn power_off_vps(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.vps.power_off(service_id).await
    }

    /// Change an account password inside a VPS.
    pub async fn change_vps_password(
        &self,
        service_id: &ServiceId,
        request: &VpsChangePasswordRequest,
    ) -> ApiResponse<Value> {
        self.vps.change_password(service_id, request).await
    }

    /// Fetch VPS monitoring graphs.
    pub async fn get_vps_graphs(&self, service_id: &ServiceId) -> ApiResponse<VpsGraphs> {
        self.vps.get_graphs(service_id).await
    }

    /// Reinstall a VPS.
    pub async fn reinstall_vps(
        &self,
        service_id: &ServiceId,
        request: &VpsReinstallRequest,
    ) -> ApiResponse<Value> {
        self.vps.reinstall(service_id, request).await
    }

    /// List VPS backups.
    pub async fn get_vps_backups(&self, service_id: &ServiceId) -> ApiResponse<Vec<VpsBackup>> {
        self.vps.get_backups(service_id).await
    }

    /// Restore a VPS backup by date and file name.
    pub async fn restore_vps_backup(
        &self,
        service_id: &ServiceId,
        date: &str,
        file: &str,
    ) -> ApiResponse<Value> {
        self.vps.restore_backup(service_id, date, file).await
    }

    /// Restore a VPS backup as returned by [`NodestyClient::get_vps_backups`].
    pub async fn restore_vps_backup_from(
        &self,
        service_id: &ServiceId,
        backup: &VpsBackup,
    ) -> ApiResponse<Value> {
        self.vps.restore_backup_from(service_id, backup).await
    }

    /// List installable VPS OS templates.
    pub async fn get_vps_os_templates(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<Vec<VpsOsTemplate>> {
        self.vps.get_os_templates(service_id).await
    }

    /// List VPS background tasks.
    pub async fn get_vps_tasks(&self, service_id: &ServiceId) -> ApiResponse<Vec<VpsTask>> {
        self.vps.get_tasks(service_id).await
    }

    // Dedicated

    /// Fetch a dedicated server summary.
    pub async fn get_dedicated_info(&self, service_id: &ServiceId) -> ApiResponse<DedicatedInfo> {
        self.dedicated.get_info(service_id).await
    }

    /// Fetch a dedicated server's hardware inventory.
    pub async fn get_dedicated_hardware(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<Vec<DedicatedHardware>> {
        self.dedicated.get_hardware(service_id).await
    }

    /// Send a power action to a dedicated server.
    pub async fn perform_dedicated_action(
        &self,
        service_id: &ServiceId,
        action: DedicatedAction,
    ) -> ApiResponse<Value> {
        self.dedicated.perform_action(service_id, action).await
    }

    /// Power a dedicated server on.
    pub async fn start_dedicated(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.dedicated.start(service_id).await
    }

    /// Power a dedicated server off.
    pub async fn stop_dedicated(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.dedicated.stop(service_id).await
    }

    /// Power cycle a dedicated server.
    pub async fn restart_dedicated(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.dedicated.restart(service_id).await
    }

    /// Same as [`NodestyClient::restart_dedicated`].
    pub async fn reset_dedicated(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.dedicated.reset(service_id).await
    }

    /// Same as [`NodestyClient::stop_dedicated`].
    pub async fn power_off_dedicated(&self, service_id: &ServiceId) -> ApiResponse<Value> {
        self.dedicated.power_off(service_id).await
    }

    /// List installable dedicated OS templates.
    pub async fn get_dedicated_os_templates(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<Vec<DedicatedOsTemplate>> {
        self.dedicated.get_os_templates(service_id).await
    }

    /// Start a dedicated server reinstall.
    pub async fn reinstall_dedicated(
        &self,
        service_id: &ServiceId,
        request: &DedicatedReinstallRequest,
    ) -> ApiResponse<Value> {
        self.dedicated.reinstall(service_id, request).await
    }

    /// Poll a dedicated server reinstall.
    pub async fn get_dedicated_reinstall_status(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<DedicatedReinstallStatus> {
        self.dedicated.get_reinstall_status(service_id).await
    }

    /// List dedicated server background tasks.
    pub async fn get_dedicated_tasks(
        &self,
        service_id: &ServiceId,
    ) -> ApiResponse<Vec<DedicatedTask>> {
        self.dedicated.get_tasks(service_id).await
    }

    // Firewall

    /// List attacks detected against an IP.
    pub async fn get_attack_logs(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Vec<FirewallAttackLog>> {
        self.firewall.get_attack_logs(service_id, ip).await
    }

    /// Fetch attack notification settings.
    pub async fn get_attack_notification(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<FirewallAttackNotification> {
        self.firewall.get_attack_notification(service_id, ip).await
    }

    /// Update attack notification settings.
    pub async fn update_attack_notification(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        request: &FirewallAttackNotificationRequest,
    ) -> ApiResponse<Value> {
        self.firewall
            .update_attack_notification(service_id, ip, request)
            .await
    }

    /// Fetch the rDNS record of an IP.
    pub async fn get_rdns(&self, service_id: &ServiceId, ip: IpAddr) -> ApiResponse<FirewallRdns> {
        self.firewall.get_rdns(service_id, ip).await
    }

    /// Set the rDNS hostname of an IP.
    pub async fn update_rdns(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        request: &FirewallRdnsRequest,
    ) -> ApiResponse<Value> {
        self.firewall.update_rdns(service_id, ip, request).await
    }

    /// Remove the rDNS record of an IP.
    pub async fn delete_rdns(&self, service_id: &ServiceId, ip: IpAddr) -> ApiResponse<Value> {
        self.firewall.delete_rdns(service_id, ip).await
    }

    /// List firewall rules.
    pub async fn get_firewall_rules(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Vec<FirewallRule>> {
        self.firewall.get_rules(service_id, ip).await
    }

    /// Create a firewall rule.
    pub async fn create_firewall_rule(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        request: &FirewallRuleRequest,
    ) -> ApiResponse<Value> {
        self.firewall.create_rule(service_id, ip, request).await
    }

    /// Delete a firewall rule by ID or sequence number.
    pub async fn delete_firewall_rule(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        rule: impl Into<FirewallRuleRef>,
    ) -> ApiResponse<Value> {
        self.firewall.delete_rule(service_id, ip, rule).await
    }

    /// Fetch firewall statistics.
    pub async fn get_firewall_stats(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Vec<FirewallStats>> {
        self.firewall.get_stats(service_id, ip).await
    }

    /// Turn email attack notifications on.
    pub async fn enable_email_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Value> {
        self.firewall.enable_email_notifications(service_id, ip).await
    }

    /// Turn email attack notifications off.
    pub async fn disable_email_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Value> {
        self.firewall
            .disable_email_notifications(service_id, ip)
            .await
    }

    /// Send attack notifications to a Discord webhook.
    pub async fn set_discord_webhook(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        webhook_url: &str,
    ) -> ApiResponse<Value> {
        self.firewall
            .set_discord_webhook(service_id, ip, webhook_url)
            .await
    }

    /// Turn email notifications on and set the Discord webhook.
    pub async fn enable_all_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        discord_webhook_url: Option<&str>,
    ) -> ApiResponse<Value> {
        self.firewall
            .enable_all_notifications(service_id, ip, discord_webhook_url)
            .await
    }

    /// Turn email notifications off and clear the Discord webhook.
    pub async fn disable_all_notifications(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
    ) -> ApiResponse<Value> {
        self.firewall.disable_all_notifications(service_id, ip).await
    }

    /// Open a port for an application profile.
    pub async fn create_port_rule(
        &self,
        service_id: &ServiceId,
        ip: IpAddr,
        port: u16,
        app_id: u64,
    ) -> ApiResponse<Value> {
        self.firewall
            .create_port_rule(service_id, ip, port, app_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_base_url() {
        let client = NodestyClient::builder("pat-1")
            .with_base_url("https://staging.nodesty.com/")
            .with_max_retries(0)
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "https://staging.nodesty.com/");
    }

    #[test]
    fn new_rejects_empty_key() {
        assert!(NodestyClient::new("").is_err());
    }

    #[test]
    fn update_base_url_rejects_garbage() {
        let client = NodestyClient::new("pat-1").unwrap();
        assert!(client.update_base_url("::not a url::").is_err());
        assert_eq!(client.base_url().as_str(), "https://nodesty.com/");
    }
}
