//! Account API client.

use crate::models::{
    HealthStatus, Invoice, InvoiceSummary, Service, Ticket, TicketSummary, UserInfo, UserSession,
};
use crate::Result;
use nodesty_core::{ApiConfig, ApiResponse, HttpTransport, TicketId};

/// Client for the authenticated user's account: profile, sessions, services,
/// tickets and invoices.
#[derive(Debug, Clone)]
pub struct UserClient {
    transport: HttpTransport,
}

impl UserClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Build a client with its own transport.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }

    /// Fetch the current user's profile.
    pub async fn get_current_user(&self) -> ApiResponse<UserInfo> {
        self.transport.get("/api/users/@me").await
    }

    /// List the current user's login sessions.
    pub async fn get_user_sessions(&self) -> ApiResponse<Vec<UserSession>> {
        self.transport.get("/api/users/@me/sessions").await
    }

    /// List all services owned by the user.
    pub async fn get_services(&self) -> ApiResponse<Vec<Service>> {
        self.transport.get("/api/services").await
    }

    /// List support tickets.
    pub async fn get_tickets(&self) -> ApiResponse<Vec<TicketSummary>> {
        self.transport.get("/api/tickets").await
    }

    /// Fetch a ticket with its messages.
    pub async fn get_ticket(&self, ticket_id: &TicketId) -> ApiResponse<Ticket> {
        let path = format!("/api/tickets/{ticket_id}");
        self.transport.get(&path).await
    }

    /// List invoices.
    pub async fn get_invoices(&self) -> ApiResponse<Vec<InvoiceSummary>> {
        self.transport.get("/api/users/@me/invoices").await
    }

    /// Fetch an invoice with its line items.
    pub async fn get_invoice(&self, invoice_id: u64) -> ApiResponse<Invoice> {
        let path = format!("/api/users/@me/invoices/{invoice_id}");
        self.transport.get(&path).await
    }

    /// Probe API availability.
    pub async fn health_check(&self) -> ApiResponse<HealthStatus> {
        self.transport.get("/health").await
    }
}
