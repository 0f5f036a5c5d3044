//! Account models: profile, sessions, services, tickets and invoices.
//!
//! Timestamps in this part of the API are ISO-8601 strings and are kept as
//! returned. Status fields decode unknown values to `Unknown` instead of
//! failing the whole response.

use nodesty_core::{ServiceId, TicketId};
use serde::{Deserialize, Serialize};

/// Profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User ID.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Whether the email address is verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A login session of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// Session ID.
    pub id: String,
    /// Client IP address.
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
    /// Session start.
    pub created_at: String,
    /// Last activity.
    pub last_activity: String,
    /// Whether the session is still valid.
    pub is_active: bool,
}

/// Product family of a service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Virtual private server.
    Vps,
    /// Dedicated server.
    Dedicated,
    /// Web hosting.
    Hosting,
    /// Any kind this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Lifecycle state of a service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Running and billed.
    Active,
    /// Suspended, usually for billing reasons.
    Suspended,
    /// Terminated.
    Terminated,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// A hosting service owned by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service ID, used by the VPS, dedicated and firewall clients.
    pub id: ServiceId,
    /// Product family.
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    /// Display name.
    pub name: String,
    /// Lifecycle state.
    pub status: ServiceStatus,
    /// Plan name.
    pub plan: String,
    /// Datacenter location.
    pub location: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiry timestamp.
    pub expires_at: String,
    /// Whether the service renews automatically.
    pub auto_renew: bool,
}

/// Support ticket state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Awaiting support.
    Open,
    /// Awaiting the customer.
    Pending,
    /// Resolved.
    Resolved,
    /// Closed.
    Closed,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Support ticket priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
    /// Any priority this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Ticket as listed by `GET /api/tickets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    /// Ticket ID.
    pub id: TicketId,
    /// Subject line.
    pub subject: String,
    /// Current state.
    pub status: TicketStatus,
    /// Priority.
    pub priority: TicketPriority,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Author of a ticket message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    /// The customer.
    User,
    /// Support staff.
    Support,
    /// Any sender this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// File attached to a ticket message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketAttachment {
    /// File name.
    pub name: String,
    /// Download URL.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
}

/// One message in a ticket thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketMessage {
    /// Message ID.
    pub id: String,
    /// Author.
    pub sender: MessageSender,
    /// Message body.
    pub message: String,
    /// Send timestamp.
    pub timestamp: String,
    /// Attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<TicketAttachment>,
}

/// Full ticket with its message thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket ID.
    pub id: TicketId,
    /// Subject line.
    pub subject: String,
    /// Current state.
    pub status: TicketStatus,
    /// Priority.
    pub priority: TicketPriority,
    /// Category.
    pub category: String,
    /// Initial description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Message thread, oldest first.
    #[serde(default)]
    pub messages: Vec<TicketMessage>,
}

/// Invoice payment state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Not yet paid.
    Pending,
    /// Paid.
    Paid,
    /// Past the due date.
    Overdue,
    /// Cancelled.
    Cancelled,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Invoice as listed by `GET /api/users/@me/invoices`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    /// Invoice ID.
    pub id: String,
    /// Human-facing invoice number.
    pub number: String,
    /// Payment state.
    pub status: InvoiceStatus,
    /// Total amount.
    pub amount: f64,
    /// ISO currency code.
    pub currency: String,
    /// Due date.
    pub due_date: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Invoice line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Item ID.
    pub id: String,
    /// Description.
    pub description: String,
    /// Quantity.
    pub quantity: f64,
    /// Price per unit.
    pub unit_price: f64,
    /// Line total.
    pub total: f64,
}

/// Full invoice with line items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice ID.
    pub id: String,
    /// Human-facing invoice number.
    pub number: String,
    /// Payment state.
    pub status: InvoiceStatus,
    /// Total amount.
    pub amount: f64,
    /// ISO currency code.
    pub currency: String,
    /// Amount before tax.
    pub subtotal: f64,
    /// Tax amount.
    pub tax: f64,
    /// Due date.
    pub due_date: String,
    /// Payment timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Line items.
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

/// Result of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// Reported status, e.g. `ok`.
    pub status: String,
    /// Server time.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_decodes_type_and_unknown_status() {
        let service: Service = serde_json::from_value(json!({
            "id": "srv-1",
            "type": "vps",
            "name": "web-1",
            "status": "migrating",
            "plan": "VPS-4",
            "location": "Istanbul",
            "createdAt": "2024-01-01T00:00:00Z",
            "expiresAt": "2025-01-01T00:00:00Z",
            "autoRenew": true
        }))
        .unwrap();

        assert_eq!(service.id.as_str(), "srv-1");
        assert_eq!(service.kind, ServiceKind::Vps);
        assert_eq!(service.status, ServiceStatus::Unknown);
        assert!(service.auto_renew);
    }

    #[test]
    fn user_info_optional_fields_default() {
        let user: UserInfo =
            serde_json::from_value(json!({"id": "u1", "email": "a@example.com"})).unwrap();
        assert!(user.username.is_none());
        assert!(user.verified.is_none());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value, json!({"id": "u1", "email": "a@example.com"}));
    }

    #[test]
    fn ticket_messages_without_attachments() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": "T-1",
            "subject": "Network issue",
            "status": "open",
            "priority": "high",
            "category": "network",
            "description": "Packet loss",
            "createdAt": "2024-02-01T10:00:00Z",
            "updatedAt": "2024-02-01T11:00:00Z",
            "messages": [
                {"id": "m1", "sender": "user", "message": "Help", "timestamp": "2024-02-01T10:00:00Z"},
                {"id": "m2", "sender": "support", "message": "Looking", "timestamp": "2024-02-01T10:30:00Z",
                 "attachments": [{"name": "mtr.txt", "url": "https://files.example/mtr.txt", "size": 512}]}
            ]
        }))
        .unwrap();

        assert_eq!(ticket.priority, TicketPriority::High);
        assert_eq!(ticket.messages.len(), 2);
        assert!(ticket.messages[0].attachments.is_empty());
        assert_eq!(ticket.messages[1].sender, MessageSender::Support);
        assert_eq!(ticket.messages[1].attachments[0].size, 512);
    }

    #[test]
    fn invoice_decodes_items() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "42",
            "number": "INV-2024-0042",
            "status": "paid",
            "amount": 11.8,
            "currency": "EUR",
            "subtotal": 10.0,
            "tax": 1.8,
            "dueDate": "2024-03-01",
            "paidAt": "2024-02-20T08:00:00Z",
            "createdAt": "2024-02-15T08:00:00Z",
            "items": [{"id": "i1", "description": "VPS-4", "quantity": 1, "unitPrice": 10.0, "total": 10.0}]
        }))
        .unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.items[0].unit_price, 10.0);
        assert_eq!(invoice.paid_at.as_deref(), Some("2024-02-20T08:00:00Z"));
    }
}
