//! Account client and data models for the Nodesty API.
//!
//! Covers the authenticated user's profile and sessions, the list of owned
//! services, support tickets, invoices and the API health probe.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::UserClient;
pub use models::{
    HealthStatus, Invoice, InvoiceItem, InvoiceStatus, InvoiceSummary, MessageSender, Service,
    ServiceKind, ServiceStatus, Ticket, TicketAttachment, TicketMessage, TicketPriority,
    TicketStatus, TicketSummary, UserInfo, UserSession,
};

/// Convenient result alias that reuses the shared Nodesty error type.
pub type Result<T> = nodesty_core::Result<T>;
