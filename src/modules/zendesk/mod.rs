//! Zendesk integration: tag resolution, the ticket wire payload, and the
//! REST client used by the synchronization workers.

mod client;
mod payload;
mod tags;

pub use client::{ZendeskApi, ZendeskClient};
pub use payload::{Comment, CustomField, EmailCc, Requester, Ticket, TicketRequest};
pub use tags::TagResolver;
