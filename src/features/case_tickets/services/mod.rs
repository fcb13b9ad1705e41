mod case_ticket_service;
pub mod description_builder;
mod request_builder;

pub use case_ticket_service::{CaseTicketService, CaseTicketStore};
pub use request_builder::CaseTicketRequestBuilder;
