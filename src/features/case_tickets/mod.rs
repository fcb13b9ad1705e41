pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::{CaseTicketRequestBuilder, CaseTicketService};
pub use workers::{CaseSyncWorker, PgCaseSyncWorker};
