pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::{OrderRequestBuilder, OrderService};
pub use workers::{OrderSyncWorker, PgOrderSyncWorker};
