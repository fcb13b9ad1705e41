mod order_sync_worker;

pub use order_sync_worker::{OrderSyncWorker, PgOrderSyncWorker};
