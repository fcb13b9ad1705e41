mod case_sync_worker;

pub use case_sync_worker::{CaseSyncWorker, PgCaseSyncWorker};
