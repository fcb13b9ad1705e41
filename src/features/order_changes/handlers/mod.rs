mod job_handler;

pub use job_handler::*;
