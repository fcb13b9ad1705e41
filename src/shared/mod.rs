pub mod dates;
pub mod types;
