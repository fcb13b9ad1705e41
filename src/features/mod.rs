pub mod case_tickets;
pub mod order_changes;
