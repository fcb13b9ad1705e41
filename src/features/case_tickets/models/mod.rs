mod case_ticket;
mod topic;
mod topic_data;

pub use case_ticket::CaseTicket;
pub use topic::CaseTopic;
pub use topic_data::{
    scalar_to_string, AddressChange, AddressFields, Appointment, CardDeclined, CardStatusChange,
    FlexIssue, ItemInfo, OrderSummary, OrderTopicPayload, ProviderIssue, WalletTransferRequest,
};
