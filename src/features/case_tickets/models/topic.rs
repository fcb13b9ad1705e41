/// The closed set of case topics. The topic string on a record selects both
/// the embedded-payload schema and the description formatter; matching is
/// exact and case-sensitive because the strings are a data contract with
/// the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseTopic {
    ItemRelatedIssues,
    ShipmentRelatedIssues,
    HearingAidIssues,
    ProviderIssues,
    BillingIssues,
    UserAgreementsNotReceived,
    WrongItemReceived,
    DeviceIssue,
    BalanceNotLoaded,
    WrongWalletCharged,
    TransactionDeclined,
    Others,
    WalletTransfer,
    CardReplacement,
    CardholderAddressUpdate,
    ChangeCardStatus,
    RequestVoucher,
    CardDeclined,
    FlexIssue,
    Reimbursement,
}

impl CaseTopic {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Item related issues" => Some(Self::ItemRelatedIssues),
            "Shipment related issues" => Some(Self::ShipmentRelatedIssues),
            "Hearing aid issues" => Some(Self::HearingAidIssues),
            "Provider issues" => Some(Self::ProviderIssues),
            "Billing issues" => Some(Self::BillingIssues),
            "User Agreements (Not received)" => Some(Self::UserAgreementsNotReceived),
            "Wrong Item received" => Some(Self::WrongItemReceived),
            "Device Issue" => Some(Self::DeviceIssue),
            "Balance not loaded" => Some(Self::BalanceNotLoaded),
            "Wrong wallet charged" => Some(Self::WrongWalletCharged),
            "Transaction declined" => Some(Self::TransactionDeclined),
            "Others" => Some(Self::Others),
            "Wallet Transfer" => Some(Self::WalletTransfer),
            "Card Replacement" => Some(Self::CardReplacement),
            "Cardholder Address Update" => Some(Self::CardholderAddressUpdate),
            "Change Card Status" => Some(Self::ChangeCardStatus),
            "Request Voucher" => Some(Self::RequestVoucher),
            "Card Declined" => Some(Self::CardDeclined),
            "Flex Issue" => Some(Self::FlexIssue),
            "Reimbursement" => Some(Self::Reimbursement),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItemRelatedIssues => "Item related issues",
            Self::ShipmentRelatedIssues => "Shipment related issues",
            Self::HearingAidIssues => "Hearing aid issues",
            Self::ProviderIssues => "Provider issues",
            Self::BillingIssues => "Billing issues",
            Self::UserAgreementsNotReceived => "User Agreements (Not received)",
            Self::WrongItemReceived => "Wrong Item received",
            Self::DeviceIssue => "Device Issue",
            Self::BalanceNotLoaded => "Balance not loaded",
            Self::WrongWalletCharged => "Wrong wallet charged",
            Self::TransactionDeclined => "Transaction declined",
            Self::Others => "Others",
            Self::WalletTransfer => "Wallet Transfer",
            Self::CardReplacement => "Card Replacement",
            Self::CardholderAddressUpdate => "Cardholder Address Update",
            Self::ChangeCardStatus => "Change Card Status",
            Self::RequestVoucher => "Request Voucher",
            Self::CardDeclined => "Card Declined",
            Self::FlexIssue => "Flex Issue",
            Self::Reimbursement => "Reimbursement",
        }
    }

    /// Topics whose custom status resolves from the ticket status alone;
    /// all other topics combine the ticket status with the approval status.
    pub fn uses_plain_status(&self) -> bool {
        matches!(self, Self::Reimbursement | Self::WalletTransfer)
    }
}
