//! Typed views of the per-topic JSON embedded in `case_ticket_data`.
//!
//! Field names mirror the wire contract exactly, including its irregular
//! casing and the misspelled `additinalinfro` key, which is contractual and
//! must not be corrected. Every field is optional: payloads are produced by
//! several upstream forms and routinely omit fields.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// "Change Card Status" payload.
#[derive(Debug, Deserialize)]
pub struct CardStatusChange {
    #[serde(rename = "Currentstatus")]
    pub current_status: Option<String>,
    #[serde(rename = "ChangeStatusto")]
    pub change_status_to: Option<String>,
    #[serde(rename = "reasonForchangingcardstatus")]
    pub reason: Option<String>,
}

/// "Wallet Transfer" payload. The balance arrives as either a number or a
/// string depending on the producing form.
#[derive(Debug, Deserialize)]
pub struct WalletTransferRequest {
    #[serde(rename = "FromWalletValue")]
    pub from_wallet: Option<String>,
    #[serde(rename = "ToWalletValue")]
    pub to_wallet: Option<String>,
    #[serde(rename = "BalanceAmount")]
    pub balance_amount: Option<Value>,
    #[serde(rename = "Reason")]
    pub reason: Option<String>,
}

/// Shared payload for "Cardholder Address Update" and "Card Replacement".
#[derive(Debug, Deserialize)]
pub struct AddressChange {
    pub reason: Option<ReasonField>,
    pub address: Option<AddressFields>,
}

#[derive(Debug, Deserialize)]
pub struct ReasonField {
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressFields {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "stateCode")]
    pub state_code: Option<String>,
    pub zipcode: Option<String>,
}

/// "Provider issues" payload.
#[derive(Debug, Deserialize)]
pub struct ProviderIssue {
    pub appointment: Option<Appointment>,
}

#[derive(Debug, Deserialize)]
pub struct Appointment {
    #[serde(rename = "memberAppointmentId")]
    pub member_appointment_id: Option<Value>,
    #[serde(rename = "providerName")]
    pub provider_name: Option<String>,
    #[serde(rename = "providerLocation")]
    pub provider_location: Option<String>,
    #[serde(rename = "hcpName")]
    pub hcp_name: Option<String>,
    /// Arrives either as a JSON-encoded string or as an inline object.
    #[serde(rename = "appointmentProcessData")]
    pub appointment_process_data: Option<Value>,
}

impl Appointment {
    /// Extracts the date-of-service from the process-data node, decoding
    /// the string-encoded form when necessary.
    pub fn date_of_service(&self) -> Option<String> {
        let node = self.appointment_process_data.as_ref()?;
        let object = match node {
            Value::String(encoded) => serde_json::from_str::<Value>(encoded).ok()?,
            other => other.clone(),
        };
        object
            .get("DateOfService")
            .map(scalar_to_string)
            .filter(|s| !s.is_empty())
    }
}

/// Root payload for the order-bearing topics (Billing, Shipment, Hearing
/// aid, OTC items). Also carries the complaint text used by the resolution
/// footer for every topic.
#[derive(Debug, Default, Deserialize)]
pub struct OrderTopicPayload {
    #[serde(rename = "additinalinfro")]
    pub additional_info: Option<String>,
    #[serde(rename = "Order")]
    pub order: Option<OrderSummary>,
    #[serde(rename = "ItemInfo")]
    pub item_info: Option<Vec<ItemInfo>>,
}

#[derive(Debug, Deserialize)]
pub struct OrderSummary {
    #[serde(rename = "OrderId")]
    pub order_id: Option<Value>,
    #[serde(rename = "OrderDate")]
    pub order_date: Option<String>,
    #[serde(rename = "TotalAmount")]
    pub total_amount: Option<Decimal>,
    #[serde(rename = "BenefitApplied", default)]
    pub benefit_applied: bool,
}

#[derive(Debug, Deserialize)]
pub struct ItemInfo {
    #[serde(rename = "ItemId")]
    pub item_id: Option<Value>,
    #[serde(rename = "TotalQuantity", default)]
    pub total_quantity: i64,
    #[serde(rename = "Price", default)]
    pub price: Decimal,
    #[serde(rename = "Issue")]
    pub issue: Option<Vec<ItemIssue>>,
    #[serde(rename = "ImpactedQuantity", default)]
    pub impacted_quantity: i64,
    #[serde(rename = "ImpactedPrice", default)]
    pub impacted_price: Decimal,
}

impl ItemInfo {
    pub fn first_issue_name(&self) -> &str {
        self.issue
            .as_deref()
            .and_then(|issues| issues.first())
            .and_then(|issue| issue.issue_name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemIssue {
    #[serde(rename = "IssueName")]
    pub issue_name: Option<String>,
}

/// "Card Declined" payload.
#[derive(Debug, Deserialize)]
pub struct CardDeclined {
    #[serde(rename = "TransactionDate")]
    pub transaction_date: Option<String>,
    #[serde(rename = "TransactionDetails")]
    pub transaction_details: Option<String>,
    #[serde(rename = "Reason")]
    pub reason: Option<String>,
}

/// "Flex Issue" payload. A missing balance reads as zero.
#[derive(Debug, Deserialize)]
pub struct FlexIssue {
    #[serde(rename = "FromWalletValue")]
    pub from_wallet: Option<String>,
    #[serde(rename = "ToWalletValue")]
    pub to_wallet: Option<String>,
    #[serde(rename = "BalanceAmount", default)]
    pub balance_amount: f64,
    #[serde(rename = "Reason")]
    pub reason: Option<String>,
}

/// Renders a loose JSON scalar the way the upstream forms expect: strings
/// verbatim, numbers and booleans via their display form, anything else
/// empty.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_status_change_wire_names() {
        let payload: CardStatusChange = serde_json::from_str(
            r#"{"Currentstatus":"Active","ChangeStatusto":"Frozen","reasonForchangingcardstatus":"Lost card"}"#,
        )
        .unwrap();
        assert_eq!(payload.current_status.as_deref(), Some("Active"));
        assert_eq!(payload.change_status_to.as_deref(), Some("Frozen"));
        assert_eq!(payload.reason.as_deref(), Some("Lost card"));
    }

    #[test]
    fn test_appointment_process_data_string_encoded() {
        let payload: ProviderIssue = serde_json::from_str(
            r#"{"appointment":{"memberAppointmentId":9001,
                "appointmentProcessData":"{\"DateOfService\":\"2024-02-14\"}"}}"#,
        )
        .unwrap();
        let appointment = payload.appointment.unwrap();
        assert_eq!(
            appointment.date_of_service().as_deref(),
            Some("2024-02-14")
        );
    }

    #[test]
    fn test_appointment_process_data_inline_object() {
        let payload: ProviderIssue = serde_json::from_str(
            r#"{"appointment":{"appointmentProcessData":{"DateOfService":"2024-02-14"}}}"#,
        )
        .unwrap();
        let appointment = payload.appointment.unwrap();
        assert_eq!(
            appointment.date_of_service().as_deref(),
            Some("2024-02-14")
        );
    }

    #[test]
    fn test_order_payload_defaults() {
        let payload: OrderTopicPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.order.is_none());
        assert!(payload.item_info.is_none());
        assert!(payload.additional_info.is_none());
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&serde_json::json!("abc")), "abc");
        assert_eq!(scalar_to_string(&serde_json::json!(42)), "42");
        assert_eq!(scalar_to_string(&serde_json::json!(true)), "true");
        assert_eq!(scalar_to_string(&Value::Null), "");
    }
}
