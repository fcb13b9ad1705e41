//! Builds the human-readable ticket description for a case ticket.
//!
//! Every description is Common Header + topic-specific body + Resolution
//! Footer. The body is selected by the case topic; the payload embedded in
//! `case_ticket_data` is parsed fresh on every call and never persisted.
//! Formatting is pure: the same record always yields identical text.

use rust_decimal::Decimal;

use crate::features::case_tickets::models::{
    scalar_to_string, AddressChange, AddressFields, CardDeclined, CardStatusChange, CaseTicket,
    CaseTopic, FlexIssue, OrderSummary, OrderTopicPayload, ProviderIssue, WalletTransferRequest,
};
use crate::shared::dates;

const UNKNOWN_CASE_TOPIC: &str = "Unknown Case Topic";

/// Builds the full description for a case ticket. Malformed topic JSON is
/// logged and yields an empty string: the caller proceeds with an empty
/// description rather than aborting the batch.
pub fn build_description(ticket: &CaseTicket) -> String {
    let raw_topic = ticket.case_topic.as_deref().unwrap_or("");

    let Some(topic) = CaseTopic::parse(raw_topic) else {
        return UNKNOWN_CASE_TOPIC.to_string();
    };

    match build_for_topic(topic, ticket) {
        Ok(description) => description,
        Err(e) => {
            tracing::error!(
                "Failed to parse topic payload for case ticket {} ({}): {}",
                ticket.case_ticket_id,
                topic.as_str(),
                e
            );
            String::new()
        }
    }
}

fn build_for_topic(topic: CaseTopic, ticket: &CaseTicket) -> serde_json::Result<String> {
    let body = match topic {
        CaseTopic::Reimbursement | CaseTopic::Others => String::new(),
        CaseTopic::ChangeCardStatus => change_card_status_body(ticket)?,
        CaseTopic::WalletTransfer => wallet_transfer_body(ticket)?,
        CaseTopic::CardholderAddressUpdate => {
            address_body(ticket, "Reason for Cardholder Address Update", "New FIS Address")?
        }
        CaseTopic::CardReplacement => {
            address_body(ticket, "Reason for Card Replacement", "Mailing Address")?
        }
        CaseTopic::ProviderIssues => provider_issues_body(ticket)?,
        CaseTopic::BillingIssues => billing_issues_body(ticket)?,
        CaseTopic::ItemRelatedIssues
        | CaseTopic::ShipmentRelatedIssues
        | CaseTopic::HearingAidIssues => itemized_order_body(ticket)?,
        CaseTopic::CardDeclined => card_declined_body(ticket)?,
        CaseTopic::FlexIssue => flex_issue_body(ticket)?,
        CaseTopic::UserAgreementsNotReceived => {
            return Ok("Description for User Agreements (Not received)".to_string())
        }
        CaseTopic::WrongItemReceived => {
            return Ok("Description for Wrong Item received".to_string())
        }
        CaseTopic::DeviceIssue => return Ok("Description for Device Issue".to_string()),
        CaseTopic::BalanceNotLoaded => {
            return Ok("Description for Balance not loaded".to_string())
        }
        CaseTopic::WrongWalletCharged => {
            return Ok("Description for Wrong wallet charged".to_string())
        }
        CaseTopic::TransactionDeclined => {
            return Ok("Description for Transaction declined".to_string())
        }
        CaseTopic::RequestVoucher => return Ok("Description for Request Voucher".to_string()),
    };

    Ok(format!(
        "{}{}{}",
        common_header(ticket),
        body,
        resolution_footer(ticket)
    ))
}

/// Header shared by every formatted topic.
fn common_header(ticket: &CaseTicket) -> String {
    let case_id = format!(
        "{} - {}",
        ticket.case_ticket_number.as_deref().unwrap_or(""),
        ticket.case_topic.as_deref().unwrap_or("")
    );
    let card_information = format!(
        "XXXX-XXXX-XXXX-{}",
        ticket.card_last4_digits.as_deref().unwrap_or("")
    );

    format!(
        "Case ID#: {}\n\
         Created By: {}\n\
         Created On: {}\n\
         Assigned To: {}\n\
         Issue Genre: {}\n\
         Issue Type: {}\n\
         Issue Topic: {}\n\
         Case Ticket Status: {}\n\
         Card Information: {}\n",
        case_id,
        ticket.create_user.as_deref().unwrap_or(""),
        dates::format_date(ticket.create_date),
        ticket.assigned_to.as_deref().unwrap_or(""),
        ticket.case_category.as_deref().unwrap_or(""),
        ticket.case_type.as_deref().unwrap_or(""),
        ticket.case_topic.as_deref().unwrap_or(""),
        ticket.case_ticket_status.as_deref().unwrap_or(""),
        card_information,
    )
}

/// Footer shared by every formatted topic. Null resolution flags render as
/// "No".
fn resolution_footer(ticket: &CaseTicket) -> String {
    format!(
        "Additional Details or Action Taken: {}\n\
         Description of Complaint : {}\n\
         First Contact Resolution: {}\n\
         Resolution Description: {}\n\
         Is Written Resolution Requested: {}\n",
        ticket.additional_info.as_deref().unwrap_or(""),
        complaint_description(ticket),
        yes_no(ticket.is_first_call_resolution),
        ticket.first_call_resolution_desc.as_deref().unwrap_or(""),
        yes_no(ticket.is_written_resolution_requested),
    )
}

/// The complaint text lives in the topic payload under the contractual
/// (misspelled) `additinalinfro` key. Extraction is best-effort; a missing
/// or unreadable payload contributes an empty value, not a failure.
fn complaint_description(ticket: &CaseTicket) -> String {
    ticket
        .case_ticket_data
        .as_deref()
        .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
        .and_then(|root| {
            root.get("additinalinfro")
                .and_then(|v| v.as_str().map(String::from))
        })
        .unwrap_or_default()
}

fn change_card_status_body(ticket: &CaseTicket) -> serde_json::Result<String> {
    let payload: CardStatusChange = parse_payload(ticket)?;

    Ok(format!(
        "Current Status: {}\n\
         Change Status To: {}\n\
         Reason for Changing Card Status: {}\n",
        payload.current_status.as_deref().unwrap_or(""),
        payload.change_status_to.as_deref().unwrap_or(""),
        payload.reason.as_deref().unwrap_or(""),
    ))
}

fn wallet_transfer_body(ticket: &CaseTicket) -> serde_json::Result<String> {
    let payload: WalletTransferRequest = parse_payload(ticket)?;

    let balance = payload
        .balance_amount
        .as_ref()
        .map(scalar_to_string)
        .unwrap_or_default();

    Ok(format!(
        "From Wallet: {}\n\
         To Wallet: {}\n\
         Balance Amount: {}\n\
         Reason for Missing Funds: {}\n",
        payload.from_wallet.as_deref().unwrap_or(""),
        payload.to_wallet.as_deref().unwrap_or(""),
        balance,
        payload.reason.as_deref().unwrap_or(""),
    ))
}

fn address_body(
    ticket: &CaseTicket,
    reason_label: &str,
    address_label: &str,
) -> serde_json::Result<String> {
    let payload: AddressChange = parse_payload(ticket)?;

    let reason = payload
        .reason
        .and_then(|r| r.value)
        .unwrap_or_default();
    let address = payload
        .address
        .map(|a| join_address(&a))
        .unwrap_or_default();

    Ok(format!(
        "{}: {}\n{}: {}\n",
        reason_label, reason, address_label, address
    ))
}

/// Joins the address components in their fixed order, dropping empty parts
/// so the result never carries doubled separators.
fn join_address(address: &AddressFields) -> String {
    [
        address.firstname.as_deref(),
        address.lastname.as_deref(),
        address.address1.as_deref(),
        address.address2.as_deref(),
        address.city.as_deref(),
        address.state.as_deref(),
        address.state_code.as_deref(),
        address.zipcode.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

fn provider_issues_body(ticket: &CaseTicket) -> serde_json::Result<String> {
    let payload: ProviderIssue = parse_payload(ticket)?;
    let appointment = payload.appointment;

    let appointment_id = appointment
        .as_ref()
        .and_then(|a| a.member_appointment_id.as_ref())
        .map(scalar_to_string)
        .unwrap_or_default();
    let date_of_service = appointment
        .as_ref()
        .and_then(|a| a.date_of_service())
        .map(|raw| dates::format_date_str(&raw))
        .unwrap_or_default();

    Ok(format!(
        "Appointment ID: #{}\n\
         Provider Name: {}\n\
         Provider Location: {}\n\
         HCP Name: {}\n\
         Date of Interaction: {}\n",
        appointment_id,
        appointment
            .as_ref()
            .and_then(|a| a.provider_name.as_deref())
            .unwrap_or(""),
        appointment
            .as_ref()
            .and_then(|a| a.provider_location.as_deref())
            .unwrap_or(""),
        appointment
            .as_ref()
            .and_then(|a| a.hcp_name.as_deref())
            .unwrap_or(""),
        date_of_service,
    ))
}

fn billing_issues_body(ticket: &CaseTicket) -> serde_json::Result<String> {
    let payload: OrderTopicPayload = parse_payload(ticket)?;

    let benefit_applied = match &payload.order {
        Some(order) if order.benefit_applied => "Yes",
        Some(_) => "No",
        None => "Not found",
    };

    Ok(format!(
        "Order Information: {}\nWas Benefit Applied: {}\n",
        order_information(payload.order.as_ref()),
        benefit_applied,
    ))
}

fn itemized_order_body(ticket: &CaseTicket) -> serde_json::Result<String> {
    let payload: OrderTopicPayload = parse_payload(ticket)?;

    let mut body = format!(
        "Order Information: {}\n",
        order_information(payload.order.as_ref())
    );

    let items = payload.item_info.as_deref().unwrap_or(&[]);
    let mut total_impacted_message = String::new();

    if !items.is_empty() {
        let mut item_lines = String::new();
        let mut total_impacted = Decimal::ZERO;

        for item in items {
            item_lines.push_str(&format!(
                "Item ID: {}\n\
                 Total Quantity: {}\n\
                 Price: ${:.2}\n\
                 Member Issue: {}\n\
                 Impacted Quantity: {}\n\
                 Impacted Price: ${:.2}\n\n",
                item.item_id
                    .as_ref()
                    .map(scalar_to_string)
                    .unwrap_or_default(),
                item.total_quantity,
                item.price,
                item.first_issue_name(),
                item.impacted_quantity,
                item.impacted_price,
            ));
            total_impacted += item.impacted_price;
        }

        body.push_str(&format!("Item Information:\n{}\n", item_lines));
        total_impacted_message = format!("Total Price Impacted: ${:.2}", total_impacted);
    }

    body.push_str(&total_impacted_message);
    body.push('\n');

    Ok(body)
}

fn card_declined_body(ticket: &CaseTicket) -> serde_json::Result<String> {
    let payload: CardDeclined = parse_payload(ticket)?;

    let transaction_date = payload
        .transaction_date
        .as_deref()
        .map(dates::format_date_str)
        .unwrap_or_default();

    Ok(format!(
        "Transaction Date: {}\n\
         Transaction Details: {}\n\
         Reason for: {}\n",
        transaction_date,
        payload.transaction_details.as_deref().unwrap_or(""),
        payload.reason.as_deref().unwrap_or(""),
    ))
}

fn flex_issue_body(ticket: &CaseTicket) -> serde_json::Result<String> {
    let payload: FlexIssue = parse_payload(ticket)?;

    Ok(format!(
        "Wallet Transfer Reason: Transaction amount of ${} from {} to {} wallet with reason {}\n",
        payload.balance_amount,
        payload.from_wallet.as_deref().unwrap_or(""),
        payload.to_wallet.as_deref().unwrap_or(""),
        payload.reason.as_deref().unwrap_or(""),
    ))
}

/// Shared order-summary line: `{orderId} - {MMM DD, YYYY} - ${total}`, or
/// empty when the payload carries no order.
fn order_information(order: Option<&OrderSummary>) -> String {
    match order {
        Some(order) => format!(
            "{} - {} - ${:.2}",
            order
                .order_id
                .as_ref()
                .map(scalar_to_string)
                .unwrap_or_default(),
            order
                .order_date
                .as_deref()
                .map(dates::format_date_str)
                .unwrap_or_default(),
            order.total_amount.unwrap_or_default(),
        ),
        None => String::new(),
    }
}

fn yes_no(flag: Option<bool>) -> &'static str {
    if flag.unwrap_or(false) {
        "Yes"
    } else {
        "No"
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(ticket: &CaseTicket) -> serde_json::Result<T> {
    serde_json::from_str(ticket.case_ticket_data.as_deref().unwrap_or(""))
}
