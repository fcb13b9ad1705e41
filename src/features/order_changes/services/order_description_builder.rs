//! Builds the ticket description for an order-change request: order header
//! lines plus a product-details block with per-item reasons and the admin
//! approval trail.

use crate::features::order_changes::models::{AdminComment, ItemComment, ItemDetail, Order};

const STATUS_PENDING: &str = "PENDING";
const STATUS_APPROVED: &str = "APPROVED";
const STATUS_REJECTED: &str = "REJECTED";

/// Builds the order description. Malformed item/comment JSON is an error:
/// the caller must skip the remote call rather than file a ticket with a
/// truncated body.
pub fn build_order_description(order: &Order) -> serde_json::Result<String> {
    let item_details: Vec<ItemDetail> = match order.item_details.as_deref() {
        Some(raw) => serde_json::from_str(raw)?,
        None => Vec::new(),
    };
    let item_comments: Vec<ItemComment> = match order.item_comments.as_deref() {
        Some(raw) => serde_json::from_str(raw)?,
        None => Vec::new(),
    };
    let admin_comment: Option<AdminComment> = match order.admin_comments.as_deref() {
        Some(raw) => Some(serde_json::from_str(raw)?),
        None => None,
    };

    let status = order.status.as_deref().unwrap_or("");
    let mut product_details = String::new();

    for item in &item_details {
        product_details.push('\n');
        product_details.push_str(&format!(
            "Item Name: {}\n\
             Units: {}\n\
             Unit Price: {}\n\
             Total Price: {:.2}\n\
             Reason & Comments\n",
            item.item_name.as_deref().unwrap_or(""),
            item.quantity,
            item.unit_price.as_deref().unwrap_or(""),
            item.total_price,
        ));

        let comment = item_comments
            .iter()
            .find(|c| c.order_item_id == item.order_item_id);
        product_details.push_str(comment.and_then(|c| c.reason.as_deref()).unwrap_or(""));
        product_details.push('\n');
        product_details.push_str(comment.and_then(|c| c.comments.as_deref()).unwrap_or(""));
        product_details.push('\n');

        if let Some(admin) = &admin_comment {
            product_details.push_str(&admin_decision_block(status, admin));
        }

        product_details.push('\n');
    }

    Ok(format!(
        "Order ID: {}\n\
         Status: {}\n\
         Carrier Name: {}\n\
         Member ID: {}\n\
         Member Name: {}\n\
         Requested Date: {}\n\
         Submitted By: {}\n\
         Request Type: {}\n\
         Product Details: {}\n",
        order.order_id,
        status,
        order.carrier_name.as_deref().unwrap_or(""),
        order.member_id.as_deref().unwrap_or(""),
        order.user_name.as_deref().unwrap_or(""),
        order.requested_date.as_deref().unwrap_or(""),
        order.submitted_by.as_deref().unwrap_or(""),
        order.request_type.as_deref().unwrap_or(""),
        product_details,
    ))
}

/// The approval trail appears only once the request has been decided; a
/// pending request contributes a blank line instead.
fn admin_decision_block(status: &str, admin: &AdminComment) -> String {
    let status = status.to_uppercase();
    if status != STATUS_APPROVED && status != STATUS_REJECTED {
        return "\n".to_string();
    }

    let decision = if status == STATUS_REJECTED {
        "Rejected"
    } else {
        "Approved"
    };
    let reason = if status == STATUS_REJECTED {
        format!("Reason: {}", admin.comment.as_deref().unwrap_or(""))
    } else {
        "Reason: Approved".to_string()
    };

    format!(
        "{} & Comments\n{} on {}\n{}\n",
        decision,
        admin.display_name.as_deref().unwrap_or(""),
        admin.date.as_deref().unwrap_or(""),
        reason,
    )
}

/// Maps an order status onto the helpdesk status vocabulary: pending
/// requests open as New, decided requests close.
pub fn helpdesk_status_for(order_status: &str) -> Option<&'static str> {
    match order_status.to_uppercase().as_str() {
        STATUS_PENDING => Some("New"),
        STATUS_APPROVED | STATUS_REJECTED => Some("Closed"),
        _ => None,
    }
}
