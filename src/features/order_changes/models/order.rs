use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::FromRow;

/// A pending order-change request id; the full order detail is loaded in a
/// second query.
#[derive(Debug, Clone, FromRow)]
pub struct OrderChangeRequest {
    pub order_change_request_id: i64,
}

/// An order-change ticket candidate. The item-detail, item-comment, and
/// admin-comment fields carry JSON-encoded text parsed at formatting time.
///
/// `is_processed` is the tri-state sync marker (0 not processed,
/// 1 processed, 2 submitting); `ticket_id` is the remote reference and is
/// null/empty until a remote ticket exists.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub order_id: i64,
    pub order_change_request_id: i64,
    pub member_id: Option<String>,
    pub user_name: Option<String>,
    pub submitted_by: Option<String>,
    pub carrier_name: Option<String>,
    pub insurance_carrier_id: Option<i64>,
    pub requested_date: Option<String>,
    pub request_type: Option<String>,
    pub status: Option<String>,
    pub item_details: Option<String>,
    pub item_comments: Option<String>,
    pub admin_comments: Option<String>,
    pub total_price: Option<Decimal>,
    pub is_processed: Option<i32>,
    pub ticket_id: Option<String>,
}

impl Order {
    /// The remote ticket id, when one has already been created. Empty,
    /// non-numeric, and non-positive references all mean "not yet synced".
    pub fn external_ref(&self) -> Option<i64> {
        self.ticket_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
    }
}

/// One line of the JSON-encoded `item_details` field.
#[derive(Debug, Deserialize)]
pub struct ItemDetail {
    #[serde(rename = "ItemName")]
    pub item_name: Option<String>,
    #[serde(rename = "Quantity", default)]
    pub quantity: i64,
    #[serde(rename = "UnitPrice")]
    pub unit_price: Option<String>,
    #[serde(rename = "TotalPrice", default)]
    pub total_price: Decimal,
    #[serde(rename = "OrderItemId", default)]
    pub order_item_id: i64,
    #[serde(rename = "Comments")]
    pub comments: Option<String>,
}

/// One entry of the JSON-encoded `item_comments` field, matched to its
/// item by `order_item_id`.
#[derive(Debug, Deserialize)]
pub struct ItemComment {
    #[serde(rename = "OrderItemId", default)]
    pub order_item_id: i64,
    #[serde(rename = "Comments")]
    pub comments: Option<String>,
    #[serde(rename = "Reason")]
    pub reason: Option<String>,
}

/// The JSON-encoded `admin_comments` field: who approved or rejected the
/// request, when, and why.
#[derive(Debug, Deserialize)]
pub struct AdminComment {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "ModifyUser")]
    pub modify_user: Option<String>,
    #[serde(rename = "DisplayName")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_detail_wire_names() {
        let raw = r#"[{"ItemName":"Vitamins","Quantity":2,"UnitPrice":"9.99",
            "TotalPrice":19.98,"OrderItemId":12,"Comments":"x"}]"#;
        let items: Vec<ItemDetail> = serde_json::from_str(raw).unwrap();
        assert_eq!(items[0].item_name.as_deref(), Some("Vitamins"));
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].order_item_id, 12);
    }

    #[test]
    fn test_external_ref() {
        let order = Order {
            order_id: 1,
            order_change_request_id: 2,
            member_id: None,
            user_name: None,
            submitted_by: None,
            carrier_name: None,
            insurance_carrier_id: None,
            requested_date: None,
            request_type: None,
            status: None,
            item_details: None,
            item_comments: None,
            admin_comments: None,
            total_price: None,
            is_processed: Some(0),
            ticket_id: Some("901".to_string()),
        };
        assert_eq!(order.external_ref(), Some(901));
    }
}
