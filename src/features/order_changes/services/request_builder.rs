use std::sync::Arc;

use crate::core::config::ZendeskConfig;
use crate::features::order_changes::models::Order;
use crate::features::order_changes::services::order_description_builder::{
    build_order_description, helpdesk_status_for,
};
use crate::modules::zendesk::{
    Comment, CustomField, EmailCc, Requester, TagResolver, Ticket, TicketRequest,
};

/// Assembles the outbound ticket payload for an order-change request.
///
/// Returns None when the embedded item JSON cannot be parsed; the worker
/// must then skip the remote call entirely instead of filing a ticket with
/// no body.
pub struct OrderRequestBuilder {
    config: Arc<ZendeskConfig>,
    resolver: Arc<TagResolver>,
}

impl OrderRequestBuilder {
    pub fn new(config: Arc<ZendeskConfig>, resolver: Arc<TagResolver>) -> Self {
        Self { config, resolver }
    }

    pub fn build(&self, order: &Order) -> Option<TicketRequest> {
        let description = match build_order_description(order) {
            Ok(description) => description,
            Err(e) => {
                tracing::error!(
                    "Failed to build zendesk request body for order change request {}: {}",
                    order.order_change_request_id,
                    e
                );
                return None;
            }
        };

        let subject = format!(
            "Member ID: {} - Request Type: {}",
            order.member_id.as_deref().unwrap_or(""),
            order.request_type.as_deref().unwrap_or("")
        );

        let carrier_tag = self
            .resolver
            .carrier_tag(order.carrier_name.as_deref().unwrap_or(""));

        let custom_status_id = helpdesk_status_for(order.status.as_deref().unwrap_or(""))
            .map(|status| self.resolver.status_tag(status))
            .unwrap_or_default();

        let comment_body = order.external_ref().map(|_| description.clone());

        Some(TicketRequest {
            ticket: Ticket {
                assignee_email: self.config.assignee_email.clone(),
                brand_id: self.config.brand_id.clone(),
                group_id: self.config.group_id.clone(),
                description,
                custom_fields: vec![
                    CustomField {
                        id: self.config.member_id_field.clone(),
                        value: order.member_id.clone().into(),
                    },
                    CustomField {
                        id: self.config.member_name_field.clone(),
                        value: order.user_name.clone().into(),
                    },
                    CustomField {
                        id: self.config.carrier_name_field.clone(),
                        value: carrier_tag.into(),
                    },
                ],
                email_ccs: vec![EmailCc {
                    user_email: self.config.assignee_email.clone(),
                    action: "put".to_string(),
                }],
                priority: "high".to_string(),
                requester: Requester {
                    email: self.config.assignee_email.clone(),
                },
                custom_status_id,
                subject,
                ticket_form_id: self.config.ticket_form_id.clone(),
                tags: vec![],
                comment: Comment { body: comment_body },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> Arc<ZendeskConfig> {
        Arc::new(ZendeskConfig {
            base_url: "https://example.zendesk.com".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            create_ticket_path: "/api/v2/tickets.json".to_string(),
            update_ticket_path: "/api/v2/tickets/".to_string(),
            assignee_email: "agent@example.com".to_string(),
            brand_id: "10".to_string(),
            group_id: "20".to_string(),
            ticket_form_id: "30".to_string(),
            member_id_field: "100".to_string(),
            member_name_field: "101".to_string(),
            carrier_name_field: "102".to_string(),
            plan_name_field: "103".to_string(),
            requestor_type_field: "104".to_string(),
            status_tags: HashMap::new(),
            carrier_tags: HashMap::new(),
            requestor_tags: HashMap::new(),
        })
    }

    fn resolver() -> Arc<TagResolver> {
        Arc::new(TagResolver::new(
            HashMap::from([
                ("New".to_string(), "111".to_string()),
                ("Closed".to_string(), "333".to_string()),
            ]),
            HashMap::new(),
            HashMap::new(),
        ))
    }

    fn order(status: &str, ticket_id: Option<&str>) -> Order {
        Order {
            order_id: 3001,
            order_change_request_id: 77,
            member_id: Some("M200".to_string()),
            user_name: Some("Pat Member".to_string()),
            submitted_by: None,
            carrier_name: Some("Acme Health".to_string()),
            insurance_carrier_id: None,
            requested_date: None,
            request_type: Some("Refund".to_string()),
            status: Some(status.to_string()),
            item_details: None,
            item_comments: None,
            admin_comments: None,
            total_price: None,
            is_processed: Some(0),
            ticket_id: ticket_id.map(String::from),
        }
    }

    #[test]
    fn test_pending_order_opens_as_new() {
        let builder = OrderRequestBuilder::new(config(), resolver());
        let request = builder.build(&order("PENDING", None)).unwrap();

        assert_eq!(request.ticket.custom_status_id, "111");
        assert_eq!(
            request.ticket.subject,
            "Member ID: M200 - Request Type: Refund"
        );
        assert!(request.ticket.comment.body.is_none());
    }

    #[test]
    fn test_decided_order_closes() {
        let builder = OrderRequestBuilder::new(config(), resolver());
        assert_eq!(
            builder
                .build(&order("APPROVED", None))
                .unwrap()
                .ticket
                .custom_status_id,
            "333"
        );
        assert_eq!(
            builder
                .build(&order("REJECTED", None))
                .unwrap()
                .ticket
                .custom_status_id,
            "333"
        );
    }

    #[test]
    fn test_unknown_status_resolves_to_empty() {
        let builder = OrderRequestBuilder::new(config(), resolver());
        let request = builder.build(&order("WEIRD", None)).unwrap();
        assert_eq!(request.ticket.custom_status_id, "");
    }

    #[test]
    fn test_update_carries_description_as_comment() {
        let builder = OrderRequestBuilder::new(config(), resolver());
        let request = builder.build(&order("PENDING", Some("901"))).unwrap();
        assert_eq!(
            request.ticket.comment.body.as_deref(),
            Some(request.ticket.description.as_str())
        );
    }

    #[test]
    fn test_malformed_item_json_yields_none() {
        let builder = OrderRequestBuilder::new(config(), resolver());
        let mut bad = order("PENDING", None);
        bad.item_details = Some("{not json".to_string());
        assert!(builder.build(&bad).is_none());
    }
}
