use std::sync::Arc;

use crate::core::config::ZendeskConfig;
use crate::features::case_tickets::models::{CaseTicket, CaseTopic};
use crate::features::case_tickets::services::description_builder::build_description;
use crate::modules::zendesk::{
    Comment, CustomField, EmailCc, Requester, TagResolver, Ticket, TicketRequest,
};

/// Assembles the outbound ticket payload for a case ticket. Pure
/// construction: all I/O stays in the worker and the client.
pub struct CaseTicketRequestBuilder {
    config: Arc<ZendeskConfig>,
    resolver: Arc<TagResolver>,
}

impl CaseTicketRequestBuilder {
    pub fn new(config: Arc<ZendeskConfig>, resolver: Arc<TagResolver>) -> Self {
        Self { config, resolver }
    }

    pub fn build(&self, ticket: &CaseTicket) -> TicketRequest {
        let subject = format!(
            "Member ID: {} - Case Topic: {}",
            ticket.member_id.as_deref().unwrap_or(""),
            ticket.case_topic.as_deref().unwrap_or("")
        );

        let carrier_tag = self
            .resolver
            .carrier_tag(ticket.insurance_carrier_name.as_deref().unwrap_or(""));
        let requestor_tag = self
            .resolver
            .requestor_type_tag(ticket.requestor_type_id.unwrap_or(0));

        let description = build_description(ticket);

        // The API reads `comment.body` on updates and `description` on
        // creates; body stays null until a remote ticket exists.
        let comment_body = ticket.external_ref().map(|_| description.clone());

        TicketRequest {
            ticket: Ticket {
                assignee_email: self.config.assignee_email.clone(),
                brand_id: self.config.brand_id.clone(),
                group_id: self.config.group_id.clone(),
                description,
                custom_fields: vec![
                    CustomField {
                        id: self.config.member_id_field.clone(),
                        value: ticket.member_id.clone().into(),
                    },
                    CustomField {
                        id: self.config.member_name_field.clone(),
                        value: ticket.member_name.clone().into(),
                    },
                    CustomField {
                        id: self.config.carrier_name_field.clone(),
                        value: carrier_tag.into(),
                    },
                    CustomField {
                        id: self.config.plan_name_field.clone(),
                        value: ticket.health_plan_name.clone().into(),
                    },
                    CustomField {
                        id: self.config.requestor_type_field.clone(),
                        value: requestor_tag.into(),
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
                custom_status_id: self.custom_status_id(ticket),
                subject,
                ticket_form_id: self.config.ticket_form_id.clone(),
                tags: vec![],
                comment: Comment { body: comment_body },
            },
        }
    }

    /// Reimbursement and Wallet Transfer tickets resolve their status tag
    /// from the ticket status alone; every other topic combines the ticket
    /// status with the approval status before resolving.
    fn custom_status_id(&self, ticket: &CaseTicket) -> String {
        let status = ticket.case_ticket_status.as_deref().unwrap_or("");
        let plain = CaseTopic::parse(ticket.case_topic.as_deref().unwrap_or(""))
            .is_some_and(|topic| topic.uses_plain_status());

        if plain {
            self.resolver.status_tag(status)
        } else {
            let combined = format!(
                "{} {}",
                status,
                ticket.approved_status.as_deref().unwrap_or("")
            );
            self.resolver.status_tag(&combined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn config() -> Arc<ZendeskConfig> {
        Arc::new(ZendeskConfig {
            base_url: "https://example.zendesk.com".to_string(),
            username: "agent@example.com/token".to_string(),
            password: "secret".to_string(),
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
                ("Closed Approved".to_string(), "222".to_string()),
            ]),
            HashMap::from([("Acme Health".to_string(), "carrier_acme".to_string())]),
            HashMap::from([(1, "requestor_member".to_string())]),
        ))
    }

    fn ticket(topic: &str, zendesk_ticket: Option<&str>) -> CaseTicket {
        CaseTicket {
            case_ticket_id: 42,
            case_id: Some(7),
            case_number: None,
            case_ticket_number: Some("CT-2024-0042".to_string()),
            case_topic: Some(topic.to_string()),
            case_category: Some("Card".to_string()),
            case_type: Some("FLEX Card".to_string()),
            case_ticket_data: Some("{}".to_string()),
            case_ticket_status: Some("New".to_string()),
            approved_status: Some("Approved".to_string()),
            assigned_to: Some("jdoe".to_string()),
            assign_to_full_name: None,
            create_user: Some("agent.smith".to_string()),
            create_date: Some(Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap()),
            due_date: None,
            member_id: Some("M100".to_string()),
            member_name: Some("Pat Member".to_string()),
            health_plan_name: Some("Sunrise Plan".to_string()),
            insurance_carrier_name: Some("Acme Health".to_string()),
            insurance_carrier_id: Some(55),
            requestor_type_id: Some(1),
            card_last4_digits: Some("1234".to_string()),
            additional_info: None,
            is_first_call_resolution: Some(false),
            first_call_resolution_desc: None,
            is_written_resolution_requested: Some(false),
            zendesk_ticket: zendesk_ticket.map(String::from),
        }
    }

    #[test]
    fn test_create_request_has_null_comment_body() {
        let builder = CaseTicketRequestBuilder::new(config(), resolver());
        let request = builder.build(&ticket("Reimbursement", None));

        assert!(request.ticket.comment.body.is_none());
        assert_eq!(
            request.ticket.subject,
            "Member ID: M100 - Case Topic: Reimbursement"
        );
        assert_eq!(request.ticket.priority, "high");
    }

    #[test]
    fn test_update_request_carries_description_as_comment() {
        let builder = CaseTicketRequestBuilder::new(config(), resolver());
        let request = builder.build(&ticket("Reimbursement", Some("4242")));

        let body = request.ticket.comment.body.as_deref().unwrap();
        assert_eq!(body, request.ticket.description);
        assert!(!body.is_empty());
    }

    #[test]
    fn test_plain_status_topics_resolve_status_alone() {
        let builder = CaseTicketRequestBuilder::new(config(), resolver());
        let request = builder.build(&ticket("Reimbursement", None));
        assert_eq!(request.ticket.custom_status_id, "111");
    }

    #[test]
    fn test_other_topics_combine_status_with_approval() {
        let builder = CaseTicketRequestBuilder::new(config(), resolver());
        let mut case = ticket("Billing issues", None);
        case.case_ticket_status = Some("Closed".to_string());
        let request = builder.build(&case);

        // "Closed Approved" is the combined key
        assert_eq!(request.ticket.custom_status_id, "222");
    }

    #[test]
    fn test_carrier_and_requestor_tags_in_custom_fields() {
        let builder = CaseTicketRequestBuilder::new(config(), resolver());
        let request = builder.build(&ticket("Reimbursement", None));

        let carrier = request
            .ticket
            .custom_fields
            .iter()
            .find(|f| f.id == "102")
            .unwrap();
        assert_eq!(carrier.value, serde_json::json!("carrier_acme"));

        let requestor = request
            .ticket
            .custom_fields
            .iter()
            .find(|f| f.id == "104")
            .unwrap();
        assert_eq!(requestor.value, serde_json::json!("requestor_member"));
    }

    #[test]
    fn test_unknown_carrier_maps_to_sentinel_tag() {
        let builder = CaseTicketRequestBuilder::new(config(), resolver());
        let mut case = ticket("Reimbursement", None);
        case.insurance_carrier_name = Some("Mystery Mutual".to_string());
        let request = builder.build(&case);

        let carrier = request
            .ticket
            .custom_fields
            .iter()
            .find(|f| f.id == "102")
            .unwrap();
        assert_eq!(carrier.value, serde_json::json!("Carrier Not Found"));
    }
}
