use serde::Serialize;
use serde_json::Value;

/// Outbound ticket payload, shaped exactly as the helpdesk API expects.
/// Both the create (POST) and update (PUT) operations take this body.
#[derive(Debug, Clone, Serialize)]
pub struct TicketRequest {
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub assignee_email: String,
    pub brand_id: String,
    pub group_id: String,
    pub description: String,
    pub custom_fields: Vec<CustomField>,
    pub email_ccs: Vec<EmailCc>,
    pub priority: String,
    pub requester: Requester,
    pub custom_status_id: String,
    pub subject: String,
    pub ticket_form_id: String,
    pub tags: Vec<String>,
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomField {
    pub id: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailCc {
    pub user_email: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Requester {
    pub email: String,
}

/// The API distinguishes an initial description from a follow-up comment by
/// this field: `body` must serialize as null on create and carry the
/// description text on update.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_body_serializes_as_null_on_create() {
        let request = TicketRequest {
            ticket: Ticket {
                assignee_email: "agent@example.com".to_string(),
                brand_id: "1".to_string(),
                group_id: "2".to_string(),
                description: "desc".to_string(),
                custom_fields: vec![CustomField {
                    id: "100".to_string(),
                    value: serde_json::json!("M123"),
                }],
                email_ccs: vec![EmailCc {
                    user_email: "agent@example.com".to_string(),
                    action: "put".to_string(),
                }],
                priority: "high".to_string(),
                requester: Requester {
                    email: "agent@example.com".to_string(),
                },
                custom_status_id: "111".to_string(),
                subject: "subject".to_string(),
                ticket_form_id: "3".to_string(),
                tags: vec![],
                comment: Comment { body: None },
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ticket"]["comment"]["body"], Value::Null);
        assert_eq!(json["ticket"]["priority"], "high");
        assert_eq!(json["ticket"]["tags"], serde_json::json!([]));
    }
}
