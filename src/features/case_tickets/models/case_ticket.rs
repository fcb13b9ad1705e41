use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A support-case ticket row pending synchronization to the helpdesk.
///
/// `zendesk_ticket` is null/empty exactly when no remote ticket exists for
/// this record; once set it is only rewritten by the sync worker.
#[derive(Debug, Clone, FromRow)]
pub struct CaseTicket {
    pub case_ticket_id: i64,
    pub case_id: Option<i64>,
    pub case_number: Option<String>,
    pub case_ticket_number: Option<String>,
    pub case_topic: Option<String>,
    pub case_category: Option<String>,
    pub case_type: Option<String>,
    pub case_ticket_data: Option<String>,
    pub case_ticket_status: Option<String>,
    pub approved_status: Option<String>,
    pub assigned_to: Option<String>,
    pub assign_to_full_name: Option<String>,
    pub create_user: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub member_id: Option<String>,
    pub member_name: Option<String>,
    pub health_plan_name: Option<String>,
    pub insurance_carrier_name: Option<String>,
    pub insurance_carrier_id: Option<i64>,
    pub requestor_type_id: Option<i32>,
    pub card_last4_digits: Option<String>,
    pub additional_info: Option<String>,
    pub is_first_call_resolution: Option<bool>,
    pub first_call_resolution_desc: Option<String>,
    pub is_written_resolution_requested: Option<bool>,
    pub zendesk_ticket: Option<String>,
}

impl CaseTicket {
    /// The remote ticket id, when one has already been created. Empty,
    /// non-numeric, and non-positive references all mean "not yet synced".
    pub fn external_ref(&self) -> Option<i64> {
        self.zendesk_ticket
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket_with_ref(reference: Option<&str>) -> CaseTicket {
        CaseTicket {
            case_ticket_id: 1,
            case_id: None,
            case_number: None,
            case_ticket_number: None,
            case_topic: None,
            case_category: None,
            case_type: None,
            case_ticket_data: None,
            case_ticket_status: None,
            approved_status: None,
            assigned_to: None,
            assign_to_full_name: None,
            create_user: None,
            create_date: None,
            due_date: None,
            member_id: None,
            member_name: None,
            health_plan_name: None,
            insurance_carrier_name: None,
            insurance_carrier_id: None,
            requestor_type_id: None,
            card_last4_digits: None,
            additional_info: None,
            is_first_call_resolution: None,
            first_call_resolution_desc: None,
            is_written_resolution_requested: None,
            zendesk_ticket: reference.map(String::from),
        }
    }

    #[test]
    fn test_external_ref_parses_positive_ids() {
        assert_eq!(ticket_with_ref(Some("4242")).external_ref(), Some(4242));
        assert_eq!(ticket_with_ref(Some(" 7 ")).external_ref(), Some(7));
    }

    #[test]
    fn test_external_ref_absent_for_unsynced_records() {
        assert_eq!(ticket_with_ref(None).external_ref(), None);
        assert_eq!(ticket_with_ref(Some("")).external_ref(), None);
        assert_eq!(ticket_with_ref(Some("0")).external_ref(), None);
        assert_eq!(ticket_with_ref(Some("-3")).external_ref(), None);
        assert_eq!(ticket_with_ref(Some("abc")).external_ref(), None);
    }
}
