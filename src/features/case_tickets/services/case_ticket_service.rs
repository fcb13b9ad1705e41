use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::case_tickets::models::CaseTicket;
use crate::shared::types::ProcessStatus;

/// Store operations the case sync worker depends on. The worker is generic
/// over this trait so its state machine is testable without a database.
#[async_trait]
pub trait CaseTicketStore: Send + Sync {
    /// Fetches case tickets created on or after the polling window start,
    /// oldest first, bounded by the configured count.
    async fn fetch_pending(&self, from_date: NaiveDate, limit: i64) -> Result<Vec<CaseTicket>>;

    /// Writes the remote ticket reference and processing status back to the
    /// source record. Returns the affected-row count; exactly 1 is success.
    async fn update_sync_reference(
        &self,
        case_ticket_id: i64,
        ticket_ref: i64,
        status: ProcessStatus,
    ) -> Result<u64>;
}

/// Postgres-backed store. Reads come from the CRM pool, write-backs go to
/// the BR pool.
pub struct CaseTicketService {
    crm_pool: PgPool,
    br_pool: PgPool,
}

impl CaseTicketService {
    pub fn new(crm_pool: PgPool, br_pool: PgPool) -> Self {
        Self { crm_pool, br_pool }
    }
}

#[async_trait]
impl CaseTicketStore for CaseTicketService {
    async fn fetch_pending(&self, from_date: NaiveDate, limit: i64) -> Result<Vec<CaseTicket>> {
        sqlx::query_as::<_, CaseTicket>(
            r#"
            SELECT
                case_ticket_id, case_id, case_number, case_ticket_number,
                case_topic, case_category, case_type, case_ticket_data,
                case_ticket_status, approved_status, assigned_to,
                assign_to_full_name, create_user, create_date, due_date,
                member_id, member_name, health_plan_name,
                insurance_carrier_name, insurance_carrier_id,
                requestor_type_id, card_last4_digits, additional_info,
                is_first_call_resolution, first_call_resolution_desc,
                is_written_resolution_requested, zendesk_ticket
            FROM case_tickets
            WHERE create_date >= $1
            ORDER BY case_ticket_id ASC
            LIMIT $2
            "#,
        )
        .bind(from_date)
        .bind(limit)
        .fetch_all(&self.crm_pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch pending case tickets: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update_sync_reference(
        &self,
        case_ticket_id: i64,
        ticket_ref: i64,
        status: ProcessStatus,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE case_tickets
            SET zendesk_ticket = $2, is_processed = $3
            WHERE case_ticket_id = $1
            "#,
        )
        .bind(case_ticket_id)
        .bind(ticket_ref.to_string())
        .bind(status.code())
        .execute(&self.br_pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to update sync reference for case ticket {}: {:?}",
                case_ticket_id,
                e
            );
            AppError::Database(e)
        })?;

        Ok(result.rows_affected())
    }
}
