use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::order_changes::models::{Order, OrderChangeRequest};
use crate::shared::types::ProcessStatus;

/// Store operations the order sync worker depends on.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetches order-change request ids pending synchronization, oldest
    /// first, bounded by the configured count.
    async fn fetch_pending_change_requests(
        &self,
        from_date: NaiveDate,
        limit: i64,
    ) -> Result<Vec<OrderChangeRequest>>;

    /// Loads the full order detail for one change request.
    async fn get_order_for_change_request(
        &self,
        order_change_request_id: i64,
    ) -> Result<Option<Order>>;

    /// Writes the remote ticket reference and processing status back.
    /// Returns the affected-row count; exactly 1 is success.
    async fn update_sync_reference(
        &self,
        order_change_request_id: i64,
        ticket_ref: i64,
        status: ProcessStatus,
    ) -> Result<u64>;
}

/// Postgres-backed store. Reads come from the CRM pool, write-backs go to
/// the BR pool.
pub struct OrderService {
    crm_pool: PgPool,
    br_pool: PgPool,
}

impl OrderService {
    pub fn new(crm_pool: PgPool, br_pool: PgPool) -> Self {
        Self { crm_pool, br_pool }
    }
}

#[async_trait]
impl OrderStore for OrderService {
    async fn fetch_pending_change_requests(
        &self,
        from_date: NaiveDate,
        limit: i64,
    ) -> Result<Vec<OrderChangeRequest>> {
        sqlx::query_as::<_, OrderChangeRequest>(
            r#"
            SELECT order_change_request_id
            FROM order_change_requests
            WHERE requested_date >= $1
            AND COALESCE(is_processed, 0) = 0
            ORDER BY order_change_request_id ASC
            LIMIT $2
            "#,
        )
        .bind(from_date)
        .bind(limit)
        .fetch_all(&self.crm_pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch pending order change requests: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn get_order_for_change_request(
        &self,
        order_change_request_id: i64,
    ) -> Result<Option<Order>> {
        sqlx::query_as::<_, Order>(
            r#"
            SELECT
                o.order_id, ocr.order_change_request_id, o.member_id,
                o.user_name, ocr.submitted_by, o.carrier_name,
                o.insurance_carrier_id,
                to_char(ocr.requested_date, 'MM/DD/YYYY') AS requested_date,
                ocr.request_type, ocr.status, ocr.item_details,
                ocr.item_comments, ocr.admin_comments, ocr.total_price,
                ocr.is_processed, ocr.ticket_id
            FROM order_change_requests ocr
            JOIN orders o ON o.order_id = ocr.order_id
            WHERE ocr.order_change_request_id = $1
            "#,
        )
        .bind(order_change_request_id)
        .fetch_optional(&self.crm_pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to load order for change request {}: {:?}",
                order_change_request_id,
                e
            );
            AppError::Database(e)
        })
    }

    async fn update_sync_reference(
        &self,
        order_change_request_id: i64,
        ticket_ref: i64,
        status: ProcessStatus,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE order_change_requests
            SET ticket_id = $2, is_processed = $3
            WHERE order_change_request_id = $1
            "#,
        )
        .bind(order_change_request_id)
        .bind(ticket_ref.to_string())
        .bind(status.code())
        .execute(&self.br_pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to update sync reference for order change request {}: {:?}",
                order_change_request_id,
                e
            );
            AppError::Database(e)
        })?;

        Ok(result.rows_affected())
    }
}
