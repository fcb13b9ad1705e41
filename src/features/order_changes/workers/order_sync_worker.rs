use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;

use crate::core::config::JobConfig;
use crate::core::error::Result;
use crate::core::jobs::JobGuard;
use crate::features::order_changes::models::Order;
use crate::features::order_changes::services::{OrderRequestBuilder, OrderService, OrderStore};
use crate::modules::zendesk::{ZendeskApi, ZendeskClient};
use crate::shared::types::ProcessStatus;

/// Worker wired to the live store and Zendesk client.
pub type PgOrderSyncWorker = OrderSyncWorker<OrderService, ZendeskClient>;

/// Background worker that synchronizes pending order-change requests to
/// the helpdesk. Same state machine as the case-ticket worker, with a
/// two-step fetch: pending change-request ids first, then the full order
/// per id.
pub struct OrderSyncWorker<S, Z> {
    store: Arc<S>,
    zendesk: Arc<Z>,
    request_builder: OrderRequestBuilder,
    job: JobConfig,
    guard: JobGuard,
}

impl<S: OrderStore + 'static, Z: ZendeskApi + 'static> OrderSyncWorker<S, Z> {
    pub fn new(
        store: Arc<S>,
        zendesk: Arc<Z>,
        request_builder: OrderRequestBuilder,
        job: JobConfig,
    ) -> Self {
        Self {
            store,
            zendesk,
            request_builder,
            job,
            guard: JobGuard::new("order-changes"),
        }
    }

    /// Runs the worker on its polling interval until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Starting order change sync worker");

        let mut interval = interval(Duration::from_secs(self.job.interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(_token) = self.guard.try_acquire() else {
                        tracing::debug!("Order change sync already running, skipping tick");
                        continue;
                    };
                    if let Err(e) = self.process_batch().await {
                        tracing::error!("Error processing order change batch: {:?}", e);
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("Order change sync worker shutting down");
                    break;
                }
            }
        }
    }

    /// Spawns one batch in the background, as the HTTP trigger does.
    /// Returns false when a run is already in flight.
    pub fn spawn_batch(self: &Arc<Self>) -> bool {
        let Some(token) = self.guard.try_acquire() else {
            tracing::info!("Job {} already running, trigger refused", self.guard.name());
            return false;
        };

        let worker = Arc::clone(self);
        tokio::spawn(async move {
            let _token = token;
            if let Err(e) = worker.process_batch().await {
                tracing::error!("Error processing order change batch: {:?}", e);
            }
        });

        true
    }

    pub async fn process_batch(&self) -> Result<()> {
        let change_requests = self
            .store
            .fetch_pending_change_requests(self.job.from_date, self.job.batch_size)
            .await?;

        if change_requests.is_empty() {
            return Ok(());
        }

        tracing::info!(
            "Processing {} pending order change requests",
            change_requests.len()
        );

        for change_request in change_requests {
            let order = match self
                .store
                .get_order_for_change_request(change_request.order_change_request_id)
                .await
            {
                Ok(Some(order)) => order,
                Ok(None) => {
                    tracing::warn!(
                        "Order change request {} has no order detail, skipping",
                        change_request.order_change_request_id
                    );
                    continue;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to load order change request {}: {:?}",
                        change_request.order_change_request_id,
                        e
                    );
                    continue;
                }
            };

            if let Err(e) = self.sync_order(&order).await {
                tracing::error!(
                    "Failed to sync order change request {}: {:?}",
                    order.order_change_request_id,
                    e
                );
            }
        }

        Ok(())
    }

    async fn sync_order(&self, order: &Order) -> Result<()> {
        // A record whose payload cannot be built is skipped before any
        // write: never file a ticket with no body.
        let Some(request) = self.request_builder.build(order) else {
            tracing::warn!(
                "Skipping order change request {}: request body could not be built",
                order.order_change_request_id
            );
            return Ok(());
        };

        let pre_ref = order.external_ref().unwrap_or(0);
        self.write_back(
            order.order_change_request_id,
            pre_ref,
            ProcessStatus::Submitting,
        )
        .await?;

        let ticket_ref = match order.external_ref() {
            Some(existing) => {
                tracing::info!(
                    "Updating zendesk ticket {} for order change request {} (member {:?})",
                    existing,
                    order.order_change_request_id,
                    order.member_id
                );
                self.zendesk
                    .update_ticket(existing, &request)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(
                            "Zendesk update failed for order change request {}: {:?}",
                            order.order_change_request_id,
                            e
                        );
                        0
                    })
            }
            None => {
                tracing::info!(
                    "Creating zendesk ticket for order change request {} (member {:?})",
                    order.order_change_request_id,
                    order.member_id
                );
                self.zendesk
                    .create_ticket(&request)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(
                            "Zendesk create failed for order change request {}: {:?}",
                            order.order_change_request_id,
                            e
                        );
                        0
                    })
            }
        };

        if ticket_ref > 0 {
            tracing::info!(
                "Synced order change request {} to zendesk ticket {}",
                order.order_change_request_id,
                ticket_ref
            );
            self.write_back(
                order.order_change_request_id,
                ticket_ref,
                ProcessStatus::Processed,
            )
            .await?;
        } else {
            tracing::warn!(
                "Zendesk sync failed for order change request {}, leaving record unprocessed",
                order.order_change_request_id
            );
            self.write_back(
                order.order_change_request_id,
                pre_ref,
                ProcessStatus::NotProcessed,
            )
            .await?;
        }

        Ok(())
    }

    async fn write_back(
        &self,
        order_change_request_id: i64,
        ticket_ref: i64,
        status: ProcessStatus,
    ) -> Result<()> {
        let affected = self
            .store
            .update_sync_reference(order_change_request_id, ticket_ref, status)
            .await?;

        if affected == 1 {
            tracing::info!(
                "Recorded zendesk reference {} ({}) for order change request {}",
                ticket_ref,
                status,
                order_change_request_id
            );
        } else {
            tracing::warn!(
                "Write-back for order change request {} affected {} rows",
                order_change_request_id,
                affected
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ZendeskConfig;
    use crate::features::order_changes::models::OrderChangeRequest;
    use crate::modules::zendesk::{TagResolver, TicketRequest};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        WriteBack {
            record_id: i64,
            ticket_ref: i64,
            status: i32,
        },
        Create,
        Update(i64),
    }

    struct RecordingStore {
        orders: Vec<Order>,
        events: Arc<Mutex<Vec<Event>>>,
    }

    #[async_trait]
    impl OrderStore for RecordingStore {
        async fn fetch_pending_change_requests(
            &self,
            _from: NaiveDate,
            _limit: i64,
        ) -> Result<Vec<OrderChangeRequest>> {
            Ok(self
                .orders
                .iter()
                .map(|o| OrderChangeRequest {
                    order_change_request_id: o.order_change_request_id,
                })
                .collect())
        }

        async fn get_order_for_change_request(
            &self,
            order_change_request_id: i64,
        ) -> Result<Option<Order>> {
            Ok(self
                .orders
                .iter()
                .find(|o| o.order_change_request_id == order_change_request_id)
                .cloned())
        }

        async fn update_sync_reference(
            &self,
            order_change_request_id: i64,
            ticket_ref: i64,
            status: ProcessStatus,
        ) -> Result<u64> {
            self.events.lock().unwrap().push(Event::WriteBack {
                record_id: order_change_request_id,
                ticket_ref,
                status: status.code(),
            });
            Ok(1)
        }
    }

    struct StubZendesk {
        create_id: i64,
        update_id: i64,
        events: Arc<Mutex<Vec<Event>>>,
    }

    #[async_trait]
    impl ZendeskApi for StubZendesk {
        async fn create_ticket(&self, _request: &TicketRequest) -> Result<i64> {
            self.events.lock().unwrap().push(Event::Create);
            Ok(self.create_id)
        }

        async fn update_ticket(&self, ticket_id: i64, _request: &TicketRequest) -> Result<i64> {
            self.events.lock().unwrap().push(Event::Update(ticket_id));
            Ok(self.update_id)
        }
    }

    fn request_builder() -> OrderRequestBuilder {
        let config = Arc::new(ZendeskConfig {
            base_url: "https://example.zendesk.com".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            create_ticket_path: "/api/v2/tickets.json".to_string(),
            update_ticket_path: "/api/v2/tickets/".to_string(),
            assignee_email: "agent@example.com".to_string(),
            brand_id: String::new(),
            group_id: String::new(),
            ticket_form_id: String::new(),
            member_id_field: String::new(),
            member_name_field: String::new(),
            carrier_name_field: String::new(),
            plan_name_field: String::new(),
            requestor_type_field: String::new(),
            status_tags: HashMap::new(),
            carrier_tags: HashMap::new(),
            requestor_tags: HashMap::new(),
        });
        let resolver = Arc::new(TagResolver::new(
            HashMap::new(),
            HashMap::new(),
            HashMap::new(),
        ));
        OrderRequestBuilder::new(config, resolver)
    }

    fn job_config() -> JobConfig {
        JobConfig {
            enabled: true,
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            batch_size: 10,
            interval_secs: 60,
        }
    }

    fn pending_order(id: i64, ticket_id: Option<&str>) -> Order {
        Order {
            order_id: 9000 + id,
            order_change_request_id: id,
            member_id: Some("M200".to_string()),
            user_name: None,
            submitted_by: None,
            carrier_name: None,
            insurance_carrier_id: None,
            requested_date: None,
            request_type: Some("Refund".to_string()),
            status: Some("PENDING".to_string()),
            item_details: None,
            item_comments: None,
            admin_comments: None,
            total_price: None,
            is_processed: Some(0),
            ticket_id: ticket_id.map(String::from),
        }
    }

    fn worker(
        orders: Vec<Order>,
        create_id: i64,
        update_id: i64,
    ) -> (
        Arc<OrderSyncWorker<RecordingStore, StubZendesk>>,
        Arc<Mutex<Vec<Event>>>,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(RecordingStore {
            orders,
            events: Arc::clone(&events),
        });
        let zendesk = Arc::new(StubZendesk {
            create_id,
            update_id,
            events: Arc::clone(&events),
        });
        let worker = Arc::new(OrderSyncWorker::new(
            store,
            zendesk,
            request_builder(),
            job_config(),
        ));
        (worker, events)
    }

    #[tokio::test]
    async fn test_created_ticket_reference_is_written_back_processed() {
        let (worker, events) = worker(vec![pending_order(77, None)], 777, 1);

        worker.process_batch().await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                Event::WriteBack {
                    record_id: 77,
                    ticket_ref: 0,
                    status: 2
                },
                Event::Create,
                Event::WriteBack {
                    record_id: 77,
                    ticket_ref: 777,
                    status: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_reference_triggers_update() {
        let (worker, events) = worker(vec![pending_order(78, Some("901"))], 1, 901);

        worker.process_batch().await.unwrap();

        let events = events.lock().unwrap();
        assert!(events.contains(&Event::Update(901)));
        assert!(!events.contains(&Event::Create));
    }

    #[tokio::test]
    async fn test_remote_failure_reverts_to_not_processed() {
        let (worker, events) = worker(vec![pending_order(79, None)], 0, 0);

        worker.process_batch().await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            events.last(),
            Some(&Event::WriteBack {
                record_id: 79,
                ticket_ref: 0,
                status: 0
            })
        );
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::WriteBack { status: 1, .. })));
    }

    #[tokio::test]
    async fn test_unbuildable_payload_skips_remote_call() {
        let mut order = pending_order(80, None);
        order.item_details = Some("{not json".to_string());
        let (worker, events) = worker(vec![order], 777, 1);

        worker.process_batch().await.unwrap();

        let events = events.lock().unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_submitting_marker_precedes_remote_call() {
        let (worker, events) = worker(vec![pending_order(81, None)], 555, 1);

        worker.process_batch().await.unwrap();

        let events = events.lock().unwrap();
        let submit_pos = events
            .iter()
            .position(|e| matches!(e, Event::WriteBack { status: 2, .. }))
            .unwrap();
        let create_pos = events.iter().position(|e| *e == Event::Create).unwrap();
        assert!(submit_pos < create_pos);
    }
}
