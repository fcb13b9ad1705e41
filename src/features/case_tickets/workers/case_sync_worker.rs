use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;

use crate::core::config::JobConfig;
use crate::core::error::Result;
use crate::core::jobs::JobGuard;
use crate::features::case_tickets::models::CaseTicket;
use crate::features::case_tickets::services::{CaseTicketRequestBuilder, CaseTicketService, CaseTicketStore};
use crate::modules::zendesk::{ZendeskApi, ZendeskClient};
use crate::shared::types::ProcessStatus;

/// Worker wired to the live store and Zendesk client.
pub type PgCaseSyncWorker = CaseSyncWorker<CaseTicketService, ZendeskClient>;

/// Background worker that synchronizes pending case tickets to the
/// helpdesk.
///
/// Per record: a record without a remote reference is CREATEd, one with a
/// positive reference is UPDATEd against that exact id. The submitting
/// marker is written before the remote call so a crash mid-call is
/// distinguishable from a record that was never attempted.
pub struct CaseSyncWorker<S, Z> {
    store: Arc<S>,
    zendesk: Arc<Z>,
    request_builder: CaseTicketRequestBuilder,
    job: JobConfig,
    guard: JobGuard,
}

impl<S: CaseTicketStore + 'static, Z: ZendeskApi + 'static> CaseSyncWorker<S, Z> {
    pub fn new(
        store: Arc<S>,
        zendesk: Arc<Z>,
        request_builder: CaseTicketRequestBuilder,
        job: JobConfig,
    ) -> Self {
        Self {
            store,
            zendesk,
            request_builder,
            job,
            guard: JobGuard::new("case-tickets"),
        }
    }

    /// Runs the worker on its polling interval until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Starting case ticket sync worker");

        let mut interval = interval(Duration::from_secs(self.job.interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(_token) = self.guard.try_acquire() else {
                        tracing::debug!("Case ticket sync already running, skipping tick");
                        continue;
                    };
                    if let Err(e) = self.process_batch().await {
                        tracing::error!("Error processing case ticket batch: {:?}", e);
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("Case ticket sync worker shutting down");
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
                tracing::error!("Error processing case ticket batch: {:?}", e);
            }
        });

        true
    }

    pub async fn process_batch(&self) -> Result<()> {
        let tickets = self
            .store
            .fetch_pending(self.job.from_date, self.job.batch_size)
            .await?;

        if tickets.is_empty() {
            return Ok(());
        }

        tracing::info!("Processing {} pending case tickets", tickets.len());

        for ticket in tickets {
            if let Err(e) = self.sync_ticket(&ticket).await {
                tracing::error!(
                    "Failed to sync case ticket {}: {:?}",
                    ticket.case_ticket_id,
                    e
                );
            }
        }

        Ok(())
    }

    async fn sync_ticket(&self, ticket: &CaseTicket) -> Result<()> {
        let request = self.request_builder.build(ticket);

        // Pre-call marker: keeps the existing reference on updates so a
        // failed call never erases a known remote ticket.
        let pre_ref = ticket.external_ref().unwrap_or(0);
        self.write_back(ticket.case_ticket_id, pre_ref, ProcessStatus::Submitting)
            .await?;

        let ticket_ref = match ticket.external_ref() {
            Some(existing) => {
                tracing::info!(
                    "Updating zendesk ticket {} for case ticket {} (member {:?})",
                    existing,
                    ticket.case_ticket_id,
                    ticket.member_id
                );
                self.zendesk
                    .update_ticket(existing, &request)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(
                            "Zendesk update failed for case ticket {}: {:?}",
                            ticket.case_ticket_id,
                            e
                        );
                        0
                    })
            }
            None => {
                tracing::info!(
                    "Creating zendesk ticket for case ticket {} (member {:?})",
                    ticket.case_ticket_id,
                    ticket.member_id
                );
                self.zendesk
                    .create_ticket(&request)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(
                            "Zendesk create failed for case ticket {}: {:?}",
                            ticket.case_ticket_id,
                            e
                        );
                        0
                    })
            }
        };

        if ticket_ref > 0 {
            tracing::info!(
                "Synced case ticket {} to zendesk ticket {}",
                ticket.case_ticket_id,
                ticket_ref
            );
            self.write_back(ticket.case_ticket_id, ticket_ref, ProcessStatus::Processed)
                .await?;
        } else {
            tracing::warn!(
                "Zendesk sync failed for case ticket {}, leaving record unprocessed",
                ticket.case_ticket_id
            );
            self.write_back(ticket.case_ticket_id, pre_ref, ProcessStatus::NotProcessed)
                .await?;
        }

        Ok(())
    }

    async fn write_back(
        &self,
        case_ticket_id: i64,
        ticket_ref: i64,
        status: ProcessStatus,
    ) -> Result<()> {
        let affected = self
            .store
            .update_sync_reference(case_ticket_id, ticket_ref, status)
            .await?;

        if affected == 1 {
            tracing::info!(
                "Recorded zendesk reference {} ({}) for case ticket {}",
                ticket_ref,
                status,
                case_ticket_id
            );
        } else {
            tracing::warn!(
                "Write-back for case ticket {} affected {} rows",
                case_ticket_id,
                affected
            );
        }

        Ok(())
    }
}
