//! Port for deal-flow persistence.
//!
//! Deals are written database-first: the row lands with a pending sync state
//! and the chain worker resolves it later. [`DealFlowRepository::resolve_pending_sync`]
//! only applies to deals still pending, so a late worker cannot clobber a
//! state another worker already settled.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ChainSyncState, DealFlow};

/// Errors raised by deal-flow repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DealFlowRepositoryError {
    /// Repository connection could not be established.
    #[error("deal repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("deal repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// A stored row failed domain validation on load.
    #[error("stored deal failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for deal storage, retrieval, and sync-state resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DealFlowRepository: Send + Sync {
    /// Insert a new deal.
    async fn insert(&self, deal: &DealFlow) -> Result<(), DealFlowRepositoryError>;

    /// Fetch a deal by id.
    async fn find_by_id(&self, deal_id: Uuid) -> Result<Option<DealFlow>, DealFlowRepositoryError>;

    /// List deals in `investor_id`'s pipeline, ordered by id.
    async fn list_by_investor(
        &self,
        investor_id: Uuid,
    ) -> Result<Vec<DealFlow>, DealFlowRepositoryError>;

    /// List up to `limit` deals still awaiting chain sync, ordered by id.
    async fn list_pending_sync(
        &self,
        limit: usize,
    ) -> Result<Vec<DealFlow>, DealFlowRepositoryError>;

    /// Move a pending deal to its final sync state.
    ///
    /// Returns the updated deal, or `None` when the deal is unknown or no
    /// longer pending (another worker resolved it first).
    async fn resolve_pending_sync(
        &self,
        deal_id: Uuid,
        outcome: &ChainSyncState,
    ) -> Result<Option<DealFlow>, DealFlowRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct FixtureDealFlowRepository {
    deals: Mutex<HashMap<Uuid, DealFlow>>,
}

impl FixtureDealFlowRepository {
    /// Pre-load a deal, replacing any previous entry with the same id.
    pub fn seed(&self, deal: DealFlow) {
        self.lock().insert(deal.id(), deal);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, DealFlow>> {
        self.deals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sorted_by_id(mut deals: Vec<DealFlow>) -> Vec<DealFlow> {
    deals.sort_by_key(DealFlow::id);
    deals
}

#[async_trait]
impl DealFlowRepository for FixtureDealFlowRepository {
    async fn insert(&self, deal: &DealFlow) -> Result<(), DealFlowRepositoryError> {
        self.lock().insert(deal.id(), deal.clone());
        Ok(())
    }

    async fn find_by_id(&self, deal_id: Uuid) -> Result<Option<DealFlow>, DealFlowRepositoryError> {
        Ok(self.lock().get(&deal_id).cloned())
    }

    async fn list_by_investor(
        &self,
        investor_id: Uuid,
    ) -> Result<Vec<DealFlow>, DealFlowRepositoryError> {
        let deals = self
            .lock()
            .values()
            .filter(|deal| deal.investor_id() == investor_id)
            .cloned()
            .collect();
        Ok(sorted_by_id(deals))
    }

    async fn list_pending_sync(
        &self,
        limit: usize,
    ) -> Result<Vec<DealFlow>, DealFlowRepositoryError> {
        let pending = self
            .lock()
            .values()
            .filter(|deal| deal.sync().is_pending())
            .cloned()
            .collect();
        let mut pending = sorted_by_id(pending);
        pending.truncate(limit);
        Ok(pending)
    }

    async fn resolve_pending_sync(
        &self,
        deal_id: Uuid,
        outcome: &ChainSyncState,
    ) -> Result<Option<DealFlow>, DealFlowRepositoryError> {
        let mut deals = self.lock();
        let Some(existing) = deals.get(&deal_id) else {
            return Ok(None);
        };
        if !existing.sync().is_pending() {
            return Ok(None);
        }
        let updated = existing
            .clone()
            .with_sync(outcome.clone())
            .map_err(|err| DealFlowRepositoryError::Query {
                message: err.to_string(),
            })?;
        deals.insert(deal_id, updated.clone());
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DealFlowDraft, DealStatus};

    fn deal(investor_id: Uuid, sync: ChainSyncState) -> DealFlow {
        DealFlow::new(DealFlowDraft {
            id: Uuid::new_v4(),
            investor_id,
            company_id: Uuid::new_v4(),
            status: DealStatus::Funded,
            investment_amount: 100_000,
            sync,
        })
        .expect("valid deal")
    }

    #[tokio::test]
    async fn fixture_lists_only_pending_deals() {
        let repo = FixtureDealFlowRepository::default();
        let investor = Uuid::new_v4();
        repo.insert(&deal(investor, ChainSyncState::Pending))
            .await
            .expect("insert");
        repo.insert(&deal(investor, ChainSyncState::NotRequested))
            .await
            .expect("insert");

        let pending = repo.list_pending_sync(10).await.expect("list");
        assert_eq!(pending.len(), 1);
        assert!(pending.iter().all(|deal| deal.sync().is_pending()));
    }

    #[tokio::test]
    async fn fixture_resolves_a_pending_deal_once() {
        let repo = FixtureDealFlowRepository::default();
        let deal = deal(Uuid::new_v4(), ChainSyncState::Pending);
        repo.insert(&deal).await.expect("insert");
        let confirmed = ChainSyncState::Confirmed {
            tx_ref: "0xabc".to_owned(),
        };

        let updated = repo
            .resolve_pending_sync(deal.id(), &confirmed)
            .await
            .expect("resolve succeeds")
            .expect("deal was pending");
        assert!(updated.sync().is_confirmed());

        let second = repo
            .resolve_pending_sync(deal.id(), &confirmed)
            .await
            .expect("resolve succeeds");
        assert!(second.is_none(), "already-settled deal must not re-resolve");
    }

    #[tokio::test]
    async fn fixture_resolve_returns_none_for_unknown_deals() {
        let repo = FixtureDealFlowRepository::default();
        let resolved = repo
            .resolve_pending_sync(
                Uuid::new_v4(),
                &ChainSyncState::Failed {
                    reason: "relay unreachable".to_owned(),
                },
            )
            .await
            .expect("resolve succeeds");
        assert!(resolved.is_none());
    }
}
