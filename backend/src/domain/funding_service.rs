//! Deal funding domain service.
//!
//! Deals are recorded database-first: the row is the source of truth and the
//! chain sync worker settles `Pending` deals asynchronously. Clients may send
//! an `Idempotency-Key`; a retry with the same key and payload replays the
//! stored response, while key reuse with a different payload is a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    CompanyRepository, DealFlowRepository, IdempotencyRepository, IdempotencyRepositoryError,
    UserRepository,
};
use crate::domain::service_support::{
    map_company_repo_error, map_deal_repo_error, map_idempotency_error, resolve_user,
};
use crate::domain::{
    ChainSyncState, CivicId, DealFlow, DealFlowDraft, DealStatus, Error, IdempotencyKey,
    IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord, MutationType,
    canonicalize_and_hash,
};

/// Request payload for recording a funded deal.
#[derive(Debug, Clone)]
pub struct FundDealRequest {
    /// Civic id of the investing user.
    pub civic_id: CivicId,
    /// Company receiving the investment.
    pub company_id: Uuid,
    /// Pipeline status to record the deal under.
    pub status: DealStatus,
    /// Investment amount in whole currency units.
    pub investment_amount: i64,
    /// Optional client-supplied key for safe retries.
    pub idempotency_key: Option<IdempotencyKey>,
}

/// Outcome of a funding request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FundDealResponse {
    /// The recorded deal.
    pub deal: DealFlow,
    /// Whether this response replays an earlier identical request.
    #[serde(default)]
    pub replayed: bool,
}

/// Driving port for deal funding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DealFunding: Send + Sync {
    /// Record a deal, honouring any idempotency key on the request.
    async fn fund(&self, request: FundDealRequest) -> Result<FundDealResponse, Error>;

    /// List the deals recorded by the investor with this civic id.
    async fn list(&self, civic_id: &CivicId) -> Result<Vec<DealFlow>, Error>;
}

/// Funding service implementing the driving port.
#[derive(Clone)]
pub struct FundingService<U, C, D, I> {
    users: Arc<U>,
    companies: Arc<C>,
    deals: Arc<D>,
    idempotency: Arc<I>,
    chain_sync_enabled: bool,
}

impl<U, C, D, I> FundingService<U, C, D, I> {
    /// Create a new service with the given repositories.
    ///
    /// When `chain_sync_enabled` is false, recorded deals carry the
    /// [`ChainSyncState::NotRequested`] state and the worker skips them.
    pub fn new(
        users: Arc<U>,
        companies: Arc<C>,
        deals: Arc<D>,
        idempotency: Arc<I>,
        chain_sync_enabled: bool,
    ) -> Self {
        Self {
            users,
            companies,
            deals,
            idempotency,
            chain_sync_enabled,
        }
    }
}

fn idempotency_conflict() -> Error {
    Error::conflict("idempotency key already used with a different payload")
}

impl<U, C, D, I> FundingService<U, C, D, I>
where
    U: UserRepository,
    C: CompanyRepository,
    D: DealFlowRepository,
    I: IdempotencyRepository,
{
    async fn record_deal(&self, request: &FundDealRequest) -> Result<DealFlow, Error> {
        self.companies
            .find_by_id(request.company_id)
            .await
            .map_err(map_company_repo_error)?
            .ok_or_else(|| {
                Error::not_found(format!("company '{}' not found", request.company_id))
            })?;
        let investor = resolve_user(self.users.as_ref(), &request.civic_id).await?;

        let sync = if self.chain_sync_enabled {
            ChainSyncState::Pending
        } else {
            ChainSyncState::NotRequested
        };
        let deal = DealFlow::new(DealFlowDraft {
            id: Uuid::new_v4(),
            investor_id: investor.id(),
            company_id: request.company_id,
            status: request.status,
            investment_amount: request.investment_amount,
            sync,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.deals
            .insert(&deal)
            .await
            .map_err(map_deal_repo_error)?;
        Ok(deal)
    }

    fn replay(record: &IdempotencyRecord) -> Result<FundDealResponse, Error> {
        let deal: DealFlow = serde_json::from_value(record.response_snapshot.clone())
            .map_err(|err| Error::internal(format!("stored deal snapshot is invalid: {err}")))?;
        Ok(FundDealResponse {
            deal,
            replayed: true,
        })
    }

    /// A concurrent request stored the key between our lookup and store.
    /// Re-read it: an identical payload replays the winner's response.
    async fn handle_duplicate_key_race(
        &self,
        query: &IdempotencyLookupQuery,
    ) -> Result<FundDealResponse, Error> {
        match self
            .idempotency
            .lookup(query)
            .await
            .map_err(map_idempotency_error)?
        {
            IdempotencyLookupResult::MatchingPayload(record) => Self::replay(&record),
            IdempotencyLookupResult::ConflictingPayload(_) => Err(idempotency_conflict()),
            IdempotencyLookupResult::NotFound => {
                Err(Error::internal("idempotency record vanished after conflict"))
            }
        }
    }

    async fn fund_with_key(
        &self,
        key: IdempotencyKey,
        request: &FundDealRequest,
    ) -> Result<FundDealResponse, Error> {
        let investor = resolve_user(self.users.as_ref(), &request.civic_id).await?;
        let payload = json!({
            "civicId": request.civic_id,
            "companyId": request.company_id,
            "status": request.status,
            "investmentAmount": request.investment_amount,
        });
        let payload_hash = canonicalize_and_hash(&payload)
            .map_err(|err| Error::internal(format!("payload hashing failed: {err}")))?;
        let query = IdempotencyLookupQuery::new(
            key.clone(),
            investor.id(),
            MutationType::Deals,
            payload_hash.clone(),
        );

        match self
            .idempotency
            .lookup(&query)
            .await
            .map_err(map_idempotency_error)?
        {
            IdempotencyLookupResult::MatchingPayload(record) => Self::replay(&record),
            IdempotencyLookupResult::ConflictingPayload(_) => Err(idempotency_conflict()),
            IdempotencyLookupResult::NotFound => {
                let deal = self.record_deal(request).await?;
                let snapshot = serde_json::to_value(&deal)
                    .map_err(|err| Error::internal(format!("deal snapshot failed: {err}")))?;
                let record = IdempotencyRecord {
                    key,
                    mutation_type: MutationType::Deals,
                    payload_hash,
                    response_snapshot: snapshot,
                    user_id: investor.id(),
                    created_at: Utc::now(),
                };
                match self.idempotency.store(&record).await {
                    Ok(()) => Ok(FundDealResponse {
                        deal,
                        replayed: false,
                    }),
                    Err(IdempotencyRepositoryError::DuplicateKey { .. }) => {
                        warn!(key = %record.key, "lost idempotency store race, replaying winner");
                        self.handle_duplicate_key_race(&query).await
                    }
                    Err(err) => Err(map_idempotency_error(err)),
                }
            }
        }
    }
}

#[async_trait]
impl<U, C, D, I> DealFunding for FundingService<U, C, D, I>
where
    U: UserRepository,
    C: CompanyRepository,
    D: DealFlowRepository,
    I: IdempotencyRepository,
{
    async fn fund(&self, request: FundDealRequest) -> Result<FundDealResponse, Error> {
        match request.idempotency_key.clone() {
            Some(key) => self.fund_with_key(key, &request).await,
            None => {
                let deal = self.record_deal(&request).await?;
                Ok(FundDealResponse {
                    deal,
                    replayed: false,
                })
            }
        }
    }

    async fn list(&self, civic_id: &CivicId) -> Result<Vec<DealFlow>, Error> {
        let investor = resolve_user(self.users.as_ref(), civic_id).await?;
        self.deals
            .list_by_investor(investor.id())
            .await
            .map_err(map_deal_repo_error)
    }
}
