//! PostgreSQL-backed `DealFlowRepository` implementation using Diesel ORM.
//!
//! Sync-state resolution filters on `sync_state = 'pending'`, so only the
//! first worker to settle a deal wins and a late worker observes `None`.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DealFlowRepository, DealFlowRepositoryError};
use crate::domain::{ChainSyncState, DealFlow, DealFlowDraft, DealStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DealFlowRow, NewDealFlowRow};
use super::pool::{DbPool, PoolError};
use super::schema::deal_flows;

/// Diesel-backed implementation of the deal-flow repository port.
#[derive(Clone)]
pub struct DieselDealFlowRepository {
    pool: DbPool,
}

impl DieselDealFlowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DealFlowRepositoryError {
    map_basic_pool_error(error, |message| DealFlowRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> DealFlowRepositoryError {
    map_basic_diesel_error(
        error,
        |message| DealFlowRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| DealFlowRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

fn corrupt(message: impl Into<String>) -> DealFlowRepositoryError {
    DealFlowRepositoryError::Corrupt {
        message: message.into(),
    }
}

/// Reassemble the tagged sync state from its three columns.
fn decode_sync_state(
    kind: &str,
    tx_ref: Option<String>,
    failure_reason: Option<String>,
) -> Result<ChainSyncState, DealFlowRepositoryError> {
    match kind {
        "not-requested" => Ok(ChainSyncState::NotRequested),
        "pending" => Ok(ChainSyncState::Pending),
        "confirmed" => tx_ref
            .map(|tx_ref| ChainSyncState::Confirmed { tx_ref })
            .ok_or_else(|| corrupt("confirmed sync state is missing its tx_ref")),
        "failed" => failure_reason
            .map(|reason| ChainSyncState::Failed { reason })
            .ok_or_else(|| corrupt("failed sync state is missing its reason")),
        other => Err(corrupt(format!("unknown sync state '{other}'"))),
    }
}

/// Split a sync state into its column representation.
fn encode_sync_state(sync: &ChainSyncState) -> (&'static str, Option<&str>, Option<&str>) {
    match sync {
        ChainSyncState::NotRequested | ChainSyncState::Pending => (sync.kind(), None, None),
        ChainSyncState::Confirmed { tx_ref } => (sync.kind(), Some(tx_ref.as_str()), None),
        ChainSyncState::Failed { reason } => (sync.kind(), None, Some(reason.as_str())),
    }
}

/// Convert a database row into a validated domain deal.
fn row_to_deal(row: DealFlowRow) -> Result<DealFlow, DealFlowRepositoryError> {
    let status = DealStatus::from_str(&row.status).map_err(|err| corrupt(err.to_string()))?;
    let sync = decode_sync_state(&row.sync_state, row.tx_ref, row.failure_reason)?;

    DealFlow::new(DealFlowDraft {
        id: row.id,
        investor_id: row.investor_id,
        company_id: row.company_id,
        status,
        investment_amount: row.investment_amount,
        sync,
    })
    .map_err(|err| corrupt(err.to_string()))
}

#[async_trait]
impl DealFlowRepository for DieselDealFlowRepository {
    async fn insert(&self, deal: &DealFlow) -> Result<(), DealFlowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (sync_state, tx_ref, failure_reason) = encode_sync_state(deal.sync());
        let new_row = NewDealFlowRow {
            id: deal.id(),
            investor_id: deal.investor_id(),
            company_id: deal.company_id(),
            status: deal.status().as_str(),
            investment_amount: deal.investment_amount(),
            sync_state,
            tx_ref,
            failure_reason,
        };

        diesel::insert_into(deal_flows::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        deal_id: Uuid,
    ) -> Result<Option<DealFlow>, DealFlowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = deal_flows::table
            .filter(deal_flows::id.eq(deal_id))
            .select(DealFlowRow::as_select())
            .first::<DealFlowRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_deal).transpose()
    }

    async fn list_by_investor(
        &self,
        investor_id: Uuid,
    ) -> Result<Vec<DealFlow>, DealFlowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DealFlowRow> = deal_flows::table
            .filter(deal_flows::investor_id.eq(investor_id))
            .order(deal_flows::id.asc())
            .select(DealFlowRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_deal).collect()
    }

    async fn list_pending_sync(
        &self,
        limit: usize,
    ) -> Result<Vec<DealFlow>, DealFlowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<DealFlowRow> = deal_flows::table
            .filter(deal_flows::sync_state.eq(ChainSyncState::Pending.kind()))
            .order(deal_flows::id.asc())
            .limit(limit)
            .select(DealFlowRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_deal).collect()
    }

    async fn resolve_pending_sync(
        &self,
        deal_id: Uuid,
        outcome: &ChainSyncState,
    ) -> Result<Option<DealFlow>, DealFlowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (sync_state, tx_ref, failure_reason) = encode_sync_state(outcome);
        let row = diesel::update(
            deal_flows::table.filter(
                deal_flows::id
                    .eq(deal_id)
                    .and(deal_flows::sync_state.eq(ChainSyncState::Pending.kind())),
            ),
        )
        .set((
            deal_flows::sync_state.eq(sync_state),
            deal_flows::tx_ref.eq(tx_ref),
            deal_flows::failure_reason.eq(failure_reason),
        ))
        .returning(DealFlowRow::as_select())
        .get_result::<DealFlowRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_deal).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for sync-state encoding and row conversion.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> DealFlowRow {
        DealFlowRow {
            id: Uuid::new_v4(),
            investor_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            status: "funded".to_owned(),
            investment_amount: 250_000,
            sync_state: "pending".to_owned(),
            tx_ref: None,
            failure_reason: None,
        }
    }

    #[rstest]
    fn row_converts_to_domain_deal(valid_row: DealFlowRow) {
        let deal = row_to_deal(valid_row).expect("row converts");
        assert_eq!(deal.status(), DealStatus::Funded);
        assert!(deal.sync().is_pending());
    }

    #[rstest]
    fn confirmed_row_without_tx_ref_maps_to_corrupt(mut valid_row: DealFlowRow) {
        valid_row.sync_state = "confirmed".to_owned();
        valid_row.tx_ref = None;
        let err = row_to_deal(valid_row).expect_err("missing tx_ref rejected");
        assert!(matches!(err, DealFlowRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    fn unknown_sync_state_maps_to_corrupt(mut valid_row: DealFlowRow) {
        valid_row.sync_state = "limbo".to_owned();
        let err = row_to_deal(valid_row).expect_err("unknown state rejected");
        assert!(matches!(err, DealFlowRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    #[case(ChainSyncState::NotRequested, ("not-requested", None, None))]
    #[case(ChainSyncState::Pending, ("pending", None, None))]
    #[case(
        ChainSyncState::Confirmed { tx_ref: "0xabc".to_owned() },
        ("confirmed", Some("0xabc"), None)
    )]
    #[case(
        ChainSyncState::Failed { reason: "relay unreachable".to_owned() },
        ("failed", None, Some("relay unreachable"))
    )]
    fn sync_state_round_trips_through_columns(
        #[case] state: ChainSyncState,
        #[case] expected: (&str, Option<&str>, Option<&str>),
    ) {
        let (kind, tx_ref, failure_reason) = encode_sync_state(&state);
        assert_eq!((kind, tx_ref, failure_reason), expected);

        let decoded = decode_sync_state(
            kind,
            tx_ref.map(str::to_owned),
            failure_reason.map(str::to_owned),
        )
        .expect("columns decode");
        assert_eq!(decoded, state);
    }
}
