//! Deal-flow entity and on-chain sync state.
//!
//! Every deal records its chain sync state explicitly. The original wallet
//! degradation cases are first-class states here, so database and chain can
//! never diverge silently: a deal is always in exactly one of the
//! [`ChainSyncState`] variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by [`DealFlow::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealValidationError {
    NonPositiveAmount { amount: i64 },
    BlankTxRef,
    BlankFailureReason,
}

impl fmt::Display for DealValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount { amount } => {
                write!(f, "investment amount must be positive (got {amount})")
            }
            Self::BlankTxRef => write!(f, "confirmed sync state requires a transaction reference"),
            Self::BlankFailureReason => write!(f, "failed sync state requires a reason"),
        }
    }
}

impl std::error::Error for DealValidationError {}

/// Pipeline status of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// Identified, not yet engaged.
    Prospect,
    /// Under active evaluation.
    Diligence,
    /// Terms agreed, funds not yet moved.
    Committed,
    /// Investment recorded.
    Funded,
    /// Declined.
    Passed,
}

impl DealStatus {
    /// All deal status variants.
    pub const ALL: [DealStatus; 5] = [
        DealStatus::Prospect,
        DealStatus::Diligence,
        DealStatus::Committed,
        DealStatus::Funded,
        DealStatus::Passed,
    ];

    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::Diligence => "diligence",
            Self::Committed => "committed",
            Self::Funded => "funded",
            Self::Passed => "passed",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid deal status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDealStatusError {
    /// The invalid input string.
    pub input: String,
}

impl fmt::Display for ParseDealStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variants: Vec<_> = DealStatus::ALL.iter().map(|v| v.as_str()).collect();
        write!(
            f,
            "invalid deal status '{}': expected one of {}",
            self.input,
            variants.join(", ")
        )
    }
}

impl std::error::Error for ParseDealStatusError {}

impl FromStr for DealStatus {
    type Err = ParseDealStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseDealStatusError {
                input: s.to_owned(),
            })
    }
}

/// Where a deal stands relative to the chain.
///
/// Serialized with a `state` discriminator, e.g.
/// `{"state": "confirmed", "txRef": "0xabc"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ChainSyncState {
    /// Chain sync was disabled or unconfigured when the deal was recorded.
    NotRequested,
    /// Awaiting the sync worker.
    Pending,
    /// Recorded on chain under the given transaction reference.
    Confirmed {
        #[serde(rename = "txRef")]
        tx_ref: String,
    },
    /// Sync attempts exhausted; the reason is kept for operators.
    Failed { reason: String },
}

impl ChainSyncState {
    /// Discriminator stored in the database `sync_state` column.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotRequested => "not-requested",
            Self::Pending => "pending",
            Self::Confirmed { .. } => "confirmed",
            Self::Failed { .. } => "failed",
        }
    }

    /// Whether the sync worker still owes this deal an attempt.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the deal is recorded on chain.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

impl fmt::Display for ChainSyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Input payload for [`DealFlow::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct DealFlowDraft {
    pub id: Uuid,
    pub investor_id: Uuid,
    pub company_id: Uuid,
    pub status: DealStatus,
    pub investment_amount: i64,
    pub sync: ChainSyncState,
}

/// One deal in an investor's pipeline.
///
/// ## Invariants
/// - `investment_amount` is positive.
/// - `Confirmed` carries a non-blank transaction reference; `Failed` a
///   non-blank reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct DealFlow {
    id: Uuid,
    investor_id: Uuid,
    company_id: Uuid,
    status: DealStatus,
    investment_amount: i64,
    sync: ChainSyncState,
}

impl DealFlow {
    /// Validate and construct a deal.
    pub fn new(draft: DealFlowDraft) -> Result<Self, DealValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn investor_id(&self) -> Uuid {
        self.investor_id
    }
    pub fn company_id(&self) -> Uuid {
        self.company_id
    }
    pub fn status(&self) -> DealStatus {
        self.status
    }
    pub fn investment_amount(&self) -> i64 {
        self.investment_amount
    }
    pub fn sync(&self) -> &ChainSyncState {
        &self.sync
    }

    /// Return a copy carrying the new sync state.
    pub fn with_sync(mut self, sync: ChainSyncState) -> Result<Self, DealValidationError> {
        validate_sync(&sync)?;
        self.sync = sync;
        Ok(self)
    }
}

impl TryFrom<DealFlowDraft> for DealFlow {
    type Error = DealValidationError;

    fn try_from(draft: DealFlowDraft) -> Result<Self, Self::Error> {
        if draft.investment_amount <= 0 {
            return Err(DealValidationError::NonPositiveAmount {
                amount: draft.investment_amount,
            });
        }
        validate_sync(&draft.sync)?;

        Ok(Self {
            id: draft.id,
            investor_id: draft.investor_id,
            company_id: draft.company_id,
            status: draft.status,
            investment_amount: draft.investment_amount,
            sync: draft.sync,
        })
    }
}

impl<'de> Deserialize<'de> for DealFlow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        DealFlowDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

fn validate_sync(sync: &ChainSyncState) -> Result<(), DealValidationError> {
    match sync {
        ChainSyncState::Confirmed { tx_ref } if tx_ref.trim().is_empty() => {
            Err(DealValidationError::BlankTxRef)
        }
        ChainSyncState::Failed { reason } if reason.trim().is_empty() => {
            Err(DealValidationError::BlankFailureReason)
        }
        _ => Ok(()),
    }
}
