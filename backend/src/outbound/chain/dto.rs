//! Wire DTOs for the chain relay API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{ChainCompanySubmission, ChainDealSubmission};

/// Company registration payload sent to the relay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CompanySubmissionDto<'a> {
    pub company_id: Uuid,
    pub name: &'a str,
    pub stage: &'a str,
    pub valuation: i64,
}

impl<'a> From<&'a ChainCompanySubmission> for CompanySubmissionDto<'a> {
    fn from(submission: &'a ChainCompanySubmission) -> Self {
        Self {
            company_id: submission.company_id,
            name: &submission.name,
            stage: submission.stage.as_str(),
            valuation: submission.valuation,
        }
    }
}

/// Deal recording payload sent to the relay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DealSubmissionDto {
    pub deal_id: Uuid,
    pub company_id: Uuid,
    pub investor_id: Uuid,
    pub amount: i64,
}

impl From<&ChainDealSubmission> for DealSubmissionDto {
    fn from(submission: &ChainDealSubmission) -> Self {
        Self {
            deal_id: submission.deal_id,
            company_id: submission.company_id,
            investor_id: submission.investor_id,
            amount: submission.amount,
        }
    }
}

/// Deal recording response returned by the relay.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DealReceiptDto {
    /// Transaction reference under which the deal was recorded.
    pub tx_ref: String,
}
