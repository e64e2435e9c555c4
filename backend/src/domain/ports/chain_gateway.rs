//! Port for the on-chain relay used to mirror funded deals.
//!
//! The relay is an external HTTP service that owns the actual chain
//! interaction. This port keeps chain semantics at the domain boundary: the
//! sync worker decides retry policy from [`ChainGatewayError::is_retryable`]
//! without knowing transport details.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::FundingStage;

/// Errors raised by chain relay adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainGatewayError {
    /// The relay could not be reached.
    #[error("chain relay unreachable: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
    /// The relay did not answer within the configured deadline.
    #[error("chain relay timed out after {seconds}s")]
    Timeout {
        /// The deadline that elapsed.
        seconds: u64,
    },
    /// The relay asked the caller to slow down.
    #[error("chain relay rate limited the request")]
    RateLimited,
    /// The relay rejected the submission outright.
    #[error("chain relay rejected the request (status {status}): {message}")]
    Rejected {
        /// HTTP status returned by the relay.
        status: u16,
        /// Relay-provided failure description.
        message: String,
    },
    /// The relay answered with a body this service could not decode.
    #[error("chain relay response could not be decoded: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl ChainGatewayError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Transport faults, timeouts, and rate limiting are transient; outright
    /// rejections and undecodable responses are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited
        )
    }
}

/// Company facts mirrored on chain before a deal may reference them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainCompanySubmission {
    /// Database id of the company.
    pub company_id: Uuid,
    /// Registered company name.
    pub name: String,
    /// Funding stage at submission time.
    pub stage: FundingStage,
    /// Valuation at submission time, in whole currency units.
    pub valuation: i64,
}

/// Deal facts submitted for on-chain recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDealSubmission {
    /// Database id of the deal.
    pub deal_id: Uuid,
    /// Database id of the funded company.
    pub company_id: Uuid,
    /// Database id of the investing user.
    pub investor_id: Uuid,
    /// Investment amount, in whole currency units.
    pub amount: i64,
}

/// Port for submitting companies and deals to the chain relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Ensure the company exists on chain.
    ///
    /// Idempotent on the relay side: re-registering an already-known company
    /// succeeds.
    async fn ensure_company(
        &self,
        submission: &ChainCompanySubmission,
    ) -> Result<(), ChainGatewayError>;

    /// Record the deal on chain, returning the transaction reference.
    async fn record_deal(
        &self,
        submission: &ChainDealSubmission,
    ) -> Result<String, ChainGatewayError>;
}

/// Fixture gateway that confirms every submission with a deterministic
/// transaction reference derived from the deal id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChainGateway;

#[async_trait]
impl ChainGateway for FixtureChainGateway {
    async fn ensure_company(
        &self,
        _submission: &ChainCompanySubmission,
    ) -> Result<(), ChainGatewayError> {
        Ok(())
    }

    async fn record_deal(
        &self,
        submission: &ChainDealSubmission,
    ) -> Result<String, ChainGatewayError> {
        Ok(format!("0x{}", submission.deal_id.simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ChainGatewayError::Transport { message: "dns".into() }, true)]
    #[case(ChainGatewayError::Timeout { seconds: 10 }, true)]
    #[case(ChainGatewayError::RateLimited, true)]
    #[case(ChainGatewayError::Rejected { status: 422, message: "bad deal".into() }, false)]
    #[case(ChainGatewayError::Decode { message: "not json".into() }, false)]
    fn retryability_follows_the_failure_class(
        #[case] error: ChainGatewayError,
        #[case] retryable: bool,
    ) {
        assert_eq!(error.is_retryable(), retryable);
    }

    #[tokio::test]
    async fn fixture_gateway_derives_tx_refs_from_the_deal_id() {
        let gateway = FixtureChainGateway;
        let submission = ChainDealSubmission {
            deal_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            investor_id: Uuid::new_v4(),
            amount: 100_000,
        };

        let first = gateway.record_deal(&submission).await.expect("records");
        let second = gateway.record_deal(&submission).await.expect("records");
        assert_eq!(first, second);
        assert!(first.starts_with("0x"));
    }
}
