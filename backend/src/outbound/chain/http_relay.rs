//! Reqwest-backed chain relay adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and JSON decoding of relay receipts. The relay
//! itself owns wallet and contract concerns.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{CompanySubmissionDto, DealReceiptDto, DealSubmissionDto};
use crate::domain::ports::{
    ChainCompanySubmission, ChainDealSubmission, ChainGateway, ChainGatewayError,
};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "launchpad-backend-chain-sync/0.1";

/// Chain relay adapter performing HTTP POST requests against one base URL.
pub struct HttpChainRelay {
    client: Client,
    companies_endpoint: Url,
    deals_endpoint: Url,
    timeout: Duration,
    user_agent: String,
}

impl HttpChainRelay {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URLs cannot be derived from the
    /// base URL or the reqwest client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, HttpChainRelayBuildError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URLs cannot be derived from the
    /// base URL or the reqwest client cannot be constructed.
    pub fn with_timeout(
        base_url: Url,
        timeout: Duration,
    ) -> Result<Self, HttpChainRelayBuildError> {
        let companies_endpoint = join_endpoint(&base_url, "companies")?;
        let deals_endpoint = join_endpoint(&base_url, "deals")?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            companies_endpoint,
            deals_endpoint,
            timeout,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        })
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        endpoint: &Url,
        payload: &T,
    ) -> Result<Vec<u8>, ChainGatewayError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|err| map_transport_error(err, self.timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_transport_error(err, self.timeout))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), self.timeout));
        }
        Ok(body.to_vec())
    }
}

/// Errors raised while constructing the relay adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpChainRelayBuildError {
    /// The base URL cannot carry relative endpoint paths.
    #[error("relay base URL cannot be extended with endpoint paths: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("failed to build relay HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

fn join_endpoint(base_url: &Url, segment: &str) -> Result<Url, url::ParseError> {
    // Url::join treats a base without a trailing slash as a file, which
    // would drop its last path segment.
    if base_url.path().ends_with('/') {
        base_url.join(segment)
    } else {
        Url::parse(&format!("{base_url}/{segment}"))
    }
}

#[async_trait]
impl ChainGateway for HttpChainRelay {
    async fn ensure_company(
        &self,
        submission: &ChainCompanySubmission,
    ) -> Result<(), ChainGatewayError> {
        let payload = CompanySubmissionDto::from(submission);
        self.post_json(&self.companies_endpoint, &payload).await?;
        Ok(())
    }

    async fn record_deal(
        &self,
        submission: &ChainDealSubmission,
    ) -> Result<String, ChainGatewayError> {
        let payload = DealSubmissionDto::from(submission);
        let body = self.post_json(&self.deals_endpoint, &payload).await?;
        parse_receipt(&body)
    }
}

fn parse_receipt(body: &[u8]) -> Result<String, ChainGatewayError> {
    let receipt: DealReceiptDto =
        serde_json::from_slice(body).map_err(|err| ChainGatewayError::Decode {
            message: format!("invalid relay receipt: {err}"),
        })?;
    if receipt.tx_ref.trim().is_empty() {
        return Err(ChainGatewayError::Decode {
            message: "relay receipt carried a blank txRef".to_owned(),
        });
    }
    Ok(receipt.tx_ref)
}

fn map_transport_error(error: reqwest::Error, timeout: Duration) -> ChainGatewayError {
    if error.is_timeout() {
        ChainGatewayError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else {
        ChainGatewayError::Transport {
            message: error.to_string(),
        }
    }
}

fn map_status_error(status: StatusCode, body: &[u8], timeout: Duration) -> ChainGatewayError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ChainGatewayError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ChainGatewayError::Timeout {
            seconds: timeout.as_secs(),
        },
        _ if status.is_server_error() => ChainGatewayError::Transport {
            message: format!("status {}: {}", status.as_u16(), body_preview(body)),
        },
        _ => ChainGatewayError::Rejected {
            status: status.as_u16(),
            message: body_preview(body),
        },
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network relay mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, "Rejected")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_gateway_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(
            status,
            b"{\"error\":\"relay rejected\"}",
            Duration::from_secs(30),
        );
        match expected {
            "RateLimited" => {
                assert!(matches!(error, ChainGatewayError::RateLimited));
            }
            "Timeout" => {
                assert!(matches!(error, ChainGatewayError::Timeout { seconds: 30 }));
            }
            "Rejected" => {
                assert!(
                    matches!(error, ChainGatewayError::Rejected { status: s, .. } if s == status.as_u16())
                );
            }
            "Transport" => {
                assert!(matches!(error, ChainGatewayError::Transport { .. }));
            }
            _ => panic!("unsupported test expectation: {expected}"),
        }
    }

    #[rstest]
    fn rejections_are_not_retryable_but_rate_limits_are() {
        let rejected = map_status_error(StatusCode::UNPROCESSABLE_ENTITY, b"", Duration::from_secs(30));
        assert!(!rejected.is_retryable());
        let limited = map_status_error(StatusCode::TOO_MANY_REQUESTS, b"", Duration::from_secs(30));
        assert!(limited.is_retryable());
    }

    #[rstest]
    fn parses_receipt_tx_ref() {
        let tx_ref = parse_receipt(br#"{"txRef": "0xfeed"}"#).expect("receipt decodes");
        assert_eq!(tx_ref, "0xfeed");
    }

    #[rstest]
    #[case::not_json(&b"not json"[..])]
    #[case::blank_ref(&br#"{"txRef": "  "}"#[..])]
    fn invalid_receipts_map_to_decode(#[case] body: &[u8]) {
        let error = parse_receipt(body).expect_err("receipt rejected");
        assert!(matches!(error, ChainGatewayError::Decode { .. }));
    }

    #[rstest]
    #[case::with_slash("https://relay.example/api/")]
    #[case::without_slash("https://relay.example/api")]
    fn endpoints_preserve_the_base_path(#[case] base: &str) {
        let base = Url::parse(base).expect("valid base");
        let endpoint = join_endpoint(&base, "deals").expect("joins");
        assert_eq!(endpoint.as_str(), "https://relay.example/api/deals");
    }

    #[rstest]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 163);
    }
}
