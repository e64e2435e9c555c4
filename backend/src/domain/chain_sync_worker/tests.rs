//! Unit tests for chain sync worker orchestration.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::{
    ChainSyncPassReport, ChainSyncWorker, ChainSyncWorkerConfig, ChainSyncWorkerPorts,
    ChainSyncWorkerRuntime,
};
use crate::domain::ports::{
    ChainCompanySubmission, ChainDealSubmission, ChainGateway, ChainGatewayError, ChainSyncFailure,
    ChainSyncFailureKind, ChainSyncMetrics, ChainSyncMetricsError, ChainSyncSuccess,
    DealFlowRepository, FixtureChainGateway, FixtureCompanyRepository, FixtureDealFlowRepository,
};
use crate::domain::{
    ChainSyncState, Company, CompanyDraft, DealFlow, DealFlowDraft, DealStatus, FundingStage,
};
use crate::test_support::chain_sync::{ImmediateSleeper, MutableClock, NoJitter, RecordingSleeper};

struct GatewayStub {
    scripted: Mutex<VecDeque<Result<String, ChainGatewayError>>>,
    deal_calls: AtomicUsize,
}

impl GatewayStub {
    fn scripted(scripted: Vec<Result<String, ChainGatewayError>>) -> Self {
        Self {
            scripted: Mutex::new(scripted.into()),
            deal_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChainGateway for GatewayStub {
    async fn ensure_company(
        &self,
        _submission: &ChainCompanySubmission,
    ) -> Result<(), ChainGatewayError> {
        Ok(())
    }

    async fn record_deal(
        &self,
        _submission: &ChainDealSubmission,
    ) -> Result<String, ChainGatewayError> {
        self.deal_calls.fetch_add(1, Ordering::SeqCst);
        self.scripted
            .lock()
            .expect("gateway mutex")
            .pop_front()
            .unwrap_or_else(|| {
                Err(ChainGatewayError::Rejected {
                    status: 500,
                    message: "gateway script exhausted unexpectedly".to_owned(),
                })
            })
    }
}

#[derive(Default)]
struct MetricsStub {
    successes: Mutex<Vec<ChainSyncSuccess>>,
    failures: Mutex<Vec<ChainSyncFailure>>,
}

#[async_trait]
impl ChainSyncMetrics for MetricsStub {
    async fn record_success(
        &self,
        payload: &ChainSyncSuccess,
    ) -> Result<(), ChainSyncMetricsError> {
        self.successes
            .lock()
            .expect("metrics mutex")
            .push(payload.clone());
        Ok(())
    }

    async fn record_failure(
        &self,
        payload: &ChainSyncFailure,
    ) -> Result<(), ChainSyncMetricsError> {
        self.failures
            .lock()
            .expect("metrics mutex")
            .push(payload.clone());
        Ok(())
    }
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0)
        .single()
        .expect("valid time")
}

fn config() -> ChainSyncWorkerConfig {
    ChainSyncWorkerConfig {
        batch_size: 10,
        max_attempts: 3,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(500),
        circuit_failure_threshold: 3,
        circuit_open_cooldown: Duration::from_secs(60),
        poll_interval: Duration::from_secs(5),
    }
}

fn company() -> Company {
    Company::new(CompanyDraft {
        id: Uuid::new_v4(),
        founder_id: Uuid::new_v4(),
        name: "Loomworks".to_owned(),
        industry: "DevTools".to_owned(),
        stage: FundingStage::Seed,
        valuation: 4_000_000,
    })
    .expect("valid company")
}

fn pending_deal(company_id: Uuid) -> DealFlow {
    DealFlow::new(DealFlowDraft {
        id: Uuid::new_v4(),
        investor_id: Uuid::new_v4(),
        company_id,
        status: DealStatus::Funded,
        investment_amount: 250_000,
        sync: ChainSyncState::Pending,
    })
    .expect("valid deal")
}

struct Harness {
    deals: Arc<FixtureDealFlowRepository>,
    metrics: Arc<MetricsStub>,
    sleeper: Arc<RecordingSleeper>,
    worker: ChainSyncWorker,
}

fn harness(
    gateway: Arc<dyn ChainGateway>,
    seed_company: &Company,
    seed_deals: &[DealFlow],
    now: DateTime<Utc>,
    config: ChainSyncWorkerConfig,
) -> Harness {
    let deals = Arc::new(FixtureDealFlowRepository::default());
    for deal in seed_deals {
        deals.seed(deal.clone());
    }
    let companies = Arc::new(FixtureCompanyRepository::default());
    companies.seed(seed_company.clone());
    let metrics = Arc::new(MetricsStub::default());
    let sleeper = Arc::new(RecordingSleeper::default());

    let worker = ChainSyncWorker::with_runtime(
        ChainSyncWorkerPorts::new(gateway, deals.clone(), companies, metrics.clone()),
        Arc::new(MutableClock::new(now)),
        ChainSyncWorkerRuntime {
            sleeper: sleeper.clone(),
            jitter: Arc::new(NoJitter),
        },
        config,
    );
    Harness {
        deals,
        metrics,
        sleeper,
        worker,
    }
}

async fn stored_sync(harness: &Harness, deal_id: Uuid) -> ChainSyncState {
    harness
        .deals
        .find_by_id(deal_id)
        .await
        .expect("lookup succeeds")
        .expect("deal exists")
        .sync()
        .clone()
}

#[rstest]
#[tokio::test]
async fn a_pending_deal_confirms_on_the_first_attempt(now: DateTime<Utc>) {
    let target = company();
    let deal = pending_deal(target.id());
    let harness = harness(
        Arc::new(FixtureChainGateway),
        &target,
        &[deal.clone()],
        now,
        config(),
    );

    let report = harness.worker.run_pass().await.expect("pass runs");
    assert_eq!(
        report,
        ChainSyncPassReport {
            claimed: 1,
            confirmed: 1,
            ..ChainSyncPassReport::default()
        }
    );
    let sync = stored_sync(&harness, deal.id()).await;
    assert_eq!(
        sync,
        ChainSyncState::Confirmed {
            tx_ref: format!("0x{}", deal.id().simple()),
        }
    );
    let successes = harness.metrics.successes.lock().expect("metrics mutex");
    assert_eq!(successes.as_slice(), &[ChainSyncSuccess { attempt_count: 1 }]);
}

#[rstest]
#[tokio::test]
async fn transient_relay_errors_back_off_and_retry(now: DateTime<Utc>) {
    let target = company();
    let deal = pending_deal(target.id());
    let gateway = Arc::new(GatewayStub::scripted(vec![
        Err(ChainGatewayError::Transport {
            message: "connection reset".to_owned(),
        }),
        Ok("0xabc".to_owned()),
    ]));
    let harness = harness(gateway.clone(), &target, &[deal.clone()], now, config());

    let report = harness.worker.run_pass().await.expect("pass runs");
    assert_eq!(report.confirmed, 1);
    assert_eq!(gateway.deal_calls.load(Ordering::SeqCst), 2);
    // One backoff between the two attempts, at the initial delay.
    let sleeps = harness.sleeper.0.lock().expect("sleeper mutex");
    assert_eq!(sleeps.as_slice(), &[Duration::from_millis(100)]);
    let successes = harness.metrics.successes.lock().expect("metrics mutex");
    assert_eq!(successes.as_slice(), &[ChainSyncSuccess { attempt_count: 2 }]);
}

#[rstest]
#[tokio::test]
async fn backoff_grows_exponentially_up_to_the_cap(now: DateTime<Utc>) {
    let target = company();
    let deal = pending_deal(target.id());
    let transport = || {
        Err(ChainGatewayError::Transport {
            message: "connection reset".to_owned(),
        })
    };
    let gateway = Arc::new(GatewayStub::scripted(vec![
        transport(),
        transport(),
        transport(),
        transport(),
        Ok("0xabc".to_owned()),
    ]));
    let mut config = config();
    config.max_attempts = 5;
    config.circuit_failure_threshold = 10;
    let harness = harness(gateway, &target, &[deal], now, config);

    harness.worker.run_pass().await.expect("pass runs");
    let sleeps = harness.sleeper.0.lock().expect("sleeper mutex");
    assert_eq!(
        sleeps.as_slice(),
        &[
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(500),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn exhausted_retries_mark_the_deal_failed(now: DateTime<Utc>) {
    let target = company();
    let deal = pending_deal(target.id());
    let transport = || {
        Err(ChainGatewayError::Transport {
            message: "connection reset".to_owned(),
        })
    };
    let gateway = Arc::new(GatewayStub::scripted(vec![
        transport(),
        transport(),
    ]));
    let mut config = config();
    config.max_attempts = 2;
    config.circuit_failure_threshold = 10;
    let harness = harness(gateway, &target, &[deal.clone()], now, config);

    let report = harness.worker.run_pass().await.expect("pass runs");
    assert_eq!(report.failed, 1);
    let sync = stored_sync(&harness, deal.id()).await;
    assert!(matches!(sync, ChainSyncState::Failed { reason } if reason.contains("exhausted")));
    let failures = harness.metrics.failures.lock().expect("metrics mutex");
    assert_eq!(
        failures.as_slice(),
        &[ChainSyncFailure {
            attempt_count: 2,
            kind: ChainSyncFailureKind::RetryExhausted,
        }]
    );
}

#[rstest]
#[tokio::test]
async fn a_relay_rejection_fails_the_deal_without_retrying(now: DateTime<Utc>) {
    let target = company();
    let deal = pending_deal(target.id());
    let gateway = Arc::new(GatewayStub::scripted(vec![Err(
        ChainGatewayError::Rejected {
            status: 422,
            message: "unknown company".to_owned(),
        },
    )]));
    let harness = harness(gateway.clone(), &target, &[deal.clone()], now, config());

    let report = harness.worker.run_pass().await.expect("pass runs");
    assert_eq!(report.failed, 1);
    assert_eq!(gateway.deal_calls.load(Ordering::SeqCst), 1);
    let sync = stored_sync(&harness, deal.id()).await;
    assert!(matches!(sync, ChainSyncState::Failed { reason } if reason.contains("rejected")));
    let failures = harness.metrics.failures.lock().expect("metrics mutex");
    assert_eq!(failures[0].kind, ChainSyncFailureKind::RelayRejected);
}

#[rstest]
#[tokio::test]
async fn an_open_circuit_defers_the_rest_of_the_batch(now: DateTime<Utc>) {
    let target = company();
    let first = pending_deal(target.id());
    let second = pending_deal(target.id());
    // Every relay call fails; the breaker opens after one failure, so the
    // second deal is deferred without a relay call.
    let gateway = Arc::new(GatewayStub::scripted(vec![Err(
        ChainGatewayError::Rejected {
            status: 503,
            message: "relay maintenance".to_owned(),
        },
    )]));
    let mut config = config();
    config.circuit_failure_threshold = 1;
    let harness = harness(
        gateway.clone(),
        &target,
        &[first.clone(), second.clone()],
        now,
        config,
    );

    let report = harness.worker.run_pass().await.expect("pass runs");
    assert_eq!(report.claimed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.deferred, 1);
    assert_eq!(gateway.deal_calls.load(Ordering::SeqCst), 1);

    // One of the two deals is still pending for the next pass.
    let remaining = harness
        .deals
        .list_pending_sync(10)
        .await
        .expect("list succeeds");
    assert_eq!(remaining.len(), 1);
    let failures = harness.metrics.failures.lock().expect("metrics mutex");
    assert!(
        failures
            .iter()
            .any(|failure| failure.kind == ChainSyncFailureKind::CircuitOpen)
    );
}

#[rstest]
#[tokio::test]
async fn a_deal_for_a_vanished_company_is_settled_failed(now: DateTime<Utc>) {
    let target = company();
    let deal = pending_deal(Uuid::new_v4());
    let harness = harness(
        Arc::new(FixtureChainGateway),
        &target,
        &[deal.clone()],
        now,
        config(),
    );

    let report = harness.worker.run_pass().await.expect("pass runs");
    assert_eq!(report.failed, 1);
    let sync = stored_sync(&harness, deal.id()).await;
    assert!(matches!(sync, ChainSyncState::Failed { reason } if reason.contains("no longer")));
}

#[rstest]
#[tokio::test]
async fn an_empty_backlog_is_a_quiet_pass(now: DateTime<Utc>) {
    let target = company();
    let harness = harness(Arc::new(FixtureChainGateway), &target, &[], now, config());

    let report = harness.worker.run_pass().await.expect("pass runs");
    assert_eq!(report, ChainSyncPassReport::default());
    assert!(
        harness
            .metrics
            .successes
            .lock()
            .expect("metrics mutex")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_stops_the_polling_loop(now: DateTime<Utc>) {
    let target = company();
    let deal = pending_deal(target.id());
    let deals = Arc::new(FixtureDealFlowRepository::default());
    deals.seed(deal.clone());
    let companies = Arc::new(FixtureCompanyRepository::default());
    companies.seed(target.clone());
    let worker = Arc::new(ChainSyncWorker::with_runtime(
        ChainSyncWorkerPorts::new(
            Arc::new(FixtureChainGateway),
            deals.clone(),
            companies,
            Arc::new(MetricsStub::default()),
        ),
        Arc::new(MutableClock::new(now)),
        ChainSyncWorkerRuntime {
            sleeper: Arc::new(ImmediateSleeper),
            jitter: Arc::new(NoJitter),
        },
        config(),
    ));

    let (tx, rx) = tokio::sync::watch::channel(false);
    let loop_worker = worker.clone();
    let handle = tokio::spawn(async move { loop_worker.run_until_shutdown(rx).await });
    // Give the loop a pass, then stop it.
    tokio::task::yield_now().await;
    tx.send(true).expect("shutdown signal");
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop exits")
        .expect("task joins");
}
