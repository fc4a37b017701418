//! SettlementSyncAgent - Client-side view of the settlement kept fresh by polling.
//!
//! The agent pulls `status` from the service on a fixed interval and
//! publishes each answer to observers through a `watch` channel. Commands
//! (`submit`, `respond`) are forwarded untouched and never write the cache;
//! the next poll reflects whatever the service decided.
//!
//! ## Ordering
//!
//! Every poll takes a sequence number before its request goes out. A
//! response is applied only if its number is newer than the last applied
//! one, so a slow response can never overwrite a fresher view.
//!
//! ## Cancellation
//!
//! Stopping the loop prevents new polls. A poll already in flight runs to
//! completion and its result is still applied.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 500ms | Time between status polls |

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::domain::settlement::{policy, Decision, Operation, Party, Settlement};
use crate::ports::{GatewayError, SettlementGateway};

/// Configuration for the sync agent.
#[derive(Debug, Clone)]
pub struct SyncAgentConfig {
    /// How often to poll the service for status.
    pub poll_interval: Duration,
}

impl Default for SyncAgentConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl SyncAgentConfig {
    /// Create config with custom poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl From<&ClientConfig> for SyncAgentConfig {
    fn from(client: &ClientConfig) -> Self {
        Self::default().with_poll_interval(client.poll_interval())
    }
}

/// What observers see: the latest applied settlement and the poll it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementSnapshot {
    /// Sequence number of the poll that produced this view; 0 before any poll.
    pub sequence: u64,
    pub settlement: Option<Settlement>,
}

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The response was published to observers.
    Applied { sequence: u64 },
    /// A newer response had already been applied; this one was dropped.
    Stale { sequence: u64 },
}

/// Keeps a polled copy of the settlement and forwards commands.
#[derive(Clone)]
pub struct SettlementSyncAgent {
    gateway: Arc<dyn SettlementGateway>,
    config: SyncAgentConfig,
    next_sequence: Arc<AtomicU64>,
    snapshot: Arc<watch::Sender<SettlementSnapshot>>,
}

impl SettlementSyncAgent {
    /// Create an agent with default configuration.
    pub fn new(gateway: Arc<dyn SettlementGateway>) -> Self {
        Self::with_config(gateway, SyncAgentConfig::default())
    }

    /// Create an agent with custom configuration.
    pub fn with_config(gateway: Arc<dyn SettlementGateway>, config: SyncAgentConfig) -> Self {
        let (snapshot, _) = watch::channel(SettlementSnapshot::default());
        Self {
            gateway,
            config,
            next_sequence: Arc::new(AtomicU64::new(0)),
            snapshot: Arc::new(snapshot),
        }
    }

    pub fn config(&self) -> &SyncAgentConfig {
        &self.config
    }

    /// Fetches status once and publishes it unless a newer poll already landed.
    ///
    /// The view is replaced even when it did not change.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the cached view is left as it was.
    pub async fn poll_once(&self) -> Result<PollOutcome, GatewayError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let settlement = self.gateway.fetch_status().await?;

        let applied = self.snapshot.send_if_modified(|current| {
            if sequence <= current.sequence {
                return false;
            }
            *current = SettlementSnapshot {
                sequence,
                settlement,
            };
            true
        });

        if applied {
            debug!(sequence, "settlement status applied");
            Ok(PollOutcome::Applied { sequence })
        } else {
            debug!(sequence, "discarding stale settlement status");
            Ok(PollOutcome::Stale { sequence })
        }
    }

    /// Starts the polling loop with the configured interval.
    pub fn start(&self) -> PollingHandle {
        self.start_polling(self.config.poll_interval)
    }

    /// Starts a fixed-interval polling loop. The first poll happens immediately.
    ///
    /// Poll failures are logged; the loop simply waits for the next tick.
    pub fn start_polling(&self, interval: Duration) -> PollingHandle {
        let (shutdown_tx, mut shutdown) = watch::channel(false);
        let agent = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Shutdown wins over a tick that piled up behind a slow poll.
                    biased;

                    changed = shutdown.changed() => {
                        // A dropped handle counts as a stop request.
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }

                    _ = ticker.tick() => {
                        if stop_requested(&shutdown) {
                            break;
                        }
                        if let Err(e) = agent.poll_once().await {
                            warn!(error = %e, "settlement poll failed");
                        }
                        if stop_requested(&shutdown) {
                            break;
                        }
                    }
                }
            }
            debug!("settlement polling stopped");
        });

        PollingHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Stops a polling loop started by this agent.
    pub fn stop_polling(&self, handle: PollingHandle) {
        handle.stop();
    }

    /// Forwards a submission. The cache is not touched.
    pub async fn submit(&self, amount: f64) -> Result<Settlement, GatewayError> {
        self.gateway.submit(amount).await
    }

    /// Forwards a response. The cache is not touched.
    pub async fn respond(
        &self,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Settlement, GatewayError> {
        self.gateway.respond(decision, comment).await
    }

    /// Latest applied settlement.
    pub fn current(&self) -> Option<Settlement> {
        self.snapshot.borrow().settlement.clone()
    }

    /// Latest applied snapshot including its sequence number.
    pub fn snapshot(&self) -> SettlementSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every applied poll.
    pub fn subscribe(&self) -> watch::Receiver<SettlementSnapshot> {
        self.snapshot.subscribe()
    }

    /// Whether the cached view suggests a submission would be accepted.
    ///
    /// Advisory only; the service decides.
    pub fn can_submit(&self) -> bool {
        self.allows(Operation::Submit)
    }

    /// Whether the cached view suggests a response would be accepted.
    ///
    /// Advisory only; the service decides.
    pub fn can_respond(&self) -> bool {
        self.allows(Operation::Respond)
    }

    /// Whether `party` currently has anything to do.
    pub fn is_actionable_for(&self, party: Party) -> bool {
        self.allows(party.operation())
    }

    fn allows(&self, operation: Operation) -> bool {
        let stage = self.snapshot.borrow().settlement.as_ref().map(|s| s.stage());
        policy::evaluate(stage, operation).is_allowed()
    }
}

/// True once the handle asked for a stop or was dropped.
fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow() || shutdown.has_changed().is_err()
}

/// Handle to a running polling loop.
///
/// Dropping the handle stops the loop as well.
pub struct PollingHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollingHandle {
    /// Requests the loop to stop. In-flight polls are not aborted.
    pub fn stop(self) {
        let _ = self.shutdown.send(true);
    }

    /// Requests the loop to stop and waits until it has exited.
    pub async fn stop_and_wait(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "settlement polling task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settlement::{Amount, SettlementStage};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Gateway returning whatever settlement it was last given.
    struct MockGateway {
        current: Mutex<Option<Settlement>>,
        fetches: AtomicU64,
        fail: Mutex<bool>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                current: Mutex::new(None),
                fetches: AtomicU64::new(0),
                fail: Mutex::new(false),
            }
        }

        fn set(&self, settlement: Option<Settlement>) {
            *self.current.lock().unwrap() = settlement;
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn fetch_count(&self) -> u64 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SettlementGateway for MockGateway {
        async fn fetch_status(&self) -> Result<Option<Settlement>, GatewayError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                return Err(GatewayError::transport("connection refused"));
            }
            Ok(self.current.lock().unwrap().clone())
        }

        async fn submit(&self, amount: f64) -> Result<Settlement, GatewayError> {
            let amount = Amount::new(amount).map_err(|e| GatewayError::Validation(e.to_string()))?;
            let mut current = self.current.lock().unwrap();
            let next = Settlement::submit(current.as_ref(), amount)
                .map_err(|e| GatewayError::InvalidState(e.to_string()))?;
            *current = Some(next.clone());
            Ok(next)
        }

        async fn respond(
            &self,
            _decision: Decision,
            _comment: Option<String>,
        ) -> Result<Settlement, GatewayError> {
            Err(GatewayError::NoSettlement("No settlement submitted".into()))
        }
    }

    /// Gateway whose first fetch blocks until released, to force reordering.
    struct ReorderingGateway {
        calls: AtomicU64,
        release_first: Notify,
        old: Settlement,
        new: Settlement,
    }

    #[async_trait]
    impl SettlementGateway for ReorderingGateway {
        async fn fetch_status(&self) -> Result<Option<Settlement>, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                self.release_first.notified().await;
                Ok(Some(self.old.clone()))
            } else {
                Ok(Some(self.new.clone()))
            }
        }

        async fn submit(&self, _amount: f64) -> Result<Settlement, GatewayError> {
            unimplemented!()
        }

        async fn respond(
            &self,
            _decision: Decision,
            _comment: Option<String>,
        ) -> Result<Settlement, GatewayError> {
            unimplemented!()
        }
    }

    fn submitted(value: f64) -> Settlement {
        Settlement::submit(None, Amount::new(value).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn poll_once_publishes_latest_settlement() {
        let gateway = Arc::new(MockGateway::new());
        gateway.set(Some(submitted(100.0)));
        let agent = SettlementSyncAgent::new(gateway.clone());

        let outcome = agent.poll_once().await.unwrap();

        assert_eq!(outcome, PollOutcome::Applied { sequence: 1 });
        assert_eq!(agent.current(), Some(submitted(100.0)));
    }

    #[tokio::test]
    async fn poll_once_notifies_even_without_change() {
        let gateway = Arc::new(MockGateway::new());
        let agent = SettlementSyncAgent::new(gateway);
        let mut rx = agent.subscribe();

        agent.poll_once().await.unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        agent.poll_once().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow().sequence, 2);
        assert_eq!(rx.borrow().settlement, None);
    }

    #[tokio::test]
    async fn poll_failure_keeps_previous_view() {
        let gateway = Arc::new(MockGateway::new());
        gateway.set(Some(submitted(10.0)));
        let agent = SettlementSyncAgent::new(gateway.clone());
        agent.poll_once().await.unwrap();

        gateway.set_failing(true);
        let err = agent.poll_once().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(agent.current(), Some(submitted(10.0)));
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_one() {
        let gateway = blocking_gateway();
        let agent = SettlementSyncAgent::new(gateway.clone());

        let slow = {
            let agent = agent.clone();
            tokio::spawn(async move { agent.poll_once().await })
        };
        // Let the slow poll take sequence 1 before the fast one starts.
        wait_for_first_fetch(&gateway).await;

        let fast = agent.poll_once().await.unwrap();
        assert_eq!(fast, PollOutcome::Applied { sequence: 2 });

        gateway.release_first.notify_one();
        let slow = slow.await.unwrap().unwrap();

        assert_eq!(slow, PollOutcome::Stale { sequence: 1 });
        assert_eq!(agent.current(), Some(submitted(2.0)));
        assert_eq!(agent.snapshot().sequence, 2);
    }

    #[tokio::test]
    async fn commands_do_not_touch_cache() {
        let gateway = Arc::new(MockGateway::new());
        let agent = SettlementSyncAgent::new(gateway.clone());

        agent.submit(40.0).await.unwrap();
        assert_eq!(agent.current(), None);

        agent.poll_once().await.unwrap();
        assert_eq!(agent.current().map(|s| s.stage()), Some(SettlementStage::Submitted));
    }

    #[tokio::test]
    async fn command_errors_pass_through() {
        let gateway = Arc::new(MockGateway::new());
        let agent = SettlementSyncAgent::new(gateway);

        let err = agent.respond(Decision::Approve, None).await.unwrap_err();
        assert!(matches!(err, GatewayError::NoSettlement(_)));
    }

    #[tokio::test]
    async fn polling_loop_updates_until_stopped() {
        let gateway = Arc::new(MockGateway::new());
        let agent = SettlementSyncAgent::new(gateway.clone());

        let handle = agent.start_polling(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(gateway.fetch_count() >= 1);

        handle.stop_and_wait().await;
        let sequence_after_stop = agent.snapshot().sequence;
        let fetches_after_stop = gateway.fetch_count();

        gateway.set(Some(submitted(99.0)));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(gateway.fetch_count(), fetches_after_stop);
        assert_eq!(agent.snapshot().sequence, sequence_after_stop);
        assert_eq!(agent.current(), None);
    }

    #[tokio::test]
    async fn stop_polling_through_agent_stops_loop() {
        let gateway = Arc::new(MockGateway::new());
        let agent = SettlementSyncAgent::with_config(
            gateway.clone(),
            SyncAgentConfig::default().with_poll_interval(Duration::from_millis(10)),
        );

        let handle = agent.start();
        tokio::time::sleep(Duration::from_millis(30)).await;
        agent.stop_polling(handle);

        let fetches = gateway.fetch_count();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gateway.fetch_count(), fetches);
    }

    #[tokio::test]
    async fn dropping_handle_stops_loop() {
        let gateway = Arc::new(MockGateway::new());
        let agent = SettlementSyncAgent::new(gateway.clone());

        let handle = agent.start_polling(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(handle);

        let fetches = gateway.fetch_count();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gateway.fetch_count(), fetches);
    }

    fn blocking_gateway() -> Arc<ReorderingGateway> {
        Arc::new(ReorderingGateway {
            calls: AtomicU64::new(0),
            release_first: Notify::new(),
            old: submitted(1.0),
            new: submitted(2.0),
        })
    }

    async fn wait_for_first_fetch(gateway: &ReorderingGateway) {
        while gateway.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_for_sequence(agent: &SettlementSyncAgent, sequence: u64) {
        let mut rx = agent.subscribe();
        let reached = tokio::time::timeout(
            Duration::from_secs(1),
            rx.wait_for(|snap| snap.sequence >= sequence),
        )
        .await;
        assert!(reached.is_ok(), "snapshot never reached sequence {}", sequence);
    }

    #[tokio::test]
    async fn stop_during_slow_poll_applies_it_and_issues_no_more() {
        let gateway = blocking_gateway();
        let agent = SettlementSyncAgent::new(gateway.clone());

        let handle = agent.start_polling(Duration::from_millis(5));
        wait_for_first_fetch(&gateway).await;
        agent.stop_polling(handle);

        // Several ticks elapse while the first fetch is still blocked.
        tokio::time::sleep(Duration::from_millis(40)).await;
        gateway.release_first.notify_one();

        wait_for_sequence(&agent, 1).await;
        assert_eq!(agent.current(), Some(submitted(1.0)));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(agent.snapshot().sequence, 1);
    }

    #[tokio::test]
    async fn dropped_handle_during_slow_poll_applies_it_and_issues_no_more() {
        let gateway = blocking_gateway();
        let agent = SettlementSyncAgent::new(gateway.clone());

        let handle = agent.start_polling(Duration::from_millis(5));
        wait_for_first_fetch(&gateway).await;
        drop(handle);

        tokio::time::sleep(Duration::from_millis(40)).await;
        gateway.release_first.notify_one();

        wait_for_sequence(&agent, 1).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_and_wait_returns_after_in_flight_poll_lands() {
        let gateway = blocking_gateway();
        let agent = SettlementSyncAgent::new(gateway.clone());

        let handle = agent.start_polling(Duration::from_millis(5));
        wait_for_first_fetch(&gateway).await;

        let stopping = tokio::spawn(handle.stop_and_wait());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!stopping.is_finished());

        gateway.release_first.notify_one();
        stopping.await.unwrap();

        assert_eq!(agent.snapshot().sequence, 1);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn advisory_checks_follow_cached_stage() {
        let gateway = Arc::new(MockGateway::new());
        let agent = SettlementSyncAgent::new(gateway.clone());

        assert!(agent.can_submit());
        assert!(!agent.can_respond());
        assert!(!agent.is_actionable_for(Party::Responder));

        gateway.set(Some(submitted(10.0)));
        agent.poll_once().await.unwrap();
        assert!(agent.can_respond());
        assert!(agent.is_actionable_for(Party::Responder));

        let approved =
            Settlement::respond(Some(&submitted(10.0)), Decision::Approve, None).unwrap();
        gateway.set(Some(approved));
        agent.poll_once().await.unwrap();
        assert!(!agent.can_submit());
        assert!(!agent.is_actionable_for(Party::Submitter));
    }

    #[test]
    fn config_defaults_to_half_second() {
        assert_eq!(
            SyncAgentConfig::default().poll_interval,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn config_takes_poll_interval_from_client_settings() {
        let client = ClientConfig {
            poll_interval_ms: 125,
            ..Default::default()
        };
        assert_eq!(
            SyncAgentConfig::from(&client).poll_interval,
            Duration::from_millis(125)
        );
        assert_eq!(
            SyncAgentConfig::from(&ClientConfig::default()).poll_interval,
            SyncAgentConfig::default().poll_interval
        );
    }
}
