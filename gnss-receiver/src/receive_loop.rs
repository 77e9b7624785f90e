use crate::mailbox::Mailbox;
use crate::repository::NmeaRepository;
use mqtt_client::Transport;
use nmea::{ValidationPolicy, ValidationResult, sentence};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Where the loop is in its cycle.
///
/// `Draining` and `Processing` only last for the duration of a single
/// [`ReceiveLoop::step`]; between calls the loop is `Idle` or `Stopped`.
/// Every transition is logged at trace level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for transport activity.
    Idle,
    /// A payload was found in the mailbox.
    Draining,
    /// Validating and storing the payload.
    Processing,
    Stopped,
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub received: u64,
    pub stored: u64,
    pub rejected: u64,
    pub store_failures: u64,
}

/// Consumer side of the pipeline: polls the transport, validates whatever
/// landed in the mailbox and appends accepted sentences to the repository.
///
/// At most one payload is in flight. The shutdown token is checked once per
/// iteration, so a poll that already started runs to completion (bounded by
/// the poll timeout) and its payload is processed before the loop stops.
pub struct ReceiveLoop<T, R> {
    transport: T,
    repository: R,
    mailbox: Mailbox,
    shutdown: CancellationToken,
    policy: ValidationPolicy,
    poll_timeout: Duration,
    state: LoopState,
    stats: LoopStats,
}

impl<T: Transport, R: NmeaRepository> ReceiveLoop<T, R> {
    /// `mailbox` must be the one the transport delivers into.
    pub fn new(transport: T, repository: R, mailbox: Mailbox, shutdown: CancellationToken) -> Self {
        Self {
            transport,
            repository,
            mailbox,
            shutdown,
            policy: ValidationPolicy::default(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            state: LoopState::Idle,
            stats: LoopStats::default(),
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn into_inner(self) -> (T, R) {
        (self.transport, self.repository)
    }

    /// Runs until the shutdown token is cancelled.
    pub async fn run(&mut self) -> LoopStats {
        while !self.shutdown.is_cancelled() {
            self.step().await;
        }

        self.transition(LoopState::Stopped);
        log::info!(
            "Receive loop stopped: {} received, {} stored, {} rejected, {} store failures",
            self.stats.received,
            self.stats.stored,
            self.stats.rejected,
            self.stats.store_failures
        );

        self.stats
    }

    /// One poll-and-process cycle.
    pub async fn step(&mut self) {
        self.transition(LoopState::Idle);

        match tokio::time::timeout(self.poll_timeout, self.transport.poll()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::error!("Transport error: {}", e);
                // Keep a dead connection from spinning the loop.
                tokio::select! {
                    _ = self.shutdown.cancelled() => {}
                    _ = tokio::time::sleep(self.poll_timeout) => {}
                }
            }
            Err(_) => log::trace!("No transport activity within {:?}", self.poll_timeout),
        }

        if let Some(raw) = self.mailbox.try_take() {
            self.transition(LoopState::Draining);
            self.process(raw).await;
        }

        self.transition(LoopState::Idle);
    }

    fn transition(&mut self, next: LoopState) {
        if self.state != next {
            log::trace!("Receive loop {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    async fn process(&mut self, raw: String) {
        self.transition(LoopState::Processing);
        self.stats.received += 1;
        log::info!("GNSS data received: {}", raw);

        match sentence::validate(&raw, self.policy) {
            ValidationResult::Valid => {
                log::info!("Valid NMEA data");

                match self.repository.insert(&raw).await {
                    Ok(id) => {
                        self.stats.stored += 1;
                        log::info!("Inserted valid GNSS data into the database (id {}).", id);
                    }
                    Err(e) => {
                        self.stats.store_failures += 1;
                        log::error!("{}", e);
                    }
                }
            }
            ValidationResult::Invalid(reason) => {
                self.stats.rejected += 1;
                log::warn!("Invalid NMEA data ({}), discarded", reason);
            }
        }
    }
}
