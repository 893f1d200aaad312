use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use tokio::runtime::Handle as RuntimeHandle;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::{FetchError, FetchErrorKind, Fetched, Transport, decode_envelope};
use crate::core::DashError;
use crate::poller::{PollSchedule, ResourceHandle};
use crate::resource::{Resource, ResourceRequest, Snapshot};

/// Why an attempt was issued. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Tick,
    Refresh,
    UpdateRequest,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Start => "start",
            Trigger::Tick => "tick",
            Trigger::Refresh => "refresh",
            Trigger::UpdateRequest => "update",
        };
        f.write_str(name)
    }
}

/// Result of offering a completed attempt to the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Commit {
    Applied,
    Stale,
    Stopped,
}

/// Creates polling handles that all share one transport.
#[derive(Clone)]
pub struct PollController {
    transport: Arc<dyn Transport>,
}

impl PollController {
    pub fn new<T: Transport>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches `request` immediately and, with a schedule, again on every
    /// interval until the handle is stopped or dropped.
    ///
    /// Must be called from within a Tokio runtime; attempts and the timer are
    /// spawned onto it.
    pub fn start<P: Resource>(
        &self,
        request: ResourceRequest,
        schedule: Option<PollSchedule>,
    ) -> Result<ResourceHandle<P>, DashError> {
        let runtime = RuntimeHandle::try_current()
            .map_err(|e| DashError::InvalidRequest(format!("no Tokio runtime: {e}")))?;

        let label = request.key();
        let (state, _) = watch::channel(Snapshot::default());
        let shared = Arc::new(Shared {
            transport: self.transport.clone(),
            runtime,
            control: Mutex::new(Control {
                request,
                issued: 0,
                stopped: false,
            }),
            state,
            shutdown: CancellationToken::new(),
            label,
            _marker: PhantomData,
        });

        info!(
            "Mounting '{}' (poll every {:?})",
            shared.label,
            schedule.map(|s| s.interval())
        );
        shared.issue(Trigger::Start, |_| Ok(()))?;

        if let Some(schedule) = schedule {
            let ticker = shared.clone();
            shared.runtime.spawn(async move {
                ticker.tick_loop(schedule).await;
            });
        }

        Ok(ResourceHandle::new(shared))
    }
}

pub(crate) struct Control {
    pub(crate) request: ResourceRequest,
    /// Sequence number of the newest attempt. Only that attempt may commit.
    pub(crate) issued: u64,
    pub(crate) stopped: bool,
}

/// State shared by a handle, its timer and its in-flight attempts.
///
/// Lock order is always `control` then `state`; commits and `stop()` both
/// hold `control`, so a stop is ordered strictly before or after any commit.
pub(crate) struct Shared<P> {
    transport: Arc<dyn Transport>,
    runtime: RuntimeHandle,
    control: Mutex<Control>,
    pub(crate) state: watch::Sender<Snapshot<P>>,
    shutdown: CancellationToken,
    pub(crate) label: String,
    _marker: PhantomData<fn() -> P>,
}

impl<P: Resource> Shared<P> {
    pub(crate) fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `edit` to the current request and issues one attempt for the
    /// result, all under a single lock so the attempt sees exactly that request.
    pub(crate) fn issue<F>(self: &Arc<Self>, trigger: Trigger, edit: F) -> Result<u64, DashError>
    where
        F: FnOnce(&mut ResourceRequest) -> Result<(), DashError>,
    {
        let (seq, request) = {
            let mut control = self.control();
            if control.stopped {
                return Err(DashError::Stopped(self.label.clone()));
            }
            edit(&mut control.request)?;
            control.issued += 1;
            self.state.send_modify(|s| s.begin());
            (control.issued, control.request.clone())
        };

        debug!(
            "[{}] attempt #{} ({}) -> {}",
            self.label,
            seq,
            trigger,
            request.scoped_key()
        );
        let shared = self.clone();
        self.runtime.spawn(async move {
            shared.run_attempt(seq, request).await;
        });
        Ok(seq)
    }

    async fn run_attempt(self: Arc<Self>, seq: u64, request: ResourceRequest) {
        let outcome = tokio::select! {
            _ = self.shutdown.cancelled() => {
                debug!("[{}] attempt #{} abandoned on stop", self.label, seq);
                return;
            }
            outcome = self.fetch(&request) => outcome,
        };
        self.commit(seq, &request, outcome);
    }

    async fn fetch(&self, request: &ResourceRequest) -> Result<Fetched<P>, FetchError> {
        let raw = self.transport.execute(request).await?;
        decode_envelope::<P>(P::FIELD, &raw)
    }

    pub(crate) fn commit(
        &self,
        seq: u64,
        request: &ResourceRequest,
        outcome: Result<Fetched<P>, FetchError>,
    ) -> Commit {
        let control = self.control();
        if control.stopped {
            debug!("[{}] dropping attempt #{} after stop", self.label, seq);
            return Commit::Stopped;
        }
        if seq != control.issued {
            info!(
                "[{}] discarding stale attempt #{} (latest is #{})",
                self.label, seq, control.issued
            );
            return Commit::Stale;
        }

        match outcome {
            Ok(fetched) => {
                debug!("[{}] attempt #{} committed", self.label, seq);
                let key = request.scoped_key();
                let cursor = request.cursor();
                self.state.send_modify(|s| {
                    s.succeed(fetched.payload, fetched.pagination, key, cursor)
                });
            }
            Err(err) => {
                if err.kind == FetchErrorKind::Decode {
                    error!("[{}] attempt #{} returned a malformed body: {}", self.label, seq, err);
                } else {
                    warn!("[{}] attempt #{} failed: {}", self.label, seq, err);
                }
                self.state.send_modify(|s| s.fail(err));
            }
        }
        Commit::Applied
    }

    /// Idempotent. Returns `true` only for the call that actually stopped.
    pub(crate) fn stop(&self) -> bool {
        {
            let mut control = self.control();
            if control.stopped {
                return false;
            }
            control.stopped = true;
        }
        self.shutdown.cancel();
        info!("Unmounted '{}'", self.label);
        true
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.control().stopped
    }

    async fn tick_loop(self: Arc<Self>, schedule: PollSchedule) {
        let period = schedule.interval();
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if self.issue(Trigger::Tick, |_| Ok(())).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("[{}] timer released", self.label);
    }
}
