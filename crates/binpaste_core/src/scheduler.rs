//! Periodic refresh timer with coalescing restarts.
//!
//! A scheduler owns at most one armed timer. `restart` cancels it and arms a
//! fresh one, so a burst of restarts yields a single fire one full interval
//! after the last of them.

use crate::error::AppError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

type RefreshFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type RefreshFn = Arc<dyn Fn() -> RefreshFuture + Send + Sync>;

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer armed.
    Idle,
    /// A timer is counting down to the next refresh.
    Armed,
}

#[derive(Default)]
struct TimerSlot {
    // Bumped on every arm and stop; a timer only fires while its epoch is current.
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

fn lock_slot(slot: &Mutex<TimerSlot>) -> MutexGuard<'_, TimerSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a refresh callback every `interval` until stopped.
///
/// Each fire spawns the callback's future as its own task: stopping the
/// scheduler never cancels a refresh that already started.
pub struct RefreshScheduler {
    interval: Duration,
    refresh: RefreshFn,
    runtime: Handle,
    timer: Arc<Mutex<TimerSlot>>,
}

impl fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("interval", &self.interval)
            .field("state", &self.state())
            .finish()
    }
}

impl RefreshScheduler {
    /// Create an idle scheduler bound to the current tokio runtime.
    ///
    /// # Errors
    /// Returns [`AppError::Runtime`] outside a tokio runtime and
    /// [`AppError::BadRequest`] for a zero interval.
    pub fn new<F, Fut>(interval: Duration, refresh: F) -> Result<Self, AppError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|err| {
            AppError::Runtime(format!("refresh scheduler needs a tokio runtime: {}", err))
        })?;
        Self::with_handle(runtime, interval, refresh)
    }

    /// Create an idle scheduler whose timers run on `runtime`.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for a zero interval.
    pub fn with_handle<F, Fut>(
        runtime: Handle,
        interval: Duration,
        refresh: F,
    ) -> Result<Self, AppError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(AppError::BadRequest(
                "refresh interval must be non-zero".to_string(),
            ));
        }
        let refresh: RefreshFn = Arc::new(move || Box::pin(refresh()) as RefreshFuture);
        Ok(Self {
            interval,
            refresh,
            runtime,
            timer: Arc::new(Mutex::new(TimerSlot::default())),
        })
    }

    /// Interval between fires.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a timer is currently armed.
    pub fn state(&self) -> SchedulerState {
        if lock_slot(&self.timer).task.is_some() {
            SchedulerState::Armed
        } else {
            SchedulerState::Idle
        }
    }

    /// Arm the timer. Ignored when already armed.
    pub fn start(&self) {
        let mut slot = lock_slot(&self.timer);
        if slot.task.is_some() {
            debug!("refresh scheduler already armed; start ignored");
            return;
        }
        slot.epoch = slot.epoch.wrapping_add(1);

        let epoch = slot.epoch;
        let interval = self.interval;
        let timer = Arc::clone(&self.timer);
        let refresh = Arc::clone(&self.refresh);
        let runtime = self.runtime.clone();
        let mut deadline = Instant::now() + interval;

        slot.task = Some(self.runtime.spawn(async move {
            loop {
                sleep_until(deadline).await;
                {
                    let slot = lock_slot(&timer);
                    if slot.epoch != epoch {
                        break;
                    }
                    debug!("refresh scheduler fired");
                    runtime.spawn(refresh());
                }
                deadline = Instant::now() + interval;
            }
        }));
        debug!(interval_ms = interval.as_millis() as u64, "refresh scheduler armed");
    }

    /// Cancel the armed timer. Safe to call when idle.
    pub fn stop(&self) {
        let mut slot = lock_slot(&self.timer);
        slot.epoch = slot.epoch.wrapping_add(1);
        if let Some(task) = slot.task.take() {
            task.abort();
            debug!("refresh scheduler stopped");
        }
    }

    /// Stop, then start: the next fire is one full interval from now.
    pub fn restart(&self) {
        self.stop();
        self.start();
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
