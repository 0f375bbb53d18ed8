//! Recent-pastes list model.
//!
//! The list polls the API on a [`RefreshScheduler`] and also reacts to
//! creations and deletions announced through the [`AppContext`]. Every local
//! change restarts the scheduler so a poll never lands right after the list
//! was brought up to date.

use crate::transport::PasteTransport;
use binpaste_core::models::{PasteRecord, PasteSummary};
use binpaste_core::{AppContext, AppError, RefreshScheduler, SchedulerState, SubscriptionId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct FeedState {
    items: Vec<PasteSummary>,
    loaded: bool,
    // Bumped by every locally applied creation or deletion.
    revision: u64,
    // Bumped by every refresh that starts; only the newest may apply.
    latest_ticket: u64,
    stale_drops: u64,
}

#[derive(Debug, Clone, Copy)]
struct RefreshTicket {
    ticket: u64,
    revision: u64,
}

impl FeedState {
    fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest_ticket = self.latest_ticket.wrapping_add(1);
        RefreshTicket {
            ticket: self.latest_ticket,
            revision: self.revision,
        }
    }

    fn apply_refresh(&mut self, ticket: RefreshTicket, items: Vec<PasteSummary>) -> bool {
        // Drop responses superseded by a newer refresh or by a local change
        // made while the request was in flight.
        if ticket.ticket != self.latest_ticket || ticket.revision != self.revision {
            self.stale_drops = self.stale_drops.saturating_add(1);
            debug!(stale_drops = self.stale_drops, "dropping stale list refresh");
            return false;
        }
        self.items = items;
        self.loaded = true;
        true
    }

    fn splice_created(&mut self, summary: PasteSummary) {
        self.items.retain(|item| item.id != summary.id);
        self.items.insert(0, summary);
        self.revision = self.revision.wrapping_add(1);
    }

    fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
        self.revision = self.revision.wrapping_add(1);
    }
}

fn lock_state(state: &Mutex<FeedState>) -> MutexGuard<'_, FeedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn refresh_feed<T: PasteTransport>(
    transport: &T,
    state: &Mutex<FeedState>,
) -> Result<bool, AppError> {
    let ticket = lock_state(state).begin_refresh();
    let items = transport.find_all().await?;
    Ok(lock_state(state).apply_refresh(ticket, items))
}

fn on_list_change(
    state: &Weak<Mutex<FeedState>>,
    scheduler: &Weak<RefreshScheduler>,
    apply: impl FnOnce(&mut FeedState),
) {
    // A publish already in progress may still reach a feed being dropped.
    let (Some(state), Some(scheduler)) = (state.upgrade(), scheduler.upgrade()) else {
        return;
    };
    apply(&mut lock_state(&state));
    scheduler.restart();
}

/// Live model of the recent-pastes list.
///
/// The feed stays subscribed to its context until it is unmounted or
/// dropped.
pub struct ListFeed<'ctx, T> {
    ctx: &'ctx AppContext,
    transport: Arc<T>,
    state: Arc<Mutex<FeedState>>,
    scheduler: Arc<RefreshScheduler>,
    created_sub: SubscriptionId,
    deleted_sub: SubscriptionId,
}

impl<T> std::fmt::Debug for ListFeed<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock_state(&self.state);
        f.debug_struct("ListFeed")
            .field("items", &state.items.len())
            .field("loaded", &state.loaded)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl<'ctx, T: PasteTransport + 'static> ListFeed<'ctx, T> {
    /// Subscribe to `ctx`, load the list once, and start polling every
    /// `interval`.
    ///
    /// A failed initial load is logged; the next poll retries it.
    ///
    /// # Errors
    /// Returns the scheduler construction error (no tokio runtime, zero
    /// interval).
    pub async fn mount(
        ctx: &'ctx AppContext,
        transport: Arc<T>,
        interval: Duration,
    ) -> Result<Self, AppError> {
        let state = Arc::new(Mutex::new(FeedState::default()));

        let scheduler = Arc::new(RefreshScheduler::new(interval, {
            let transport = Arc::clone(&transport);
            let state = Arc::clone(&state);
            move || {
                let transport = Arc::clone(&transport);
                let state = Arc::clone(&state);
                async move {
                    if let Err(err) = refresh_feed(transport.as_ref(), &state).await {
                        warn!("scheduled list refresh failed: {}", err);
                    }
                }
            }
        })?);

        let created_sub = {
            let state = Arc::downgrade(&state);
            let scheduler = Arc::downgrade(&scheduler);
            ctx.subscribe_created(move |paste: &PasteRecord| {
                let summary = PasteSummary::from(paste);
                on_list_change(&state, &scheduler, |feed| feed.splice_created(summary));
            })
        };
        let deleted_sub = {
            let state = Arc::downgrade(&state);
            let scheduler = Arc::downgrade(&scheduler);
            ctx.subscribe_deleted(move |paste: &PasteRecord| {
                on_list_change(&state, &scheduler, |feed| feed.remove(&paste.id));
            })
        };

        let feed = Self {
            ctx,
            transport,
            state,
            scheduler,
            created_sub,
            deleted_sub,
        };
        if let Err(err) = feed.refresh_now().await {
            warn!("initial list load failed: {}", err);
        }
        Ok(feed)
    }

    /// Fetch the list now and restart the polling countdown.
    ///
    /// # Returns
    /// `true` when the response was applied, `false` when it was dropped as
    /// stale.
    ///
    /// # Errors
    /// Propagates transport errors.
    pub async fn refresh_now(&self) -> Result<bool, AppError> {
        self.scheduler.restart();
        refresh_feed(self.transport.as_ref(), &self.state).await
    }

    /// Stop polling and detach from the context. Same as dropping the feed.
    pub fn unmount(self) {}
}

impl<T> ListFeed<'_, T> {
    /// Snapshot of the current rows, newest first.
    pub fn items(&self) -> Vec<PasteSummary> {
        lock_state(&self.state).items.clone()
    }

    /// Whether at least one refresh has been applied.
    pub fn is_loaded(&self) -> bool {
        lock_state(&self.state).loaded
    }

    /// Number of refresh responses discarded as stale.
    pub fn stale_drops(&self) -> u64 {
        lock_state(&self.state).stale_drops
    }

    /// State of the polling timer.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }
}

impl<T> Drop for ListFeed<'_, T> {
    fn drop(&mut self) {
        self.scheduler.stop();
        self.ctx.unsubscribe_created(self.created_sub);
        self.ctx.unsubscribe_deleted(self.deleted_sub);
        debug!("list feed detached");
    }
}
