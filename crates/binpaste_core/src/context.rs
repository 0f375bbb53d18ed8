//! Process-wide hand-off and notification context shared by all views.

use crate::channel::{EventChannel, SubscriptionId};
use crate::models::{PasteDraft, PasteRecord};
use crate::relay::PendingRelay;
use std::sync::OnceLock;

/// Whether a newly created paste is broadcast to `created` subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announce {
    /// Store the hand-off and notify subscribers.
    Broadcast,
    /// Store the hand-off only.
    Silent,
}

impl Announce {
    /// Derive the announcement policy for a created paste.
    ///
    /// Public pastes are always broadcast; unlisted and one-time pastes only
    /// when `announce_unlisted` is set.
    pub fn for_record(record: &PasteRecord, announce_unlisted: bool) -> Self {
        if record.is_public || announce_unlisted {
            Self::Broadcast
        } else {
            Self::Silent
        }
    }
}

/// Relays and channels connecting the create, read and list views.
#[derive(Debug, Default)]
pub struct AppContext {
    cloned_draft: PendingRelay<PasteDraft>,
    created_paste: PendingRelay<PasteRecord>,
    on_created: EventChannel<PasteRecord>,
    on_deleted: EventChannel<PasteRecord>,
}

impl AppContext {
    /// Build an isolated context.
    ///
    /// Applications use [`AppContext::global`]; separate instances exist for
    /// tests and embedding.
    pub const fn new() -> Self {
        Self {
            cloned_draft: PendingRelay::new(),
            created_paste: PendingRelay::new(),
            on_created: EventChannel::new(),
            on_deleted: EventChannel::new(),
        }
    }

    /// The single context shared for the lifetime of the process.
    pub fn global() -> &'static AppContext {
        static CONTEXT: OnceLock<AppContext> = OnceLock::new();
        CONTEXT.get_or_init(AppContext::new)
    }

    /// Hand a draft to the create view.
    pub fn push_cloned_draft(&self, draft: PasteDraft) {
        self.cloned_draft.push(draft);
    }

    /// Take the pending clone draft, if any.
    pub fn pop_cloned_draft(&self) -> Option<PasteDraft> {
        self.cloned_draft.pop()
    }

    /// Record a freshly created paste and, for [`Announce::Broadcast`],
    /// notify `created` subscribers.
    ///
    /// The relay is written before any subscriber runs, so a subscriber may
    /// pop it and observe this same record.
    pub fn push_created_paste(&self, paste: PasteRecord, announce: Announce) {
        tracing::debug!(id = %paste.id, ?announce, "created paste handed off");
        match announce {
            Announce::Broadcast => {
                self.created_paste.push(paste.clone());
                self.on_created.publish(&paste);
            }
            Announce::Silent => self.created_paste.push(paste),
        }
    }

    /// Take the created-paste hand-off without notifying anyone.
    pub fn pop_created_paste(&self) -> Option<PasteRecord> {
        self.created_paste.pop()
    }

    /// Notify `deleted` subscribers. Nothing is stored.
    pub fn push_deleted_paste(&self, paste: &PasteRecord) {
        tracing::debug!(id = %paste.id, "deleted paste announced");
        self.on_deleted.publish(paste);
    }

    /// Register for created-paste notifications.
    pub fn subscribe_created<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PasteRecord) + Send + Sync + 'static,
    {
        self.on_created.subscribe(callback)
    }

    /// Register for deleted-paste notifications.
    pub fn subscribe_deleted<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PasteRecord) + Send + Sync + 'static,
    {
        self.on_deleted.subscribe(callback)
    }

    /// Remove a created-paste subscription.
    pub fn unsubscribe_created(&self, id: SubscriptionId) -> bool {
        self.on_created.unsubscribe(id)
    }

    /// Remove a deleted-paste subscription.
    pub fn unsubscribe_deleted(&self, id: SubscriptionId) -> bool {
        self.on_deleted.unsubscribe(id)
    }

    /// Current `(created, deleted)` subscriber counts.
    pub fn subscriber_counts(&self) -> (usize, usize) {
        (
            self.on_created.subscriber_count(),
            self.on_deleted.subscriber_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn record(id: &str, is_public: bool) -> PasteRecord {
        PasteRecord {
            id: id.to_string(),
            title: None,
            content: "hello world".to_string(),
            size_in_bytes: 11,
            is_public,
            is_erasable: true,
            is_encrypted: false,
            is_one_time: !is_public,
            is_permanent: false,
            date_created: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("valid timestamp"),
            date_of_expiry: None,
            last_viewed: None,
            views: 0,
        }
    }

    fn collect(ctx: &AppContext, created: bool) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = move |paste: &PasteRecord| {
            sink.lock().expect("seen lock").push(paste.id.clone());
        };
        if created {
            ctx.subscribe_created(callback);
        } else {
            ctx.subscribe_deleted(callback);
        }
        seen
    }

    #[test]
    fn created_paste_reaches_subscriber_and_relay() {
        let ctx = AppContext::new();
        let seen = collect(&ctx, true);
        let paste = record("p1", true);

        ctx.push_created_paste(paste.clone(), Announce::Broadcast);

        assert_eq!(*seen.lock().expect("seen lock"), vec!["p1"]);
        assert_eq!(ctx.pop_created_paste(), Some(paste));
        assert_eq!(ctx.pop_created_paste(), None);
    }

    #[test]
    fn relay_is_written_before_subscribers_run() {
        let ctx = Arc::new(AppContext::new());
        let observed = Arc::new(Mutex::new(None));
        {
            let ctx_ref = Arc::downgrade(&ctx);
            let observed = Arc::clone(&observed);
            ctx.subscribe_created(move |_| {
                if let Some(ctx) = ctx_ref.upgrade() {
                    *observed.lock().expect("observed lock") = ctx.pop_created_paste();
                }
            });
        }

        ctx.push_created_paste(record("p2", true), Announce::Broadcast);

        let observed = observed.lock().expect("observed lock").take();
        assert_eq!(observed.map(|paste| paste.id), Some("p2".to_string()));
        assert_eq!(ctx.pop_created_paste(), None);
    }

    #[test]
    fn silent_creation_fills_relay_without_notifying() {
        let ctx = AppContext::new();
        let seen = collect(&ctx, true);

        ctx.push_created_paste(record("p3", false), Announce::Silent);

        assert!(seen.lock().expect("seen lock").is_empty());
        assert_eq!(
            ctx.pop_created_paste().map(|paste| paste.id),
            Some("p3".to_string())
        );
    }

    #[test]
    fn deletion_only_notifies() {
        let ctx = AppContext::new();
        let deleted = collect(&ctx, false);
        let created = collect(&ctx, true);

        ctx.push_deleted_paste(&record("p4", true));

        assert_eq!(*deleted.lock().expect("deleted lock"), vec!["p4"]);
        assert!(created.lock().expect("created lock").is_empty());
        assert_eq!(ctx.pop_created_paste(), None);
    }

    #[test]
    fn clone_draft_is_popped_once() {
        let ctx = AppContext::new();
        ctx.push_cloned_draft(PasteDraft {
            title: Some("T".to_string()),
            content: "C".to_string(),
        });

        assert_eq!(
            ctx.pop_cloned_draft(),
            Some(PasteDraft {
                title: Some("T".to_string()),
                content: "C".to_string(),
            })
        );
        assert_eq!(ctx.pop_cloned_draft(), None);
    }

    #[test]
    fn announce_policy_follows_visibility_and_override() {
        assert_eq!(
            Announce::for_record(&record("a", true), false),
            Announce::Broadcast
        );
        assert_eq!(
            Announce::for_record(&record("b", false), false),
            Announce::Silent
        );
        assert_eq!(
            Announce::for_record(&record("c", false), true),
            Announce::Broadcast
        );
    }

    #[test]
    fn unsubscribe_detaches_listeners() {
        let ctx = AppContext::new();
        let created = ctx.subscribe_created(|_| {});
        let deleted = ctx.subscribe_deleted(|_| {});
        assert_eq!(ctx.subscriber_counts(), (1, 1));

        assert!(ctx.unsubscribe_created(created));
        assert!(ctx.unsubscribe_deleted(deleted));
        assert_eq!(ctx.subscriber_counts(), (0, 0));
    }

    #[test]
    fn global_context_is_a_singleton() {
        assert!(std::ptr::eq(AppContext::global(), AppContext::global()));
    }
}
