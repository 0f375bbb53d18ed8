//! Root crate facade for the BinPaste client core and view flows.

pub use binpaste_client::{
    list_feed, transport, workflow, ListFeed, NewPaste, PasteTransport, Workflow,
};
pub use binpaste_core::{
    channel, config, constants, context, crypto, error, models, relay, scheduler, Announce,
    AppContext, AppError, Config, EventChannel, KdfParams, PassphraseCodec, PendingRelay,
    RefreshScheduler, SchedulerState, SubscriptionId,
};
