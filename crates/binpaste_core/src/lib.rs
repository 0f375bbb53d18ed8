//! Client-side coordination and confidentiality core for BinPaste.

/// Ordered multi-subscriber notification channel.
pub mod channel;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants and content policy limits.
pub mod constants;
/// Process-wide hand-off and notification context.
pub mod context;
/// Passphrase-based encryption of paste bodies.
pub mod crypto;
/// Application error types.
pub mod error;
/// Paste data models exchanged with the transport layer.
pub mod models;
/// Single-slot ephemeral relay.
pub mod relay;
/// Periodic refresh timer with coalescing restarts.
pub mod scheduler;

pub use channel::{EventChannel, SubscriptionId};
pub use config::Config;
pub use constants::*;
pub use context::{Announce, AppContext};
pub use crypto::{decrypt, encrypt, KdfParams, PassphraseCodec};
pub use error::AppError;
pub use relay::PendingRelay;
pub use scheduler::{RefreshScheduler, SchedulerState};
