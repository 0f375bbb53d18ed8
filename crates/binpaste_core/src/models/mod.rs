//! Data models exchanged between the views and the transport layer.

/// Paste records, list rows, drafts and create commands.
pub mod paste;

pub use paste::{CreatePasteCmd, Expiry, Exposure, PasteDraft, PasteRecord, PasteSummary};
