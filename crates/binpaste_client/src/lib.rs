//! Headless view coordination for the BinPaste client.
//!
//! Views render; this crate performs the state transitions around them:
//! encrypting before submit, handing records between views through the
//! [`AppContext`](binpaste_core::AppContext), and keeping the recent-pastes
//! list current.

/// Recent-pastes list model with coalesced polling.
pub mod list_feed;
/// Seam to the remote paste API.
pub mod transport;
/// Create, open, clone, delete and search flows.
pub mod workflow;

pub use list_feed::ListFeed;
pub use transport::PasteTransport;
pub use workflow::{NewPaste, Workflow};
