//! Seam to the remote paste API.
//!
//! The HTTP contract lives outside this workspace; views depend on this trait
//! so flows can be driven by any client or by an in-memory fake in tests.

use binpaste_core::models::{CreatePasteCmd, PasteRecord, PasteSummary};
use binpaste_core::AppError;
use std::future::Future;

/// Operations the views need from the paste API.
pub trait PasteTransport: Send + Sync {
    /// Submit a new paste and return the stored record.
    fn create(
        &self,
        cmd: CreatePasteCmd,
    ) -> impl Future<Output = Result<PasteRecord, AppError>> + Send;

    /// Fetch one paste by id.
    ///
    /// Implementations return [`AppError::NotFound`] for unknown or expired ids.
    fn find_one(&self, id: &str) -> impl Future<Output = Result<PasteRecord, AppError>> + Send;

    /// Fetch the recent public pastes, newest first.
    fn find_all(&self) -> impl Future<Output = Result<Vec<PasteSummary>, AppError>> + Send;

    /// Full-text search over public pastes.
    fn search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<PasteSummary>, AppError>> + Send;

    /// Delete a paste by id.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}
