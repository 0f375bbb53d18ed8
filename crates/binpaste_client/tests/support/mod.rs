//! In-memory paste API used by the headless workflow tests.

#![allow(dead_code)]

use binpaste_client::PasteTransport;
use binpaste_core::models::{CreatePasteCmd, Exposure, PasteRecord, PasteSummary};
use binpaste_core::{AppError, Config, KdfParams};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Config with a cheap key derivation so debug test builds stay fast.
pub fn test_config() -> Config {
    Config {
        kdf: KdfParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
        ..Config::default()
    }
}

/// Stores pastes in a vector and counts requests per operation.
#[derive(Default)]
pub struct InMemoryTransport {
    pastes: Mutex<Vec<PasteRecord>>,
    list_delay: Mutex<Option<Duration>>,
    fail_list: Mutex<bool>,
    pub creates: AtomicUsize,
    pub finds: AtomicUsize,
    pub lists: AtomicUsize,
    pub searches: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn pastes(&self) -> MutexGuard<'_, Vec<PasteRecord>> {
        self.pastes.lock().expect("pastes lock")
    }

    /// Stored record by id, including ciphertext bodies.
    pub fn stored(&self, id: &str) -> Option<PasteRecord> {
        self.pastes().iter().find(|paste| paste.id == id).cloned()
    }

    /// Insert a record directly, bypassing `create`.
    pub fn seed(&self, record: PasteRecord) {
        self.pastes().push(record);
    }

    /// Make every `find_all` wait before answering.
    pub fn set_list_delay(&self, delay: Option<Duration>) {
        *self.list_delay.lock().expect("delay lock") = delay;
    }

    pub fn set_list_failure(&self, fail: bool) {
        *self.fail_list.lock().expect("fail lock") = fail;
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn public_summaries(&self, matches: impl Fn(&PasteRecord) -> bool) -> Vec<PasteSummary> {
        self.pastes()
            .iter()
            .rev()
            .filter(|paste| paste.is_public && matches(paste))
            .map(PasteSummary::from)
            .collect()
    }
}

/// Build a stored record the way the API would.
pub fn record_from_cmd(cmd: CreatePasteCmd) -> PasteRecord {
    let exposure = cmd.exposure.unwrap_or_default();
    PasteRecord {
        id: uuid::Uuid::new_v4().simple().to_string(),
        title: cmd.title,
        size_in_bytes: cmd.content.len(),
        content: cmd.content,
        is_public: exposure == Exposure::Public,
        is_erasable: true,
        is_encrypted: cmd.is_encrypted,
        is_one_time: exposure == Exposure::Once,
        is_permanent: false,
        date_created: Utc::now().naive_utc(),
        date_of_expiry: None,
        last_viewed: None,
        views: 0,
    }
}

impl PasteTransport for InMemoryTransport {
    async fn create(&self, cmd: CreatePasteCmd) -> Result<PasteRecord, AppError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let record = record_from_cmd(cmd);
        self.pastes().push(record.clone());
        Ok(record)
    }

    async fn find_one(&self, id: &str) -> Result<PasteRecord, AppError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.stored(id).ok_or(AppError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<PasteSummary>, AppError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().expect("delay lock");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_list.lock().expect("fail lock") {
            return Err(AppError::Transport("list unavailable".to_string()));
        }
        Ok(self.public_summaries(|_| true))
    }

    async fn search(&self, term: &str) -> Result<Vec<PasteSummary>, AppError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.public_summaries(|paste| {
            paste.content.contains(term)
                || paste
                    .title
                    .as_deref()
                    .is_some_and(|title| title.contains(term))
        }))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let mut pastes = self.pastes();
        let before = pastes.len();
        pastes.retain(|paste| paste.id != id);
        if pastes.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
