//! Create, open, clone, delete and search flows performed by the views.

use crate::transport::PasteTransport;
use binpaste_core::models::paste::{effective_search_term, normalize_title, validate_content};
use binpaste_core::models::{
    CreatePasteCmd, Expiry, Exposure, PasteDraft, PasteRecord, PasteSummary,
};
use binpaste_core::{Announce, AppContext, AppError, Config, PassphraseCodec, MAX_CONTENT_CHARS};
use tracing::{debug, info};

/// Form input for a new paste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPaste {
    pub title: Option<String>,
    /// Plaintext body; encrypted before submit when `passphrase` is set.
    pub content: String,
    pub expiry: Option<Expiry>,
    pub exposure: Option<Exposure>,
    /// Empty or missing means the paste is stored in the clear.
    pub passphrase: Option<String>,
}

impl NewPaste {
    /// Pre-fill the form from a clone draft.
    pub fn from_draft(draft: PasteDraft) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            ..Self::default()
        }
    }
}

/// Flows bound to one context and transport.
#[derive(Debug)]
pub struct Workflow<'a, T> {
    ctx: &'a AppContext,
    transport: &'a T,
    codec: PassphraseCodec,
    announce_unlisted: bool,
}

impl<'a, T: PasteTransport> Workflow<'a, T> {
    /// Bind flows to `ctx` and `transport` using `config` for encryption cost
    /// and announcement policy.
    pub fn new(ctx: &'a AppContext, transport: &'a T, config: &Config) -> Self {
        Self {
            ctx,
            transport,
            codec: PassphraseCodec::new(config.kdf),
            announce_unlisted: config.announce_unlisted,
        }
    }

    /// Validate, optionally encrypt, submit, then hand the record to the
    /// read view and (per announcement policy) to list subscribers.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for content or title policy
    /// violations, and propagates codec and transport errors.
    pub async fn create_paste(&self, new_paste: NewPaste) -> Result<PasteRecord, AppError> {
        let NewPaste {
            title,
            content,
            expiry,
            exposure,
            passphrase,
        } = new_paste;

        let title = normalize_title(title)?;
        validate_content(&content)?;

        let (content, is_encrypted) = match passphrase.as_deref().filter(|p| !p.is_empty()) {
            Some(passphrase) => (self.codec.encrypt(&content, passphrase)?, true),
            None => (content, false),
        };
        // The API limits the submitted body, which for encrypted pastes is
        // the envelope rather than the plaintext.
        if is_encrypted && content.len() > MAX_CONTENT_CHARS {
            return Err(AppError::BadRequest(format!(
                "content is too long once encrypted ({} of {} characters)",
                content.len(),
                MAX_CONTENT_CHARS
            )));
        }

        let record = self
            .transport
            .create(CreatePasteCmd {
                title,
                content,
                is_encrypted,
                expiry,
                exposure,
            })
            .await?;

        let announce = Announce::for_record(&record, self.announce_unlisted);
        info!(
            id = %record.id,
            encrypted = record.is_encrypted,
            ?announce,
            "paste created"
        );
        self.ctx.push_created_paste(record.clone(), announce);
        Ok(record)
    }

    /// Load a paste for the read view.
    ///
    /// Uses the created-paste hand-off when it matches `id`, avoiding a second
    /// request right after creation; otherwise fetches.
    ///
    /// # Errors
    /// Propagates transport errors from the fallback fetch.
    pub async fn open_paste(&self, id: &str) -> Result<PasteRecord, AppError> {
        if let Some(record) = self.ctx.pop_created_paste() {
            if record.id == id {
                debug!(id, "opened paste from creation hand-off");
                return Ok(record);
            }
            debug!(
                requested = id,
                pending = %record.id,
                "discarding hand-off for a different paste"
            );
        }
        self.transport.find_one(id).await
    }

    /// Readable body of `record`.
    ///
    /// # Returns
    /// The content as-is for unencrypted pastes. For encrypted ones, the
    /// decrypted body, or `None` when the passphrase is missing or wrong and
    /// the view should prompt again.
    pub fn reveal_content(&self, record: &PasteRecord, passphrase: Option<&str>) -> Option<String> {
        if !record.is_encrypted {
            return Some(record.content.clone());
        }
        let passphrase = passphrase.filter(|p| !p.is_empty())?;
        let plaintext = self.codec.decrypt(&record.content, passphrase);
        if plaintext.is_none() {
            debug!(id = %record.id, "passphrase did not open paste");
        }
        plaintext
    }

    /// Hand `record` to the create view as a draft.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for encrypted or non-public pastes.
    pub fn clone_paste(&self, record: &PasteRecord) -> Result<(), AppError> {
        if !record.is_cloneable() {
            return Err(AppError::BadRequest(format!(
                "paste '{}' cannot be cloned",
                record.id
            )));
        }
        self.ctx.push_cloned_draft(record.to_draft());
        Ok(())
    }

    /// Take the draft waiting for the create view, if any.
    pub fn take_clone_draft(&self) -> Option<PasteDraft> {
        self.ctx.pop_cloned_draft()
    }

    /// Delete through the transport, then announce the deletion.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for pastes that are not erasable and
    /// propagates transport errors; nothing is announced on failure.
    pub async fn delete_paste(&self, record: &PasteRecord) -> Result<(), AppError> {
        if !record.is_erasable {
            return Err(AppError::BadRequest(format!(
                "paste '{}' cannot be deleted",
                record.id
            )));
        }
        self.transport.delete(&record.id).await?;
        info!(id = %record.id, "paste deleted");
        self.ctx.push_deleted_paste(record);
        Ok(())
    }

    /// Search public pastes.
    ///
    /// Terms shorter than the minimum search length return no results
    /// without a request.
    ///
    /// # Errors
    /// Propagates transport errors.
    pub async fn search_pastes(&self, term: &str) -> Result<Vec<PasteSummary>, AppError> {
        match effective_search_term(term) {
            Some(term) => self.transport.search(term).await,
            None => Ok(Vec::new()),
        }
    }
}
