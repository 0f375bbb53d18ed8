//! Passphrase-based encryption for paste bodies.
//!
//! A ciphertext is one base64 string carrying everything needed to decrypt it
//! again except the passphrase:
//!
//! ```text
//! version | m_cost | t_cost | p_cost | salt | nonce | ciphertext + tag
//!   u8      u32le    u32le    u32le    16B    24B     ...
//! ```
//!
//! The key is derived with Argon2id and the body is sealed with
//! XChaCha20-Poly1305, so a wrong passphrase fails tag verification instead of
//! producing garbage. Decryption never errors: every failure is `None`.

use crate::constants::{
    DEFAULT_KDF_ITERATIONS, DEFAULT_KDF_MEMORY_KIB, DEFAULT_KDF_PARALLELISM, MAX_KDF_ITERATIONS,
    MAX_KDF_MEMORY_KIB, MAX_KDF_PARALLELISM,
};
use crate::error::AppError;
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;

const ENVELOPE_VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = 1 + 3 * 4 + SALT_LEN + NONCE_LEN;

/// Argon2id cost parameters used to stretch a passphrase into a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_KDF_MEMORY_KIB,
            iterations: DEFAULT_KDF_ITERATIONS,
            parallelism: DEFAULT_KDF_PARALLELISM,
        }
    }
}

impl KdfParams {
    fn fits_within(self, ceiling: Self) -> bool {
        self.memory_kib <= ceiling.memory_kib
            && self.iterations <= ceiling.iterations
            && self.parallelism <= ceiling.parallelism
    }

    fn derive_key(self, passphrase: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], AppError> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|err| AppError::Crypto(format!("invalid key derivation parameters: {err}")))?;
        let mut key = [0u8; KEY_LEN];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(passphrase.as_bytes(), salt, &mut key)
            .map_err(|err| AppError::Crypto(format!("key derivation failed: {err}")))?;
        Ok(key)
    }
}

/// Encrypts and decrypts paste bodies with a passphrase-derived key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassphraseCodec {
    params: KdfParams,
    ceiling: KdfParams,
}

impl Default for PassphraseCodec {
    fn default() -> Self {
        Self::new(KdfParams::default())
    }
}

impl PassphraseCodec {
    /// Build a codec that derives keys for new ciphertexts with `params`.
    ///
    /// Decryption always uses the parameters recorded in the ciphertext.
    pub fn new(params: KdfParams) -> Self {
        Self {
            params,
            ceiling: KdfParams {
                memory_kib: MAX_KDF_MEMORY_KIB,
                iterations: MAX_KDF_ITERATIONS,
                parallelism: MAX_KDF_PARALLELISM,
            },
        }
    }

    /// Key-derivation parameters applied by [`PassphraseCodec::encrypt`].
    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Encrypt `plaintext` under `passphrase`.
    ///
    /// Every call draws a fresh salt and nonce, so encrypting the same input
    /// twice yields different ciphertexts.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for an empty passphrase (encryption is
    /// opt-in; callers skip the codec instead) and [`AppError::Crypto`] when
    /// the configured derivation parameters are rejected.
    pub fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<String, AppError> {
        if passphrase.is_empty() {
            return Err(AppError::BadRequest(
                "passphrase must not be empty".to_string(),
            ));
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let key = self.params.derive_key(passphrase, &salt)?;
        let cipher = XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|_| AppError::Crypto("invalid key length".to_string()))?;
        let sealed = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| AppError::Crypto("encryption failed".to_string()))?;

        let mut envelope = Vec::with_capacity(HEADER_LEN + sealed.len());
        envelope.push(ENVELOPE_VERSION);
        envelope.extend_from_slice(&self.params.memory_kib.to_le_bytes());
        envelope.extend_from_slice(&self.params.iterations.to_le_bytes());
        envelope.extend_from_slice(&self.params.parallelism.to_le_bytes());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);
        Ok(STANDARD.encode(envelope))
    }

    /// Decrypt a ciphertext produced by [`PassphraseCodec::encrypt`].
    ///
    /// # Returns
    /// The plaintext, or `None` when the passphrase is wrong, the input is
    /// malformed or tampered with, or the recovered plaintext is empty.
    pub fn decrypt(&self, ciphertext: &str, passphrase: &str) -> Option<String> {
        let bytes = STANDARD.decode(ciphertext.trim()).ok()?;
        let envelope = Envelope::parse(&bytes)?;
        if !envelope.params.fits_within(self.ceiling) {
            tracing::debug!(
                params = ?envelope.params,
                "refusing ciphertext with excessive key derivation cost"
            );
            return None;
        }

        let key = match envelope.params.derive_key(passphrase, envelope.salt) {
            Ok(key) => key,
            Err(err) => {
                tracing::debug!("ciphertext key derivation failed: {}", err);
                return None;
            }
        };
        let cipher = XChaCha20Poly1305::new_from_slice(&key).ok()?;
        let opened = cipher
            .decrypt(XNonce::from_slice(envelope.nonce), envelope.sealed)
            .ok()?;
        String::from_utf8(opened)
            .ok()
            .filter(|plaintext| !plaintext.is_empty())
    }
}

struct Envelope<'a> {
    params: KdfParams,
    salt: &'a [u8],
    nonce: &'a [u8],
    sealed: &'a [u8],
}

impl<'a> Envelope<'a> {
    fn parse(bytes: &'a [u8]) -> Option<Self> {
        let (&version, rest) = bytes.split_first()?;
        if version != ENVELOPE_VERSION {
            return None;
        }
        let (memory_kib, rest) = take_u32(rest)?;
        let (iterations, rest) = take_u32(rest)?;
        let (parallelism, rest) = take_u32(rest)?;
        let (salt, rest) = take(rest, SALT_LEN)?;
        let (nonce, sealed) = take(rest, NONCE_LEN)?;
        if sealed.is_empty() {
            return None;
        }
        Some(Self {
            params: KdfParams {
                memory_kib,
                iterations,
                parallelism,
            },
            salt,
            nonce,
            sealed,
        })
    }
}

fn take(bytes: &[u8], len: usize) -> Option<(&[u8], &[u8])> {
    (bytes.len() >= len).then(|| bytes.split_at(len))
}

fn take_u32(bytes: &[u8]) -> Option<(u32, &[u8])> {
    let (head, rest) = take(bytes, 4)?;
    let value = u32::from_le_bytes(head.try_into().ok()?);
    Some((value, rest))
}

/// Encrypt with the default key-derivation cost.
///
/// See [`PassphraseCodec::encrypt`].
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<String, AppError> {
    PassphraseCodec::default().encrypt(plaintext, passphrase)
}

/// Decrypt any ciphertext produced by this module.
///
/// See [`PassphraseCodec::decrypt`].
pub fn decrypt(ciphertext: &str, passphrase: &str) -> Option<String> {
    PassphraseCodec::default().decrypt(ciphertext, passphrase)
}
