//! Shared constants used across BinPaste crates.

/// Default interval between automatic list refreshes, in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 10;

/// Default Argon2id memory cost in KiB.
pub const DEFAULT_KDF_MEMORY_KIB: u32 = 19 * 1024;
/// Default Argon2id time cost (passes over memory).
pub const DEFAULT_KDF_ITERATIONS: u32 = 2;
/// Default Argon2id lane count.
pub const DEFAULT_KDF_PARALLELISM: u32 = 1;
/// Largest memory cost a ciphertext may demand before decryption is refused.
pub const MAX_KDF_MEMORY_KIB: u32 = 64 * 1024;
/// Largest time cost a ciphertext may demand before decryption is refused.
pub const MAX_KDF_ITERATIONS: u32 = 8;
/// Largest lane count a ciphertext may demand before decryption is refused.
pub const MAX_KDF_PARALLELISM: u32 = 4;

/// Minimum paste body length, in characters.
pub const MIN_CONTENT_CHARS: usize = 5;
/// Maximum paste body length, in characters.
pub const MAX_CONTENT_CHARS: usize = 4096;
/// Maximum paste title length, in characters.
pub const MAX_TITLE_CHARS: usize = 255;
/// Search terms shorter than this are not sent to the API.
pub const MIN_SEARCH_TERM_CHARS: usize = 3;

/// Title shown for pastes created without one.
pub const UNTITLED: &str = "Untitled";
