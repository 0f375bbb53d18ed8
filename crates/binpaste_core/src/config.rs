//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_KDF_ITERATIONS, DEFAULT_KDF_MEMORY_KIB, DEFAULT_KDF_PARALLELISM,
    DEFAULT_REFRESH_INTERVAL_SECS, MAX_KDF_ITERATIONS, MAX_KDF_MEMORY_KIB, MAX_KDF_PARALLELISM,
};
use crate::crypto::KdfParams;
use std::env;
use std::time::Duration;

/// Runtime configuration for the BinPaste client core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interval between automatic list refreshes.
    pub refresh_interval: Duration,
    /// Key-derivation cost applied to newly encrypted pastes.
    pub kdf: KdfParams,
    /// Broadcast unlisted and one-time creations to list subscribers too.
    pub announce_unlisted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            kdf: KdfParams::default(),
            announce_unlisted: false,
        }
    }
}

const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];
const FALSY: [&str; 5] = ["", "0", "false", "no", "off"];

/// Interpret an on/off setting such as `yes`, `0` or `Off`.
///
/// Returns `None` for anything outside the accepted spellings.
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    let is_any = |spellings: &[&str]| spellings.iter().any(|s| s.eq_ignore_ascii_case(value));
    if is_any(&TRUTHY[..]) {
        Some(true)
    } else if is_any(&FALSY[..]) {
        Some(false)
    } else {
        None
    }
}

fn env_flag(name: &str) -> bool {
    let Ok(raw) = env::var(name) else {
        return false;
    };
    parse_flag(&raw).unwrap_or_else(|| {
        tracing::warn!("Ignoring unrecognized {}={:?}", name, raw);
        false
    })
}

fn env_positive<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed = env::var(name).ok()?.trim().parse::<T>().ok()?;
    if parsed > T::default() {
        Some(parsed)
    } else {
        tracing::warn!("Ignoring non-positive {}", name);
        None
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or invalid.
    pub fn from_env() -> Self {
        let refresh_secs = env_positive::<u64>("BINPASTE_REFRESH_INTERVAL_SECS")
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
        let memory_kib = env_positive::<u32>("BINPASTE_KDF_MEMORY_KIB")
            .filter(|kib| *kib <= MAX_KDF_MEMORY_KIB)
            .unwrap_or(DEFAULT_KDF_MEMORY_KIB);

        Self {
            refresh_interval: Duration::from_secs(refresh_secs),
            kdf: KdfParams {
                memory_kib,
                iterations: env_positive::<u32>("BINPASTE_KDF_ITERATIONS")
                    .filter(|passes| *passes <= MAX_KDF_ITERATIONS)
                    .unwrap_or(DEFAULT_KDF_ITERATIONS),
                parallelism: env_positive::<u32>("BINPASTE_KDF_PARALLELISM")
                    .filter(|lanes| *lanes <= MAX_KDF_PARALLELISM)
                    .unwrap_or(DEFAULT_KDF_PARALLELISM),
            },
            announce_unlisted: env_flag("BINPASTE_ANNOUNCE_UNLISTED"),
        }
    }
}
