//! Short code generation and validation utilities.
//!
//! Codes are drawn uniformly from a 62-character alphabet using an injected
//! [`RandomSource`]. Production uses the operating system CSPRNG
//! ([`OsRandom`]); tests substitute a seeded source.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Characters a short code may contain: digits, uppercase, lowercase.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length used when the requested length is out of range.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Upper bound on code length, matching the `short_code` column size.
pub const MAX_CODE_LENGTH: usize = 10;

/// Minimum custom alias length.
pub const MIN_ALIAS_LENGTH: usize = 3;

/// Maximum custom alias length, matching the `custom_alias` column size.
pub const MAX_ALIAS_LENGTH: usize = 10;

/// Bytes at or above this value are rejected so `byte % 62` stays uniform.
const REJECTION_LIMIT: u8 = 248;

/// Failure of the underlying randomness source.
#[derive(Debug, thiserror::Error)]
#[error("randomness source failed: {0}")]
pub struct RandomnessError(pub String);

/// A source of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fills `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomnessError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomnessError> {
        getrandom::fill(buf).map_err(|e| RandomnessError(e.to_string()))
    }
}

/// Deterministic source seeded from a `u64`.
///
/// Produces reproducible codes for tests and fixtures. Never use it to issue
/// real links: its output is predictable.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomnessError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| RandomnessError("seeded generator lock poisoned".to_string()))?;
        rng.fill_bytes(buf);
        Ok(())
    }
}

/// Generates random short codes from [`ALPHABET`].
#[derive(Clone)]
pub struct CodeGenerator {
    source: Arc<dyn RandomSource>,
}

impl CodeGenerator {
    /// Creates a generator backed by the given randomness source.
    pub fn new(source: Arc<dyn RandomSource>) -> Self {
        Self { source }
    }

    /// Creates a generator backed by the operating system CSPRNG.
    pub fn os() -> Self {
        Self::new(Arc::new(OsRandom))
    }

    /// Generates a code of `length` characters.
    ///
    /// Lengths outside `1..=10` fall back to [`DEFAULT_CODE_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns [`RandomnessError`] if the randomness source fails. The
    /// failure is not retried here.
    pub fn generate(&self, length: i64) -> Result<String, RandomnessError> {
        let length = normalize_length(length);
        let mut code = String::with_capacity(length);
        let mut buf = [0u8; 32];

        while code.len() < length {
            self.source.fill(&mut buf)?;

            for &byte in buf.iter().filter(|&&b| b < REJECTION_LIMIT) {
                code.push(ALPHABET[usize::from(byte % 62)] as char);
                if code.len() == length {
                    break;
                }
            }
        }

        Ok(code)
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator").finish_non_exhaustive()
    }
}

/// Maps a requested length onto `1..=10`, defaulting to 6.
pub fn normalize_length(length: i64) -> usize {
    match usize::try_from(length) {
        Ok(len) if (1..=MAX_CODE_LENGTH).contains(&len) => len,
        _ => DEFAULT_CODE_LENGTH,
    }
}

/// Returns true if `code` is non-empty and every character is in [`ALPHABET`].
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Returns true if `alias` is 3-10 ASCII letters or digits.
pub fn is_valid_alias(alias: &str) -> bool {
    (MIN_ALIAS_LENGTH..=MAX_ALIAS_LENGTH).contains(&alias.len())
        && alias.bytes().all(|b| b.is_ascii_alphanumeric())
}
