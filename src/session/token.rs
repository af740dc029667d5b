//! Session token generation
//!
//! Tokens are 24 characters drawn uniformly from every byte that may appear
//! unquoted in a cookie value. Index selection goes through
//! [`rand::Rng::random_range`], which rejects samples outside the largest
//! multiple of the alphabet size, so no symbol is favoured.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Number of characters in a session token
pub const TOKEN_LENGTH: usize = 24;

/// Every byte accepted by [`is_cookie_value_byte`], in ascending order
pub const ALPHABET: &[u8] =
    b" !#$%&'()*+,-./0123456789:<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Whether a byte may appear in a cookie value without quoting
#[must_use]
pub const fn is_cookie_value_byte(b: u8) -> bool {
    0x20 <= b && b < 0x7f && b != b'"' && b != b';' && b != b'\\'
}

/// Source of fresh session tokens
pub trait TokenSource: Send + Sync {
    fn generate(&self) -> String;
}

/// Build a token by drawing each character from `rng`
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LENGTH)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}

/// Tokens from the thread-local OS-seeded generator
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn generate(&self) -> String {
        generate_with(&mut rand::rng())
    }
}

/// Reproducible tokens from a seeded generator
#[derive(Debug)]
pub struct SeededTokenSource {
    rng: Mutex<StdRng>,
}

impl SeededTokenSource {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TokenSource for SeededTokenSource {
    fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        generate_with(&mut *rng)
    }
}

/// Shortened token for log output
pub(crate) fn token_prefix(token: &str) -> &str {
    token.get(..4).unwrap_or(token)
}
