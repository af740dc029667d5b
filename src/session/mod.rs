//! Form Session Module
//!
//! Single-use storage of form submission results between a POST and the GET
//! that follows its redirect.
//!
//! # Modules
//!
//! - [`token`] - Cookie-safe random session tokens
//! - [`cache`] - Concurrent expiring token store
//! - [`resolve`] - Merging a consumed submission with default forms
//! - [`sweeper`] - Background removal of expired entries
//! - [`cookie`] - Session cookie transport
//! - [`manager`] - Cache and cookie transport combined for handlers
//! - [`clock`] - Injectable time source

pub mod cache;
pub mod clock;
pub mod cookie;
pub mod manager;
pub mod resolve;
mod sweeper;
pub mod token;

// Re-export commonly used items for convenience
pub use cache::{SessionCache, DEFAULT_SWEEP_INTERVAL_SECONDS, DEFAULT_TTL_SECONDS};
pub use clock::{Clock, SystemClock};
pub use cookie::{CookieOptions, SessionCookies, COOKIE_NAME};
pub use manager::{Restored, SessionManager};
pub use resolve::{resolve_forms, FieldProvider, Resolved};
pub use token::{RandomTokenSource, SeededTokenSource, TokenSource, ALPHABET, TOKEN_LENGTH};
