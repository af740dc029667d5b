//! Testing utilities for flashform
//!
//! ## Organization
//!
//! - [`clock`] - Manually advanced clock for expiry tests
//! - [`fixtures`] - Pre-built caches, managers and settings
//! - [`requests`] - HTTP request builders carrying session cookies
//!
//! ## Usage
//!
//! ```rust
//! use flashform::models::{Field, Form};
//! use flashform::session::SessionManager;
//! use flashform::testing::{ManualClock, TestFixtures};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::default());
//! let manager: SessionManager<Field> = TestFixtures::manager_with_clock(clock.clone());
//! manager.stash(Form::accepted(1));
//! clock.advance(chrono::Duration::seconds(121));
//! assert_eq!(manager.cache().sweep(), 1);
//! ```

pub mod clock;
pub mod fixtures;
pub mod requests;

pub use clock::ManualClock;
pub use fixtures::TestFixtures;
pub use requests::{set_cookie_values, RequestBuilder};

/// Common test constants
pub mod constants {
    pub use crate::handlers::CONTACT_FORM;

    /// Seed for reproducible token sources
    pub const TEST_SEED: u64 = 0x5eed;
}
