#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the flashform library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod handlers;
pub mod models;
pub mod session;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use error::FlashError;
pub use models::{Field, Form, FormId, NO_ACTION};
pub use session::{SessionCache, SessionManager};
pub use settings::FlashSettings;
