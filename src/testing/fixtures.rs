//! Test fixtures providing pre-built test objects

use chrono::Duration;
use std::sync::Arc;

use crate::models::{Field, Form};
use crate::session::{
    SeededTokenSource, SessionCache, SessionCookies, SessionManager, DEFAULT_TTL_SECONDS,
};
use crate::settings::{ApplicationSettings, FlashSettings, SessionSettings};

use super::clock::ManualClock;
use super::constants::{CONTACT_FORM, TEST_SEED};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Settings with a loopback address and default session values
    #[must_use]
    pub fn settings() -> FlashSettings {
        FlashSettings {
            application: ApplicationSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            session: SessionSettings::default(),
            ..Default::default()
        }
    }

    /// Cache driven by `clock` with reproducible tokens
    #[must_use]
    pub fn cache_with_clock<F>(clock: Arc<ManualClock>) -> SessionCache<F> {
        SessionCache::with_parts(
            Duration::seconds(i64::try_from(DEFAULT_TTL_SECONDS).unwrap_or(120)),
            clock,
            Arc::new(SeededTokenSource::new(TEST_SEED)),
        )
    }

    /// Manager over [`TestFixtures::cache_with_clock`] without a sweeper
    #[must_use]
    pub fn manager_with_clock<F>(clock: Arc<ManualClock>) -> SessionManager<F> {
        SessionManager::new(Self::cache_with_clock(clock), SessionCookies::default())
    }

    /// A contact form submission that failed validation
    #[must_use]
    pub fn rejected_contact() -> Form<Field> {
        Form::new(
            CONTACT_FORM,
            vec![
                Field::new("name", "Name").with_value("Ada"),
                Field::new("email", "Email")
                    .with_value("ada")
                    .with_error("Enter a valid email address"),
            ],
        )
    }

    /// A contact form submission that passed validation
    #[must_use]
    pub fn accepted_contact() -> Form<Field> {
        Form::accepted(CONTACT_FORM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers;

    #[test]
    fn test_contact_fixtures_target_page_form() {
        assert_eq!(TestFixtures::rejected_contact().action, handlers::CONTACT_FORM);
        assert_eq!(TestFixtures::accepted_contact().action, handlers::CONTACT_FORM);
        assert!(handlers::PAGE_FORMS.contains(&CONTACT_FORM));
    }
}
