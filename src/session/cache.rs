//! Concurrent single-use session cache
//!
//! Maps opaque tokens to a pending [`Form`] and its expiry. Every insert and
//! every lookup-and-remove runs under the write side of one lock, so a token
//! is handed out at most once and consumed at most once.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::FlashError;
use crate::models::{Form, FormId};
use crate::session::clock::{Clock, SystemClock};
use crate::session::resolve::{resolve_forms, FieldProvider, Resolved};
use crate::session::sweeper;
use crate::session::token::{token_prefix, RandomTokenSource, TokenSource};
use crate::settings::SessionSettings;

/// Default lifetime of a stored submission in seconds
pub const DEFAULT_TTL_SECONDS: u64 = 120;

/// Default period of the background sweep in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 15;

struct StoredForm<F> {
    form: Form<F>,
    expires_at: DateTime<Utc>,
}

pub(crate) struct CacheInner<F> {
    entries: RwLock<HashMap<String, StoredForm<F>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenSource>,
}

impl<F> CacheInner<F> {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, StoredForm<F>>> {
        // Every critical section leaves the map consistent, so a poisoned
        // lock is still safe to use.
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, StoredForm<F>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn sweep(&self) -> usize {
        if self.read().is_empty() {
            return 0;
        }

        let now = self.clock.now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, stored| stored.expires_at > now);
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            debug!("Swept {removed} expired form sessions");
        }
        removed
    }
}

/// Single-use, expiring store of form submissions keyed by random token
pub struct SessionCache<F> {
    inner: Arc<CacheInner<F>>,
}

impl<F> Clone for SessionCache<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F> Default for SessionCache<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> SessionCache<F> {
    /// Create a cache with the default TTL, wall clock and random tokens.
    ///
    /// No sweeper is started; call [`SessionCache::sweep`] manually or use
    /// [`SessionCache::spawn`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(
            Duration::seconds(i64::try_from(DEFAULT_TTL_SECONDS).unwrap_or(120)),
            Arc::new(SystemClock),
            Arc::new(RandomTokenSource),
        )
    }

    /// Create a cache from explicit parts
    #[must_use]
    pub fn with_parts(ttl: Duration, clock: Arc<dyn Clock>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::new()),
                ttl,
                clock,
                tokens,
            }),
        }
    }

    /// Lifetime of stored submissions
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Store a submission and return the token that retrieves it.
    ///
    /// The first candidate token is generated before taking the lock. On a
    /// collision a new token is drawn until a vacant one is found, so an
    /// existing entry is never overwritten.
    pub fn store(&self, form: Form<F>) -> String {
        let mut token = self.inner.tokens.generate();
        let mut entries = self.inner.write();
        let expires_at = self.inner.clock.now() + self.inner.ttl;

        loop {
            match entries.entry(token) {
                Entry::Vacant(slot) => {
                    let token = slot.key().clone();
                    debug!(
                        "Stored form session {}... for action {}",
                        token_prefix(&token),
                        form.action
                    );
                    slot.insert(StoredForm { form, expires_at });
                    return token;
                }
                Entry::Occupied(slot) => {
                    warn!(
                        "Session token collision on {}..., regenerating",
                        token_prefix(slot.key())
                    );
                    token = self.inner.tokens.generate();
                }
            }
        }
    }

    /// Remove and return the submission stored under `token`.
    ///
    /// Returns `None` for an empty, unknown, already consumed or expired
    /// token. An expired entry found here is removed as well.
    pub fn take(&self, token: &str) -> Option<Form<F>> {
        if token.is_empty() {
            return None;
        }

        let now = self.inner.clock.now();
        let stored = self.inner.write().remove(token)?;

        if stored.expires_at > now {
            Some(stored.form)
        } else {
            debug!(
                "Discarded expired form session {}...",
                token_prefix(token)
            );
            None
        }
    }

    /// Consume the session for `token` and resolve the requested forms.
    ///
    /// A missing token behaves exactly like an unknown one: every requested
    /// form comes from `provider` and the action is
    /// [`NO_ACTION`](crate::models::NO_ACTION).
    pub fn retrieve<P>(&self, token: Option<&str>, requested: &[FormId], provider: &P) -> Resolved<F>
    where
        P: FieldProvider<F> + ?Sized,
    {
        let stored = token.and_then(|token| self.take(token));
        resolve_forms(stored, requested, provider)
    }

    /// Remove every entry whose expiry is not after now.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        self.inner.sweep()
    }

    /// Whether a live or not-yet-swept entry exists for `token`
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.inner.read().contains_key(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl<F: Send + Sync + 'static> SessionCache<F> {
    /// Create a cache from settings and start its background sweeper.
    ///
    /// The sweeper runs every `sweep_interval_seconds` for as long as any
    /// clone of the returned cache is alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are out of range or no Tokio runtime
    /// is running.
    pub fn spawn(settings: &SessionSettings) -> Result<Self, FlashError> {
        settings.validate()?;
        let cache = Self::with_parts(
            settings.ttl(),
            Arc::new(SystemClock),
            Arc::new(RandomTokenSource),
        );
        cache.start_sweeper(settings.sweep_interval())?;
        Ok(cache)
    }

    /// Start a background task sweeping this cache every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if `interval` is zero or no Tokio runtime is running.
    pub fn start_sweeper(&self, interval: std::time::Duration) -> Result<(), FlashError> {
        if interval.is_zero() {
            return Err(FlashError::Settings(
                "sweep interval must be positive".to_string(),
            ));
        }
        let handle = tokio::runtime::Handle::try_current().map_err(|_| FlashError::NoRuntime)?;
        handle.spawn(sweeper::run(Arc::downgrade(&self.inner), interval));
        info!(
            "Form session sweeper started (interval {}s, ttl {}s)",
            interval.as_secs(),
            self.inner.ttl.num_seconds()
        );
        Ok(())
    }
}
