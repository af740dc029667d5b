use actix_web::cookie::Cookie;
use actix_web::HttpRequest;
use log::debug;

use crate::error::FlashError;
use crate::models::{Form, FormId};
use crate::session::cache::SessionCache;
use crate::session::cookie::SessionCookies;
use crate::session::resolve::{FieldProvider, Resolved};
use crate::settings::FlashSettings;

/// Forms restored for a request plus the cookie that ends the session
#[derive(Debug)]
pub struct Restored<F> {
    pub resolved: Resolved<F>,
    pub clear_cookie: Cookie<'static>,
}

/// Session cache bound to its cookie transport
pub struct SessionManager<F> {
    cache: SessionCache<F>,
    cookies: SessionCookies,
}

impl<F> Clone for SessionManager<F> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            cookies: self.cookies.clone(),
        }
    }
}

impl<F> SessionManager<F> {
    #[must_use]
    pub fn new(cache: SessionCache<F>, cookies: SessionCookies) -> Self {
        Self { cache, cookies }
    }

    #[must_use]
    pub fn cache(&self) -> &SessionCache<F> {
        &self.cache
    }

    #[must_use]
    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    /// Store a submission and return the cookie to send with the redirect
    pub fn stash(&self, form: Form<F>) -> Cookie<'static> {
        let token = self.cache.store(form);
        self.cookies.session_cookie(&token)
    }

    /// Consume the request's session, if any, and resolve `requested`.
    ///
    /// The returned clearing cookie must be sent whatever the outcome: the
    /// token is spent after one use.
    pub fn restore<P>(&self, req: &HttpRequest, requested: &[FormId], provider: &P) -> Restored<F>
    where
        P: FieldProvider<F> + ?Sized,
    {
        let token = self.cookies.token_from_request(req);
        if token.is_none() {
            debug!("No form session cookie on {}", req.path());
        }

        Restored {
            resolved: self.cache.retrieve(token.as_deref(), requested, provider),
            clear_cookie: self.cookies.expired_cookie(),
        }
    }
}

impl<F: Send + Sync + 'static> SessionManager<F> {
    /// Build a manager from settings and start the cache's sweeper
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or no Tokio runtime is
    /// running.
    pub fn from_settings(settings: &FlashSettings) -> Result<Self, FlashError> {
        let cache = SessionCache::spawn(&settings.session)?;
        Ok(Self::new(cache, SessionCookies::from_settings(settings)))
    }
}
