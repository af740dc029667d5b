use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::HttpRequest;
use log::debug;

use crate::settings::FlashSettings;

/// Default name of the form session cookie
pub const COOKIE_NAME: &str = "s";

/// Options for cookie creation
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Duration,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age: Duration::seconds(120),
        }
    }
}

/// Builds and reads the cookie that carries a form session token
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    secure: bool,
    max_age_seconds: i64,
}

impl Default for SessionCookies {
    fn default() -> Self {
        Self::new(COOKIE_NAME, false, 120)
    }
}

impl SessionCookies {
    #[must_use]
    pub fn new(name: &str, secure: bool, max_age_seconds: i64) -> Self {
        Self {
            name: name.to_string(),
            secure,
            max_age_seconds,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &FlashSettings) -> Self {
        Self::new(
            &settings.session.cookie_name,
            settings.cookies.secure,
            settings.session.ttl().num_seconds(),
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, value: String, options: CookieOptions) -> Cookie<'static> {
        Cookie::build(self.name.clone(), value)
            .http_only(options.http_only)
            .secure(options.secure)
            .same_site(options.same_site)
            .path(options.path)
            .max_age(options.max_age)
            .finish()
    }

    /// Cookie handing `token` to the client for one session lifetime
    #[must_use]
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        self.build(
            token.to_string(),
            CookieOptions {
                secure: self.secure,
                max_age: Duration::seconds(self.max_age_seconds),
                ..Default::default()
            },
        )
    }

    /// Cookie instructing the client to drop its session token
    #[must_use]
    pub fn expired_cookie(&self) -> Cookie<'static> {
        self.build(
            String::new(),
            CookieOptions {
                secure: self.secure,
                max_age: Duration::seconds(-1),
                ..Default::default()
            },
        )
    }

    /// Session token sent with the request.
    ///
    /// A missing cookie, an unreadable cookie header and an empty value all
    /// count as no token. The raw header is read because actix percent-decodes
    /// cookie values and `%` is a valid token character.
    #[must_use]
    pub fn token_from_request(&self, req: &HttpRequest) -> Option<String> {
        let token = req
            .headers()
            .get_all(header::COOKIE)
            .filter_map(|value| value.to_str().ok())
            .find_map(|raw| self.token_from_header(raw))?;

        if token.is_empty() {
            debug!("Ignoring empty '{}' cookie", self.name);
            return None;
        }
        Some(token.to_string())
    }

    fn token_from_header<'a>(&self, raw: &'a str) -> Option<&'a str> {
        raw.split(';').find_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            (name.trim() == self.name).then_some(value)
        })
    }
}
