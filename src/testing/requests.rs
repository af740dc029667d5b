//! HTTP request builders for testing handlers
//!
//! Cookies are written into a raw `Cookie` header so token characters reach
//! the handler exactly as a browser would send them.

use actix_web::cookie::Cookie;
use actix_web::http::header::{self, HeaderMap};
use actix_web::http::Method;
use actix_web::{test, HttpRequest};

/// Builder for creating HTTP requests for testing
pub struct RequestBuilder {
    method: Method,
    uri: String,
    cookies: Vec<(String, String)>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            method: Method::GET,
            uri: "/".to_string(),
            cookies: Vec::new(),
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.to_string();
        self
    }

    /// Add a cookie sent verbatim
    #[must_use]
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push((name.to_string(), value.to_string()));
        self
    }

    /// Raw `Cookie` header value for the configured cookies
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Build an actix test request
    #[must_use]
    pub fn to_test_request(&self) -> test::TestRequest {
        let mut req = test::TestRequest::default()
            .method(self.method.clone())
            .uri(&self.uri);
        if let Some(raw) = self.cookie_header() {
            req = req.insert_header((header::COOKIE, raw));
        }
        req
    }

    #[must_use]
    pub fn build(&self) -> HttpRequest {
        self.to_test_request().to_http_request()
    }

    /// Request carrying the session cookie a previous response set
    #[must_use]
    pub fn with_session_cookie(cookie: &Cookie<'_>) -> HttpRequest {
        Self::new().cookie(cookie.name(), cookie.value()).build()
    }

    /// Request with no headers
    #[must_use]
    pub fn empty() -> HttpRequest {
        Self::new().build()
    }
}

/// Raw values of every `Set-Cookie` header named `name`, in order.
///
/// Values are cut at the first `;` without trimming or percent-decoding, so
/// tokens starting or ending with a space survive.
#[must_use]
pub fn set_cookie_values(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| {
            let pair = raw.split(';').next()?;
            let (cookie_name, value) = pair.split_once('=')?;
            (cookie_name == name).then(|| value.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::prelude::v1::test;

    #[test]
    fn test_cookie_header_joins_cookies() {
        let builder = RequestBuilder::new().cookie("a", "1").cookie("s", "x%y");
        assert_eq!(builder.cookie_header().as_deref(), Some("a=1; s=x%y"));
        assert_eq!(RequestBuilder::new().cookie_header(), None);
    }

    #[test]
    fn test_set_cookie_values_keep_spaces() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            header::HeaderValue::from_static("s= a%41 ; HttpOnly; Max-Age=120"),
        );
        headers.append(
            header::SET_COOKIE,
            header::HeaderValue::from_static("other=1"),
        );
        assert_eq!(set_cookie_values(&headers, "s"), vec![" a%41 ".to_string()]);
    }

    #[test]
    fn test_build_sets_method_and_uri() {
        let req = RequestBuilder::new()
            .method(Method::POST)
            .uri("/contact")
            .build();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.path(), "/contact");
    }
}
