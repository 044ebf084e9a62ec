//! Credential cookie handling
//!
//! The session token travels in an HttpOnly, `SameSite=Lax` cookie (named
//! `token` by default). This module builds the `Set-Cookie` values for
//! login/logout and reads the token back out of a request's `Cookie` header.

use axum::http::{header, HeaderMap, HeaderValue};

/// Name of the cookie carrying the identity token
pub const TOKEN_COOKIE: &str = "token";

/// Attributes of the credential cookie
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub path: String,
    /// Only set when tokens expire; otherwise the cookie lives for the browser session
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: TOKEN_COOKIE.to_string(),
            secure: false,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// `Set-Cookie` value carrying `value`. Always HttpOnly.
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}; HttpOnly", self.name, value);

        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite=Lax; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// `Set-Cookie` value that makes the browser drop the cookie
    pub fn build_clear_cookie(&self) -> String {
        format!(
            "{}=; HttpOnly; SameSite=Lax; Path={}; Max-Age=0",
            self.name, self.path
        )
    }

    /// Header value for [`Self::build_set_cookie`]
    ///
    /// JWTs are base64url segments, so the only way this fails is a caller
    /// passing a value with control characters; that yields `None`.
    pub fn set_cookie_header(&self, value: &str) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(value)).ok()
    }

    /// Header value for [`Self::build_clear_cookie`]
    pub fn clear_cookie_header(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_clear_cookie()).ok()
    }
}

/// Extract a cookie value from request headers
///
/// Looks through every `Cookie` header. A value wrapped in double quotes
/// (allowed by RFC 6265) is unwrapped. Empty values count as absent.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            if key.trim() != name {
                return None;
            }

            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);

            (!value.is_empty()).then(|| value.to_string())
        })
}
