use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieParseError {
    #[error("Set-Cookie value '{0}' has no name=value pair")]
    MissingPair(String),
    #[error("Set-Cookie value '{0}' has an empty name")]
    EmptyName(String),
    #[error("unknown SameSite value '{0}'")]
    UnknownSameSite(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        f.write_str(label)
    }
}

impl FromStr for SameSite {
    type Err = CookieParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(CookieParseError::UnknownSameSite(other.to_string())),
        }
    }
}

/// A cookie as set by a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    /// Seconds; `None` for a session cookie.
    pub max_age: Option<i64>,
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl ResponseCookie {
    pub fn from(name: &str, value: &str) -> ResponseCookieBuilder {
        ResponseCookieBuilder {
            cookie: ResponseCookie {
                name: name.to_string(),
                value: value.to_string(),
                domain: None,
                path: None,
                max_age: None,
                expires: None,
                secure: false,
                http_only: false,
                same_site: None,
            },
        }
    }

    /// Reads a `Set-Cookie` header value. Unknown attributes and attribute
    /// values that cannot be interpreted are ignored.
    pub fn parse(header: &str) -> Result<Self, CookieParseError> {
        let mut parts = header.split(';');
        let pair = parts.next().unwrap_or_default().trim();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| CookieParseError::MissingPair(header.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CookieParseError::EmptyName(header.to_string()));
        }

        let mut builder = ResponseCookie::from(name, value.trim());
        for attribute in parts {
            let attribute = attribute.trim();
            let (key, raw) = match attribute.split_once('=') {
                Some((key, raw)) => (key.trim(), Some(raw.trim())),
                None => (attribute, None),
            };
            match (key.to_ascii_lowercase().as_str(), raw) {
                ("domain", Some(domain)) if !domain.is_empty() => {
                    builder.cookie.domain = Some(domain.to_string());
                }
                ("path", Some(path)) if !path.is_empty() => {
                    builder.cookie.path = Some(path.to_string());
                }
                ("max-age", Some(seconds)) => {
                    builder.cookie.max_age = seconds.parse::<i64>().ok().filter(|s| *s >= 0);
                }
                ("expires", Some(date)) => {
                    builder.cookie.expires = DateTime::parse_from_rfc2822(date)
                        .ok()
                        .map(|parsed| parsed.with_timezone(&Utc));
                }
                ("secure", _) => builder.cookie.secure = true,
                ("httponly", _) => builder.cookie.http_only = true,
                ("samesite", Some(mode)) => builder.cookie.same_site = mode.parse().ok(),
                _ => {}
            }
        }

        Ok(builder.cookie)
    }
}

impl fmt::Display for ResponseCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(path) = &self.path {
            write!(f, "; Path={}", path)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain)?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires.format(EXPIRES_FORMAT))?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if let Some(same_site) = &self.same_site {
            write!(f, "; SameSite={}", same_site)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ResponseCookieBuilder {
    cookie: ResponseCookie,
}

impl ResponseCookieBuilder {
    pub fn domain(mut self, domain: &str) -> Self {
        self.cookie.domain = Some(domain.to_string());
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.cookie.path = Some(path.to_string());
        self
    }

    /// A negative value leaves the cookie without a max age.
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.cookie.max_age = (seconds >= 0).then_some(seconds);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.cookie.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.cookie.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.cookie.same_site = Some(same_site);
        self
    }

    pub fn build(mut self) -> ResponseCookie {
        if let Some(seconds) = self.cookie.max_age {
            self.cookie.expires = Some(if seconds > 0 {
                // ages past chrono's range saturate at the latest instant
                TimeDelta::try_seconds(seconds)
                    .and_then(|age| Utc::now().checked_add_signed(age))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
            } else {
                DateTime::<Utc>::UNIX_EPOCH
            });
        }
        self.cookie
    }
}
