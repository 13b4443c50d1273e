use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[!#$%&'*+\-.^_`|~0-9A-Za-z]+$").expect("valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("media type must not be empty")]
    Empty,
    #[error("media type '{0}' has no subtype")]
    MissingSubtype(String),
    #[error("invalid token '{0}' in media type")]
    InvalidToken(String),
    #[error("invalid media type parameter '{0}'")]
    InvalidParameter(String),
}

/// A parsed `Content-Type` style value such as `text/plain;charset=UTF-8`.
#[derive(Debug, Clone)]
pub struct MediaType {
    type_: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    pub fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn text_plain_utf8() -> Self {
        Self::new("text", "plain").with_parameter("charset", "UTF-8")
    }

    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.parameters.push((name.to_string(), value.to_string()));
        self
    }

    pub fn parse(value: &str) -> Result<Self, MediaTypeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let mut segments = split_segments(trimmed).into_iter();
        let full_type = segments.next().unwrap_or_default().trim();
        let (type_, subtype) = full_type
            .split_once('/')
            .ok_or_else(|| MediaTypeError::MissingSubtype(full_type.to_string()))?;
        let (type_, subtype) = (type_.trim(), subtype.trim());
        if subtype.is_empty() {
            return Err(MediaTypeError::MissingSubtype(full_type.to_string()));
        }
        for token in [type_, subtype] {
            if !TOKEN_PATTERN.is_match(token) {
                return Err(MediaTypeError::InvalidToken(token.to_string()));
            }
        }

        let mut parameters = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, raw_value) = segment
                .split_once('=')
                .ok_or_else(|| MediaTypeError::InvalidParameter(segment.to_string()))?;
            let name = name.trim();
            if !TOKEN_PATTERN.is_match(name) {
                return Err(MediaTypeError::InvalidParameter(segment.to_string()));
            }
            parameters.push((name.to_string(), unquote(raw_value.trim())));
        }

        Ok(Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
            parameters,
        })
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn essence(&self) -> String {
        format!(
            "{}/{}",
            self.type_.to_ascii_lowercase(),
            self.subtype.to_ascii_lowercase()
        )
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }
}

/// Splits on `;` outside of quoted strings.
fn split_segments(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (index, ch) in value.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                segments.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(&value[start..]);
    segments
}

fn unquote(value: &str) -> String {
    if value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') {
        return value.to_string();
    }
    let mut unquoted = String::with_capacity(value.len() - 2);
    let mut chars = value[1..value.len() - 1].chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => unquoted.extend(chars.next()),
            _ => unquoted.push(ch),
        }
    }
    unquoted
}

fn write_parameter_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if TOKEN_PATTERN.is_match(value) {
        return f.write_str(value);
    }
    f.write_str("\"")?;
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", ch)?;
    }
    f.write_str("\"")
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        if !self.type_.eq_ignore_ascii_case(&other.type_)
            || !self.subtype.eq_ignore_ascii_case(&other.subtype)
            || self.parameters.len() != other.parameters.len()
        {
            return false;
        }
        self.parameters.iter().all(|(name, value)| {
            match other.parameter(name) {
                // charset names are case-insensitive, other values are not
                Some(theirs) if name.eq_ignore_ascii_case("charset") => {
                    theirs.eq_ignore_ascii_case(value)
                }
                Some(theirs) => theirs == value,
                None => false,
            }
        })
    }
}

impl Eq for MediaType {}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, ";{}=", name)?;
            write_parameter_value(f, value)?;
        }
        Ok(())
    }
}
