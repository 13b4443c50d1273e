use http::HeaderMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::media_type::{MediaType, MediaTypeError};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const SET_COOKIE: &str = "Set-Cookie";

/// Ordered, case-insensitive header mapping where every key holds all of
/// its values in arrival order.
#[derive(Debug, Clone, Default)]
pub struct HttpHeaders {
    entries: Vec<(String, Vec<String>)>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(index) => self.entries[index].1.push(value.into()),
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    /// Replaces every value of `name`; an empty `values` removes the header.
    pub fn set(&mut self, name: &str, values: Vec<String>) {
        if values.is_empty() {
            self.remove(name);
            return;
        }
        match self.position(name) {
            Some(index) => self.entries[index].1 = values,
            None => self.entries.push((name.to_string(), values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name)
            .map(|index| self.entries[index].1.as_slice())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name)
            .map(|index| self.entries.remove(index).1)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn content_type(&self) -> Result<Option<MediaType>, MediaTypeError> {
        self.first(CONTENT_TYPE).map(MediaType::parse).transpose()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.first(CONTENT_LENGTH)
            .and_then(|value| value.trim().parse().ok())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}

impl PartialEq for HttpHeaders {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(name, values)| other.get(name) == Some(values.as_slice()))
    }
}

impl Eq for HttpHeaders {}

impl From<&HeaderMap> for HttpHeaders {
    fn from(map: &HeaderMap) -> Self {
        let mut headers = HttpHeaders::new();
        for name in map.keys() {
            let canonical = canonical_header_name(name.as_str());
            for value in map.get_all(name) {
                headers.add(
                    &canonical,
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                );
            }
        }
        headers
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for HttpHeaders {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut headers = HttpHeaders::new();
        for (name, value) in iter {
            headers.add(name, value);
        }
        headers
    }
}

impl Serialize for HttpHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

const IRREGULAR_NAMES: &[&str] = &[
    "ETag",
    "WWW-Authenticate",
    "Content-MD5",
    "DNT",
    "TE",
    "X-XSS-Protection",
];

/// `content-type` -> `Content-Type`
pub fn canonical_header_name(name: &str) -> String {
    if let Some(irregular) = IRREGULAR_NAMES
        .iter()
        .find(|irregular| irregular.eq_ignore_ascii_case(name))
    {
        return irregular.to_string();
    }
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, SET_COOKIE as SET_COOKIE_NAME};

    #[test]
    fn add_keeps_every_value_for_repeated_names() {
        let mut headers = HttpHeaders::new();
        headers.add("Set-Cookie", "a=1");
        headers.add("set-cookie", "b=2");
        headers.add("X-Trace", "abc");

        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get("SET-COOKIE"),
            Some(&["a=1".to_string(), "b=2".to_string()][..])
        );
        assert_eq!(headers.iter().next().map(|(name, _)| name), Some("Set-Cookie"));
    }

    #[test]
    fn set_and_remove_replace_whole_entries() {
        let mut headers: HttpHeaders = [("Accept", "text/html"), ("Accept", "*/*")]
            .into_iter()
            .collect();
        headers.set("accept", vec!["application/json".to_string()]);
        assert_eq!(headers.first("Accept"), Some("application/json"));

        assert_eq!(
            headers.remove("ACCEPT"),
            Some(vec!["application/json".to_string()])
        );
        assert!(headers.is_empty());
        assert!(!headers.contains("Accept"));
    }

    #[test]
    fn set_with_no_values_removes_the_header() {
        let mut headers: HttpHeaders = [("Set-Cookie", "a=1"), ("X-Trace", "abc")]
            .into_iter()
            .collect();
        headers.set("set-cookie", Vec::new());
        assert!(!headers.contains(SET_COOKIE));
        assert_eq!(headers.len(), 1);

        headers.set("X-Absent", Vec::new());
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn derives_content_type_and_length() {
        let headers: HttpHeaders = [
            ("content-type", "text/plain;charset=UTF-8"),
            ("content-length", "13"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            headers.content_type().unwrap(),
            Some(MediaType::text_plain_utf8())
        );
        assert_eq!(headers.content_length(), Some(13));
    }

    #[test]
    fn missing_or_invalid_derived_values() {
        let headers: HttpHeaders = [("Content-Length", "thirteen")].into_iter().collect();
        assert_eq!(headers.content_length(), None);
        assert_eq!(headers.content_type().unwrap(), None);

        let bad: HttpHeaders = [("Content-Type", "nonsense")].into_iter().collect();
        assert!(bad.content_type().is_err());
    }

    #[test]
    fn equality_ignores_name_case_and_order() {
        let a: HttpHeaders = [("A", "1"), ("B", "2")].into_iter().collect();
        let b: HttpHeaders = [("b", "2"), ("a", "1")].into_iter().collect();
        let c: HttpHeaders = [("a", "1"), ("b", "3")].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn from_header_map_preserves_all_values() {
        let mut map = HeaderMap::new();
        map.append(SET_COOKIE_NAME, HeaderValue::from_static("a=1"));
        map.append(SET_COOKIE_NAME, HeaderValue::from_static("b=2"));
        map.insert("x-request-id", HeaderValue::from_static("42"));

        let headers = HttpHeaders::from(&map);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get(SET_COOKIE).map(|v| v.len()), Some(2));
        assert!(headers.iter().any(|(name, _)| name == "X-Request-Id"));
    }

    #[test]
    fn canonical_header_name_title_cases_segments() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_header_name("etag"), "ETag");
        assert_eq!(canonical_header_name("www-authenticate"), "WWW-Authenticate");
        assert_eq!(canonical_header_name("x--y"), "X--Y");
    }
}
