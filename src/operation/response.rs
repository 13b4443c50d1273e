use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

use crate::cookie::ResponseCookie;
use crate::headers::{HttpHeaders, SET_COOKIE};
use crate::media_type::{MediaType, MediaTypeError};

use super::status::OperationStatus;

/// The response side of a documented operation. Built once per conversion
/// and never mutated afterwards; use
/// [`OperationResponseFactory`](super::OperationResponseFactory) to derive
/// modified copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResponse {
    status: OperationStatus,
    headers: HttpHeaders,
    content: Bytes,
}

impl OperationResponse {
    pub(super) fn new(status: OperationStatus, headers: HttpHeaders, content: Bytes) -> Self {
        Self {
            status,
            headers,
            content,
        }
    }

    pub fn status(&self) -> OperationStatus {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_type(&self) -> Result<Option<MediaType>, MediaTypeError> {
        self.headers.content_type()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.headers.content_length()
    }

    /// Decodes the content with the `Content-Type` charset, falling back
    /// to UTF-8. Invalid sequences are replaced.
    pub fn content_as_string(&self) -> String {
        let encoding = self
            .content_type()
            .ok()
            .flatten()
            .and_then(|media_type| {
                media_type
                    .charset()
                    .and_then(|charset| Encoding::for_label(charset.as_bytes()))
            })
            .unwrap_or(UTF_8);
        let (decoded, _) = encoding.decode_without_bom_handling(&self.content);
        decoded.into_owned()
    }

    pub fn cookies(&self) -> Vec<ResponseCookie> {
        self.headers
            .get(SET_COOKIE)
            .unwrap_or_default()
            .iter()
            .filter_map(|line| match ResponseCookie::parse(line) {
                Ok(cookie) => Some(cookie),
                Err(err) => {
                    debug!(%err, "skipping unparsable Set-Cookie header");
                    None
                }
            })
            .collect()
    }
}
