use bytes::Bytes;

use crate::headers::{HttpHeaders, CONTENT_LENGTH};

use super::{response::OperationResponse, status::OperationStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct OperationResponseFactory;

impl OperationResponseFactory {
    pub fn create(
        &self,
        status: OperationStatus,
        headers: HttpHeaders,
        content: impl Into<Bytes>,
    ) -> OperationResponse {
        OperationResponse::new(status, headers, content.into())
    }

    /// Copies `original` with new content. A `Content-Length` header that
    /// was present is rewritten to match; an absent one is not added.
    pub fn create_from_content(
        &self,
        original: &OperationResponse,
        new_content: impl Into<Bytes>,
    ) -> OperationResponse {
        let content = new_content.into();
        let mut headers = original.headers().clone();
        if headers.contains(CONTENT_LENGTH) {
            headers.set(CONTENT_LENGTH, vec![content.len().to_string()]);
        }
        OperationResponse::new(original.status(), headers, content)
    }

    pub fn create_from_headers(
        &self,
        original: &OperationResponse,
        new_headers: HttpHeaders,
    ) -> OperationResponse {
        OperationResponse::new(
            original.status(),
            new_headers,
            Bytes::copy_from_slice(original.content()),
        )
    }
}
