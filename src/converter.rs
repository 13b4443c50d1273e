use std::marker::PhantomData;

use bytes::Bytes;
use tracing::debug;

use crate::cookie::ResponseCookie;
use crate::exchange::{ExchangeResult, RawStatusCode};
use crate::headers::{HttpHeaders, SET_COOKIE};
use crate::operation::{OperationResponse, OperationResponseFactory, OperationStatus};

pub trait StatusBinding<R: ?Sized> {
    fn status_of(result: &R) -> OperationStatus;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStatusBinding;

#[derive(Debug, Clone, Copy, Default)]
pub struct RawStatusBinding;

impl<R: ExchangeResult + ?Sized> StatusBinding<R> for StandardStatusBinding {
    fn status_of(result: &R) -> OperationStatus {
        OperationStatus::from_status(result.status())
    }
}

impl<R: ExchangeResult + RawStatusCode + ?Sized> StatusBinding<R> for RawStatusBinding {
    fn status_of(result: &R) -> OperationStatus {
        OperationStatus::from_code(result.raw_status_code())
    }
}

/// Turns a finished exchange into an [`OperationResponse`], reading the
/// status through the binding `B`.
///
/// ```
/// use restcapture::converter::ResponseConverter;
/// use restcapture::exchange::in_memory::{InMemoryClient, Router, ServerResponse};
///
/// let client = InMemoryClient::bind(
///     Router::new().get("/foo", |_| ServerResponse::status(210).build()),
/// );
/// let exchange = client.get("/foo").unwrap();
/// let response = ResponseConverter::raw().convert(&exchange);
/// assert_eq!(response.status_code(), 210);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseConverter<B = RawStatusBinding> {
    factory: OperationResponseFactory,
    binding: PhantomData<B>,
}

impl ResponseConverter<StandardStatusBinding> {
    pub fn standard() -> Self {
        Self::bound()
    }
}

impl ResponseConverter<RawStatusBinding> {
    pub fn raw() -> Self {
        Self::bound()
    }
}

impl<B> ResponseConverter<B> {
    pub fn bound() -> Self {
        Self {
            factory: OperationResponseFactory,
            binding: PhantomData,
        }
    }

    pub fn convert<R>(&self, result: &R) -> OperationResponse
    where
        R: ExchangeResult + ?Sized,
        B: StatusBinding<R>,
    {
        let status = B::status_of(result);
        let headers = extract_headers(result);
        debug!(
            status = status.code(),
            headers = headers.len(),
            bytes = result.response_body().len(),
            "converted exchange result"
        );
        self.factory.create(
            status,
            headers,
            Bytes::copy_from_slice(result.response_body()),
        )
    }
}

fn extract_headers<R: ExchangeResult + ?Sized>(result: &R) -> HttpHeaders {
    let headers = result.response_headers();
    let cookies = result.response_cookies();
    if cookies.is_empty() || headers.contains(SET_COOKIE) {
        return headers.clone();
    }

    let mut with_cookies = headers.clone();
    for cookie in cookies {
        with_cookies.add(SET_COOKIE, set_cookie_header(cookie));
    }
    with_cookies
}

fn set_cookie_header(cookie: &ResponseCookie) -> String {
    let mut header = format!("{}={}", cookie.name, cookie.value);
    if let Some(max_age) = cookie.max_age {
        header.push_str(&format!("; Max-Age={}", max_age));
    }
    if let Some(domain) = &cookie.domain {
        header.push_str(&format!("; Domain={}", domain));
    }
    if let Some(path) = &cookie.path {
        header.push_str(&format!("; Path={}", path));
    }
    if cookie.secure {
        header.push_str("; Secure");
    }
    if cookie.http_only {
        header.push_str("; HttpOnly");
    }
    header
}
