use bytes::Bytes;
use http::{Method, Response, StatusCode};
use tracing::warn;

use crate::cookie::ResponseCookie;
use crate::headers::{HttpHeaders, SET_COOKIE};

use super::{ExchangeResult, RawStatusCode};

#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl ExchangeRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A finished exchange with its response fully buffered.
#[derive(Debug, Clone)]
pub struct CapturedExchange {
    request: ExchangeRequest,
    status: StatusCode,
    headers: HttpHeaders,
    cookies: Vec<ResponseCookie>,
    body: Bytes,
}

impl CapturedExchange {
    pub fn from_parts(
        request: ExchangeRequest,
        status: StatusCode,
        headers: HttpHeaders,
        body: Bytes,
    ) -> Self {
        let cookies = parse_cookies(&headers);
        Self {
            request,
            status,
            headers,
            cookies,
            body,
        }
    }

    pub fn from_response(request: ExchangeRequest, response: Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self::from_parts(request, parts.status, HttpHeaders::from(&parts.headers), body)
    }

    pub fn request(&self) -> &ExchangeRequest {
        &self.request
    }
}

fn parse_cookies(headers: &HttpHeaders) -> Vec<ResponseCookie> {
    let mut cookies = Vec::new();
    for line in headers.get(SET_COOKIE).unwrap_or_default() {
        match ResponseCookie::parse(line) {
            Ok(cookie) => cookies.push(cookie),
            Err(err) => warn!(%err, "ignoring malformed Set-Cookie header"),
        }
    }
    cookies
}

impl ExchangeResult for CapturedExchange {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn response_headers(&self) -> &HttpHeaders {
        &self.headers
    }

    fn response_cookies(&self) -> &[ResponseCookie] {
        &self.cookies
    }

    fn response_body(&self) -> &[u8] {
        &self.body
    }
}

impl RawStatusCode for CapturedExchange {
    fn raw_status_code(&self) -> u16 {
        self.status.as_u16()
    }
}
