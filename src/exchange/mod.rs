mod captured;
pub mod in_memory;
#[cfg(feature = "cli")]
pub mod live;

pub use captured::{CapturedExchange, ExchangeRequest};

use http::StatusCode;

use crate::cookie::ResponseCookie;
use crate::headers::HttpHeaders;

/// Read-only view of a finished exchange. Implementations must be fully
/// buffered: the body is available in full and nothing is pending.
pub trait ExchangeResult {
    fn status(&self) -> StatusCode;
    fn response_headers(&self) -> &HttpHeaders;
    fn response_cookies(&self) -> &[ResponseCookie];
    fn response_body(&self) -> &[u8];
}

/// An exchange result that also exposes the status as sent on the wire,
/// including codes outside the registered set.
pub trait RawStatusCode {
    fn raw_status_code(&self) -> u16;
}
