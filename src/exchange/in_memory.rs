use anyhow::{Context, Result};
use bytes::Bytes;
use http::{
    header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, SET_COOKIE},
    Method, Request, Response, StatusCode,
};
use tracing::debug;
use url::Url;

use crate::cookie::ResponseCookie;
use crate::media_type::MediaType;

use super::{CapturedExchange, ExchangeRequest};

type Handler = Box<dyn Fn(&Request<Bytes>) -> Result<Response<Bytes>> + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Exact `(method, path)` routes; anything else is answered with an empty 404.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<F>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(&Request<Bytes>) -> Result<Response<Bytes>> + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(handler),
        });
        self
    }

    pub fn get<F>(self, path: &str, handler: F) -> Self
    where
        F: Fn(&Request<Bytes>) -> Result<Response<Bytes>> + Send + Sync + 'static,
    {
        self.route(Method::GET, path, handler)
    }

    fn dispatch(&self, request: &Request<Bytes>) -> Result<Response<Bytes>> {
        let path = request.uri().path();
        match self
            .routes
            .iter()
            .find(|route| route.method == request.method() && route.path == path)
        {
            Some(route) => (route.handler)(request),
            None => {
                debug!(method = %request.method(), path, "no route matched");
                let mut response = Response::new(Bytes::new());
                *response.status_mut() = StatusCode::NOT_FOUND;
                Ok(response)
            }
        }
    }
}

pub struct InMemoryClient {
    router: Router,
    base_url: Url,
}

impl InMemoryClient {
    pub fn bind(router: Router) -> Self {
        Self {
            router,
            base_url: Url::parse("http://localhost/").expect("valid default base url"),
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url =
            Url::parse(base_url).with_context(|| format!("invalid base url {base_url}"))?;
        Ok(self)
    }

    pub fn get(&self, path: &str) -> Result<CapturedExchange> {
        self.exchange(ExchangeRequest::get(path))
    }

    pub fn exchange(&self, request: ExchangeRequest) -> Result<CapturedExchange> {
        let url = self
            .base_url
            .join(&request.url)
            .with_context(|| format!("resolving {} against {}", request.url, self.base_url))?;

        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let http_request = builder
            .body(request.body.clone().unwrap_or_default())
            .with_context(|| format!("building request for {url}"))?;

        let mut response = self
            .router
            .dispatch(&http_request)
            .with_context(|| format!("handling {} {}", request.method, url))?;

        if !response.body().is_empty() && !response.headers().contains_key(CONTENT_LENGTH) {
            let length = HeaderValue::from(response.body().len());
            response.headers_mut().insert(CONTENT_LENGTH, length);
        }

        debug!(method = %request.method, %url, status = response.status().as_u16(), "in-memory exchange finished");

        Ok(CapturedExchange::from_response(
            ExchangeRequest {
                url: url.to_string(),
                ..request
            },
            response,
        ))
    }
}

/// Builds handler responses.
#[derive(Debug, Clone)]
pub struct ServerResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ServerResponse {
    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn status(code: u16) -> Self {
        Self {
            status: code,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn cookie(self, cookie: &ResponseCookie) -> Self {
        let line = cookie.to_string();
        self.header(SET_COOKIE.as_str(), &line)
    }

    pub fn body_text(mut self, text: &str) -> Self {
        if !self
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
        {
            self.headers.push((
                CONTENT_TYPE.as_str().to_string(),
                MediaType::text_plain_utf8().to_string(),
            ));
        }
        self.body = Bytes::copy_from_slice(text.as_bytes());
        self
    }

    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Response<Bytes>> {
        let status = StatusCode::from_u16(self.status)
            .with_context(|| format!("invalid status code {}", self.status))?;
        let mut response = Response::new(self.body);
        *response.status_mut() = status;
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name {name}"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header {name}"))?;
            response.headers_mut().append(name, value);
        }
        Ok(response)
    }
}
