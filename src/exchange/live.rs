use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::headers::HttpHeaders;

use super::{CapturedExchange, ExchangeRequest};

pub struct LiveExchange {
    pub exchange: CapturedExchange,
    pub duration_ms: f64,
}

/// Sends exchanges over the network and buffers each response completely.
#[derive(Debug, Clone, Default)]
pub struct LiveClient {
    client: Client,
}

impl LiveClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn execute(&self, request: ExchangeRequest) -> Result<LiveExchange> {
        let mut request_builder = self
            .client
            .request(request.method.clone(), request.url.as_str());

        for (name, value) in &request.headers {
            request_builder = request_builder.header(name, value);
        }
        if let Some(body) = &request.body {
            request_builder = request_builder.body(body.clone());
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let start = Instant::now();
        let response = request_builder
            .send()
            .await
            .with_context(|| format!("sending {} {}", request.method, request.url))?;

        let status = response.status();
        let headers = HttpHeaders::from(response.headers());
        let body = response
            .bytes()
            .await
            .with_context(|| format!("reading response body from {}", request.url))?;
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            bytes = body.len(),
            "captured response"
        );

        Ok(LiveExchange {
            exchange: CapturedExchange::from_parts(request, status, headers, body),
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{ExchangeResult, RawStatusCode};
    use httpmock::prelude::*;

    #[tokio::test]
    async fn execute_buffers_status_headers_and_body() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/widgets").header("x-token", "abc");
                then.status(210)
                    .header("content-type", "application/json")
                    .header("set-cookie", "session=1; HttpOnly")
                    .body("{\"ok\":true}");
            })
            .await;

        let request = ExchangeRequest::new(http::Method::POST, server.url("/widgets"))
            .header("x-token", "abc")
            .body("{}");
        let live = LiveClient::new().execute(request).await?;

        mock.assert_async().await;
        assert_eq!(live.exchange.raw_status_code(), 210);
        assert_eq!(live.exchange.response_body(), b"{\"ok\":true}");
        assert_eq!(
            live.exchange.response_headers().first("Content-Type"),
            Some("application/json")
        );
        assert_eq!(live.exchange.response_cookies().len(), 1);
        assert!(live.duration_ms >= 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn execute_reports_connection_errors() {
        let request = ExchangeRequest::get("http://127.0.0.1:9/unreachable");
        let err = LiveClient::new().execute(request).await.err().unwrap();
        assert!(err.to_string().contains("sending GET"));
    }
}
