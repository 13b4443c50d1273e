use anyhow::{anyhow, Context, Result};
use tracing::debug;
use url::Url;

use crate::converter::ResponseConverter;
use crate::exchange::live::LiveClient;
use crate::exchange::ExchangeRequest;

use super::{
    models::{CaptureOptions, CaptureResult, RequestSummary},
    writer::{create_preview, record_name_for, write_capture_record, CaptureRecord},
};

pub async fn capture_request(
    request: ExchangeRequest,
    options: CaptureOptions<'_>,
) -> Result<CaptureResult> {
    let request = apply_settings(request, &options)?;
    let summary = RequestSummary {
        method: request.method.to_string(),
        url: request.url.clone(),
        body_bytes: request.body.as_ref().map(|body| body.len()),
    };

    let live = LiveClient::new().execute(request).await?;
    let response = ResponseConverter::raw().convert(&live.exchange);

    let record_name = options
        .record_name
        .clone()
        .unwrap_or_else(|| record_name_for(&summary.method, &summary.url));
    let record = CaptureRecord::new(&summary, &response);
    let record_path =
        write_capture_record(&record, options.settings.output_dir.as_deref(), &record_name)?;
    debug!(path = %record_path.display(), "wrote capture record");

    let preview = options
        .preview_bytes
        .filter(|limit| *limit > 0)
        .map(|limit| create_preview(response.content(), limit));

    Ok(CaptureResult {
        profile: options.settings.profile_name.clone(),
        request: summary,
        response,
        duration_ms: live.duration_ms,
        record_path,
        preview,
    })
}

fn apply_settings(
    mut request: ExchangeRequest,
    options: &CaptureOptions<'_>,
) -> Result<ExchangeRequest> {
    request.url = resolve_url(&request.url, options.settings.base_url.as_deref())?;
    for (name, value) in &options.settings.default_headers {
        if !request
            .headers
            .iter()
            .any(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            request.headers.push((name.clone(), value.clone()));
        }
    }
    Ok(request)
}

fn resolve_url(url: &str, base_url: Option<&str>) -> Result<String> {
    if url.contains("://") {
        let absolute = Url::parse(url).with_context(|| format!("invalid URL {url}"))?;
        return Ok(absolute.to_string());
    }
    let base = base_url.ok_or_else(|| {
        anyhow!("relative URL {url} needs a baseUrl in the active profile")
    })?;
    let base = Url::parse(base).with_context(|| format!("invalid baseUrl {base}"))?;
    // `localhost:8080/x` would otherwise parse with `localhost` as its scheme
    let reference = match url.split('/').next() {
        Some(head) if head.contains(':') => format!("./{url}"),
        _ => url.to_string(),
    };
    let joined = base
        .join(&reference)
        .with_context(|| format!("resolving {url} against {base}"))?;
    Ok(joined.to_string())
}
