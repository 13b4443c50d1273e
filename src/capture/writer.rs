use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use petname::petname;
use serde::Serialize;
use uuid::Uuid;

use crate::headers::HttpHeaders;
use crate::operation::OperationResponse;

use super::models::RequestSummary;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CaptureRecord<'a> {
    pub request: &'a RequestSummary,
    pub status: u16,
    pub reason: Option<&'static str>,
    pub headers: &'a HttpHeaders,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hex: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl<'a> CaptureRecord<'a> {
    pub(super) fn new(request: &'a RequestSummary, response: &'a OperationResponse) -> Self {
        let (content, content_hex) = match std::str::from_utf8(response.content()) {
            Ok(_) => (Some(response.content_as_string()), None),
            Err(_) => (None, Some(hex::encode(response.content()))),
        };
        Self {
            request,
            status: response.status_code(),
            reason: response.status().reason_phrase(),
            headers: response.headers(),
            content_type: response
                .content_type()
                .ok()
                .flatten()
                .map(|media_type| media_type.to_string()),
            content_length: response.content_length(),
            content,
            content_hex,
            captured_at: Utc::now(),
        }
    }
}

pub(super) fn write_capture_record(
    record: &CaptureRecord<'_>,
    output_dir: Option<&Path>,
    record_name: &str,
) -> Result<PathBuf> {
    let json = serde_json::to_vec_pretty(record).context("serializing capture record")?;

    if let Some(base_dir) = output_dir {
        let sanitized = sanitize_component(record_name);
        let record_dir = base_dir.join(&sanitized);
        fs::create_dir_all(&record_dir)
            .with_context(|| format!("creating capture directory {}", record_dir.display()))?;

        let index = next_index(&record_dir)?;
        let pet = petname(2, "-");
        let file_name = format!("{:03}-{}.json", index, pet);
        let path = record_dir.join(file_name);
        fs::write(&path, json)
            .with_context(|| format!("writing capture record to {}", path.display()))?;
        Ok(path)
    } else {
        let filename = format!("restcapture-{}.json", Uuid::new_v4());
        let path = std::env::temp_dir().join(filename);
        fs::write(&path, json)
            .with_context(|| format!("writing capture record to {}", path.display()))?;
        Ok(path)
    }
}

/// `GET https://host/widgets/42?x=1` -> `get-widgets-42`
pub(super) fn record_name_for(method: &str, url: &str) -> String {
    let path = url::Url::parse(url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| url.split('?').next().unwrap_or_default().to_string());
    sanitize_component(&format!("{}-{}", method.to_ascii_lowercase(), path))
}

pub(super) fn create_preview(bytes: &[u8], limit: usize) -> String {
    let slice = if bytes.len() > limit {
        &bytes[..limit]
    } else {
        bytes
    };
    match std::str::from_utf8(slice) {
        Ok(text) => text.to_string(),
        Err(_) => hex::encode(slice),
    }
}

pub(super) fn sanitize_component(value: &str) -> String {
    let mut sanitized = String::with_capacity(value.len());
    for ch in value.chars() {
        let mapped = match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => ch,
            _ => '-',
        };
        // collapse runs so `/widgets//42` stays readable
        if mapped == '-' && sanitized.ends_with('-') {
            continue;
        }
        sanitized.push(mapped);
    }
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        "capture".to_string()
    } else {
        trimmed.to_string()
    }
}

pub(super) fn next_index(dir: &Path) -> Result<u32> {
    let mut max_index = 0;
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if name.len() >= 3 && name.chars().take(3).all(|c| c.is_ascii_digit()) {
                if let Ok(value) = name[0..3].parse::<u32>() {
                    max_index = max_index.max(value + 1);
                }
            }
        }
    }
    Ok(max_index)
}
