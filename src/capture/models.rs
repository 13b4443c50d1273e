use std::path::PathBuf;

use serde::Serialize;

use crate::config::CaptureSettings;
use crate::operation::OperationResponse;

pub struct CaptureOptions<'a> {
    pub preview_bytes: Option<usize>,
    pub settings: &'a CaptureSettings,
    /// Directory name for the record; derived from the request when absent.
    pub record_name: Option<String>,
}

pub struct CaptureResult {
    pub profile: Option<String>,
    pub request: RequestSummary,
    pub response: OperationResponse,
    pub duration_ms: f64,
    pub record_path: PathBuf,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
    pub body_bytes: Option<usize>,
}
