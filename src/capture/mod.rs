mod models;
mod printer;
mod runner;
mod writer;

pub use models::{CaptureOptions, CaptureResult, RequestSummary};
pub use printer::print_capture_result;
pub use runner::capture_request;
