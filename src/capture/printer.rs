use colored::{Color, Colorize};
use url::Url;

use super::models::CaptureResult;

pub fn print_capture_result(result: &CaptureResult) {
    let status = result.response.status();
    let status_color = if status.code() >= 400 {
        Color::Red
    } else if status.code() >= 300 {
        Color::Yellow
    } else {
        Color::Green
    };

    println!(
        "{} {}",
        result.request.method.bold(),
        result.request.url.cyan()
    );
    if let Some(profile) = &result.profile {
        println!("{} {}", "Profile:".bold(), profile.magenta());
    }
    println!(
        "{} {} {}",
        "Status:".bold(),
        status.to_string().color(status_color),
        format!("({:.1} ms)", result.duration_ms).dimmed()
    );

    if let Some(bytes) = result.request.body_bytes {
        println!(
            "{} {}",
            "Request body:".bold(),
            format!("{} bytes", bytes).dimmed()
        );
    }

    println!("{}", "Response headers".bold());
    for (name, values) in result.response.headers().iter() {
        for value in values {
            println!("  {}: {}", name.cyan(), value.dimmed());
        }
    }

    println!(
        "{} {} {}",
        "Record:".bold(),
        format_file_link(&result.record_path),
        format!("({} bytes)", result.response.content().len()).dimmed()
    );

    if let Some(preview) = &result.preview {
        println!("{}", "Preview".bold());
        println!("{}", preview.dimmed());
    }
}

fn format_file_link(path: &std::path::Path) -> String {
    let display = path.to_string_lossy();
    match Url::from_file_path(path) {
        Ok(url) => format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, display.cyan()),
        Err(_) => display.cyan().to_string(),
    }
}
