use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use http::Method;
use restcapture::capture::{capture_request, print_capture_result, CaptureOptions};
use restcapture::config::{load_config, SettingsBuilder};
use restcapture::exchange::ExchangeRequest;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "restcapture",
    version,
    about = "Capture HTTP responses as documentation records"
)]
struct Cli {
    /// URL to request; relative URLs use the profile's baseUrl
    #[arg(value_name = "URL")]
    url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// Request body
    #[arg(short, long)]
    data: Option<String>,

    /// Preview the first N bytes of the response body
    #[arg(short, long)]
    preview: Option<usize>,

    /// Select a profile from restcapture.json
    #[arg(short = 'P', long)]
    profile: Option<String>,

    /// Directory or file containing restcapture.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override base directory used for resolving paths
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Directory to store capture records
    #[arg(long = "output", short = 'O')]
    output: Option<PathBuf>,

    /// Name of the record directory (defaults to method and path)
    #[arg(long)]
    name: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    restcapture::logging::init(cli.verbose)?;

    let base_dir = match &cli.cwd {
        Some(path) => resolve_path(path)?,
        None => std::env::current_dir()?,
    };

    let config_target = cli
        .config
        .as_ref()
        .map(|p| resolve_relative(&base_dir, p))
        .unwrap_or_else(|| base_dir.clone());

    let cfg = load_config(&config_target).context("loading configuration")?;
    if let Some(loaded) = &cfg {
        info!(path = %loaded.path.display(), "using configuration");
    }
    let config_dir = cfg.as_ref().map(|c| c.dir.clone()).unwrap_or_else(|| {
        if config_target.is_dir() {
            config_target.clone()
        } else {
            config_target
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| config_target.clone())
        }
    });

    let settings = SettingsBuilder::new(
        base_dir.clone(),
        config_dir,
        cfg,
        cli.profile.clone(),
        cli.output.as_ref().map(|p| resolve_relative(&base_dir, p)),
    )
    .build()?;

    let request = build_request(&cli)?;

    let result = capture_request(
        request,
        CaptureOptions {
            preview_bytes: cli.preview,
            settings: &settings,
            record_name: cli.name.clone(),
        },
    )
    .await?;

    print_capture_result(&result);

    Ok(())
}

fn build_request(cli: &Cli) -> Result<ExchangeRequest> {
    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method {}", cli.method))?;
    let mut request = ExchangeRequest::new(method, cli.url.clone());
    for raw in &cli.headers {
        let (name, value) = parse_header_arg(raw)?;
        request = request.header(name, value);
    }
    if let Some(data) = &cli.data {
        request = request.body(data.clone());
    }
    Ok(request)
}

fn parse_header_arg(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("Invalid header: {}", raw),
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
