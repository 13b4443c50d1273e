use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const LOG_ENV: &str = "RESTCAPTURE_LOG";

/// Installs the global subscriber. `RESTCAPTURE_LOG` (e.g. `debug`) takes
/// precedence over the `-v` count.
pub fn init(verbosity: u8) -> Result<()> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or_else(|| level_for(verbosity));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("installing tracing subscriber")?;
    Ok(())
}

fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(7), Level::TRACE);
    }
}
