pub mod converter;
pub mod cookie;
pub mod exchange;
pub mod headers;
pub mod media_type;
pub mod operation;

#[cfg(feature = "cli")]
pub mod capture;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod logging;
