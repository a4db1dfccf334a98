pub mod config;
pub mod daemon;
pub mod domains;
pub mod error;
pub mod factories;
pub mod interfaces;
pub mod logging;
pub mod providers;
pub mod services;

pub type Result<T> = std::result::Result<T, error::MermatesRagError>;

/// Crate version with the short git SHA stamped by `build.rs`.
pub fn version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), "+", env!("MERMATES_GIT_SHA"))
}
