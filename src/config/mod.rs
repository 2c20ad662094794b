#[cfg(feature = "cli")]
pub mod cli;
pub mod fetch_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use fetch_config::FetchConfig;
