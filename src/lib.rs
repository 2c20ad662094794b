pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{AtnfCatalogue, LocalStorage, StdoutStorage};
pub use crate::config::FetchConfig;
pub use crate::core::{etl::EtlEngine, pipeline::PulsarPipeline};
pub use crate::domain::model::{OutputTarget, PulsarRecord, SelectionPolicy};
pub use crate::utils::error::{FeedError, Result};
