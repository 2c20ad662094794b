pub mod etl;
pub mod pipeline;
pub mod projection;
pub mod selection;

pub use crate::domain::model::{CatalogueTable, PulsarRecord, TransformResult};
pub use crate::domain::ports::{CatalogueSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
