// Adapters layer: concrete implementations for external systems (catalogue, storage).

pub mod atnf;
pub mod storage;

pub use atnf::AtnfCatalogue;
pub use storage::{LocalStorage, StdoutStorage};
