//! Catalog, dispatch engine, ordering and export.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod order;
pub mod output;
pub mod types;
