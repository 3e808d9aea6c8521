//! Storage layer for catalog and content documents

mod catalog;
mod document_db;

pub use catalog::{CatalogCounts, CatalogStore};
pub use document_db::DocumentDb;
