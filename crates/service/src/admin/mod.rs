//! Dashboard writes: catalog CRUD over the document store.

pub mod catalog;

pub use catalog::CatalogAdmin;
