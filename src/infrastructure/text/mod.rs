//! Text lookup adapters

pub mod catalog;

pub use catalog::Catalog;
