//! Local artifact storage adapters

pub mod directory;

pub use directory::DirectorySink;
