//! Host file selection adapters

pub mod local_file;

pub use local_file::{pick_file, PickError};
