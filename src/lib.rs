//! PodPolish - upload a recording for audio cleanup and fetch the results
//!
//! This crate drives the client side of an upload/process/result workflow:
//! it validates a selected audio file, submits it to a processing service,
//! tracks the result state, and saves the returned artifacts locally.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the workflow state machine, and errors
//! - **Application**: The workflow engine, the artifact downloader, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (HTTP service, directory sink, text catalog, config file)
//! - **CLI**: Command-line interface, argument parsing, and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
