//! Notebook command layer for Splunk search jobs.
//!
//! This crate implements the editor commands that annotate and interact with
//! notebook cells backed by Splunk search jobs: recording visualization
//! preferences and query metadata (module name, namespace, time range),
//! pushing SPL2 modules to the search service, fetching job search logs,
//! opening the job inspector and search app in a browser, and copying
//! identifiers to the clipboard.
//!
//! The host editor supplies the document model, prompts, clipboard and URL
//! opener through the traits in [`host`]; the remote search service is
//! reached through [`services::splunk::SplunkClient`] or any other
//! [`services::splunk::SearchService`] implementation.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod host;
pub mod notebook;
pub mod services;
pub mod visualizations;

pub use commands::{all_commands, execute_command, Command, CommandContext, CommandTarget};
pub use config::Config;
pub use notebook::{Cell, CellOutput, Detection, JobInfo, OutputMetadata};
