pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod git;
pub mod manifest;
pub mod plan;
pub mod registry;
pub mod runner;
pub mod staging;
pub mod ui;
pub mod version;
pub mod warning;

pub use error::{ReleaseError, Result};
