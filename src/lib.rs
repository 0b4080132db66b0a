//! signlens library crate.
//!
//! Photo capture and preprocessing, plus thin clients for the recognition,
//! translation and speech services. The `signlens` binary is a CLI over
//! these modules.

pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod preprocess;
pub mod services;
pub mod settings;

pub use error::{Error, ErrorKind, Result};
