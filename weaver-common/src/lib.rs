//! # Stem Weaver Common Library
//!
//! Shared code for the stem weaver server and client:
//! - Error type
//! - Configuration loading
//! - Stem name normalization and matching
//! - API request/response types

pub mod api;
pub mod config;
pub mod error;
pub mod stems;

pub use error::{Error, Result};
pub use stems::{canonical_name, match_stems, Version};
