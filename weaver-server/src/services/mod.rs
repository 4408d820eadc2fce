//! Stem services: archive reading, analysis and mix assembly
//!
//! All ZIP work here is synchronous; handlers run it on
//! `tokio::task::spawn_blocking`.

pub mod analyzer;
pub mod archive;
pub mod mixer;

pub use analyzer::{analyze_stems, RandomScorer, StemScorer};
pub use archive::list_stems;
pub use mixer::{create_mix, MixOutput};
