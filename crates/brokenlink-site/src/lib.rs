//! Post-processor for a built static site.
//!
//! Runs the external link pass over every rendered page and writes the
//! palette stylesheet next to them.

pub mod builder;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
