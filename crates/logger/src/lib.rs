//! Shared tracing setup for the sitewatch binaries.

mod subscriber;

pub use subscriber::{LogFormat, init_tracing, init_tracing_with};
