//! Sitewatch - website availability monitoring.
//!
//! Monitors are registered in a [`Registry`], checked on their own interval by the
//! [`Scheduler`] and probed over HTTP by a [`Prober`].

pub mod config;
pub mod error;
pub mod monitoring;

pub use config::Config;
pub use error::{AddError, ConfigError, RemoveError};
pub use monitoring::{
    HttpProber, MonitorSnapshot, MonitorStatus, ProbeResult, Prober, Registry, Scheduler,
};
