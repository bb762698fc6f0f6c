/// Monitoring engine module - handles registration and execution of checks
///
/// This module is responsible for:
/// - Probing HTTP/HTTPS targets
/// - Scheduling one recurring check per monitor
/// - Keeping the registry of live monitors
/// - Validating new monitors
pub mod monitor;
pub mod prober;
pub mod registry;
pub mod scheduler;
pub mod types;
pub mod validation;

pub use monitor::Monitor;
pub use prober::{HttpProber, Prober};
pub use registry::Registry;
pub use scheduler::Scheduler;
pub use types::{MonitorSnapshot, MonitorStatus, ProbeResult};
