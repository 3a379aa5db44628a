//! dockhand-health: wait for an HTTP application to become healthy.
//!
//! The poller probes a target URL until it answers `200 OK` or an optional
//! deadline passes. A single background task owns the probe loop; the
//! caller only waits on its one-shot result and the deadline timer.
//!
//! # Architecture
//!
//! ```text
//! HealthPoller::wait(deadline)
//!   ├── Background task (aborted on deadline)
//!   │   ├── Probe::check() → ProbeOutcome
//!   │   └── Unhealthy → log, sleep RETRY_INTERVAL, probe again
//!   └── select! { deadline timer, task result }   (deadline wins ties)
//! ```
//!
//! A deadline of `None` (or zero) polls until the target is healthy.
//! Probe failures are logged and retried, never returned: the caller only
//! sees success or [`HealthError::DeadlineExceeded`].

pub mod error;
pub mod poller;
pub mod probe;

pub use error::{HealthError, HealthResult};
pub use poller::{HealthPoller, RETRY_INTERVAL};
pub use probe::{HttpProbe, Probe, ProbeOutcome, Target};
