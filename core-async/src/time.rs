//! Time-related abstractions.
//!
//! Wall-clock time used for session bookkeeping comes from the host `Clock`
//! bridge; this module only covers monotonic timing and timers.

pub use tokio::time::{error::Elapsed, sleep, timeout, Sleep, Timeout};

pub use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
