//! Runtime abstraction layer for the media capture core.
//!
//! Every core-* and bridge-* crate reaches the executor through this crate
//! instead of naming Tokio directly. Host integrations that drive the core
//! from a different executor only need to swap the re-exports here.
//!
//! # Modules
//!
//! - `task`: Task spawning
//! - `time`: Sleep, timeouts, instants
//! - `sync`: Async-aware locks and channels
//! - `fs`: Async filesystem helpers
//! - `runtime`: Runtime handles and `block_on`
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::oneshot;
//! use core_async::task;
//!
//! async fn example() {
//!     let (tx, rx) = oneshot::channel();
//!     task::spawn(async move {
//!         let _ = tx.send(42);
//!     });
//!     assert_eq!(rx.await.unwrap(), 42);
//! }
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod fs;
pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, timeout, Duration, Instant};
