//! Synchronization primitives.
//!
//! All primitives are `Send + Sync` and async-aware, so they can be held
//! across `.await` points inside capture sessions without blocking the
//! executor.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::Mutex;
//!
//! async fn example() {
//!     let slot = Mutex::new(None::<u32>);
//!     *slot.lock().await = Some(7);
//!     assert_eq!(*slot.lock().await, Some(7));
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};
