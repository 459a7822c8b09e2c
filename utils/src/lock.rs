//! Lock acquisition that survives poisoning.
//!
//! A poisoned lock means another thread panicked while holding it. The
//! guarded data is still returned; the event is logged at ERROR level.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::error;

/// Acquire a Mutex lock, recovering from poisoning if necessary.
pub fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        error!(context, "mutex poisoned, recovering guard");
        poisoned.into_inner()
    })
}

/// Acquire a RwLock read lock, recovering from poisoning if necessary.
pub fn read_or_recover<'a, T>(lock: &'a RwLock<T>, context: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        error!(context, "rwlock poisoned (read), recovering guard");
        poisoned.into_inner()
    })
}

/// Acquire a RwLock write lock, recovering from poisoning if necessary.
pub fn write_or_recover<'a, T>(lock: &'a RwLock<T>, context: &str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        error!(context, "rwlock poisoned (write), recovering guard");
        poisoned.into_inner()
    })
}
