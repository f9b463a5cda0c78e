//! Locking helpers for the shared registry.
//!
//! A poisoned lock is reported as [`crate::Error::LockError`] instead of panicking.

macro_rules! lock {
    ($lock:expr) => {
        $lock.lock().map_err(|_| crate::Error::LockError)
    };
}

macro_rules! with_lock {
    ($lock:expr, $closure:expr) => {{
        let mut guard = lock!($lock)?;
        $closure(&mut *guard)
    }};
}
