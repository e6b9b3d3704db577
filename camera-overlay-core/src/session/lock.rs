//! Bounded binary acquisition lock guarding camera open/close.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Binary semaphore serializing camera open/close against the
/// hardware's asynchronous completion callbacks.
///
/// The holder releases from a different call stack than the one that
/// acquired (the device-opened callback releases what `open` acquired),
/// so this is an explicit acquire/release pair rather than an RAII
/// guard.
pub struct AcquisitionLock {
    held: Mutex<bool>,
    available: Condvar,
}

impl AcquisitionLock {
    pub fn new() -> Self {
        Self {
            held: Mutex::new(false),
            available: Condvar::new(),
        }
    }

    /// Block until the lock is acquired. Used by close, which is
    /// expected to succeed quickly even when an open is in flight.
    pub fn acquire(&self) {
        let mut held = self.held.lock();
        while *held {
            self.available.wait(&mut held);
        }
        *held = true;
    }

    /// Try to acquire within `timeout`. Returns false on timeout.
    pub fn try_acquire_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut held = self.held.lock();
        while *held {
            if self.available.wait_until(&mut held, deadline).timed_out() && *held {
                return false;
            }
        }
        *held = true;
        true
    }

    pub fn release(&self) {
        let mut held = self.held.lock();
        *held = false;
        self.available.notify_one();
    }
}

impl Default for AcquisitionLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn acquire_and_release() {
        let lock = AcquisitionLock::new();
        lock.acquire();
        lock.release();
        assert!(lock.try_acquire_for(Duration::from_millis(10)));
        lock.release();
    }

    #[test]
    fn bounded_acquire_times_out_while_held() {
        let lock = AcquisitionLock::new();
        lock.acquire();
        assert!(!lock.try_acquire_for(Duration::from_millis(50)));
        lock.release();
    }

    #[test]
    fn blocking_acquire_waits_for_release() {
        let lock = Arc::new(AcquisitionLock::new());
        lock.acquire();

        let waiter = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                lock.acquire();
                lock.release();
            })
        };

        thread::sleep(Duration::from_millis(20));
        lock.release();
        waiter.join().unwrap();
    }

    #[test]
    fn bounded_acquire_succeeds_after_release() {
        let lock = Arc::new(AcquisitionLock::new());
        lock.acquire();

        let holder = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                lock.release();
            })
        };

        assert!(lock.try_acquire_for(Duration::from_millis(500)));
        lock.release();
        holder.join().unwrap();
    }
}
