/*
 * Copyright 2025 Luc Lenôtre
 *
 * This file is part of Maestro.
 *
 * Maestro is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * Maestro is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * Maestro. If not, see <https://www.gnu.org/licenses/>.
 */

//! The reboot guard is the single slot tracking whether a reboot is in flight.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Admission controller for reboots.
///
/// The guard starts released. [`RebootGuard::try_acquire`] is a compare-and-set: under
/// concurrent calls, exactly one caller observes success until [`RebootGuard::release`] is
/// called.
#[derive(Debug, Default)]
pub struct RebootGuard {
    in_flight: AtomicBool,
}

impl RebootGuard {
    /// Creates a released guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to mark a reboot as in flight.
    ///
    /// Returns `true` if admission is granted. If a reboot is already in flight, the function
    /// returns `false` and leaves the guard untouched.
    pub fn try_acquire(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Marks the reboot as no longer in flight.
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    /// Tells whether a reboot is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn acquire_release() {
        let guard = RebootGuard::new();
        assert!(!guard.is_in_flight());
        assert!(guard.try_acquire());
        assert!(guard.is_in_flight());
        assert!(!guard.try_acquire());
        assert!(guard.is_in_flight());
        guard.release();
        assert!(!guard.is_in_flight());
        assert!(guard.try_acquire());
    }

    #[test]
    fn release_when_idle() {
        let guard = RebootGuard::new();
        guard.release();
        assert!(!guard.is_in_flight());
        assert!(guard.try_acquire());
    }

    #[test]
    fn concurrent_acquire() {
        const THREADS: usize = 32;
        for _ in 0..20 {
            let guard = Arc::new(RebootGuard::new());
            let barrier = Arc::new(Barrier::new(THREADS));
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let guard = guard.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        guard.try_acquire()
                    })
                })
                .collect();
            let granted = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|granted| *granted)
                .count();
            assert_eq!(granted, 1);
            assert!(guard.is_in_flight());
        }
    }
}
