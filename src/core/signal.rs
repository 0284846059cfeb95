//! Cooperative signals for cross-thread notification
//!
//! A `Signal` is a boolean flag with a condvar-backed timed wait. It is a
//! notification primitive, not a lock: setters never block, and waiters are
//! woken the moment the flag is raised.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// A cooperative boolean flag observable and settable from any thread.
#[derive(Default)]
pub struct Signal {
    state: Mutex<bool>,
    cond: Condvar,
}

impl Signal {
    /// Create a new, unset signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every current waiter. Idempotent.
    pub fn set(&self) {
        let mut state = self.state.lock();
        *state = true;
        self.cond.notify_all();
    }

    /// Lower the flag. Does not wake waiters.
    pub fn clear(&self) {
        *self.state.lock() = false;
    }

    /// Current value of the flag.
    pub fn is_set(&self) -> bool {
        *self.state.lock()
    }

    /// Block until the flag is set or `timeout` elapses, whichever comes
    /// first. Returns the flag value observed on wake-up, so `true` means
    /// the wait ended because the signal was raised.
    pub fn wait_up_to(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while !*state {
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                return *state;
            }
        }
        true
    }
}

/// The three process-lifetime signals shared between the control panel,
/// the polling loop, and the alarm controller.
#[derive(Default)]
pub struct SignalSet {
    /// Tells a sounding alarm task to wind down.
    pub alarm_stop: Signal,
    /// Cuts the current inter-cycle sleep short.
    pub wake: Signal,
    /// Tells the polling loop to exit after its current iteration.
    pub program_stop: Signal,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// End-of-program handshake: stop the loop and the alarm, and raise the
    /// wake signal so a loop mid-sleep observes the stop promptly.
    pub fn request_shutdown(&self) {
        self.program_stop.set();
        self.alarm_stop.set();
        self.wake.set();
    }
}
