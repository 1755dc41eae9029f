// camlink-rs/camlink/src/timer.rs
//! Periodic timer service used for the SYNC beacon.
//!
//! The handshake registers a zero-argument callback and a period; the
//! service must invoke the callback at least once per period until told to
//! stop. Services are polled from the foreground wait loop, which stands in
//! for the timer interrupt preempting a busy-wait.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Zero-argument callback run once per timer period.
pub type TimerCallback = Box<dyn FnMut()>;

/// Recurring timer. Callbacks run at least once per period until `stop`.
pub trait TimerService {
    /// Start calling `callback` every `period`, replacing any running schedule.
    fn start(&mut self, period: Duration, callback: TimerCallback);

    /// Run the callback if a period has elapsed.
    fn poll(&mut self);

    /// Stop the schedule and drop the callback.
    fn stop(&mut self);

    /// Whether a callback is scheduled.
    fn is_running(&self) -> bool;
}

impl<S: TimerService + ?Sized> TimerService for &mut S {
    fn start(&mut self, period: Duration, callback: TimerCallback) {
        (**self).start(period, callback)
    }

    fn poll(&mut self) {
        (**self).poll()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

/// Shared counter of SYNC frames the timer has asked for but the
/// foreground has not sent yet. The timer side only increments, so the
/// callback stays non-blocking.
#[derive(Debug, Clone, Default)]
pub struct SyncBeacon {
    pending: Rc<Cell<u32>>,
}

impl SyncBeacon {
    /// Beacon with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback to register with a [`TimerService`].
    pub fn callback(&self) -> TimerCallback {
        let pending = Rc::clone(&self.pending);
        Box::new(move || pending.set(pending.get().saturating_add(1)))
    }

    /// Take every pending request.
    pub fn take(&self) -> u32 {
        self.pending.replace(0)
    }

    /// Ticks not yet taken.
    pub fn pending(&self) -> u32 {
        self.pending.get()
    }
}

/// Wall-clock timer on `std::time::Instant`.
#[derive(Default)]
pub struct MonotonicTimer {
    schedule: Option<(Duration, Instant, TimerCallback)>,
}

impl MonotonicTimer {
    /// Stopped timer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MonotonicTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicTimer")
            .field("period", &self.schedule.as_ref().map(|(p, _, _)| *p))
            .finish()
    }
}

impl TimerService for MonotonicTimer {
    fn start(&mut self, period: Duration, callback: TimerCallback) {
        self.schedule = Some((period, Instant::now() + period, callback));
    }

    fn poll(&mut self) {
        if let Some((period, due, callback)) = self.schedule.as_mut() {
            let now = Instant::now();
            if now >= *due {
                callback();
                // Missed periods collapse into one call instead of a burst.
                *due = now + *period;
            }
        }
    }

    fn stop(&mut self) {
        self.schedule = None;
    }

    fn is_running(&self) -> bool {
        self.schedule.is_some()
    }
}

/// Deterministic timer for tests and simulations: one period elapses every
/// `polls_per_period` polls, regardless of wall-clock time.
pub struct ManualTimer {
    polls_per_period: u32,
    polls: u32,
    callback: Option<TimerCallback>,
    /// Periods passed to every `start`, in order
    pub started: Vec<Duration>,
    /// Total callback invocations
    pub fired: u32,
}

impl ManualTimer {
    /// Fires on every poll.
    pub fn new() -> Self {
        Self::every(1)
    }

    /// Fire once every `polls_per_period` polls.
    pub fn every(polls_per_period: u32) -> Self {
        Self {
            polls_per_period: polls_per_period.max(1),
            polls: 0,
            callback: None,
            started: Vec::new(),
            fired: 0,
        }
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTimer")
            .field("running", &self.callback.is_some())
            .field("started", &self.started)
            .field("fired", &self.fired)
            .finish()
    }
}

impl TimerService for ManualTimer {
    fn start(&mut self, period: Duration, callback: TimerCallback) {
        self.started.push(period);
        self.polls = 0;
        self.callback = Some(callback);
    }

    fn poll(&mut self) {
        if let Some(callback) = self.callback.as_mut() {
            self.polls += 1;
            if self.polls >= self.polls_per_period {
                self.polls = 0;
                self.fired += 1;
                callback();
            }
        }
    }

    fn stop(&mut self) {
        self.callback = None;
    }

    fn is_running(&self) -> bool {
        self.callback.is_some()
    }
}
