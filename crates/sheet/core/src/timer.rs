//! Timer port for periodic recharge.
//!
//! The engine never sleeps. A host scheduler calls back into the sheet at a
//! fixed interval; the callback re-checks the resource's recharge flag before
//! mutating, so a tick that races a `toggle_recharge(false)` does nothing.

use std::time::Duration;

/// Handle to a scheduled callback.
pub trait TimerHandle: Send {
    /// Stops future invocations. Idempotent.
    fn cancel(&self);

    fn is_active(&self) -> bool;
}

/// Callback invoked on every tick.
pub type TimerCallback = Box<dyn FnMut() + Send + 'static>;

/// Runs callbacks after (or every) `interval`.
pub trait Scheduler {
    type Handle: TimerHandle;

    fn schedule(&self, interval: Duration, repeating: bool, callback: TimerCallback) -> Self::Handle;
}
