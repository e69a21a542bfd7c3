//! Recharge scheduling on tokio timers.
//!
//! [`TokioScheduler`] implements the core [`Scheduler`] port with one spawned
//! `interval` task per timer. [`RechargeScheduler`] keeps one timer per
//! recharging resource of a [`SharedSheet`]:
//!
//! ```text
//! enable("mana")  ──▶ toggle_recharge(true) + schedule(every recharge_interval)
//! tick            ──▶ lock sheet ─▶ recharge_if_enabled("mana")
//! disable("mana") ──▶ toggle_recharge(false) + cancel timer
//! ```
//!
//! Ticks re-check the recharge flag under the sheet lock, so a tick that was
//! already due when recharge was disabled leaves the resource untouched.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sheet_core::{Scheduler, TimerCallback, TimerHandle};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::{Result, RuntimeError};
use crate::shared::SharedSheet;

// ============================================================================
// Tokio timers
// ============================================================================

/// Shortest period a timer runs at; tokio rejects zero-length intervals.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Longest period; keeps `now + period` representable as an `Instant`.
const MAX_PERIOD: Duration = Duration::from_secs(u32::MAX as u64);

/// [`Scheduler`] backed by tasks on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Uses the runtime of the calling context.
    pub fn new() -> Result<Self> {
        Handle::try_current()
            .map(Self::with_handle)
            .map_err(RuntimeError::NoRuntime)
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimerHandle;

    fn schedule(
        &self,
        interval: Duration,
        repeating: bool,
        mut callback: TimerCallback,
    ) -> TokioTimerHandle {
        let period = interval.clamp(MIN_PERIOD, MAX_PERIOD);
        let active = Arc::new(AtomicBool::new(true));
        let running = Arc::clone(&active);

        let task = self.handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                callback();
                if !repeating {
                    break;
                }
            }
            running.store(false, Ordering::Release);
        });

        TokioTimerHandle {
            task: task.abort_handle(),
            active,
        }
    }
}

/// Handle to a timer task; aborts the task when cancelled or dropped.
#[derive(Debug)]
pub struct TokioTimerHandle {
    task: AbortHandle,
    active: Arc<AtomicBool>,
}

impl TimerHandle for TokioTimerHandle {
    fn cancel(&self) {
        self.active.store(false, Ordering::Release);
        self.task.abort();
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire) && !self.task.is_finished()
    }
}

impl Drop for TokioTimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ============================================================================
// Recharge
// ============================================================================

/// Keeps one recharge timer per enabled resource of a sheet.
pub struct RechargeScheduler<S: Scheduler = TokioScheduler> {
    scheduler: S,
    sheet: SharedSheet,
    timers: HashMap<String, S::Handle>,
}

impl<S: Scheduler> RechargeScheduler<S> {
    pub fn new(scheduler: S, sheet: SharedSheet) -> Self {
        Self {
            scheduler,
            sheet,
            timers: HashMap::new(),
        }
    }

    pub fn sheet(&self) -> &SharedSheet {
        &self.sheet
    }

    /// Turns recharge on for `name` and starts its timer.
    pub fn enable(&mut self, name: &str) -> Result<()> {
        let interval = self.sheet.with(|sheet| {
            sheet.toggle_recharge(name, true)?;
            Ok(sheet.resource(name)?.recharge_interval())
        })?;
        self.start(name, interval);
        Ok(())
    }

    /// Turns recharge off for `name` and cancels its timer.
    pub fn disable(&mut self, name: &str) -> Result<()> {
        self.sheet
            .with(|sheet| sheet.toggle_recharge(name, false))?;
        self.stop(name);
        Ok(())
    }

    /// Cancels the timer and removes the resource from the sheet.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.stop(name);
        self.sheet.with(|sheet| sheet.resources().remove(name))?;
        Ok(())
    }

    /// Starts timers for every resource whose recharge flag is already set,
    /// e.g. after loading a sheet from the store. Returns how many started.
    pub fn resume_all(&mut self) -> Result<usize> {
        let enabled = self.sheet.with(|sheet| {
            Ok(sheet
                .resources()
                .all()?
                .into_iter()
                .filter(|resource| resource.recharge_enabled())
                .map(|resource| (resource.name().to_owned(), resource.recharge_interval()))
                .collect::<Vec<_>>())
        })?;

        for (name, interval) in &enabled {
            self.start(name, *interval);
        }
        Ok(enabled.len())
    }

    pub fn is_scheduled(&self, name: &str) -> bool {
        self.timers
            .get(name)
            .is_some_and(|handle| handle.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.timers.values().filter(|handle| handle.is_active()).count()
    }

    fn start(&mut self, name: &str, interval: Duration) {
        self.stop(name);

        let sheet = self.sheet.clone();
        let resource = name.to_owned();
        let callback: TimerCallback = Box::new(move || {
            match sheet.with(|sheet| sheet.recharge_if_enabled(&resource)) {
                Ok(Some(current)) => {
                    tracing::trace!(resource = %resource, current, "recharged");
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(resource = %resource, error = %err, "recharge tick failed");
                }
            }
        });

        let handle = self.scheduler.schedule(interval, true, callback);
        tracing::info!(resource = name, ?interval, "recharge timer started");
        self.timers.insert(name.to_owned(), handle);
    }

    fn stop(&mut self, name: &str) {
        if let Some(handle) = self.timers.remove(name) {
            handle.cancel();
            tracing::info!(resource = name, "recharge timer cancelled");
        }
    }
}

impl<S: Scheduler> Drop for RechargeScheduler<S> {
    fn drop(&mut self) {
        for handle in self.timers.values() {
            handle.cancel();
        }
    }
}
