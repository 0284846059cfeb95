//! Alarm controller
//!
//! Runs at most one background pulse task at a time. Starting is idempotent
//! while a task is alive; stopping is cooperative through the stop-alarm
//! signal and completes within one pulse interval.

use crate::core::context::AppContext;
use crate::sound;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::info;

/// Pulse emitter, injectable so tests can observe pulses.
pub type PulseFn = Arc<dyn Fn() + Send + Sync>;

/// Controls the repeating audible alert.
pub struct AlarmController {
    ctx: Arc<AppContext>,
    pulse_interval: Duration,
    pulse: PulseFn,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AlarmController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        let pulse_interval = ctx.config.timing.alarm_pulse();
        Self::with_pulse(ctx, pulse_interval, Arc::new(sound::pulse))
    }

    /// Create a controller with a custom pulse emitter and interval.
    pub fn with_pulse(ctx: Arc<AppContext>, pulse_interval: Duration, pulse: PulseFn) -> Self {
        Self {
            ctx,
            pulse_interval,
            pulse,
            task: Mutex::new(None),
        }
    }

    /// Begin sounding. No-op while a pulse task is still alive; a task that
    /// already exited (normally or not) is detected via its handle and
    /// replaced.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().map_or(false, |handle| !handle.is_finished()) {
            return;
        }

        self.ctx.signals.alarm_stop.clear();

        let ctx = Arc::clone(&self.ctx);
        let pulse = Arc::clone(&self.pulse);
        let interval = self.pulse_interval;
        *task = Some(thread::spawn(move || {
            while !ctx.signals.alarm_stop.is_set() {
                pulse();
                if ctx.signals.alarm_stop.wait_up_to(interval) {
                    break;
                }
            }
        }));

        info!("Alarm started");
        self.ctx.log.post("Alarm started!");
    }

    /// Request the pulse task to wind down. Asynchronous: the task observes
    /// the signal within one pulse interval.
    pub fn stop(&self) {
        self.ctx.signals.alarm_stop.set();
    }

    /// Whether a pulse task is currently alive.
    pub fn is_sounding(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_controller(interval: Duration) -> (AlarmController, Arc<AtomicUsize>) {
        let ctx = Arc::new(AppContext::new(Config::default()));
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let pulse: PulseFn = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (AlarmController::with_pulse(ctx, interval, pulse), count)
    }

    #[test]
    fn test_start_twice_spawns_one_task() {
        let (alarm, count) = counting_controller(Duration::from_millis(20));

        alarm.start();
        alarm.start();
        assert!(alarm.is_sounding());

        thread::sleep(Duration::from_millis(110));
        alarm.stop();
        thread::sleep(Duration::from_millis(60));

        // One task pulsing every 20ms for ~110ms: roughly 5-7 pulses.
        // Two concurrent tasks would have produced about twice that.
        let pulses = count.load(Ordering::SeqCst);
        assert!(pulses >= 3, "too few pulses: {pulses}");
        assert!(pulses <= 9, "second task was spawned: {pulses} pulses");
    }

    #[test]
    fn test_stop_ends_task_within_one_interval() {
        let (alarm, count) = counting_controller(Duration::from_millis(20));

        alarm.start();
        thread::sleep(Duration::from_millis(50));
        alarm.stop();
        thread::sleep(Duration::from_millis(60));
        assert!(!alarm.is_sounding());

        let after_stop = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(80));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_restart_after_stop() {
        let (alarm, count) = counting_controller(Duration::from_millis(10));

        alarm.start();
        thread::sleep(Duration::from_millis(30));
        alarm.stop();
        thread::sleep(Duration::from_millis(40));
        assert!(!alarm.is_sounding());

        let before = count.load(Ordering::SeqCst);
        alarm.start();
        assert!(alarm.is_sounding());
        thread::sleep(Duration::from_millis(40));
        assert!(count.load(Ordering::SeqCst) > before);
        alarm.stop();
    }

    #[test]
    fn test_start_logs_to_panel() {
        let (alarm, _count) = counting_controller(Duration::from_millis(10));
        alarm.start();
        let drained = alarm.ctx.log.drain_all();
        assert!(drained.iter().any(|e| e.message.contains("Alarm started")));
        alarm.stop();
    }
}
