//! Repeating-timer primitives that drive simulator ticks.
//!
//! `ThreadScheduler` runs each timer on its own thread against the wall
//! clock. `ManualScheduler` is a virtual clock advanced by the host, for
//! embedding in an existing frame loop and for deterministic tests.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Work run on every timer expiry.
pub type TimerTask = Box<dyn FnMut() + Send + 'static>;

/// Host facility that runs a task at a fixed interval until cancelled.
pub trait Scheduler {
    type Handle: Send;

    /// Run `task` every `interval`, first after one full interval.
    fn schedule_repeating(&self, interval: Duration, task: TimerTask) -> Self::Handle;

    /// Stop a timer. No expiry of this timer starts after this returns.
    fn cancel(&self, handle: Self::Handle);
}

const TIMER_THREAD_NAME: &str = "orbitlight-timer";

/// Wall-clock scheduler backed by one thread per timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadScheduler;

impl ThreadScheduler {
    pub fn new() -> Self {
        Self
    }
}

/// Running thread timer. Dropping it without `cancel` also ends the
/// thread, after any in-flight expiry returns.
#[derive(Debug)]
pub struct ThreadTimer {
    cancel_tx: mpsc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl Scheduler for ThreadScheduler {
    type Handle = ThreadTimer;

    fn schedule_repeating(&self, interval: Duration, task: TimerTask) -> ThreadTimer {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let thread = std::thread::Builder::new()
            .name(TIMER_THREAD_NAME.into())
            .spawn(move || {
                run_timer(interval, task, cancel_rx);
            })
            .expect("Failed to spawn timer thread");

        ThreadTimer {
            cancel_tx,
            thread: Some(thread),
        }
    }

    fn cancel(&self, mut handle: ThreadTimer) {
        let _ = handle.cancel_tx.send(());
        if let Some(thread) = handle.thread.take() {
            // A task cancelling its own timer cannot wait for itself; the
            // loop sees the message as soon as the task returns.
            if thread.thread().id() != std::thread::current().id() {
                let _ = thread.join();
            }
        }
    }
}

/// The timer loop. Runs until cancelled or the handle is dropped.
fn run_timer(interval: Duration, mut task: TimerTask, cancel_rx: mpsc::Receiver<()>) {
    let mut next_tick_time = Instant::now() + interval;

    loop {
        // 1. Wait for the deadline, waking early on cancellation
        let wait = next_tick_time.saturating_duration_since(Instant::now());
        match cancel_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        // 2. Fire. A panicking task must not end the timer.
        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(&mut task)) {
            log::error!("timer task panicked: {}", panic_message(panic.as_ref()));
        }

        // 3. Schedule the next deadline from the previous one to avoid drift
        next_tick_time += interval;
        let now = Instant::now();
        if now > next_tick_time && now - next_tick_time > interval * 2 {
            // Too far behind — skip missed expiries instead of bursting
            next_tick_time = now;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Identifier of a timer on a `ManualScheduler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManualTimerId(u64);

struct ManualTimer {
    interval: Duration,
    next_due: Duration,
    /// `None` while the task is executing.
    task: Option<TimerTask>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, ManualTimer>,
}

impl ManualClock {
    /// Take the earliest task due at or before `target`, moving the clock
    /// to its deadline. Ties fire in scheduling order.
    fn take_due(&mut self, target: Duration) -> Option<(u64, TimerTask)> {
        let (&id, _) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.task.is_some() && timer.next_due <= target)
            .min_by_key(|(id, timer)| (timer.next_due, **id))?;

        let timer = self.timers.get_mut(&id)?;
        self.now = timer.next_due;
        timer.next_due += timer.interval;
        timer.task.take().map(|task| (id, task))
    }
}

/// Virtual-clock scheduler. Time only moves when `advance` is called.
///
/// Clones share the same clock, so a host can hand one clone to a
/// simulator and keep another to drive it.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of live timers.
    pub fn active_timers(&self) -> usize {
        self.lock().timers.len()
    }

    /// Move the clock forward, firing every expiry that falls inside the
    /// window in deadline order. Returns the number of expiries fired.
    ///
    /// Tasks run without the clock lock held, so they may cancel or
    /// schedule timers on this scheduler.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.lock().now + elapsed;
        let mut fired = 0;

        loop {
            let due = self.lock().take_due(target);
            let Some((id, mut task)) = due else {
                break;
            };

            task();
            fired += 1;

            // A cancelled timer is gone from the map; its task is dropped here.
            if let Some(timer) = self.lock().timers.get_mut(&id) {
                timer.task = Some(task);
            }
        }

        self.lock().now = target;
        fired
    }
}

/// Zero-length intervals would never let virtual time move past a deadline.
const MIN_MANUAL_INTERVAL: Duration = Duration::from_nanos(1);

impl Scheduler for ManualScheduler {
    type Handle = ManualTimerId;

    fn schedule_repeating(&self, interval: Duration, task: TimerTask) -> ManualTimerId {
        let interval = interval.max(MIN_MANUAL_INTERVAL);
        let mut clock = self.lock();
        let id = clock.next_id;
        clock.next_id += 1;
        let next_due = clock.now + interval;
        clock.timers.insert(
            id,
            ManualTimer {
                interval,
                next_due,
                task: Some(task),
            },
        );
        ManualTimerId(id)
    }

    fn cancel(&self, handle: ManualTimerId) {
        self.lock().timers.remove(&handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_task(counter: &Arc<AtomicUsize>) -> TimerTask {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_first_expiry_after_one_interval() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        scheduler.schedule_repeating(Duration::from_millis(100), counting_task(&count));

        assert_eq!(scheduler.advance(Duration::from_millis(99)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(1000)), 10);
        assert_eq!(count.load(Ordering::SeqCst), 11);
        assert_eq!(scheduler.now(), Duration::from_millis(1100));
    }

    #[test]
    fn test_manual_cancel_stops_expiries() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let id = scheduler.schedule_repeating(Duration::from_millis(10), counting_task(&count));
        scheduler.advance(Duration::from_millis(30));
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.cancel(id);
        assert_eq!(scheduler.active_timers(), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(100)), 0);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_manual_fires_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for (tag, ms) in [("slow", 30u64), ("fast", 20)] {
            let order = Arc::clone(&order);
            scheduler.schedule_repeating(
                Duration::from_millis(ms),
                Box::new(move || order.lock().unwrap().push(tag)),
            );
        }

        scheduler.advance(Duration::from_millis(60));
        // fast@20, slow@30, fast@40, then the tie at 60 fires in scheduling order
        assert_eq!(
            *order.lock().unwrap(),
            vec!["fast", "slow", "fast", "slow", "fast"]
        );
    }

    #[test]
    fn test_manual_task_may_cancel_itself() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None::<ManualTimerId>));

        let task = {
            let scheduler = scheduler.clone();
            let count = Arc::clone(&count);
            let own_id = Arc::clone(&own_id);
            Box::new(move || {
                if count.fetch_add(1, Ordering::SeqCst) == 1 {
                    if let Some(id) = own_id.lock().unwrap().take() {
                        scheduler.cancel(id);
                    }
                }
            })
        };
        let id = scheduler.schedule_repeating(Duration::from_millis(5), task);
        *own_id.lock().unwrap() = Some(id);

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_thread_timer_survives_panicking_task() {
        let scheduler = ThreadScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let handle = scheduler.schedule_repeating(
            Duration::from_millis(5),
            Box::new(move || {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first expiry fails");
                }
            }),
        );

        std::thread::sleep(Duration::from_millis(100));
        scheduler.cancel(handle);
        assert!(count.load(Ordering::SeqCst) >= 3, "timer died after panic");
    }

    #[test]
    fn test_thread_timer_fires_and_cancels() {
        let scheduler = ThreadScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule_repeating(Duration::from_millis(5), counting_task(&count));

        std::thread::sleep(Duration::from_millis(100));
        scheduler.cancel(handle);
        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 1, "timer never fired");

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }
}
