// ABOUTME: Admission rate limiter gating how fast the executor may spawn work.
// ABOUTME: A single controller task owns the window state; requesters only enqueue and wait.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Configuration for the admission rate limiter.
///
/// At most `reqs_rate` admissions are granted within any window of length
/// `interval`. Passing `None` where options are accepted disables limiting
/// entirely - every admission request is granted immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitOptions {
    /// Length of the admission window. Must be positive.
    pub interval: Duration,
    /// Maximum admissions granted per window. Zero means no admissions.
    pub reqs_rate: u32,
}

/// Restart-on-expiry window counter.
///
/// The window does not reset at fixed wall-clock boundaries: it resets to
/// "now" the first time it is checked after `interval` has elapsed since the
/// previous reset. Owned exclusively by the controller task; nothing else
/// ever touches the counter or timestamp.
pub(crate) struct AdmissionWindow {
    interval: Duration,
    reqs_rate: u32,
    window_start: Option<Instant>,
    count: u32,
}

impl AdmissionWindow {
    pub(crate) fn new(options: RateLimitOptions) -> Self {
        Self {
            interval: options.interval,
            reqs_rate: options.reqs_rate,
            window_start: None,
            count: 0,
        }
    }

    /// Count one admission attempt against the current window.
    ///
    /// Returns true if the attempt is within `reqs_rate` for the window,
    /// restarting the window first if it has expired (or never started).
    pub(crate) fn check_admission(&mut self) -> bool {
        let now = Instant::now();
        let expired = match self.window_start {
            Some(start) => now.duration_since(start) > self.interval,
            None => true,
        };
        if expired {
            self.window_start = Some(now);
            self.count = 0;
        }

        self.count += 1;
        self.count <= self.reqs_rate
    }
}

/// A pending admission request: the controller releases the waiter by
/// completing this channel.
type AdmitTicket = oneshot::Sender<()>;

/// Blocking admission gate backed by a background controller task.
///
/// Executor tasks call [`admit`](RateLimiter::admit) before every spawn. When
/// limiting is enabled, the call enqueues a ticket and waits until the
/// controller releases it; the controller grants releases only while the
/// current admission window has budget. When limiting is disabled, `admit`
/// returns immediately.
pub struct RateLimiter {
    /// Queue sender; `None` when limiting is disabled or after shutdown.
    queue: Mutex<Option<mpsc::UnboundedSender<AdmitTicket>>>,
    /// Controller task handle, awaited on shutdown.
    controller: Mutex<Option<JoinHandle<()>>>,
}

impl RateLimiter {
    /// Create the limiter and, if options were supplied, spawn its controller.
    ///
    /// # Panics
    ///
    /// Panics if `options.interval` is zero.
    pub fn start(options: Option<RateLimitOptions>) -> Self {
        let Some(options) = options else {
            return Self {
                queue: Mutex::new(None),
                controller: Mutex::new(None),
            };
        };
        assert!(
            options.interval > Duration::ZERO,
            "interval must be positive"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(controller(AdmissionWindow::new(options), rx));

        Self {
            queue: Mutex::new(Some(tx)),
            controller: Mutex::new(Some(handle)),
        }
    }

    /// Create a limiter that grants every admission immediately.
    pub fn disabled() -> Self {
        Self::start(None)
    }

    /// Block until the controller grants one admission.
    ///
    /// Returns immediately when limiting is disabled or the limiter has
    /// already been shut down.
    pub async fn admit(&self) {
        let Some(tx) = self.queue.lock().unwrap().clone() else {
            return;
        };

        let (release, released) = oneshot::channel();
        if tx.send(release).is_err() {
            // Controller already exited; nothing left to gate against.
            return;
        }
        let _ = released.await;
    }

    /// Shut the controller down and wait for it to exit.
    ///
    /// Dropping the queue sender is the sole exit signal for the controller.
    /// Must be called after the traversal has fully completed; any waiter
    /// still blocked in [`admit`](RateLimiter::admit) at that point would be
    /// released without an admission grant. Idempotent.
    pub async fn shutdown(&self) {
        drop(self.queue.lock().unwrap().take());
        let handle = self.controller.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

/// Controller loop: the only task that mutates the admission window.
///
/// Takes the next pending request off the queue, then waits at a sub-interval
/// tick resolution until the window has budget for it. A denied check skips
/// the remainder of that tick and retries on the next one. Exits when the
/// queue closes and drains empty.
async fn controller(mut window: AdmissionWindow, mut queue: mpsc::UnboundedReceiver<AdmitTicket>) {
    // One tenth of the interval keeps release latency small relative to the
    // window without busy-polling.
    let period = (window.interval / 10).max(Duration::from_millis(1));
    let mut tick = time::interval_at(Instant::now() + period, period);
    // After an idle stretch on the queue the ticker has a backlog of missed
    // ticks; Delay reschedules from now instead of firing them back-to-back,
    // so a denied check always waits a real tick before retrying.
    tick.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    debug!(
        interval_ms = window.interval.as_millis() as u64,
        reqs_rate = window.reqs_rate,
        "rate limiter controller started"
    );

    while let Some(release) = queue.recv().await {
        while !window.check_admission() {
            tick.tick().await;
        }
        // Waiter may have been dropped; the admission still counted.
        let _ = release.send(());
        trace!("admission released");
    }

    debug!("admission queue closed; rate limiter controller exiting");
}
