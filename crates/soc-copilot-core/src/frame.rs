//! Animation-frame scheduling.
//!
//! A frame is one display-refresh-aligned invocation of a callback. The
//! [`FrameScheduler`] trait abstracts the host's frame facility so animators
//! can be driven by a real display loop, a terminal redraw tick, or a test
//! that advances time by hand.
//!
//! Frame timestamps are `f64` milliseconds on a monotonic clock whose origin
//! is chosen by the scheduler.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use soc_copilot_core::{FrameScheduler, ManualFrameScheduler};
//!
//! let scheduler = ManualFrameScheduler::new();
//! let ran = Arc::new(AtomicUsize::new(0));
//! let ran_clone = ran.clone();
//!
//! scheduler.request_frame(Box::new(move |now| {
//!     assert_eq!(now, 16.0);
//!     ran_clone.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! assert_eq!(scheduler.tick(16.0), 1);
//! assert_eq!(ran.load(Ordering::SeqCst), 1);
//! ```

use std::collections::VecDeque;
use std::time::Instant;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{FrameError, Result};
use crate::logging::{PerfSpan, targets};

new_key_type! {
    /// Handle to a pending frame callback, used for cancellation.
    pub struct FrameHandle;
}

/// A frame callback. Receives the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64) + Send + 'static>;

/// A host facility that runs callbacks on the next animation frame.
///
/// Implementations must never invoke a callback while holding a lock that
/// `request_frame` or `cancel_frame` also takes: callbacks routinely request
/// their successor frame from inside the callback.
pub trait FrameScheduler: Send + Sync {
    /// Run `callback` on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending frame.
    ///
    /// Returns an error if the handle already ran or was already cancelled.
    fn cancel_frame(&self, handle: FrameHandle) -> Result<()>;

    /// Check whether a frame is still pending.
    fn is_pending(&self, handle: FrameHandle) -> bool;
}

/// Cancelled entries tolerated in the request order before compaction.
const ORDER_SLACK: usize = 8;

/// Internal scheduler state.
struct FrameQueue {
    /// Callbacks by handle.
    callbacks: SlotMap<FrameHandle, FrameCallback>,
    /// Request order. May contain handles that were cancelled.
    order: VecDeque<FrameHandle>,
    /// Timestamp of the most recent frame, in milliseconds.
    now: f64,
    /// Number of frames run so far.
    frames_run: u64,
}

/// A frame scheduler that only advances when told to.
///
/// Hosts call [`run_frame`](Self::run_frame) from their refresh loop; tests
/// call [`tick`](Self::tick) to advance a virtual clock deterministically.
///
/// Callbacks requested while a frame is running are deferred to the next
/// frame, and a callback cancelled mid-frame before its turn is skipped.
pub struct ManualFrameScheduler {
    inner: Mutex<FrameQueue>,
}

impl ManualFrameScheduler {
    /// Create a scheduler with its clock at `0.0`.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a scheduler with its clock at `now` milliseconds.
    pub fn starting_at(now: f64) -> Self {
        Self {
            inner: Mutex::new(FrameQueue {
                callbacks: SlotMap::with_key(),
                order: VecDeque::new(),
                now,
                frames_run: 0,
            }),
        }
    }

    /// The timestamp of the most recent frame.
    pub fn now(&self) -> f64 {
        self.inner.lock().now
    }

    /// Number of frames run so far, including empty ones.
    pub fn frames_run(&self) -> u64 {
        self.inner.lock().frames_run
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().callbacks.len()
    }

    /// Run one frame at timestamp `now`.
    ///
    /// Invokes every callback that was pending when the frame began, in
    /// request order. A `now` earlier than the previous frame is raised to
    /// the previous frame's time. Returns the number of callbacks invoked.
    #[tracing::instrument(skip(self), target = "soc_copilot_core::frame", level = "trace")]
    pub fn run_frame(&self, now: f64) -> usize {
        let (now, batch): (f64, Vec<FrameHandle>) = {
            let mut queue = self.inner.lock();
            // Frame time is monotonic even if the host clock stutters.
            queue.now = queue.now.max(now);
            queue.frames_run += 1;
            (queue.now, queue.order.drain(..).collect())
        };

        let mut executed = 0;
        for handle in batch {
            // Take the callback under the lock, invoke it outside.
            let Some(callback) = self.inner.lock().callbacks.remove(handle) else {
                continue;
            };
            tracing::trace!(target: targets::FRAME, ?handle, now, "running frame callback");
            callback(now);
            executed += 1;
        }

        executed
    }

    /// Advance the clock by `delta_ms` and run a frame.
    pub fn tick(&self, delta_ms: f64) -> usize {
        let now = self.now() + delta_ms.max(0.0);
        self.run_frame(now)
    }

    /// Tick by `step_ms` until no callbacks are pending or `max_frames`
    /// frames have run. Returns the number of frames run.
    pub fn run_until_idle(&self, step_ms: f64, max_frames: usize) -> usize {
        let _span = PerfSpan::new("run_until_idle");
        let mut frames = 0;
        while frames < max_frames && self.pending_count() > 0 {
            self.tick(step_ms);
            frames += 1;
        }
        frames
    }
}

impl Default for ManualFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut queue = self.inner.lock();
        let handle = queue.callbacks.insert(callback);
        queue.order.push_back(handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) -> Result<()> {
        let mut queue = self.inner.lock();
        if queue.callbacks.remove(handle).is_some() {
            // Stale entries in `order` are skipped when the frame runs, but a
            // host that retargets without running frames must not grow it.
            if queue.order.len() > 2 * queue.callbacks.len() + ORDER_SLACK {
                let FrameQueue { callbacks, order, .. } = &mut *queue;
                order.retain(|handle| callbacks.contains_key(*handle));
            }
            Ok(())
        } else {
            Err(FrameError::InvalidHandle.into())
        }
    }

    fn is_pending(&self, handle: FrameHandle) -> bool {
        self.inner.lock().callbacks.contains_key(handle)
    }
}

static_assertions::assert_impl_all!(ManualFrameScheduler: Send, Sync);

/// Wall-clock source for frame timestamps.
///
/// Real-time hosts pair this with [`ManualFrameScheduler::run_frame`]:
///
/// ```no_run
/// use soc_copilot_core::{FrameClock, ManualFrameScheduler};
///
/// let clock = FrameClock::new();
/// let scheduler = ManualFrameScheduler::new();
/// loop {
///     scheduler.run_frame(clock.now_ms());
///     std::thread::sleep(std::time::Duration::from_millis(16));
/// #   break;
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock's origin.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
