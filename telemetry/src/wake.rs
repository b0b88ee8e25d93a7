use core::sync::atomic::{AtomicUsize, Ordering};

/// How the worker passes time while the wake count is zero.
pub trait Idle {
    fn idle(&mut self);
}

/// Busy-waits. Fine on a host or in tests; firmware should sleep the core
/// instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinIdle;

impl Idle for SpinIdle {
    fn idle(&mut self) {
        core::hint::spin_loop();
    }
}

/// Counting wake signal between the alert interrupt and the worker.
///
/// `post` may be called from any context, including interrupt handlers, and
/// never blocks. `wait` belongs to the single worker context. Every post is
/// one wake: posts made before the worker catches up are queued, not merged.
#[derive(Debug, Default)]
pub struct WakeSignal {
    count: AtomicUsize,
}

impl WakeSignal {
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    pub fn post(&self) {
        self.count.fetch_add(1, Ordering::Release);
    }

    /// Takes one wake if any are pending.
    pub fn try_wait(&self) -> bool {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Blocks until a wake is pending, then takes exactly one.
    pub fn wait<I: Idle>(&self, idle: &mut I) {
        while !self.try_wait() {
            idle.idle();
        }
    }

    pub fn pending(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}
