use std::{
    sync::{Condvar, Mutex, PoisonError},
    time::Duration,
};

/// Count of accepted-but-unfinished delivery attempts, with blocking waits
/// for drain. A plain mutex/condvar pair so `flush` works without an async
/// runtime on the calling side.
#[derive(Default)]
pub(crate) struct PendingGauge {
    count: Mutex<u64>,
    drained: Condvar,
}

impl PendingGauge {
    pub(crate) fn increment(&self) {
        let mut count = self.lock();
        *count += 1;
    }

    pub(crate) fn decrement(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);

        if *count == 0 {
            self.drained.notify_all();
        }
    }

    pub(crate) fn current(&self) -> u64 {
        *self.lock()
    }

    /// Blocks until the count reaches zero or the timeout elapses. Returns
    /// whether it drained.
    pub(crate) fn wait_drained(&self, timeout: Duration) -> bool {
        let count = self.lock();

        let (count, _) = self
            .drained
            .wait_timeout_while(count, timeout, |count| *count > 0)
            .unwrap_or_else(PoisonError::into_inner);

        *count == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, u64> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
