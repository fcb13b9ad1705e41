use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-flight guard for a named background job.
///
/// A timer tick and an HTTP trigger can both try to start the same job;
/// whichever acquires the guard first runs, the other is refused instead of
/// racing on the same pending records.
#[derive(Clone)]
pub struct JobGuard {
    name: &'static str,
    running: Arc<AtomicBool>,
}

impl JobGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Attempts to acquire the guard. Returns None when a run is already in
    /// flight; the returned token releases the guard on drop.
    pub fn try_acquire(&self) -> Option<JobRunToken> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(JobRunToken {
                running: Arc::clone(&self.running),
            })
        } else {
            None
        }
    }
}

pub struct JobRunToken {
    running: Arc<AtomicBool>,
}

impl Drop for JobRunToken {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
