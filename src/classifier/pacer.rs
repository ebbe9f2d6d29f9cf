// Outbound request pacing for hosted classifier endpoints.
//
// Hosted inference endpoints throttle aggressively, and a batch request
// fans out into one call per text. The pacer spaces those calls: each
// caller reserves the next free slot and sleeps until it opens, so
// concurrent callers queue up in order instead of bursting.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};

/// Spaces calls at a fixed interval. Cheap to clone; clones share the
/// same schedule.
#[derive(Clone)]
pub struct Pacer {
    interval: Duration,
    /// When the next call is allowed to go out
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl Pacer {
    /// Create a pacer allowing `requests_per_minute` calls per minute.
    pub fn per_minute(requests_per_minute: f64) -> Self {
        Self {
            interval: Duration::from_secs_f64(60.0 / requests_per_minute),
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Reserve the next free slot and wait until it opens.
    ///
    /// If the schedule is idle this returns immediately; otherwise it
    /// sleeps for however long is left. The slot is claimed before
    /// sleeping, so no other caller can take it in the meantime.
    pub async fn wait(&self) {
        let deadline = {
            let mut slot = self.next_slot.lock().await;
            let now = Instant::now();
            let deadline = match *slot {
                Some(at) if at > now => at,
                _ => now,
            };
            *slot = Some(deadline + self.interval);
            deadline
        };
        sleep_until(deadline).await;
    }
}
