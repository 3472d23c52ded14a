use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

static TOKEN_SEQ: AtomicU64 = AtomicU64::new(0);

/// Time-based unique token used for vendor and payment ids.
///
/// Millisecond timestamp plus a process-local sequence number and a random
/// suffix, so ids stay unique within a run and collisions across runs that
/// land on the same millisecond stay negligible.
pub fn time_token(now: DateTime<Utc>) -> String {
    let seq = TOKEN_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{seq}-{:04x}", now.timestamp_millis(), rand::random::<u16>())
}
