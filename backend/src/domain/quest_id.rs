//! Quest identifier generation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mockable::Clock;
use rand::Rng;

use super::quest::QuestId;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 5;

/// Source of fresh quest identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait QuestIdGenerator: Send + Sync {
    /// Produce an identifier no earlier call has returned.
    fn next_id(&self) -> QuestId;
}

#[expect(
    clippy::integer_division_remainder_used,
    reason = "base-36 digits come from repeated division"
)]
fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or_default();
        digits.push(char::from(BASE36.get(digit).copied().unwrap_or(b'0')));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Millisecond timestamp in base 36 followed by a random base-36 suffix.
///
/// The time component never repeats within a process: when the clock has
/// not advanced since the last call the previous value plus one is used, so
/// identifiers are strictly increasing in their time part even under bursts.
pub struct TimeRandomQuestIdGenerator {
    clock: Arc<dyn Clock>,
    last_millis: AtomicU64,
}

impl TimeRandomQuestIdGenerator {
    /// Create a generator reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_millis: AtomicU64::new(0),
        }
    }

    fn next_millis(&self) -> u64 {
        let now = u64::try_from(self.clock.utc().timestamp_millis()).unwrap_or_default();
        let step = |last: u64| now.max(last.saturating_add(1));
        match self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(step(last)))
        {
            Ok(previous) | Err(previous) => step(previous),
        }
    }
}

impl QuestIdGenerator for TimeRandomQuestIdGenerator {
    fn next_id(&self) -> QuestId {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RANDOM_SUFFIX_LEN)
            .map(|_| char::from(BASE36.get(rng.gen_range(0..36)).copied().unwrap_or(b'0')))
            .collect();
        QuestId::from_suffix(&format!("{}{suffix}", to_base36(self.next_millis())))
    }
}
