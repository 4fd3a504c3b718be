//! Client-side record ids.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::models::EntityId;

/// Hands out ids from the wall clock in milliseconds. Ids are strictly
/// increasing within one generator even when called within one millisecond
/// or when the clock steps back.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> EntityId {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        EntityId(now.max(previous + 1))
    }
}
