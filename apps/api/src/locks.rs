//! # Per-(Garage, Day) Admission Locks
//!
//! Opt-in serialization for booking admissions (`PITSTOP_SERIALIZE_ADMISSIONS`).
//!
//! ## The Problem
//! Admission is check-then-act: count the day's bookings, compare against
//! capacity, then insert. Two concurrent requests for the last slot can both
//! pass the check before either insert lands, overshooting capacity by one.
//! With the flag off that window stays open (reads never block writes and the
//! day keeps rejecting once it reports full). With the flag on, requests
//! touching the same (garage, day) pair take turns through this module.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          DayLocks                                       │
//! │                                                                         │
//! │  slots: Mutex<HashMap<(garage_id, day), Arc<Mutex<()>>>>                │
//! │                                                                         │
//! │  hold("garage-1", 2024-06-10):                                          │
//! │    1. Lock the map, sweep entries nobody holds or waits on              │
//! │    2. Get-or-create the slot for the key, clone its Arc                 │
//! │    3. Release the map, await the slot lock                              │
//! │    4. Caller keeps the guard across admit + insert, drops it after      │
//! │                                                                         │
//! │  Different keys never contend; the map lock is held only for the        │
//! │  get-or-create step.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sweep in step 1 keeps the map from accumulating one entry per
//! (garage, day) ever booked: a slot whose Arc count is 1 has no guard
//! holder and no waiter, so it can go.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by (garage id, calendar day).
#[derive(Default)]
pub struct DayLocks {
    slots: Mutex<HashMap<(String, NaiveDate), Arc<Mutex<()>>>>,
}

impl DayLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one (garage, day) pair.
    ///
    /// The returned guard keeps its slot alive; dropping it releases the
    /// slot and lets a later sweep retire the entry.
    pub async fn hold(&self, garage_id: &str, day: NaiveDate) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;

            // Arc count 1 means the map holds the only reference: no guard
            // out, no waiter queued.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);

            slots
                .entry((garage_id.to_string(), day))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        slot.lock_owned().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_same_day_takes_turns() {
        let locks = Arc::new(DayLocks::new());

        let guard = locks.hold("garage-1", day(10)).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.hold("garage-1", day(10)).await;
            })
        };

        sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished(), "same key must wait for release");

        drop(guard);
        timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should acquire after release")
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_contend() {
        let locks = Arc::new(DayLocks::new());

        let _held = locks.hold("garage-1", day(10)).await;

        // Other day, same garage.
        let other_day = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.hold("garage-1", day(11)).await;
            })
        };
        // Same day, other garage.
        let other_garage = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.hold("garage-2", day(10)).await;
            })
        };

        timeout(Duration::from_secs(1), other_day)
            .await
            .expect("different day must not block")
            .unwrap();
        timeout(Duration::from_secs(1), other_garage)
            .await
            .expect("different garage must not block")
            .unwrap();
    }

    #[tokio::test]
    async fn test_released_slots_are_swept() {
        let locks = DayLocks::new();

        for d in 1..=5 {
            let _guard = locks.hold("garage-1", day(d)).await;
        }
        assert!(!locks.slots.lock().await.is_empty());

        // Next hold sweeps the five released slots before adding its own.
        let guard = locks.hold("garage-1", day(6)).await;
        assert_eq!(locks.slots.lock().await.len(), 1);

        drop(guard);
        let _guard = locks.hold("garage-1", day(7)).await;
        let slots = locks.slots.lock().await;
        assert_eq!(slots.len(), 1);
        assert!(slots.contains_key(&("garage-1".to_string(), day(7))));
    }

    #[tokio::test]
    async fn test_held_slot_survives_sweep() {
        let locks = Arc::new(DayLocks::new());

        let guard = locks.hold("garage-1", day(10)).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.hold("garage-1", day(10)).await;
            })
        };
        sleep(Duration::from_millis(20)).await;

        // A hold on an unrelated key runs the sweep; the contended slot must
        // stay registered and the waiter must still be ordered behind us.
        let _other = locks.hold("garage-2", day(10)).await;
        assert!(locks
            .slots
            .lock()
            .await
            .contains_key(&("garage-1".to_string(), day(10))));
        assert!(!contender.is_finished());

        drop(guard);
        timeout(Duration::from_secs(1), contender)
            .await
            .expect("waiter should proceed after release")
            .unwrap();
    }
}
