//! # Admission Module
//!
//! The pre-persist admission gate for maintenance bookings.
//!
//! ## Validation Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    AdmissionController::admit                           │
//! │                                                                         │
//! │  BookingProposal { car_id, garage_id, scheduled_date, exclude }        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. parse scheduled_date ──────────── fail ──► InvalidDate             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Directory::find_car ───────────── None ──► CarNotFound             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Directory::find_garage ────────── None ──► GarageNotFound          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. Directory::is_car_assigned ───── false ──► CarNotInGarage          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. BookingLedger: fetch the target DAY's bookings, count them         │
//! │     (minus the excluded id), capacity - booked <= 0 ──► CapacityExhausted│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  6. Admission { scheduled_for, day, open_capacity } ──► caller persists│
//! │                                                                         │
//! │  Checks short-circuit: the first failure is the outcome.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Check-Then-Act Window
//!
//! Step 5's read and the caller's subsequent insert are not atomic. Two
//! concurrent attempts for the same garage and day can both observe one open
//! slot and together overshoot capacity by one. The gate deliberately does
//! not serialize; callers that want the stronger guarantee hold a
//! per-(garage, day) lock around admit-plus-persist.
//!
//! ## Update Path
//!
//! Updates run the same sequence against the *new* car/garage/date and set
//! [`BookingProposal::exclude_booking`] to the record's own id, so a record
//! never occupies a slot against itself. Without the exclusion, a no-op
//! update on a full day would spuriously reject.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar::DayBucket;
use crate::error::{LookupError, ScheduleError};
use crate::report::count_in_day;
use crate::types::{Car, Garage, MaintenanceRequest};
use crate::{calendar, ScheduleResult};

// =============================================================================
// Storage Capabilities
// =============================================================================

/// Existence and membership lookups, implemented by the persistence layer.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetches a car by id; `None` when it does not exist.
    async fn find_car(&self, car_id: &str) -> Result<Option<Car>, LookupError>;

    /// Fetches a garage by id; `None` when it does not exist.
    async fn find_garage(&self, garage_id: &str) -> Result<Option<Garage>, LookupError>;

    /// Whether the car is currently assigned to the garage.
    async fn is_car_assigned(&self, car_id: &str, garage_id: &str) -> Result<bool, LookupError>;
}

/// Booking reads, implemented by the persistence layer.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// All of the garage's requests with `scheduled_date` in `[start, end]`
    /// inclusive, in no particular order.
    async fn bookings_for_garage(
        &self,
        garage_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceRequest>, LookupError>;
}

// =============================================================================
// Proposal & Outcome
// =============================================================================

/// A booking attempt presented to the gate.
#[derive(Debug, Clone, Copy)]
pub struct BookingProposal<'a> {
    /// The car to service.
    pub car_id: &'a str,
    /// The garage to service it at.
    pub garage_id: &'a str,
    /// Raw `yyyy-mm-dd` input; parsing it is the gate's first check.
    pub scheduled_date: &'a str,
    /// Record id to leave out of the day's occupancy count. Set on updates
    /// to the id of the record being updated, `None` on creates.
    pub exclude_booking: Option<&'a str>,
}

/// A passed admission check. The caller may persist the booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// The parsed booking instant (UTC midnight of the target day).
    pub scheduled_for: DateTime<Utc>,
    /// The target calendar day.
    pub day: NaiveDate,
    /// Capacity still open on the day at check time, this booking included.
    /// Always >= 1 on an accepted admission.
    pub open_capacity: i64,
}

// =============================================================================
// Admission Controller
// =============================================================================

/// Runs the admission sequence over injected storage capabilities.
pub struct AdmissionController {
    directory: Arc<dyn Directory>,
    ledger: Arc<dyn BookingLedger>,
}

impl AdmissionController {
    /// Creates a controller over the given storage capabilities.
    pub fn new(directory: Arc<dyn Directory>, ledger: Arc<dyn BookingLedger>) -> Self {
        AdmissionController { directory, ledger }
    }

    /// Validates a proposed booking. See the module docs for the sequence.
    ///
    /// Every rejection is a typed [`ScheduleError`]; the lookups are awaited
    /// one at a time and the first failed check ends the attempt.
    pub async fn admit(&self, proposal: &BookingProposal<'_>) -> ScheduleResult<Admission> {
        let scheduled_for = calendar::parse_date(proposal.scheduled_date)?;

        if self.directory.find_car(proposal.car_id).await?.is_none() {
            return Err(ScheduleError::CarNotFound(proposal.car_id.to_string()));
        }

        let garage = self
            .directory
            .find_garage(proposal.garage_id)
            .await?
            .ok_or_else(|| ScheduleError::GarageNotFound(proposal.garage_id.to_string()))?;

        if !self
            .directory
            .is_car_assigned(proposal.car_id, proposal.garage_id)
            .await?
        {
            return Err(ScheduleError::CarNotInGarage {
                car_id: proposal.car_id.to_string(),
                garage_id: proposal.garage_id.to_string(),
            });
        }

        let bucket = DayBucket::containing(scheduled_for);
        let booked = self
            .ledger
            .bookings_for_garage(proposal.garage_id, bucket.start, bucket.end)
            .await?;
        let requests = count_in_day(&bucket, &booked, proposal.exclude_booking);

        let open_capacity = garage.capacity - requests;
        if open_capacity <= 0 {
            return Err(ScheduleError::CapacityExhausted {
                garage_id: garage.id,
                date: bucket.date,
                capacity: garage.capacity,
                booked: requests,
            });
        }

        Ok(Admission {
            scheduled_for,
            day: bucket.date,
            open_capacity,
        })
    }
}

// =============================================================================
// In-Memory Mock
// =============================================================================

/// Simple in-memory storage capabilities for tests and doc examples.
pub mod mock {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    /// In-memory [`Directory`] and [`BookingLedger`] backed by hash maps.
    #[derive(Default)]
    pub struct MockStore {
        cars: Mutex<HashMap<String, Car>>,
        garages: Mutex<HashMap<String, Garage>>,
        assignments: Mutex<HashSet<(String, String)>>,
        bookings: Mutex<Vec<MaintenanceRequest>>,
        failing: Mutex<bool>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_car(&self, car: Car) {
            self.cars.lock().unwrap().insert(car.id.clone(), car);
        }

        pub fn add_garage(&self, garage: Garage) {
            self.garages.lock().unwrap().insert(garage.id.clone(), garage);
        }

        pub fn assign(&self, car_id: &str, garage_id: &str) {
            self.assignments
                .lock()
                .unwrap()
                .insert((car_id.to_string(), garage_id.to_string()));
        }

        pub fn add_booking(&self, request: MaintenanceRequest) {
            self.bookings.lock().unwrap().push(request);
        }

        /// Makes every subsequent lookup fail, simulating a storage outage.
        pub fn fail_lookups(&self) {
            *self.failing.lock().unwrap() = true;
        }

        fn check_available(&self) -> Result<(), LookupError> {
            if *self.failing.lock().unwrap() {
                Err(LookupError::new("mock store unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Directory for MockStore {
        async fn find_car(&self, car_id: &str) -> Result<Option<Car>, LookupError> {
            self.check_available()?;
            Ok(self.cars.lock().unwrap().get(car_id).cloned())
        }

        async fn find_garage(&self, garage_id: &str) -> Result<Option<Garage>, LookupError> {
            self.check_available()?;
            Ok(self.garages.lock().unwrap().get(garage_id).cloned())
        }

        async fn is_car_assigned(
            &self,
            car_id: &str,
            garage_id: &str,
        ) -> Result<bool, LookupError> {
            self.check_available()?;
            Ok(self
                .assignments
                .lock()
                .unwrap()
                .contains(&(car_id.to_string(), garage_id.to_string())))
        }
    }

    #[async_trait]
    impl BookingLedger for MockStore {
        async fn bookings_for_garage(
            &self,
            garage_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<MaintenanceRequest>, LookupError> {
            self.check_available()?;
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|request| request.garage_id == garage_id)
                .filter(|request| start <= request.scheduled_date && request.scheduled_date <= end)
                .cloned()
                .collect())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::mock::MockStore;
    use super::*;
    use chrono::NaiveDate;

    fn car(id: &str) -> Car {
        Car {
            id: id.to_string(),
            make: "Hyundai".to_string(),
            model: "Accent".to_string(),
            production_year: 2018,
            license_plate: "CA-1234-XP".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn garage(id: &str, capacity: i64) -> Garage {
        Garage {
            id: id.to_string(),
            name: "Central Auto".to_string(),
            location: "12 Main St".to_string(),
            city: "Sofia".to_string(),
            capacity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking(id: &str, garage_id: &str, date: &str) -> MaintenanceRequest {
        MaintenanceRequest {
            id: id.to_string(),
            car_id: "car-1".to_string(),
            garage_id: garage_id.to_string(),
            service_type: "Oil change".to_string(),
            scheduled_date: calendar::parse_date(date).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn controller(store: Arc<MockStore>) -> AdmissionController {
        AdmissionController::new(store.clone(), store)
    }

    fn proposal<'a>(car_id: &'a str, garage_id: &'a str, date: &'a str) -> BookingProposal<'a> {
        BookingProposal {
            car_id,
            garage_id,
            scheduled_date: date,
            exclude_booking: None,
        }
    }

    /// Store with car-1 assigned to garage-1 (capacity 5).
    fn populated_store() -> Arc<MockStore> {
        let store = Arc::new(MockStore::new());
        store.add_car(car("car-1"));
        store.add_garage(garage("garage-1", 5));
        store.assign("car-1", "garage-1");
        store
    }

    #[tokio::test]
    async fn test_admits_into_empty_day() {
        let gate = controller(populated_store());

        let admission = gate
            .admit(&proposal("car-1", "garage-1", "2024-06-10"))
            .await
            .unwrap();

        assert_eq!(admission.day, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(admission.scheduled_for, calendar::parse_date("2024-06-10").unwrap());
        assert_eq!(admission.open_capacity, 5);
    }

    #[tokio::test]
    async fn test_invalid_date_rejected_before_existence_checks() {
        // Deliberately empty store: a car/garage lookup would also fail,
        // but the date check must win.
        let gate = controller(Arc::new(MockStore::new()));

        let err = gate
            .admit(&proposal("ghost-car", "ghost-garage", "2024-02-30"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::InvalidDate { .. }));
    }

    #[tokio::test]
    async fn test_unknown_car_rejected_before_garage_check() {
        let store = Arc::new(MockStore::new());
        let gate = controller(store);

        let err = gate
            .admit(&proposal("ghost-car", "ghost-garage", "2024-06-10"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::CarNotFound(id) if id == "ghost-car"));
    }

    #[tokio::test]
    async fn test_unknown_garage_rejected() {
        let store = Arc::new(MockStore::new());
        store.add_car(car("car-1"));
        let gate = controller(store);

        let err = gate
            .admit(&proposal("car-1", "ghost-garage", "2024-06-10"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::GarageNotFound(id) if id == "ghost-garage"));
    }

    #[tokio::test]
    async fn test_unassigned_car_rejected_before_capacity_check() {
        let store = Arc::new(MockStore::new());
        store.add_car(car("car-1"));
        store.add_garage(garage("garage-1", 5));
        // No assignment, and the day is already over capacity; membership
        // must be the reported failure.
        for i in 0..6 {
            store.add_booking(booking(&format!("m{i}"), "garage-1", "2024-06-10"));
        }
        let gate = controller(store);

        let err = gate
            .admit(&proposal("car-1", "garage-1", "2024-06-10"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::CarNotInGarage { .. }));
    }

    #[tokio::test]
    async fn test_last_slot_accepted_then_next_rejected() {
        let store = populated_store();
        for i in 0..4 {
            store.add_booking(booking(&format!("m{i}"), "garage-1", "2024-06-10"));
        }
        let gate = controller(store.clone());

        // 4 of 5 slots taken: the 5th booking fits.
        let admission = gate
            .admit(&proposal("car-1", "garage-1", "2024-06-10"))
            .await
            .unwrap();
        assert_eq!(admission.open_capacity, 1);

        // Day now full: the 6th is rejected.
        store.add_booking(booking("m4", "garage-1", "2024-06-10"));
        let err = gate
            .admit(&proposal("car-1", "garage-1", "2024-06-10"))
            .await
            .unwrap_err();

        match err {
            ScheduleError::CapacityExhausted {
                garage_id,
                date,
                capacity,
                booked,
            } => {
                assert_eq!(garage_id, "garage-1");
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
                assert_eq!(capacity, 5);
                assert_eq!(booked, 5);
            }
            other => panic!("expected CapacityExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_days_do_not_count_against_the_target_day() {
        let store = populated_store();
        for i in 0..5 {
            store.add_booking(booking(&format!("m{i}"), "garage-1", "2024-06-09"));
        }
        let gate = controller(store);

        let admission = gate
            .admit(&proposal("car-1", "garage-1", "2024-06-10"))
            .await
            .unwrap();
        assert_eq!(admission.open_capacity, 5);
    }

    #[tokio::test]
    async fn test_over_booked_day_reports_the_real_count() {
        let store = populated_store();
        for i in 0..7 {
            store.add_booking(booking(&format!("m{i}"), "garage-1", "2024-06-10"));
        }
        let gate = controller(store);

        let err = gate
            .admit(&proposal("car-1", "garage-1", "2024-06-10"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScheduleError::CapacityExhausted { capacity: 5, booked: 7, .. }
        ));
    }

    #[tokio::test]
    async fn test_update_excludes_its_own_record_from_the_count() {
        let store = populated_store();
        for i in 0..5 {
            store.add_booking(booking(&format!("m{i}"), "garage-1", "2024-06-10"));
        }
        let gate = controller(store);

        // A no-op update of m0 on the full day: its own slot is not held
        // against it.
        let admission = gate
            .admit(&BookingProposal {
                exclude_booking: Some("m0"),
                ..proposal("car-1", "garage-1", "2024-06-10")
            })
            .await
            .unwrap();
        assert_eq!(admission.open_capacity, 1);

        // Excluding a record from some other day changes nothing.
        let err = gate
            .admit(&BookingProposal {
                exclude_booking: Some("not-on-this-day"),
                ..proposal("car-1", "garage-1", "2024-06-10")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::CapacityExhausted { .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates_as_lookup_error() {
        let store = populated_store();
        store.fail_lookups();
        let gate = controller(store);

        let err = gate
            .admit(&proposal("car-1", "garage-1", "2024-06-10"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::Lookup(_)));
    }
}
