//! Shared application state handed to every request handler.

use std::sync::Arc;

use pitstop_core::AdmissionController;
use pitstop_db::Database;

use crate::locks::DayLocks;

/// State shared across all routes.
///
/// Cloning is cheap: the database wraps a connection pool handle and the
/// rest are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub admission: Arc<AdmissionController>,

    /// Present only when `PITSTOP_SERIALIZE_ADMISSIONS` is on.
    pub day_locks: Option<Arc<DayLocks>>,
}

impl AppState {
    pub fn new(db: Database, serialize_admissions: bool) -> Self {
        // The database doubles as both storage capabilities the admission
        // controller needs.
        let store: Arc<Database> = Arc::new(db.clone());
        let admission = Arc::new(AdmissionController::new(store.clone(), store));
        let day_locks = serialize_admissions.then(|| Arc::new(DayLocks::new()));

        AppState {
            db,
            admission,
            day_locks,
        }
    }
}
