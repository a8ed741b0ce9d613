use crate::ledger::Ledger;
use crate::profile::AthleteProfile;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared handler state. The ledger mutex is the single-writer lock that
/// serializes every read-modify-write.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<Ledger>>,
    pub profile_path: PathBuf,
    pub profile: Arc<Mutex<AthleteProfile>>,
}

impl AppState {
    pub fn new(ledger: Ledger, profile_path: PathBuf, profile: AthleteProfile) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            profile_path,
            profile: Arc::new(Mutex::new(profile)),
        }
    }
}
