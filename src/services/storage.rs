use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::{
    error::AppError,
    models::{reimbursement::ReimbursementRequest, trip::Trip},
    services::trips::TripStore,
};

/// On-disk shape of the start-up seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFile {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub reimbursements: Vec<ReimbursementRequest>,
}

#[derive(Clone)]
pub struct StorageService {
    seed_path: Arc<PathBuf>,
}

impl StorageService {
    pub fn new(seed_path: PathBuf) -> Self {
        Self {
            seed_path: Arc::new(seed_path),
        }
    }

    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    pub async fn load_seed(&self) -> Result<SeedFile, AppError> {
        let path = self.seed_path();
        if !fs::try_exists(path).await? {
            warn!(path = %path.display(), "seed file missing, starting with no trips");
            return Ok(SeedFile::default());
        }
        let raw = fs::read(path).await?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(SeedFile::default());
        }
        let seed: SeedFile = serde_json::from_slice(&raw)?;
        Ok(seed)
    }

    pub async fn load_store(&self) -> Result<TripStore, AppError> {
        let seed = self.load_seed().await?;
        info!(
            trips = seed.trips.len(),
            reimbursements = seed.reimbursements.len(),
            "seed loaded"
        );
        Ok(TripStore::seeded(seed.trips, seed.reimbursements))
    }

    /// Dumps the current store so a session can be inspected or replayed.
    pub async fn write_snapshot(&self, store: &TripStore, path: &Path) -> Result<(), AppError> {
        let snapshot = SeedFile {
            trips: store
                .list()
                .await
                .into_iter()
                .map(|trip| Trip::clone(&trip))
                .collect(),
            reimbursements: store.reimbursements().await,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec_pretty(&snapshot)?;
        fs::write(path, data).await?;
        Ok(())
    }
}
