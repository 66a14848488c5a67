//! Storage Config

use std::{path::PathBuf, sync::Arc};

use clap::Args;

use crate::storage::{FileStorage, MemoryStorage, Storage};

/// Local persistence settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory for the persisted cart and address; kept in memory when unset
    #[arg(long, env = "STOREFRONT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Open the configured store.
    pub fn open(&self) -> Arc<dyn Storage> {
        match &self.data_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        }
    }
}
