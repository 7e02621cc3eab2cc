//! Singleton bot settings.

use crate::database::Namespace;
use crate::document::Collection;
use crate::models::BotSettings;
use crate::Result;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Service owning the single [`BotSettings`] record.
#[derive(Debug)]
pub struct SettingsStore {
    collection: Collection<BotSettings>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Opens the settings collection in `namespace`.
    pub fn new(namespace: &Namespace) -> Result<Self> {
        Ok(Self {
            collection: namespace.collection()?,
            write_lock: Mutex::new(()),
        })
    }

    /// Inserts a default record if the collection is empty.
    ///
    /// Returns `true` when a record was created. Existing duplicates are left
    /// alone.
    pub async fn ensure_exists(&self) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        self.ensure_exists_locked().await
    }

    /// First settings record, if any.
    pub fn get(&self) -> Result<Option<BotSettings>> {
        Ok(self.collection.find_all()?.into_iter().next())
    }

    /// Flips the toggle and persists it, returning the new value.
    pub async fn toggle(&self) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        self.ensure_exists_locked().await?;

        let mut settings = self.get()?.unwrap_or_default();
        settings.toggle = !settings.toggle;
        self.collection.save(&settings).await?;

        info!("Settings toggle is now {}", settings.toggle);
        Ok(settings.toggle)
    }

    /// Number of stored settings records.
    pub fn count(&self) -> usize {
        self.collection.count()
    }

    async fn ensure_exists_locked(&self) -> Result<bool> {
        if self.collection.count() > 0 {
            debug!("Settings record already present");
            return Ok(false);
        }

        self.collection.insert_one(&BotSettings::new()).await?;
        info!("Created default settings record");
        Ok(true)
    }
}
