use std::{future::Future, io::ErrorKind, path::PathBuf};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::warn;

use super::entity::Settings;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Interface for abstracting persistence of settings. The daemon reloads
/// through this on every tick, so edits made by the cli are picked up without
/// a restart.
pub trait SettingsStore {
    fn load(&self) -> impl Future<Output = Result<Settings>>;

    fn save(&self, settings: &Settings) -> impl Future<Output = Result<()>>;
}

/// The main realization of [SettingsStore]. Everything lives in one json file
/// inside the application directory, guarded by advisory file locks since the
/// cli and the daemon touch it concurrently.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(settings_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&settings_dir)?;

        Ok(Self {
            path: settings_dir.join(SETTINGS_FILE_NAME),
        })
    }

    async fn read_current(&self) -> Result<Option<String>> {
        let mut file = match File::open(&self.path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;
        let mut content = String::new();
        let result = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        result?;
        Ok(Some(content))
    }
}

impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<Settings> {
        let Some(content) = self.read_current().await? else {
            return Ok(Settings::default());
        };
        match serde_json::from_str::<Settings>(&content) {
            Ok(v) => Ok(v),
            Err(e) => {
                // Might happen after a shutdown cutting off a write. Degrade to
                // "unset" instead of refusing to work.
                warn!("Settings file {:?} holds illegal json: {e}", self.path);
                Ok(Settings::default())
            }
        }
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;

        file.lock_exclusive()?;
        let result = write_settings(&mut file, settings).await;
        file.unlock_async().await?;
        result
    }
}

async fn write_settings(file: &mut File, settings: &Settings) -> Result<()> {
    let buffer = serde_json::to_vec_pretty(settings)?;
    file.write_all(&buffer).await?;
    file.flush().await?;
    Ok(())
}
