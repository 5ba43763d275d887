//! Durable key/value slots.
//!
//! A slot is a named blob of JSON text. On disk every slot is a single
//! `<slot>.json` file inside the data directory, overwritten wholesale on
//! each write.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::debug;

const SLOT_EXTENSION: &str = "json";

#[derive(Clone, Debug)]
pub enum Storage {
    Dir(PathBuf),
    Memory(Arc<Mutex<BTreeMap<String, String>>>),
}

impl Storage {
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::Dir(path.into())
    }

    pub fn memory() -> Self {
        Self::Memory(Arc::new(Mutex::new(BTreeMap::new())))
    }

    /// Returns `Ok(None)` when the slot has never been written.
    pub async fn read_slot(&self, slot: &str) -> io::Result<Option<String>> {
        match self {
            Self::Dir(dir) => match fs::read_to_string(slot_path(dir, slot)).await {
                Ok(contents) => Ok(Some(contents)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            },
            Self::Memory(slots) => Ok(slots.lock().await.get(slot).cloned()),
        }
    }

    pub async fn write_slot(&self, slot: &str, contents: &str) -> io::Result<()> {
        match self {
            Self::Dir(dir) => {
                fs::create_dir_all(dir).await?;
                let path = slot_path(dir, slot);
                fs::write(&path, contents).await?;
                debug!(path = %path.display(), bytes = contents.len(), "slot written");
                Ok(())
            }
            Self::Memory(slots) => {
                slots
                    .lock()
                    .await
                    .insert(slot.to_string(), contents.to_string());
                Ok(())
            }
        }
    }

    /// Slot names starting with `prefix`, sorted.
    pub async fn list_slots(&self, prefix: &str) -> io::Result<Vec<String>> {
        let mut names = match self {
            Self::Dir(dir) => {
                let mut entries = match fs::read_dir(dir).await {
                    Ok(entries) => entries,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                    Err(err) => return Err(err),
                };
                let mut names = Vec::new();
                while let Some(entry) = entries.next_entry().await? {
                    let path = entry.path();
                    if path.extension().and_then(|ext| ext.to_str()) != Some(SLOT_EXTENSION) {
                        continue;
                    }
                    if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                        if stem.starts_with(prefix) {
                            names.push(stem.to_string());
                        }
                    }
                }
                names
            }
            Self::Memory(slots) => slots
                .lock()
                .await
                .keys()
                .filter(|name| name.starts_with(prefix))
                .cloned()
                .collect(),
        };
        names.sort();
        Ok(names)
    }
}

fn slot_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{slot}.{SLOT_EXTENSION}"))
}
