//! Durable key/value configuration with section grouping.
//!
//! Settings live in an INI-style text file of named sections holding
//! `key = value` lines. Every operation re-reads the whole file and mutating
//! operations rewrite it; last writer wins, which is acceptable for the
//! single-operator, low-frequency usage this store sees.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};

/// Section created when the file does not exist yet.
pub const DEFAULT_SECTION: &str = "camera_settings";
const DEFAULT_RESOLUTION_KEY: &str = "resolution";
const DEFAULT_RESOLUTION_VALUE: &str = "1920, 1080";

type Sections = IndexMap<String, IndexMap<String, String>>;

/// Settings store backed by a sectioned text file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Retrieve the value of a setting.
    pub async fn get(&self, section: &str, key: &str) -> Result<String> {
        self.ensure_defaults().await?;
        let sections = self.load().await?;
        let value = sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .cloned()
            .ok_or_else(|| Error::setting_not_found(section, key))?;
        debug!(section, key, "Get setting");
        Ok(value)
    }

    /// Create or update a setting.
    pub async fn set(&self, section: &str, key: &str, value: &str) -> Result<()> {
        self.ensure_defaults().await?;
        let mut sections = self.load().await?;
        sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.store(&sections).await?;
        debug!(section, key, "Updated setting");
        Ok(())
    }

    /// Delete a setting. The section itself is kept, even when emptied.
    pub async fn delete(&self, section: &str, key: &str) -> Result<()> {
        self.ensure_defaults().await?;
        let mut sections = self.load().await?;
        let removed = sections
            .get_mut(section)
            .and_then(|entries| entries.shift_remove(key));
        if removed.is_none() {
            return Err(Error::setting_not_found(section, key));
        }
        self.store(&sections).await?;
        debug!(section, key, "Deleted setting");
        Ok(())
    }

    /// Create the file with default contents when it is absent.
    async fn ensure_defaults(&self) -> Result<()> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        let mut defaults = Sections::new();
        defaults.insert(
            DEFAULT_SECTION.to_string(),
            IndexMap::from([(
                DEFAULT_RESOLUTION_KEY.to_string(),
                DEFAULT_RESOLUTION_VALUE.to_string(),
            )]),
        );
        self.store(&defaults).await?;
        debug!(path = %self.path.display(), "Created settings file with defaults");
        Ok(())
    }

    async fn load(&self) -> Result<Sections> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse(&contents))
    }

    async fn store(&self, sections: &Sections) -> Result<()> {
        tokio::fs::write(&self.path, render(sections)).await?;
        Ok(())
    }
}

fn parse(contents: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        if let (Some(section), Some((key, value))) = (&current, line.split_once('=')) {
            if let Some(entries) = sections.get_mut(section) {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    sections
}

fn render(sections: &Sections) -> String {
    let mut out = String::new();
    for (name, entries) in sections {
        out.push('[');
        out.push_str(name);
        out.push_str("]\n");
        for (key, value) in entries {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.ini"))
    }

    #[tokio::test]
    async fn test_first_access_creates_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let value = store.get(DEFAULT_SECTION, "resolution").await.expect("get");
        assert_eq!(value, "1920, 1080");
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store
            .set("camera_settings", "resolution", "1280,720")
            .await
            .expect("set");
        let value = store
            .get("camera_settings", "resolution")
            .await
            .expect("get");
        assert_eq!(value, "1280,720");
    }

    #[tokio::test]
    async fn test_get_missing_key_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let err = store.get("camera_settings", "missing").await.unwrap_err();
        assert!(matches!(err, Error::SettingNotFound { .. }));

        let err = store.get("no_such_section", "resolution").await.unwrap_err();
        assert!(matches!(err, Error::SettingNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_then_get_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.set("camera_settings", "rotation", "90").await.expect("set");
        store
            .delete("camera_settings", "rotation")
            .await
            .expect("delete");

        let err = store.get("camera_settings", "rotation").await.unwrap_err();
        assert!(matches!(err, Error::SettingNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_key_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let err = store.delete("camera_settings", "missing").await.unwrap_err();
        assert!(matches!(err, Error::SettingNotFound { .. }));
    }

    #[tokio::test]
    async fn test_rewrite_preserves_section_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.set("stream", "quality", "high").await.expect("set");
        store.set("camera_settings", "rotation", "180").await.expect("set");

        let contents = tokio::fs::read_to_string(store.path()).await.expect("read");
        let camera_at = contents.find("[camera_settings]").expect("camera section");
        let stream_at = contents.find("[stream]").expect("stream section");
        assert!(camera_at < stream_at);
    }
}
