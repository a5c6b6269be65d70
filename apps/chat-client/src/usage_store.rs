//! Persistence for the daily usage counter.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use garage_core::chat::DailyUsage;

pub struct UsageStore {
    path: PathBuf,
}

impl UsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved usage; a missing or unreadable file starts a fresh counter.
    pub fn load(&self) -> DailyUsage {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return DailyUsage::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cannot read usage file");
                return DailyUsage::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Corrupt usage file, resetting");
            DailyUsage::default()
        })
    }

    pub fn save(&self, usage: &DailyUsage) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        // write-then-rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(usage)?)
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scratch(name: &str) -> PathBuf {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        std::env::temp_dir().join(format!("garage-chat-{name}-{}-{nanos}.json", std::process::id()))
    }

    #[test]
    fn test_missing_file_is_fresh_usage() {
        let store = UsageStore::new(scratch("missing"));
        assert_eq!(store.load(), DailyUsage::default());
    }

    #[test]
    fn test_saved_usage_is_reloaded() {
        let path = scratch("saved");
        let store = UsageStore::new(&path);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let mut usage = store.load();
        usage.record(today);
        usage.record(today);
        store.save(&usage).unwrap();

        assert_eq!(store.load().used_on(today), 2);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_corrupt_file_resets() {
        let path = scratch("corrupt");
        fs::write(&path, "{not json").unwrap();

        assert_eq!(UsageStore::new(&path).load(), DailyUsage::default());
        fs::remove_file(path).ok();
    }
}
