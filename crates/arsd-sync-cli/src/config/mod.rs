//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use arsd_sync::SyncConfig;

/// Directory name used under the working directory and the home directory.
const DATA_DIR: &str = ".arsd-sync";

/// Resolve the record store path.
pub fn resolve_store_path(explicit: Option<&str>) -> PathBuf {
    resolve("ARSD_SYNC_STORE", "records.db", explicit)
}

/// Resolve the optional JSON config file path.
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    resolve("ARSD_SYNC_CONFIG", "config.json", explicit)
}

/// Flag, then environment variable, then an existing `./.arsd-sync/<file>`,
/// then `~/.arsd-sync/<file>`.
fn resolve(env_var: &str, file: &str, explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(env_var) {
        return PathBuf::from(env_path);
    }

    let cwd_path = Path::new(DATA_DIR).join(file);
    if cwd_path.exists() {
        return cwd_path;
    }

    default_dir().join(file)
}

pub(crate) fn default_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR)
}

/// Load the engine configuration. A missing file means defaults;
/// `ARSD_PORTAL_URL` overrides the portal root either way.
pub fn load_config(path: &Path) -> Result<SyncConfig> {
    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        SyncConfig::from_json(&raw)
            .with_context(|| format!("invalid config: {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        SyncConfig::default()
    };

    if let Ok(url) = std::env::var("ARSD_PORTAL_URL") {
        config.portal.base_url = url;
    }
    Ok(config)
}
