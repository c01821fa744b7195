use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::report::DocumentSettings;

/// File name of the tracking database
pub const DATABASE_FILE: &str = "internship_tracking.db";

/// Set in hosted or ephemeral runtimes; moves the default database to the temp dir
pub const EPHEMERAL_ENV: &str = "KYRA_EPHEMERAL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KyraConfig {
    pub database: Option<String>,
    pub fonts_dir: Option<String>,
    pub font_family: Option<String>,
}

impl KyraConfig {
    /// PDF settings with any configured font overrides applied
    pub fn document_settings(&self) -> DocumentSettings {
        let mut settings = DocumentSettings::default();
        if let Some(dir) = &self.fonts_dir {
            settings.fonts_dir = PathBuf::from(dir);
        }
        if let Some(family) = &self.font_family {
            settings.font_family = family.clone();
        }
        settings
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("kyra.toml")
}

/// Default database location: `base` normally, the temp dir when ephemeral
pub fn default_database_path_in(base: &Path, ephemeral: bool) -> PathBuf {
    if ephemeral {
        std::env::temp_dir().join(DATABASE_FILE)
    } else {
        base.join(DATABASE_FILE)
    }
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let ephemeral = std::env::var_os(EPHEMERAL_ENV).is_some();
    Ok(default_database_path_in(&cwd, ephemeral))
}

/// Pick the database path: explicit flag, then config file, then default
pub fn resolve_database_path(
    explicit: Option<&Path>,
    config: Option<&KyraConfig>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(db) = config.and_then(|c| c.database.as_deref()) {
        return Ok(PathBuf::from(db));
    }
    default_database_path()
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<KyraConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: KyraConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &KyraConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
