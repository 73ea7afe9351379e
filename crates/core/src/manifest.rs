//! Catalog manifest stored alongside catalog fragments.

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// File name of the manifest inside a catalog directory.
pub const MANIFEST_FILE: &str = "catalog.manifest.json";

/// Version stamp of a catalog directory, read from its manifest.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    pub version: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogMetadata {
    /// Read the manifest of `catalog_dir`, returning `None` if it has none.
    pub fn read_dir(catalog_dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = catalog_dir.as_ref().join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let metadata = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(Some(metadata))
    }
}

impl fmt::Display for CatalogMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version.as_deref().unwrap_or("unversioned"))?;
        if let Some(updated_at) = self.updated_at {
            write!(f, " (updated {})", updated_at.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn missing_manifest_is_none() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(CatalogMetadata::read_dir(dir.path())?, None);
        Ok(())
    }

    #[test]
    fn manifest_fields_are_camel_case() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{ "version": "2024.1", "updatedAt": "2024-03-09T12:00:00Z" }"#,
        )?;

        let metadata = CatalogMetadata::read_dir(dir.path())?.expect("manifest present");
        assert_eq!(metadata.version.as_deref(), Some("2024.1"));
        assert_eq!(
            metadata.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap())
        );
        assert_eq!(metadata.to_string(), "2024.1 (updated 2024-03-09)");
        Ok(())
    }

    #[test]
    fn unstamped_catalogs_read_as_unversioned() {
        assert_eq!(CatalogMetadata::default().to_string(), "unversioned");
    }

    #[test]
    fn malformed_manifest_names_the_file() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json")?;

        let err = CatalogMetadata::read_dir(dir.path()).expect_err("manifest should be rejected");
        assert!(format!("{err:#}").contains(MANIFEST_FILE));
        Ok(())
    }
}
