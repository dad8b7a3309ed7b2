//! Loads the ability catalog from disk.
//!
//! Two layouts are accepted: a single JSON document with every section keyed
//! by path, or a directory holding one `<path>.json` file per path.

use std::fs;
use std::path::{Path, PathBuf};

use essencecalc_domain::{AbilityCatalog, EssencePath};
use essencecalc_shared::{parse_catalog, parse_path_sections, CatalogLoadError, CatalogSource};
use thiserror::Error;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Catalog not found at {0}")]
    NotFound(PathBuf),
    #[error("Unexpected catalog file {0}: file name must be an essence path")]
    UnknownPathFile(PathBuf),
    #[error("Invalid catalog in {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: CatalogLoadError,
    },
}

/// Reads catalog JSON from a file or directory.
pub struct CatalogLoader {
    root: PathBuf,
}

impl CatalogLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self) -> Result<AbilityCatalog, CatalogLoaderError> {
        if self.root.is_dir() {
            self.load_directory()
        } else if self.root.is_file() {
            let text = read(&self.root)?;
            let catalog = parse_catalog(&text).map_err(|source| CatalogLoaderError::Invalid {
                path: self.root.clone(),
                source,
            })?;
            tracing::info!(
                path = %self.root.display(),
                abilities = catalog.len(),
                "Loaded ability catalog"
            );
            Ok(catalog)
        } else {
            Err(CatalogLoaderError::NotFound(self.root.clone()))
        }
    }

    fn load_directory(&self) -> Result<AbilityCatalog, CatalogLoaderError> {
        let entries = fs::read_dir(&self.root).map_err(|source| CatalogLoaderError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        let mut source = CatalogSource::default();
        for file in &files {
            let path = path_from_file_name(file)?;
            let text = read(file)?;
            let sections =
                parse_path_sections(&text).map_err(|source| CatalogLoaderError::Invalid {
                    path: file.clone(),
                    source,
                })?;
            tracing::debug!(
                path = %path,
                abilities = sections.abilities.len(),
                cantrips = sections.cantrips.len(),
                spells = sections.spells.len(),
                "Read path catalog file"
            );
            source.insert_path(path, sections);
        }

        let catalog = source
            .into_catalog()
            .map_err(|source| CatalogLoaderError::Invalid {
                path: self.root.clone(),
                source,
            })?;
        tracing::info!(
            path = %self.root.display(),
            files = files.len(),
            abilities = catalog.len(),
            "Loaded ability catalog"
        );
        Ok(catalog)
    }
}

fn read(path: &Path) -> Result<String, CatalogLoaderError> {
    fs::read_to_string(path).map_err(|source| CatalogLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn path_from_file_name(file: &Path) -> Result<EssencePath, CatalogLoaderError> {
    file.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
        .ok_or_else(|| CatalogLoaderError::UnknownPathFile(file.to_path_buf()))
}
