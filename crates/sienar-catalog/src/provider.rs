use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::CatalogError;

#[derive(Debug)]
enum Source {
    File(PathBuf),
    Fixed(Catalog),
}

/// Hands out a catalog, loading it from disk on first use.
///
/// The provider is owned by whoever needs the catalog; nothing is shared
/// process-wide. A file-backed provider keeps its copy until
/// [`refresh`](Self::refresh) or [`invalidate`](Self::invalidate).
#[derive(Debug)]
pub struct CatalogProvider {
    source: Source,
    loaded: Option<Catalog>,
}

impl CatalogProvider {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
            loaded: None,
        }
    }

    /// A provider that always returns `catalog`
    pub fn fixed(catalog: Catalog) -> Self {
        Self {
            source: Source::Fixed(catalog),
            loaded: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File(path) => Some(path),
            Source::Fixed(_) => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        match self.source {
            Source::File(_) => self.loaded.is_some(),
            Source::Fixed(_) => true,
        }
    }

    pub fn catalog(&mut self) -> Result<&Catalog, CatalogError> {
        match &self.source {
            Source::Fixed(catalog) => Ok(catalog),
            Source::File(path) => {
                let catalog = match self.loaded.take() {
                    Some(catalog) => catalog,
                    None => Catalog::from_path(path)?,
                };
                Ok(&*self.loaded.insert(catalog))
            }
        }
    }

    /// Re-read the catalog file. On failure the previously loaded copy is kept.
    pub fn refresh(&mut self) -> Result<&Catalog, CatalogError> {
        if let Source::File(path) = &self.source {
            log::info!("refreshing catalog from {}", path.display());
            let catalog = Catalog::from_path(path)?;
            self.loaded = Some(catalog);
        }
        self.catalog()
    }

    /// Drop the loaded copy; the next [`catalog`](Self::catalog) call reads the file again
    pub fn invalidate(&mut self) {
        self.loaded = None;
    }
}
