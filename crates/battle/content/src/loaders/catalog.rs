//! Class catalog loader.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::catalog::ClassCatalog;
use crate::loaders::{LoadResult, read_file};

/// Loader for class catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    ///
    /// RON format: `Vec<ClassTemplate>`. Only the listed classes are present;
    /// use [`CatalogLoader::load_over`] to patch the built-in catalog instead.
    pub fn load(path: &Path) -> LoadResult<ClassCatalog> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)
            .with_context(|| format!("Failed to parse class catalog {}", path.display()))?;
        debug!(path = %path.display(), classes = catalog.len(), "class catalog loaded");
        Ok(catalog)
    }

    /// Load a RON file and overlay it onto `base`.
    pub fn load_over(base: ClassCatalog, path: &Path) -> LoadResult<ClassCatalog> {
        let mut catalog = base;
        catalog.merge(Self::load(path)?);
        Ok(catalog)
    }

    pub fn parse(content: &str) -> LoadResult<ClassCatalog> {
        let catalog: ClassCatalog =
            ron::from_str(content).map_err(|e| anyhow::anyhow!("invalid catalog RON: {}", e))?;
        anyhow::ensure!(!catalog.is_empty(), "class catalog is empty");
        for template in catalog.iter() {
            if let Some(attribute) = template.range.inverted() {
                anyhow::bail!(
                    "{} has inverted {} bounds ({})",
                    template.tag,
                    attribute,
                    template.range.bounds(attribute)
                );
            }
        }
        Ok(catalog)
    }

    /// Renders a catalog as pretty RON, e.g. to seed a data file.
    pub fn to_ron(catalog: &ClassCatalog) -> LoadResult<String> {
        ron::ser::to_string_pretty(catalog, ron::ser::PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize class catalog: {}", e))
    }
}
