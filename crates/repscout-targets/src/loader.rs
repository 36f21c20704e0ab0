//! Target definition loading from TOML files.
//!
//! A definition file holds one or more `[[targets]]` tables. The built-in
//! catalog ships inside the crate; a directory of additional files can be
//! loaded on top of or instead of it.

use crate::{
    definition::{TargetConfig, TargetFile},
    error::{Result, TargetError},
};
use repscout_core::TargetSlug;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const BUILTIN_CATALOG: &str = include_str!("../data/targets.toml");

/// Loader for target definitions from a directory of TOML files.
pub struct TargetLoader {
    /// Base directory containing definition files
    definitions_dir: PathBuf,
}

impl TargetLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(TargetError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Parse and validate the catalog compiled into the crate.
    pub fn builtin_catalog() -> Result<Vec<TargetConfig>> {
        let file = parse_file(BUILTIN_CATALOG, "<built-in>")?;
        for target in &file.targets {
            target.validate()?;
        }
        debug!(count = file.targets.len(), "parsed built-in target catalog");
        Ok(file.targets)
    }

    /// Load a single target definition by slug.
    ///
    /// # Errors
    /// Returns `NotFound` if no valid file in the directory defines the slug.
    pub fn load(&self, slug: &TargetSlug) -> Result<TargetConfig> {
        self.load_all()?
            .into_iter()
            .find(|t| &t.slug == slug)
            .ok_or_else(|| TargetError::NotFound {
                slug: slug.to_string(),
            })
    }

    /// Load all target definitions from the definitions directory.
    ///
    /// Files that fail to parse and definitions that fail validation are
    /// logged as warnings and skipped. Files are visited in name order.
    pub fn load_all(&self) -> Result<Vec<TargetConfig>> {
        let mut targets = Vec::new();

        Self::walk_and_load_recursive(&self.definitions_dir, &mut targets)?;

        info!(
            count = targets.len(),
            dir = %self.definitions_dir.display(),
            "loaded target definitions"
        );

        Ok(targets)
    }

    fn walk_and_load_recursive(dir: &Path, targets: &mut Vec<TargetConfig>) -> Result<()> {
        let mut paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            if path.is_dir() {
                Self::walk_and_load_recursive(&path, targets)?;
                continue;
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }

            match Self::load_from_path(&path) {
                Ok(file) => {
                    for target in file.targets {
                        if let Err(e) = target.validate() {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "skipping invalid target definition"
                            );
                            continue;
                        }
                        targets.push(target);
                    }
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load target definition file"
                    );
                }
            }
        }

        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<TargetFile> {
        let contents = std::fs::read_to_string(path).map_err(|e| TargetError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        parse_file(&contents, &path.display().to_string())
    }
}

fn parse_file(contents: &str, origin: &str) -> Result<TargetFile> {
    toml::from_str(contents).map_err(|source| TargetError::ParseError {
        path: origin.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{StrategyKind, TargetCategory};
    use tempfile::TempDir;

    fn write_definition(dir: &Path, file: &str, slug: &str, rate_limit: u32) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create dir");
        let path = dir.join(file);
        let content = format!(
            r#"
[[targets]]
name = "Test {slug}"
slug = "{slug}"
base_url = "https://{slug}.example.org"
category = "home-kitchen"
strategy = "search-engine"
rate_limit = {rate_limit}
"#
        );
        std::fs::write(&path, content).expect("write definition");
        path
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let targets = TargetLoader::builtin_catalog().expect("builtin catalog");
        assert_eq!(targets.len(), 43);
        assert_eq!(targets[0].slug.as_str(), "mary-kay");

        let with_locator = targets.iter().filter(|t| t.has_locator()).count();
        assert!(with_locator > 0);
        assert!(targets
            .iter()
            .all(|t| t.has_locator() == (t.strategy == StrategyKind::Locator)));
    }

    #[test]
    fn test_builtin_slugs_unique() {
        let targets = TargetLoader::builtin_catalog().expect("builtin catalog");
        let slugs: std::collections::HashSet<_> = targets.iter().map(|t| &t.slug).collect();
        assert_eq!(slugs.len(), targets.len());
    }

    #[test]
    fn test_loader_new_with_nonexistent_dir() {
        let loader = TargetLoader::new("/nonexistent/path/to/targets");
        assert!(matches!(loader, Err(TargetError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_load_all_recursive_and_multi_target_files() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_definition(temp_dir.path(), "a.toml", "alpha-co", 10);
        write_definition(&temp_dir.path().join("nested"), "b.toml", "beta-co", 20);

        let multi = temp_dir.path().join("multi.toml");
        std::fs::write(
            &multi,
            r#"
[[targets]]
name = "Gamma"
slug = "gamma"
base_url = "https://gamma.example.org"
locator_url = "https://gamma.example.org/find"
category = "wine"
strategy = "locator"

[[targets]]
name = "Delta"
slug = "delta"
base_url = "https://delta.example.org"
category = "fitness"
strategy = "social"
enabled = false
"#,
        )
        .expect("write multi file");

        let loader = TargetLoader::new(temp_dir.path()).expect("create loader");
        let targets = loader.load_all().expect("load all");
        assert_eq!(targets.len(), 4);

        let gamma = targets
            .iter()
            .find(|t| t.slug.as_str() == "gamma")
            .expect("gamma loaded");
        assert_eq!(gamma.category, TargetCategory::Wine);
        assert!(gamma.has_locator());
    }

    #[test]
    fn test_load_all_skips_invalid() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_definition(temp_dir.path(), "good.toml", "good-co", 10);
        write_definition(temp_dir.path(), "zero-rate.toml", "zero-co", 0);
        std::fs::write(temp_dir.path().join("broken.toml"), "not [[[ toml")
            .expect("write broken file");
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").expect("write txt");

        let loader = TargetLoader::new(temp_dir.path()).expect("create loader");
        let targets = loader.load_all().expect("load all");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].slug.as_str(), "good-co");
    }

    #[test]
    fn test_load_single_target() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_definition(temp_dir.path(), "one.toml", "solo-co", 30);

        let loader = TargetLoader::new(temp_dir.path()).expect("create loader");
        let slug = TargetSlug::new("solo-co").expect("valid slug");
        let target = loader.load(&slug).expect("load target");
        assert_eq!(target.rate_limit, 30);

        let missing = TargetSlug::new("missing").expect("valid slug");
        assert!(matches!(
            loader.load(&missing),
            Err(TargetError::NotFound { .. })
        ));
    }
}
