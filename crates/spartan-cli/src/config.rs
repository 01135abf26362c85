//! Configuration file support for spartan
//!
//! Loads `.spartan.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use serde::Deserialize;
use spartan_engine::DriverConfig;
use spartan_tippers::{Category, Enablement};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".spartan.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Category name -> enabled; unlisted categories stay on
    pub categories: HashMap<String, bool>,
    pub driver: DriverSection,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DriverSection {
    pub pass_ceiling: Option<usize>,
    pub parallel: Option<bool>,
    pub eager_fixed_point: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "diff"
    pub format: Option<String>,
}

impl Config {
    /// Load config from `.spartan.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Compute the effective category switches.
    ///
    /// Categories named on the command line replace the config table; the
    /// `--disable` list is applied last.
    pub fn enablement(&self, cli_categories: &[String], cli_disabled: &[String]) -> Result<Enablement> {
        let mut enablement = if cli_categories.is_empty() {
            Enablement::from_map(&self.categories).context("Invalid [categories] table")?
        } else {
            Enablement::only(parse_categories(cli_categories)?)
        };

        for category in parse_categories(cli_disabled)? {
            enablement.set(category, false);
        }

        Ok(enablement)
    }

    /// Driver settings from the `[driver]` table, overridden by CLI flags
    pub fn driver_config(&self, cli_passes: Option<usize>, cli_parallel: bool) -> DriverConfig {
        let defaults = DriverConfig::default();
        DriverConfig {
            pass_ceiling: cli_passes
                .or(self.driver.pass_ceiling)
                .unwrap_or(defaults.pass_ceiling),
            parallel: cli_parallel || self.driver.parallel.unwrap_or(defaults.parallel),
            eager_fixed_point: self
                .driver
                .eager_fixed_point
                .unwrap_or(defaults.eager_fixed_point),
        }
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            // Directory patterns match any path component
            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}

fn parse_categories(names: &[String]) -> Result<Vec<Category>> {
    names
        .iter()
        .map(|name| {
            name.parse::<Category>()
                .with_context(|| "Use --list-tippers to see available categories")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_load_basic_config() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            r#"
[categories]
ternarization = false

[driver]
pass_ceiling = 7
parallel = true

[paths]
exclude = ["fixtures/", "*.generated.json"]

[output]
format = "json"
"#,
        );

        let (config, path) = Config::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(config.categories.get("ternarization"), Some(&false));
        assert_eq!(config.driver.pass_ceiling, Some(7));
        assert_eq!(config.driver.parallel, Some(true));
        assert_eq!(
            config.paths.exclude,
            vec!["fixtures/".to_string(), "*.generated.json".to_string()]
        );
        assert_eq!(config.output.format, Some("json".to_string()));
    }

    #[test]
    fn test_load_empty_config() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "");

        let (config, _) = Config::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert!(config.categories.is_empty());
        assert!(config.driver.pass_ceiling.is_none());
        assert!(config.paths.exclude.is_empty());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_found_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[driver]\npass_ceiling = 3\n");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let (config, path) = Config::load_from(nested).unwrap().unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(config.driver.pass_ceiling, Some(3));
    }

    #[test]
    fn test_no_config_found() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(temp.path().to_path_buf()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[driver\npass_ceiling = ");
        let err = Config::load_from(temp.path().to_path_buf()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_enablement_from_table() {
        let mut config = Config::default();
        config.categories.insert("ternarization".to_string(), false);

        let enablement = config.enablement(&[], &[]).unwrap();
        assert!(!enablement.is_enabled(Category::Ternarization));
        assert!(enablement.is_enabled(Category::InVain));
    }

    #[test]
    fn test_enablement_cli_override() {
        let mut config = Config::default();
        config.categories.insert("simplification".to_string(), false);

        let enablement = config
            .enablement(&["simplification".to_string()], &[])
            .unwrap();
        assert_eq!(enablement.enabled(), vec![Category::Simplification]);
    }

    #[test]
    fn test_enablement_with_disabled() {
        let config = Config::default();
        let enablement = config
            .enablement(&[], &["in-vain".to_string()])
            .unwrap();
        assert!(!enablement.is_enabled(Category::InVain));
        assert!(enablement.is_enabled(Category::SyntacticBaggage));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut config = Config::default();
        config.categories.insert("style".to_string(), true);
        assert!(config.enablement(&[], &[]).is_err());
        assert!(Config::default()
            .enablement(&["bogus".to_string()], &[])
            .is_err());
    }

    #[test]
    fn test_driver_config_precedence() {
        let mut config = Config::default();
        assert_eq!(config.driver_config(None, false), DriverConfig::default());

        config.driver.pass_ceiling = Some(4);
        config.driver.eager_fixed_point = Some(false);
        let from_file = config.driver_config(None, false);
        assert_eq!(from_file.pass_ceiling, 4);
        assert!(!from_file.eager_fixed_point);

        let from_cli = config.driver_config(Some(9), true);
        assert_eq!(from_cli.pass_ceiling, 9);
        assert!(from_cli.parallel);
    }

    #[test]
    fn test_should_exclude_glob() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["*.generated.json".to_string()],
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("foo.generated.json")));
        assert!(!config.should_exclude(Path::new("foo.json")));
    }

    #[test]
    fn test_should_exclude_directory() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["fixtures/".to_string()],
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("project/fixtures/a.json")));
        assert!(config.should_exclude(Path::new("fixtures/b.json")));
        assert!(!config.should_exclude(Path::new("src/fixtures.json")));
    }
}
