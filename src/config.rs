//! Application configuration management.
//!
//! Configuration is layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. The user file `<config_dir>/textdupe/config.toml`
//! 3. The project file, the first of `.textdupe.toml` or `textdupe.toml`
//!    found in the scanned root
//! 4. An explicit `--config <FILE>` (an error if missing)
//! 5. `TEXTDUPE_*` environment variables (e.g. `TEXTDUPE_MIN_LINES=4`)
//! 6. Command-line flags ([`Config::apply_check_args`])
//!
//! Unknown keys in a file never fail the load. They are logged as warnings,
//! with a suggestion when a known key is close enough.
//!
//! # Example
//!
//! ```
//! use textdupe::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.min_lines, 3);
//! assert!(config.validate().is_ok());
//! ```

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::CheckArgs;
use crate::duplicates::{DetectionConfig, LineCounting};
use crate::scanner::WalkerConfig;

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "TEXTDUPE_";

/// File names looked up in the scanned root, in order.
pub const PROJECT_CONFIG_FILES: [&str; 2] = [".textdupe.toml", "textdupe.toml"];

/// Every key accepted in a configuration file.
pub const KNOWN_KEYS: &[&str] = &[
    "include",
    "ignore",
    "min_lines",
    "min_chars",
    "failure_threshold",
    "line_counting",
    "respect_gitignore",
    "follow_symlinks",
    "io_threads",
];

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A layer could not be read or did not match the expected types.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// A value is outside its allowed range.
    #[error("Invalid configuration value for `{field}`: {message}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// `init` refused to replace an existing file.
    #[error("Configuration file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    /// The default configuration could not be rendered as TOML.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Writing a configuration file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Target file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gitignore-style globs selecting documents.
    pub include: Vec<String>,

    /// Gitignore-style globs excluded from the scan.
    pub ignore: Vec<String>,

    /// Minimum lines for a paragraph to be compared.
    pub min_lines: usize,

    /// Paragraphs must be longer than this many characters.
    pub min_chars: usize,

    /// Minimum passing originality score, in percent.
    pub failure_threshold: f64,

    /// How duplicated lines are counted.
    pub line_counting: LineCounting,

    /// Also apply the root `.gitignore`.
    pub respect_gitignore: bool,

    /// Follow symbolic links during discovery.
    pub follow_symlinks: bool,

    /// Reader thread-pool size.
    pub io_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: ["**/*.md", "**/*.markdown", "**/*.txt", "**/*.rst", "**/*.adoc"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            ignore: ["node_modules/", "target/", ".git/"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            min_lines: 3,
            min_chars: 50,
            failure_threshold: 90.0,
            line_counting: LineCounting::Legacy,
            respect_gitignore: true,
            follow_symlinks: false,
            io_threads: 4,
        }
    }
}

impl Config {
    /// Load configuration for a scan of `root` from the given file layers.
    ///
    /// `user` is normally [`Config::user_config_path`]. The result is not
    /// validated; call [`Config::validate`] after applying command-line
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] for unreadable layers, wrong types, or a
    /// missing `explicit` file.
    pub fn load_layers(
        user: Option<&Path>,
        root: &Path,
        explicit: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(user) = user.filter(|p| p.is_file()) {
            log::debug!("Loading user config from {}", user.display());
            warn_unknown_keys(user);
            figment = figment.merge(Toml::file(user));
        }

        if let Some(project) = find_project_config(root) {
            log::debug!("Loading project config from {}", project.display());
            warn_unknown_keys(&project);
            figment = figment.merge(Toml::file(&project));
        }

        if let Some(explicit) = explicit {
            if !explicit.is_file() {
                return Err(ConfigError::Load(figment::Error::from(format!(
                    "configuration file not found: {}",
                    explicit.display()
                ))));
            }
            log::debug!("Loading config from {}", explicit.display());
            warn_unknown_keys(explicit);
            figment = figment.merge(Toml::file(explicit));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Ok(figment.extract()?)
    }

    /// Load, apply command-line overrides, and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn resolve(args: &CheckArgs) -> Result<Self, ConfigError> {
        let user = if args.no_user_config {
            None
        } else {
            Self::user_config_path()
        };
        let mut config = Self::load_layers(user.as_deref(), &args.path, args.config.as_deref())?;
        config.apply_check_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Apply `check` flags on top of the loaded layers.
    ///
    /// Ignore patterns are appended; include patterns replace the list.
    pub fn apply_check_args(&mut self, args: &CheckArgs) {
        if let Some(min_lines) = args.min_lines {
            self.min_lines = min_lines;
        }
        if let Some(min_chars) = args.min_chars {
            self.min_chars = min_chars;
        }
        if let Some(threshold) = args.failure_threshold {
            self.failure_threshold = threshold;
        }
        if let Some(line_counting) = args.line_counting {
            self.line_counting = line_counting;
        }
        if let Some(io_threads) = args.io_threads {
            self.io_threads = io_threads;
        }
        if !args.include_patterns.is_empty() {
            self.include.clone_from(&args.include_patterns);
        }
        self.ignore.extend(args.ignore_patterns.iter().cloned());
        if args.follow_symlinks {
            self.follow_symlinks = true;
        }
        if args.no_gitignore {
            self.respect_gitignore = false;
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_lines == 0 {
            return Err(ConfigError::Invalid {
                field: "min_lines",
                message: "must be at least 1".to_string(),
            });
        }
        if !self.failure_threshold.is_finite() || !(0.0..=100.0).contains(&self.failure_threshold)
        {
            return Err(ConfigError::Invalid {
                field: "failure_threshold",
                message: format!("must be between 0 and 100, got {}", self.failure_threshold),
            });
        }
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid {
                field: "io_threads",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Detection settings for the engine.
    #[must_use]
    pub fn to_detection_config(&self) -> DetectionConfig {
        DetectionConfig::default()
            .with_min_lines(self.min_lines)
            .with_min_chars(self.min_chars)
            .with_line_counting(self.line_counting)
    }

    /// Discovery settings for the walker.
    #[must_use]
    pub fn to_walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            include_patterns: self.include.clone(),
            ignore_patterns: self.ignore.clone(),
            respect_gitignore: self.respect_gitignore,
            follow_symlinks: self.follow_symlinks,
        }
    }

    /// Write the default configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyExists`] when `path` exists and `force`
    /// is false, or a serialization/write error.
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        let content = toml::to_string_pretty(&Config::default())?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// The platform-specific user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "textdupe").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Find the project configuration file in `root`.
#[must_use]
pub fn find_project_config(root: &Path) -> Option<PathBuf> {
    PROJECT_CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Closest known key to `key`, if similar enough.
#[must_use]
pub fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}

/// Top-level keys of the TOML file at `path` that are not configuration keys.
///
/// Each key is paired with a suggested replacement when one exists. Files
/// that cannot be parsed yield no keys; the figment load reports them.
#[must_use]
pub fn unknown_keys(path: &Path) -> Vec<(String, Option<&'static str>)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return Vec::new();
    };
    table
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .map(|key| (key.clone(), suggest_key(key)))
        .collect()
}

fn warn_unknown_keys(path: &Path) {
    for (key, suggestion) in unknown_keys(path) {
        match suggestion {
            Some(known) => log::warn!(
                "Unknown configuration key `{}` in {} (did you mean `{}`?)",
                key,
                path.display(),
                known
            ),
            None => log::warn!(
                "Unknown configuration key `{}` in {}",
                key,
                path.display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.min_lines, 3);
        assert_eq!(config.min_chars, 50);
        assert_eq!(config.failure_threshold, 90.0);
        assert_eq!(config.line_counting, LineCounting::Legacy);
        assert_eq!(config.io_threads, 4);
        assert!(config.include.contains(&"**/*.md".to_string()));
        assert!(config.ignore.contains(&"node_modules/".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            min_lines: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "min_lines",
                ..
            })
        ));

        for threshold in [f64::NAN, f64::INFINITY, -0.5, 100.5] {
            let config = Config {
                failure_threshold: threshold,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid {
                    field: "failure_threshold",
                    ..
                })
            ));
        }

        let config = Config {
            io_threads: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "io_threads",
                ..
            })
        ));
    }

    #[test]
    fn test_apply_check_args() {
        let mut config = Config::default();
        let args = CheckArgs {
            min_lines: Some(2),
            failure_threshold: Some(75.0),
            ignore_patterns: vec!["drafts/".to_string()],
            include_patterns: vec!["*.txt".to_string()],
            no_gitignore: true,
            ..Default::default()
        };
        config.apply_check_args(&args);

        assert_eq!(config.min_lines, 2);
        assert_eq!(config.min_chars, 50);
        assert_eq!(config.failure_threshold, 75.0);
        assert_eq!(config.include, vec!["*.txt".to_string()]);
        assert!(config.ignore.contains(&"node_modules/".to_string()));
        assert!(config.ignore.contains(&"drafts/".to_string()));
        assert!(!config.respect_gitignore);
    }

    #[test]
    fn test_to_detection_and_walker_config() {
        let config = Config {
            min_lines: 5,
            min_chars: 10,
            line_counting: LineCounting::Newlines,
            follow_symlinks: true,
            ..Default::default()
        };
        let detection = config.to_detection_config();
        assert_eq!(detection.min_lines, 5);
        assert_eq!(detection.min_chars, 10);
        assert_eq!(detection.line_counting, LineCounting::Newlines);

        let walker = config.to_walker_config();
        assert_eq!(walker.include_patterns, config.include);
        assert!(walker.follow_symlinks);
        assert!(walker.respect_gitignore);
    }

    #[test]
    fn test_suggest_key() {
        assert_eq!(suggest_key("min_line"), Some("min_lines"));
        assert_eq!(suggest_key("failure_treshold"), Some("failure_threshold"));
        assert_eq!(suggest_key("zzz"), None);
    }

    #[test]
    fn test_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_lines = 2\nmin_chrs = 5\ncolour = true\n").unwrap();

        let mut keys = unknown_keys(&path);
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ("colour".to_string(), None),
                ("min_chrs".to_string(), Some("min_chars")),
            ]
        );
    }

    #[test]
    fn test_find_project_config_prefers_dotfile() {
        let dir = TempDir::new().unwrap();
        assert!(find_project_config(dir.path()).is_none());

        fs::write(dir.path().join("textdupe.toml"), "").unwrap();
        assert_eq!(
            find_project_config(dir.path()),
            Some(dir.path().join("textdupe.toml"))
        );

        fs::write(dir.path().join(".textdupe.toml"), "").unwrap();
        assert_eq!(
            find_project_config(dir.path()),
            Some(dir.path().join(".textdupe.toml"))
        );
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".textdupe.toml");

        Config::write_default(&path, false).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("min_lines = 3"));
        assert!(written.contains("line_counting = \"legacy\""));

        assert!(matches!(
            Config::write_default(&path, false),
            Err(ConfigError::AlreadyExists(_))
        ));
        assert!(Config::write_default(&path, true).is_ok());
    }
}
