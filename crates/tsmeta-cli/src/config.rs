use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tsmeta::core::io::ts::DEFAULT_MAX_HEADER_LINES;
use tsmeta::engine::discovery::{DEFAULT_EXTENSIONS, DiscoveryConfig};

const CONFIG_FILE_NAME: &str = "tsmeta.toml";

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSettings {
    #[serde(default)]
    pub discovery: DiscoverySection,
    #[serde(default)]
    pub parser: ParserSection,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct DiscoverySection {
    /// Extra directories searched by auto-discovery, after the working
    /// directory and before the home directory.
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
    /// Candidate file extensions; replaces the default `txt`/`ts` pair.
    pub extensions: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ParserSection {
    pub max_header_lines: Option<usize>,
}

/// Effective settings after merging the optional config file with the
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub discovery: DiscoveryConfig,
    pub max_header_lines: usize,
}

impl Settings {
    /// Loads settings from an explicit config path, from `./tsmeta.toml`
    /// when present, or falls back to defaults. An explicit path that is
    /// missing or malformed is an error; the implicit file only has to
    /// parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file_settings = match explicit {
            Some(path) => Some(read_file(path)?),
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.is_file() {
                    debug!("using implicit config file {}", default.display());
                    Some(read_file(default)?)
                } else {
                    None
                }
            }
        };
        Ok(Self::from_file_settings(file_settings.unwrap_or_default()))
    }

    fn from_file_settings(file: FileSettings) -> Self {
        let mut search_dirs = vec![PathBuf::from(".")];
        search_dirs.extend(file.discovery.search_dirs);
        if let Some(dirs) = directories::BaseDirs::new() {
            search_dirs.push(dirs.home_dir().to_path_buf());
        }

        let extensions = file
            .discovery
            .extensions
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect());

        Self {
            discovery: DiscoveryConfig {
                search_dirs,
                extensions,
            },
            max_header_lines: file
                .parser
                .max_header_lines
                .unwrap_or(DEFAULT_MAX_HEADER_LINES),
        }
    }
}

fn read_file(path: &Path) -> Result<FileSettings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| CliError::Config(format!("invalid config {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let settings = Settings::from_file_settings(FileSettings::default());
        assert_eq!(settings.max_header_lines, DEFAULT_MAX_HEADER_LINES);
        assert_eq!(settings.discovery.extensions, vec!["txt", "ts"]);
        assert_eq!(settings.discovery.search_dirs[0], PathBuf::from("."));
    }

    #[test]
    fn config_file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tsmeta.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "[discovery]\nsearch-dirs = [\"/data/ts\"]\nextensions = [\"txt\"]\n\n[parser]\nmax-header-lines = 500\n"
        )
        .unwrap();
        drop(file);

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.max_header_lines, 500);
        assert_eq!(settings.discovery.extensions, vec!["txt"]);
        assert!(
            settings
                .discovery
                .search_dirs
                .contains(&PathBuf::from("/data/ts"))
        );
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tsmeta.toml");
        std::fs::write(&path, "[parser]\nmax-headr-lines = 10\n").unwrap();

        assert!(matches!(
            Settings::load(Some(&path)),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(CliError::Config(_))
        ));
    }
}
