use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use featurecard_core::{normalize_property_name, normalize_region, ConvertOptions};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "featurecard";
const CONFIG_FILENAME: &str = "config.toml";

/// File name the target handset imports contacts from.
pub const DEFAULT_OUTPUT: &str = "backup.dat";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub options: ConvertOptions,
    pub output: PathBuf,
    pub drop_unsupported: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            options: ConvertOptions::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            drop_unsupported: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid default_region value: {0}")]
    InvalidRegion(String),
    #[error("invalid strip_properties entry: {0}")]
    InvalidStripProperty(String),
    #[error("invalid output path: {0}")]
    InvalidOutput(PathBuf),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_region: Option<String>,
    output: Option<PathBuf>,
    drop_unsupported: Option<bool>,
    strip_properties: Option<Vec<String>>,
    suffixes: Option<SuffixesFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuffixesFile {
    mobile: Option<String>,
    fixed_line: Option<String>,
    uan: Option<String>,
}

/// Where the config file is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named on the command line; it has to exist.
    Explicit(PathBuf),
    /// The per-user default; a missing file means built-in defaults.
    Standard(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path) | ConfigLocation::Standard(path) => path,
        }
    }
}

/// Loads the config named by `--config`, or the per-user file when none is
/// given. Without either, the built-in defaults apply.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let location = match config_path {
        Some(path) if path.as_os_str().is_empty() => {
            return Err(ConfigError::InvalidConfigPath(path))
        }
        Some(path) => ConfigLocation::Explicit(path),
        None => match standard_config_path() {
            Some(path) => ConfigLocation::Standard(path),
            None => return Ok(AppConfig::default()),
        },
    };
    match read_config(&location)? {
        Some(parsed) => merge_config(parsed),
        None => Ok(AppConfig::default()),
    }
}

/// `$XDG_CONFIG_HOME/featurecard/config.toml`, or under `~/.config` when
/// the variable is unset or empty.
pub fn standard_config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
    Some(base.join(APP_DIR).join(CONFIG_FILENAME))
}

fn read_config(location: &ConfigLocation) -> Result<Option<ConfigFile>> {
    let path = location.path();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return match location {
                ConfigLocation::Explicit(_) => {
                    Err(ConfigError::MissingConfigFile(path.to_path_buf()))
                }
                ConfigLocation::Standard(_) => Ok(None),
            };
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(region) = parsed.default_region {
        config.options.region =
            normalize_region(&region).map_err(|_| ConfigError::InvalidRegion(region))?;
    }

    if let Some(output) = parsed.output {
        if output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidOutput(output));
        }
        config.output = output;
    }

    if let Some(drop_unsupported) = parsed.drop_unsupported {
        config.drop_unsupported = drop_unsupported;
    }

    if let Some(names) = parsed.strip_properties {
        let mut normalized = Vec::with_capacity(names.len());
        for name in names {
            let value = normalize_property_name(&name)
                .map_err(|_| ConfigError::InvalidStripProperty(name.clone()))?;
            if !normalized.contains(&value) {
                normalized.push(value);
            }
        }
        config.options.strip_properties = normalized;
    }

    if let Some(suffixes) = parsed.suffixes {
        if let Some(mobile) = suffixes.mobile {
            config.options.suffixes.mobile = mobile;
        }
        if let Some(fixed_line) = suffixes.fixed_line {
            config.options.suffixes.fixed_line = fixed_line;
        }
        if let Some(uan) = suffixes.uan {
            config.options.suffixes.uan = uan;
        }
    }

    Ok(config)
}
